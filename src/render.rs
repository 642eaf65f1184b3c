//! Plain text rendering of a month snapshot for the terminal.

use crate::{
    aggregation::CategoryShare,
    api::Category,
    format::{format_currency, format_hour_minute},
    grouping::DayBucket,
    month_view::MonthSnapshot,
    timezone::LocalTimezone,
};

const BAR_WIDTH: usize = 20;

/// The records, overview and distribution of a month as text.
pub fn render_month_report(snapshot: &MonthSnapshot, timezone: &LocalTimezone) -> String {
    let period = snapshot.period;
    let mut lines = vec![
        period.to_string(),
        format!("💸 Expenses {:>20}", format_currency(snapshot.total)),
        String::new(),
    ];

    if snapshot.days.is_empty() {
        lines.push(format!(
            "No expenses data available for {}/{}.",
            period.month_number(),
            period.year
        ));
    } else {
        for day in &snapshot.days {
            render_day(day, timezone, &mut lines);
        }
    }

    lines.push(String::new());
    lines.push(snapshot.overview.title.clone());
    lines.push(format!("Expenses: {}", snapshot.overview.expenses));
    lines.push(format!("Records:  {}", snapshot.overview.record_count));

    lines.push(String::new());
    lines.push("Distribution".to_owned());

    if snapshot.distribution.is_empty() {
        lines.push("No Data".to_owned());
    } else {
        lines.extend(snapshot.distribution.iter().map(render_share));
    }

    lines.join("\n")
}

fn render_day(day: &DayBucket, timezone: &LocalTimezone, lines: &mut Vec<String>) {
    lines.push(format!("{:<24}{:>12}", day.key, format_currency(-day.total())));

    for record in &day.records {
        lines.push(format!(
            "  {} {:<14} {}{:>12}",
            record.emoji,
            record.category,
            format_hour_minute(record, timezone),
            format_currency(-record.amount)
        ));
    }
}

fn render_share(share: &CategoryShare) -> String {
    let filled = ((share.bar_ratio * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);

    format!(
        "{} {:<14} {:>12} {:>8} {}{}",
        share.emoji,
        share.category,
        share.amount_label,
        share.percentage,
        "█".repeat(filled),
        "░".repeat(BAR_WIDTH - filled)
    )
}

/// One line per category: the emoji and the name.
pub fn render_categories(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories yet.".to_owned();
    }

    categories
        .iter()
        .map(|category| format!("{} {}", category.emoji, category.name))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use time::Month;

    use super::{render_categories, render_month_report};
    use crate::{
        aggregation::aggregate, api::Category, month_view::MonthSnapshot, navigation::Period,
        test_utils::record_at, timezone::LocalTimezone,
    };

    #[test]
    fn report_lists_days_and_distribution() {
        let records = vec![
            record_at("Food", 10.0, "2024-03-02 09:00"),
            record_at("Food", 5.0, "2024-03-02 18:30"),
            record_at("Rent", 30.0, "2024-03-01 12:00"),
        ];
        let period = Period::new(2024, Month::March);
        let snapshot =
            MonthSnapshot::build(period, &records, aggregate(&records), &LocalTimezone::UTC)
                .unwrap();

        let report = render_month_report(&snapshot, &LocalTimezone::UTC);

        assert!(report.starts_with("Mar 2024"), "got {report}");
        assert!(report.contains("2024-03-02"), "got {report}");
        assert!(report.contains("-$15.00"), "got {report}");
        assert!(report.contains("18:30"), "got {report}");
        assert!(report.contains("Mar Overview"), "got {report}");
        assert!(report.contains("Records:  3"), "got {report}");
        assert!(report.contains("66.67%"), "got {report}");
        assert!(!report.contains("No Data"), "got {report}");

        let newer = report.find("2024-03-02").unwrap();
        let older = report.find("2024-03-01").unwrap();
        assert!(newer < older, "days should be most recent first, got {report}");
    }

    #[test]
    fn empty_month_shows_placeholders() {
        let period = Period::new(2024, Month::February);
        let snapshot =
            MonthSnapshot::build(period, &[], aggregate(&[]), &LocalTimezone::UTC).unwrap();

        let report = render_month_report(&snapshot, &LocalTimezone::UTC);

        assert!(report.contains("No expenses data available for 2/2024."), "got {report}");
        assert!(report.contains("No Data"), "got {report}");
    }

    #[test]
    fn categories_are_listed_with_emoji() {
        let categories = vec![
            Category {
                id: 1,
                name: "Food".to_owned(),
                emoji: "🍔".to_owned(),
            },
            Category {
                id: 2,
                name: "Rent".to_owned(),
                emoji: "🏠".to_owned(),
            },
        ];

        assert_eq!(render_categories(&categories), "🍔 Food\n🏠 Rent");
        assert_eq!(render_categories(&[]), "No categories yet.");
    }
}
