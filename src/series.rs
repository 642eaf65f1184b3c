//! Daily spending series for the monthly trend chart.

use crate::{
    grouping::local_date, navigation::Period, record::ExpenseRecord, timezone::LocalTimezone,
};

/// Only every `LABEL_STRIDE`th day label is shown on the chart's x-axis,
/// starting with day 1.
pub const LABEL_STRIDE: usize = 3;

/// The amount spent on each day of a month.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySeries {
    /// The month the series covers.
    pub period: Period,
    /// One total per calendar day, index 0 is the first day of the month.
    pub values: Vec<f64>,
}

impl DailySeries {
    /// The x-axis labels for the series, see [day_labels].
    pub fn labels(&self) -> Vec<String> {
        day_labels(self.values.len())
    }

    /// The sum of every day in the series.
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }
}

/// Sums the amounts of `records` per day of `period`.
///
/// The series has one entry per calendar day, so February of a leap year
/// has 29 entries. Days without records are 0.
///
/// Records are expected to belong to `period`. A record whose local date
/// falls in a different month is skipped and logged rather than added to
/// the wrong day.
pub fn build_daily_series(
    period: Period,
    records: &[ExpenseRecord],
    timezone: &LocalTimezone,
) -> DailySeries {
    let mut values = vec![0.0; usize::from(period.days_in_month())];

    for record in records {
        let date = local_date(record, timezone);

        if date.year() != period.year || date.month() != period.month {
            tracing::warn!(
                "Skipping record \"{}\" dated {date} in the series for {period}",
                record.category
            );
            continue;
        }

        values[usize::from(date.day()) - 1] += record.amount;
    }

    DailySeries { period, values }
}

/// Labels for `days` days: "1" to `days`, with only every
/// [LABEL_STRIDE]th label shown and the rest blank.
pub fn day_labels(days: usize) -> Vec<String> {
    (0..days)
        .map(|index| {
            if index % LABEL_STRIDE == 0 {
                (index + 1).to_string()
            } else {
                String::new()
            }
        })
        .collect()
}
