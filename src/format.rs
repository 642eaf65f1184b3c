//! Formatting of amounts, times and months for display.

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};
use time::{Month, OffsetDateTime};

use crate::{record::ExpenseRecord, timezone::LocalTimezone};

/// Format `number` as dollars with thousands separators and two decimal
/// places, e.g. "$1,234.50" or "-$10.00".
pub fn format_currency(number: f64) -> String {
    static POSITIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| {
        Formatter::currency("$")
            .expect("\"$\" is a valid currency prefix")
            .precision(Precision::Decimals(2))
    });

    static NEGATIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let negative_fmt = NEGATIVE_FMT.get_or_init(|| {
        Formatter::currency("-$")
            .expect("\"-$\" is a valid currency prefix")
            .precision(Precision::Decimals(2))
    });

    // Round to cents first so the formatter never sees more precision than it prints.
    let number = (number * 100.0).round() / 100.0;

    let formatted_string = if number < 0.0 {
        negative_fmt.fmt_string(number.abs())
    } else if number > 0.0 {
        positive_fmt.fmt_string(number)
    } else {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        return "$0.00".to_owned();
    };

    pad_cents(formatted_string)
}

/// numfmt drops trailing zeros, e.g. "12.30" is rendered as "12.3" and
/// "15.00" as "15" or "15.0", so pad the fraction back out to two digits.
fn pad_cents(mut formatted_string: String) -> String {
    match formatted_string.rfind('.') {
        None => formatted_string.push_str(".00"),
        Some(dot) => {
            let decimals = formatted_string.len() - dot - 1;
            for _ in decimals..2 {
                formatted_string.push('0');
            }
        }
    }

    formatted_string
}

/// The local time of day a record was made as "HH:MM".
pub fn format_hour_minute(record: &ExpenseRecord, timezone: &LocalTimezone) -> String {
    let local = timezone.to_local(record.recorded_instant());

    format!("{:02}:{:02}", local.hour(), local.minute())
}

/// A date and time as "MM/DD/YYYY HH:MM".
pub fn format_date_time(date_time: OffsetDateTime) -> String {
    format!(
        "{:02}/{:02}/{} {:02}:{:02}",
        date_time.month() as u8,
        date_time.day(),
        date_time.year(),
        date_time.hour(),
        date_time.minute()
    )
}

/// The three letter abbreviation of a month, e.g. "Jan".
pub fn month_label(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}
