//! Grouping of expense records into calendar days for the per-day list.

use std::{collections::BTreeMap, fmt};

use time::Date;

use crate::{record::ExpenseRecord, timezone::LocalTimezone};

/// A calendar day formatted as "YYYY-MM-DD".
///
/// The format is zero padded, so comparing keys as strings orders them
/// chronologically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DateKey(String);

impl DateKey {
    /// The key for `date`.
    pub fn from_date(date: Date) -> Self {
        Self(format!(
            "{:04}-{:02}-{:02}",
            date.year(),
            date.month() as u8,
            date.day()
        ))
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// The records made on a single calendar day, most recent first.
#[derive(Debug, Clone, PartialEq)]
pub struct DayBucket {
    /// The day formatted as "YYYY-MM-DD".
    pub key: DateKey,
    /// The day the records were made on.
    pub date: Date,
    /// The records made on this day, sorted by time, most recent first.
    pub records: Vec<ExpenseRecord>,
}

impl DayBucket {
    /// The sum of the amounts of every record in the bucket.
    pub fn total(&self) -> f64 {
        self.records.iter().map(|record| record.amount).sum()
    }
}

/// The local calendar date `record` was made on.
pub(crate) fn local_date(record: &ExpenseRecord, timezone: &LocalTimezone) -> Date {
    timezone.to_local(record.recorded_instant()).date()
}

/// Groups records by the local calendar day they were made on.
///
/// Buckets are returned most recent day first, and the records in each
/// bucket are sorted most recent first. Records with the same timestamp keep
/// the order they were given in. Records without a timestamp are grouped
/// under the day of the Unix epoch.
///
/// An empty slice gives an empty vector.
pub fn group_records_by_day(
    records: &[ExpenseRecord],
    timezone: &LocalTimezone,
) -> Vec<DayBucket> {
    let mut records_by_day: BTreeMap<DateKey, (Date, Vec<ExpenseRecord>)> = BTreeMap::new();

    for record in records {
        let date = local_date(record, timezone);
        records_by_day
            .entry(DateKey::from_date(date))
            .or_insert_with(|| (date, Vec::new()))
            .1
            .push(record.clone());
    }

    records_by_day
        .into_iter()
        .rev()
        .map(|(key, (date, mut records))| {
            // `sort_by` is stable, so ties keep their input order.
            records.sort_by(|a, b| b.recorded_at_ms().cmp(&a.recorded_at_ms()));
            DayBucket { key, date, records }
        })
        .collect()
}
