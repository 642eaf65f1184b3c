//! Conversion of UTC instants into the user's local time.

use std::fmt;

use time::{
    OffsetDateTime, PrimitiveDateTime, UtcOffset, format_description::BorrowedFormatItem,
    macros::format_description,
};
use time_tz::{Offset, TimeZone, Tz};

use crate::Error;

const LOCAL_DATE_TIME_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]");

/// The timezone used to decide which calendar day a record falls on.
#[derive(Clone, Copy)]
pub enum LocalTimezone {
    /// A fixed offset from UTC.
    Fixed(UtcOffset),
    /// A timezone from the IANA database, e.g. "Pacific/Auckland".
    ///
    /// The offset is looked up per instant so daylight saving changes are
    /// applied to the day each record was made.
    Named(&'static Tz),
}

impl LocalTimezone {
    /// UTC, mostly useful for tests.
    pub const UTC: LocalTimezone = LocalTimezone::Fixed(UtcOffset::UTC);

    /// Look up a canonical timezone name such as "Pacific/Auckland" or "UTC".
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezone] if the name is not in the timezone database.
    pub fn from_name(canonical_timezone: &str) -> Result<Self, Error> {
        time_tz::timezones::get_by_name(canonical_timezone)
            .map(LocalTimezone::Named)
            .ok_or_else(|| Error::InvalidTimezone(canonical_timezone.to_owned()))
    }

    /// The UTC offset in effect at `instant`.
    pub fn offset_at(&self, instant: OffsetDateTime) -> UtcOffset {
        match self {
            LocalTimezone::Fixed(offset) => *offset,
            LocalTimezone::Named(tz) => tz.get_offset_utc(&instant).to_utc(),
        }
    }

    /// `instant` expressed in local time.
    ///
    /// An instant whose local date is outside the range `time` can represent,
    /// e.g. late on 9999-12-31 UTC in a zone ahead of UTC, falls back to the
    /// Unix epoch.
    pub fn to_local(&self, instant: OffsetDateTime) -> OffsetDateTime {
        let offset = self.offset_at(instant);

        instant.checked_to_offset(offset).unwrap_or_else(|| {
            tracing::warn!("{instant} is out of range at offset {offset}, using the epoch");
            let epoch = OffsetDateTime::UNIX_EPOCH;
            epoch.to_offset(self.offset_at(epoch))
        })
    }

    /// Read a wall clock time as a time in this timezone.
    ///
    /// During a daylight saving transition the offset in effect just after
    /// the transition is used.
    pub fn assume_local(&self, date_time: PrimitiveDateTime) -> OffsetDateTime {
        let offset = self.offset_at(date_time.assume_utc());

        date_time.assume_offset(offset)
    }

    /// Parse a local date and time written as "YYYY-MM-DD HH:MM".
    ///
    /// # Errors
    /// Returns [Error::InvalidDateTime] if `text` does not match the format.
    pub fn parse_local(&self, text: &str) -> Result<OffsetDateTime, Error> {
        let date_time = PrimitiveDateTime::parse(text.trim(), LOCAL_DATE_TIME_FORMAT)
            .map_err(|_| Error::InvalidDateTime(text.to_owned()))?;

        Ok(self.assume_local(date_time))
    }

    /// The current local date and time.
    pub fn now(&self) -> OffsetDateTime {
        self.to_local(OffsetDateTime::now_utc())
    }
}

impl fmt::Debug for LocalTimezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocalTimezone::Fixed(offset) => write!(f, "Fixed({offset})"),
            LocalTimezone::Named(tz) => write!(f, "Named({})", tz.name()),
        }
    }
}
