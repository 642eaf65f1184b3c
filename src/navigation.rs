//! Month-to-month navigation driven by a circular carousel of twelve slots.
//!
//! Slot 0 is January and slot 11 is December. The carousel wraps around, so
//! moving from December (slot 11) to January (slot 0) means moving into the
//! next year, and moving from January back to December means moving into the
//! previous year.

use std::fmt;

use time::Month;

use crate::{Error, format::month_label, timezone::LocalTimezone};

/// The number of slots in the month carousel.
pub const SLOT_COUNT: u8 = 12;

/// A calendar month of a specific year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Period {
    /// The calendar year, e.g. 2024.
    pub year: i32,
    /// The month of the year.
    pub month: Month,
}

impl Period {
    /// Create a period from a year and a month.
    pub fn new(year: i32, month: Month) -> Self {
        Self { year, month }
    }

    /// Create a period from a year and a month number from 1 to 12.
    ///
    /// # Errors
    /// Returns [Error::InvalidMonth] if `month` is outside `1..=12`.
    pub fn from_numbers(year: i32, month: u8) -> Result<Self, Error> {
        let month = Month::try_from(month).map_err(|_| Error::InvalidMonth(month))?;

        Ok(Self { year, month })
    }

    /// The month as a number from 1 to 12.
    pub fn month_number(&self) -> u8 {
        self.month as u8
    }

    /// The three letter name of the month, e.g. "Jan".
    pub fn label(&self) -> &'static str {
        month_label(self.month)
    }

    /// The number of days in this month, accounting for leap years.
    pub fn days_in_month(&self) -> u8 {
        match self.month {
            Month::January
            | Month::March
            | Month::May
            | Month::July
            | Month::August
            | Month::October
            | Month::December => 31,
            Month::April | Month::June | Month::September | Month::November => 30,
            Month::February => {
                if time::util::is_leap_year(self.year) {
                    29
                } else {
                    28
                }
            }
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.label(), self.year)
    }
}

/// Tracks the month on display and the carousel slot it was reached from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthCursor {
    period: Period,
    last_slot: u8,
}

impl MonthCursor {
    /// Create a cursor that starts at `period`.
    ///
    /// The carousel starts on the slot of the period's month so that the
    /// first wrap-around adjusts the year correctly.
    pub fn new(period: Period) -> Self {
        Self {
            period,
            last_slot: period.month_number() - 1,
        }
    }

    /// Create a cursor that starts at the current month in `timezone`.
    pub fn current(timezone: &LocalTimezone) -> Self {
        let now = timezone.now();

        Self::new(Period::new(now.year(), now.month()))
    }

    /// The period the cursor points at.
    pub fn period(&self) -> Period {
        self.period
    }

    /// The carousel slot the cursor was last moved to.
    pub fn last_slot(&self) -> u8 {
        self.last_slot
    }

    /// The three letter name of the current month, e.g. "Jan".
    pub fn label(&self) -> &'static str {
        self.period.label()
    }

    /// Move the cursor to the month in carousel slot `slot`.
    ///
    /// The year only changes when the carousel wraps from December to
    /// January (next year) or from January to December (previous year).
    /// The carousel only reports moves to adjacent slots, other jumps keep
    /// the current year.
    ///
    /// # Errors
    /// Returns [Error::InvalidSlot] if `slot` is not in `0..=11`. The cursor
    /// is left unchanged.
    pub fn advance(&mut self, slot: u8) -> Result<Period, Error> {
        if slot >= SLOT_COUNT {
            return Err(Error::InvalidSlot(slot));
        }

        let month = Month::try_from(slot + 1).map_err(|_| Error::InvalidSlot(slot))?;
        let year = match (self.last_slot, slot) {
            (11, 0) => self.period.year + 1,
            (0, 11) => self.period.year - 1,
            _ => self.period.year,
        };

        self.period = Period::new(year, month);
        self.last_slot = slot;

        Ok(self.period)
    }

    /// Move the cursor forward by one month.
    pub fn next_month(&mut self) -> Period {
        let slot = (self.last_slot + 1) % SLOT_COUNT;
        self.advance_unchecked(slot)
    }

    /// Move the cursor back by one month.
    pub fn previous_month(&mut self) -> Period {
        let slot = (self.last_slot + SLOT_COUNT - 1) % SLOT_COUNT;
        self.advance_unchecked(slot)
    }

    fn advance_unchecked(&mut self, slot: u8) -> Period {
        // Slots computed modulo SLOT_COUNT are always valid.
        self.advance(slot).unwrap_or(self.period)
    }
}
