//! Spendwise is a client for a personal expense tracking service.
//!
//! The library turns the flat list of expense records returned by the remote
//! service into the structures a month-by-month view needs: records bucketed
//! by day, a per-category spending distribution, a daily time series for
//! trend charts and the cursor that drives month-to-month navigation.

#![warn(missing_docs)]

mod aggregation;
mod api;
mod charts;
mod client;
mod config;
mod endpoints;
mod format;
mod grouping;
mod logging;
mod month_view;
mod navigation;
mod record;
mod render;
mod series;
mod timezone;
mod validation;

#[cfg(test)]
mod test_utils;

pub use aggregation::{
    CategoryShare, CategorySummary, Overview, Summary, aggregate, bar_ratio, distribution,
    overview, percentage_of,
};
pub use api::{Category, ExpenseApi, NewRecord, SummaryPayload};
pub use charts::daily_spend_chart;
pub use client::{ApiClient, ApiConfig, DEFAULT_TIMEOUT_MS};
pub use config::{Command, Config, SummarySource};
pub use format::{format_currency, format_date_time, format_hour_minute, month_label};
pub use grouping::{DateKey, DayBucket, group_records_by_day};
pub use logging::{LOG_BODY_LENGTH_LIMIT, setup_logging};
pub use month_view::{FetchEvent, FetchedMonth, MonthSnapshot, MonthView};
pub use navigation::{MonthCursor, Period};
pub use record::{Credential, ExpenseRecord};
pub use render::{render_categories, render_month_report};
pub use series::{DailySeries, LABEL_STRIDE, build_daily_series, day_labels};
pub use timezone::LocalTimezone;
pub use validation::{validate_amount, validate_category_name, validate_emoji};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A percentage was requested of a zero total.
    ///
    /// A month without expenses is a normal state, so callers should check
    /// for a zero total and show an empty state instead of asking for a
    /// percentage. [distribution] does this for you.
    #[error("cannot compute a percentage of a zero total")]
    DivisionByZero,

    /// A carousel slot outside `0..=11` was used to move the month cursor.
    #[error("{0} is not a valid month slot, expected a value from 0 to 11")]
    InvalidSlot(u8),

    /// A month number outside `1..=12` was given.
    #[error("{0} is not a valid month, expected a value from 1 to 12")]
    InvalidMonth(u8),

    /// The user entered an amount that is not a non-negative number with at
    /// most two decimal places.
    #[error("\"{0}\" is not a valid amount")]
    InvalidAmount(String),

    /// An empty string was used as a category name.
    #[error("category name cannot be empty")]
    EmptyCategoryName,

    /// The category emoji was empty or longer than a single character.
    #[error("\"{0}\" is not a single emoji")]
    InvalidEmoji(String),

    /// The canonical timezone name could not be found in the timezone database.
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),

    /// A date and time was not written as "YYYY-MM-DD HH:MM".
    #[error("\"{0}\" is not a date and time of the form YYYY-MM-DD HH:MM")]
    InvalidDateTime(String),

    /// The HTTP request could not be sent or its response could not be read.
    #[error("request to the expense service failed: {0}")]
    Request(String),

    /// The expense service answered with a non-success status code.
    #[error("the expense service responded with status {0}")]
    UnexpectedStatus(u16),

    /// The expense service processed the request but did not accept it.
    ///
    /// The string is the message returned by the service.
    #[error("the expense service rejected the request: {0}")]
    Rejected(String),

    /// The response body did not have the expected shape.
    #[error("could not parse the response from the expense service: {0}")]
    InvalidResponse(String),

    /// The audio file for a voice record could not be read.
    #[error("could not read audio file: {0}")]
    AudioFile(String),

    /// The password and its confirmation differ.
    #[error("the passwords do not match")]
    PasswordMismatch,

    /// A file could not be written or the terminal could not be read.
    #[error("I/O error: {0}")]
    Io(String),

    /// A command that talks to the expense service was run without a credential.
    #[error("no credential given, log in first and set SPENDWISE_TOKEN")]
    MissingCredential,
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            return Error::InvalidResponse(error.to_string());
        }

        match error.status() {
            Some(status) => Error::UnexpectedStatus(status.as_u16()),
            None => {
                tracing::error!("an unhandled request error occurred: {}", error);
                Error::Request(error.to_string())
            }
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::Io(error.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::InvalidResponse(error.to_string())
    }
}
