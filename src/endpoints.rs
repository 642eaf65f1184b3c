//! The expense service endpoint URIs.
//!
//! Paths are relative to the base URL in [crate::ApiConfig]. Month scoped
//! endpoints take the period as `year` and `month` query parameters, see
//! [month_query].

use crate::navigation::Period;

/// The route to fetch a month's records or create a new record.
pub const RECORDS: &str = "/records";
/// The route to fetch the spending summary of a month.
pub const EXPENSES: &str = "/expenses";
/// The route to fetch or create categories.
pub const CATEGORIES: &str = "/categories";
/// The route to create a record from an audio clip.
pub const AUDIO_RECORDS: &str = "/audioRecords";
/// The route for logging in a user.
pub const LOG_IN: &str = "/login";
/// The route for registering a new user.
pub const SIGN_UP: &str = "/signup";

/// The query parameters that select `period`.
pub fn month_query(period: Period) -> [(&'static str, String); 2] {
    [
        ("year", period.year.to_string()),
        ("month", period.month_number().to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use time::Month;

    use super::month_query;
    use crate::navigation::Period;

    #[test]
    fn month_query_uses_month_number() {
        let query = month_query(Period::new(2024, Month::March));

        assert_eq!(
            query,
            [("year", "2024".to_owned()), ("month", "3".to_owned())]
        );
    }
}
