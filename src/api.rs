//! The operations of the remote expense service and their JSON wire types.
//!
//! The service wraps every response body in an object with a `results`
//! field. Write requests answer with an outcome whose `results` is the
//! string "success" when the request was accepted.

use std::future::Future;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error, aggregation::Summary, navigation::Period, record::Credential, record::ExpenseRecord,
};

/// The remote expense service.
///
/// [crate::ApiClient] talks to the real service over HTTP. The trait lets
/// [crate::MonthView] be driven by any implementation, e.g. an in-memory
/// one in tests.
pub trait ExpenseApi: Send + Sync {
    /// Get every record of `period`.
    fn fetch_records(
        &self,
        period: Period,
        credential: &Credential,
    ) -> impl Future<Output = Result<Vec<ExpenseRecord>, Error>> + Send;

    /// Get the spending summary of `period` as computed by the service.
    fn fetch_summary(
        &self,
        period: Period,
        credential: &Credential,
    ) -> impl Future<Output = Result<Summary, Error>> + Send;

    /// Get the user's categories.
    fn fetch_categories(
        &self,
        credential: &Credential,
    ) -> impl Future<Output = Result<Vec<Category>, Error>> + Send;

    /// Create a new record.
    fn submit_record(
        &self,
        credential: &Credential,
        record: &NewRecord,
    ) -> impl Future<Output = Result<(), Error>> + Send;

    /// Upload an audio clip for the service to turn into a record.
    fn submit_audio_record(
        &self,
        credential: &Credential,
        audio: &[u8],
    ) -> impl Future<Output = Result<(), Error>> + Send;

    /// Create a new category.
    fn submit_category(
        &self,
        credential: &Credential,
        name: &str,
        emoji: &str,
    ) -> impl Future<Output = Result<(), Error>> + Send;

    /// Check a username and password and get the credential for them.
    fn log_in(
        &self,
        username: &str,
        password: &str,
    ) -> impl Future<Output = Result<Credential, Error>> + Send;

    /// Register a new user.
    fn sign_up(
        &self,
        username: &str,
        password: &str,
    ) -> impl Future<Output = Result<(), Error>> + Send;
}

/// The envelope around every response body.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiResults<T> {
    pub(crate) results: T,
}

/// The reply to a write request.
#[derive(Debug, Deserialize)]
pub(crate) struct Outcome {
    pub(crate) results: String,
    #[serde(default)]
    pub(crate) message: Option<String>,
}

impl Outcome {
    /// Turns anything but "success" into [Error::Rejected].
    pub(crate) fn into_result(self) -> Result<(), Error> {
        if self.results == "success" {
            Ok(())
        } else {
            Err(Error::Rejected(
                self.message.unwrap_or_else(|| self.results.clone()),
            ))
        }
    }
}

/// The spending summary of a month as sent by the expense service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryPayload {
    /// The total amount spent.
    pub total_expenses: f64,
    /// The number of records.
    pub total_expenses_records: usize,
    /// The amount per category, as records holding the category totals.
    #[serde(default)]
    pub top_categories: Vec<ExpenseRecord>,
}

/// A category expenses can be filed under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// The ID of the category.
    pub id: i64,
    /// The category name, e.g. "Food".
    pub name: String,
    /// The emoji shown next to the category.
    pub emoji: String,
}

/// A record to be created.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    /// The amount spent.
    pub amount: f64,
    /// The name of the category.
    pub category: String,
    /// When the expense happened as a Unix timestamp in milliseconds.
    pub recorded_at: i64,
}

impl NewRecord {
    /// A record of `amount` spent on `category` at `recorded_at`.
    pub fn new(amount: f64, category: &str, recorded_at: OffsetDateTime) -> Self {
        Self {
            amount,
            category: category.to_owned(),
            recorded_at: (recorded_at.unix_timestamp_nanos() / 1_000_000) as i64,
        }
    }

    /// The timestamp in seconds, the unit the create endpoint expects.
    pub fn wire_seconds(&self) -> f64 {
        self.recorded_at as f64 / 1000.0
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct NewRecordBody<'a> {
    pub(crate) category: &'a str,
    pub(crate) amount: f64,
    pub(crate) recorded_at: f64,
}

impl<'a> From<&'a NewRecord> for NewRecordBody<'a> {
    fn from(record: &'a NewRecord) -> Self {
        Self {
            category: &record.category,
            amount: record.amount,
            recorded_at: record.wire_seconds(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct NewCategoryBody<'a> {
    pub(crate) name: &'a str,
    pub(crate) emoji: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct AudioRecordBody {
    pub(crate) base64: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct UserBody<'a> {
    pub(crate) username: &'a str,
    pub(crate) password: &'a str,
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::{ApiResults, NewRecord, NewRecordBody, Outcome, SummaryPayload};
    use crate::Error;

    #[test]
    fn success_outcome_is_ok() {
        let outcome: Outcome = serde_json::from_str(r#"{"results":"success"}"#).unwrap();

        assert_eq!(outcome.into_result(), Ok(()));
    }

    #[test]
    fn failed_outcome_carries_message() {
        let outcome: Outcome =
            serde_json::from_str(r#"{"results":"failed","message":"category not found"}"#)
                .unwrap();

        assert_eq!(
            outcome.into_result(),
            Err(Error::Rejected("category not found".to_owned()))
        );
    }

    #[test]
    fn summary_payload_reads_camel_case() {
        let json = r#"{"results":{
            "totalExpenses":15,
            "totalExpensesRecords":2,
            "topCategories":[{"category":"Food","amount":15,"emoji":"🍔"}]
        }}"#;

        let payload: ApiResults<SummaryPayload> = serde_json::from_str(json).unwrap();

        assert_eq!(payload.results.total_expenses, 15.0);
        assert_eq!(payload.results.total_expenses_records, 2);
        assert_eq!(payload.results.top_categories[0].category, "Food");
        assert_eq!(payload.results.top_categories[0].recorded_at, None);
    }

    #[test]
    fn new_record_stores_milliseconds() {
        let record = NewRecord::new(3.0, "Bus", datetime!(2023-11-14 22:13:20.25 UTC));

        assert_eq!(record.recorded_at, 1_700_000_000_250);
        assert_eq!(record.category, "Bus");
    }

    #[test]
    fn new_record_is_sent_in_seconds() {
        let record = NewRecord {
            amount: 12.5,
            category: "Food".to_owned(),
            recorded_at: 1_700_000_000_500,
        };

        let body = serde_json::to_value(NewRecordBody::from(&record)).unwrap();

        assert_eq!(body["recorded_at"], 1_700_000_000.5);
        assert_eq!(body["category"], "Food");
        assert_eq!(body["amount"], 12.5);
    }
}
