//! The expense record returned by the expense service and the credential used
//! to fetch it.

use std::fmt;

use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;

/// A single expense, i.e. an event where money was spent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRecord {
    /// The name of the category the money was spent on, e.g. "Food".
    pub category: String,
    /// The amount of money spent. Never negative.
    pub amount: f64,
    /// The emoji of the record's category.
    #[serde(default)]
    pub emoji: String,
    /// When the expense happened as a Unix timestamp in milliseconds.
    ///
    /// Records without a timestamp are treated as if they happened at the
    /// Unix epoch, see [ExpenseRecord::recorded_at_ms].
    #[serde(default, deserialize_with = "deserialize_millis")]
    pub recorded_at: Option<i64>,
}

impl ExpenseRecord {
    /// Create a new record.
    pub fn new(category: &str, amount: f64, emoji: &str, recorded_at: Option<i64>) -> Self {
        Self {
            category: category.to_owned(),
            amount,
            emoji: emoji.to_owned(),
            recorded_at,
        }
    }

    /// The timestamp in milliseconds, with a missing timestamp read as 0.
    pub fn recorded_at_ms(&self) -> i64 {
        self.recorded_at.unwrap_or(0)
    }

    /// The UTC instant the record was made.
    ///
    /// Missing timestamps and timestamps outside the range `time` can
    /// represent fall back to the Unix epoch.
    pub fn recorded_instant(&self) -> OffsetDateTime {
        let millis = self.recorded_at_ms();

        match OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000) {
            Ok(instant) => instant,
            Err(error) => {
                tracing::warn!(
                    "timestamp {millis} of record \"{}\" is out of range ({error}), using the epoch",
                    self.category
                );
                OffsetDateTime::UNIX_EPOCH
            }
        }
    }
}

/// Accepts integer and floating point millisecond values.
fn deserialize_millis<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let millis: Option<f64> = Option::deserialize(deserializer)?;

    Ok(millis.map(|millis| millis.round() as i64))
}

/// The opaque token that authenticates requests to the expense service.
///
/// The token is sent as-is in a `Basic` authorization header.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap an existing token, e.g. one read from the environment.
    pub fn new(token: &str) -> Self {
        Self(token.trim().to_owned())
    }

    /// Create the token the expense service expects for a username and password.
    pub fn basic(username: &str, password: &str) -> Self {
        Self(STANDARD.encode(format!("{username}:{password}")))
    }

    /// The raw token.
    pub fn token(&self) -> &str {
        &self.0
    }

    /// The value of the `Authorization` header for this credential.
    pub(crate) fn header_value(&self) -> String {
        format!("Basic {}", self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(********)")
    }
}
