#![allow(missing_docs)]

use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
    time::Duration,
};

use crate::{
    Error,
    aggregation::Summary,
    api::{Category, ExpenseApi, NewRecord},
    navigation::Period,
    record::{Credential, ExpenseRecord},
    timezone::LocalTimezone,
};

/// A record made at `date_time` ("YYYY-MM-DD HH:MM" in UTC).
#[track_caller]
pub(crate) fn record_at(category: &str, amount: f64, date_time: &str) -> ExpenseRecord {
    let instant = LocalTimezone::UTC
        .parse_local(date_time)
        .expect("could not parse test date time");
    let millis = (instant.unix_timestamp_nanos() / 1_000_000) as i64;

    ExpenseRecord::new(category, amount, "🍔", Some(millis))
}

/// An in-memory expense service.
///
/// Periods without stored records return an empty list. Fetches for a period
/// marked as failing return [Error::UnexpectedStatus] with status 500.
#[derive(Default)]
pub(crate) struct FakeApi {
    records: Mutex<HashMap<Period, Vec<ExpenseRecord>>>,
    summaries: Mutex<HashMap<Period, Summary>>,
    failing: Mutex<HashSet<Period>>,
    delays: Mutex<HashMap<Period, Duration>>,
    categories: Mutex<Vec<Category>>,
    calls: Mutex<Vec<String>>,
}

impl FakeApi {
    pub(crate) fn with_records(self, period: Period, records: Vec<ExpenseRecord>) -> Self {
        self.records.lock().unwrap().insert(period, records);
        self
    }

    pub(crate) fn with_summary(self, period: Period, summary: Summary) -> Self {
        self.summaries.lock().unwrap().insert(period, summary);
        self
    }

    pub(crate) fn failing_for(self, period: Period) -> Self {
        self.failing.lock().unwrap().insert(period);
        self
    }

    pub(crate) fn delayed_for(self, period: Period, delay: Duration) -> Self {
        self.delays.lock().unwrap().insert(period, delay);
        self
    }

    /// The names of the operations called so far, in call order.
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record_call(&self, name: &str) {
        self.calls.lock().unwrap().push(name.to_owned());
    }

    async fn prepare_fetch(&self, name: &str, period: Period) -> Result<(), Error> {
        self.record_call(name);

        let delay = self.delays.lock().unwrap().get(&period).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.lock().unwrap().contains(&period) {
            return Err(Error::UnexpectedStatus(500));
        }

        Ok(())
    }
}

impl ExpenseApi for FakeApi {
    async fn fetch_records(
        &self,
        period: Period,
        _credential: &Credential,
    ) -> Result<Vec<ExpenseRecord>, Error> {
        self.prepare_fetch("fetch_records", period).await?;

        Ok(self
            .records
            .lock()
            .unwrap()
            .get(&period)
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_summary(&self, period: Period, _credential: &Credential) -> Result<Summary, Error> {
        self.prepare_fetch("fetch_summary", period).await?;

        Ok(self
            .summaries
            .lock()
            .unwrap()
            .get(&period)
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_categories(&self, _credential: &Credential) -> Result<Vec<Category>, Error> {
        self.record_call("fetch_categories");

        Ok(self.categories.lock().unwrap().clone())
    }

    async fn submit_record(&self, _credential: &Credential, _record: &NewRecord) -> Result<(), Error> {
        self.record_call("submit_record");

        Ok(())
    }

    async fn submit_audio_record(&self, _credential: &Credential, _audio: &[u8]) -> Result<(), Error> {
        self.record_call("submit_audio_record");

        Ok(())
    }

    async fn submit_category(
        &self,
        _credential: &Credential,
        name: &str,
        emoji: &str,
    ) -> Result<(), Error> {
        self.record_call("submit_category");

        let mut categories = self.categories.lock().unwrap();
        let id = categories.len() as i64 + 1;
        categories.push(Category {
            id,
            name: name.to_owned(),
            emoji: emoji.to_owned(),
        });

        Ok(())
    }

    async fn log_in(&self, username: &str, password: &str) -> Result<Credential, Error> {
        self.record_call("log_in");

        Ok(Credential::basic(username, password))
    }

    async fn sign_up(&self, _username: &str, _password: &str) -> Result<(), Error> {
        self.record_call("sign_up");

        Ok(())
    }
}
