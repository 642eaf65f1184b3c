//! The month-by-month expense view.
//!
//! [MonthView] owns the month cursor and the snapshot of the month being
//! shown. Moving the cursor spawns a fetch on the tokio runtime. Finished
//! fetches come back as [FetchEvent]s on a channel and are handed to
//! [MonthView::apply], which drops any event that a later fetch has
//! superseded.

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::{
    Error,
    aggregation::{CategoryShare, Overview, Summary, aggregate, distribution, overview},
    api::ExpenseApi,
    config::SummarySource,
    grouping::{DayBucket, group_records_by_day},
    navigation::{MonthCursor, Period},
    record::{Credential, ExpenseRecord},
    series::{DailySeries, build_daily_series},
    timezone::LocalTimezone,
};

/// The data fetched for one month.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedMonth {
    /// Every record of the month.
    pub records: Vec<ExpenseRecord>,
    /// The month's summary, from the service or computed from `records`.
    pub summary: Summary,
}

/// A finished fetch, tagged with the month it was started for.
#[derive(Debug)]
pub struct FetchEvent {
    /// The month the fetch was started for.
    pub period: Period,
    /// Increases with every fetch the view starts. Only the event of the
    /// latest fetch is applied.
    pub generation: u64,
    /// The fetched data or the reason the fetch failed.
    pub outcome: Result<FetchedMonth, Error>,
}

/// Everything needed to display one month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthSnapshot {
    /// The month shown.
    pub period: Period,
    /// The records grouped by day, most recent day first.
    pub days: Vec<DayBucket>,
    /// The sum of the amounts of the fetched records.
    pub total: f64,
    /// The spending summary.
    pub summary: Summary,
    /// The overview card.
    pub overview: Overview,
    /// The rows of the distribution view, empty if nothing was spent.
    pub distribution: Vec<CategoryShare>,
    /// The amount spent per day for the trend chart.
    pub series: DailySeries,
}

impl MonthSnapshot {
    /// Derive the display data for `period` from its records and summary.
    ///
    /// # Errors
    /// Returns an error if the distribution cannot be computed, see [distribution].
    pub fn build(
        period: Period,
        records: &[ExpenseRecord],
        summary: Summary,
        timezone: &LocalTimezone,
    ) -> Result<Self, Error> {
        Ok(Self {
            period,
            days: group_records_by_day(records, timezone),
            total: records.iter().map(|record| record.amount).sum(),
            overview: overview(period, &summary),
            distribution: distribution(&summary)?,
            series: build_daily_series(period, records, timezone),
            summary,
        })
    }
}

/// Drives the month view: navigation, fetching and the current snapshot.
pub struct MonthView<A> {
    api: Arc<A>,
    credential: Credential,
    timezone: LocalTimezone,
    source: SummarySource,
    cursor: MonthCursor,
    top_categories: Option<usize>,
    snapshot: Option<MonthSnapshot>,
    loading: bool,
    generation: u64,
    events: UnboundedSender<FetchEvent>,
}

impl<A: ExpenseApi + 'static> MonthView<A> {
    /// Create a view positioned at `cursor`.
    ///
    /// Nothing is fetched until the cursor is moved or [MonthView::refresh]
    /// is called. Finished fetches are sent to the returned receiver.
    pub fn new(
        api: Arc<A>,
        credential: Credential,
        timezone: LocalTimezone,
        source: SummarySource,
        cursor: MonthCursor,
    ) -> (Self, UnboundedReceiver<FetchEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();

        let view = Self {
            api,
            credential,
            timezone,
            source,
            cursor,
            top_categories: None,
            snapshot: None,
            loading: false,
            generation: 0,
            events,
        };

        (view, receiver)
    }

    /// Only keep the `n` largest categories in each snapshot's summary.
    pub fn with_top_categories(mut self, n: usize) -> Self {
        self.top_categories = Some(n);
        self
    }

    /// The month the cursor points at.
    pub fn period(&self) -> Period {
        self.cursor.period()
    }

    /// The latest snapshot of the current month, if it has been fetched.
    pub fn snapshot(&self) -> Option<&MonthSnapshot> {
        self.snapshot.as_ref()
    }

    /// Whether a fetch for the current month is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Move to the month in carousel `slot` and fetch it.
    ///
    /// # Errors
    /// Returns [Error::InvalidSlot] if `slot` is not in `0..=11`. The view is
    /// left unchanged in that case.
    pub fn navigate(&mut self, slot: u8) -> Result<Period, Error> {
        let period = self.cursor.advance(slot)?;
        self.fetch(period);

        Ok(period)
    }

    /// Move to the following month and fetch it.
    pub fn next_month(&mut self) -> Period {
        let period = self.cursor.next_month();
        self.fetch(period);

        period
    }

    /// Move to the preceding month and fetch it.
    pub fn previous_month(&mut self) -> Period {
        let period = self.cursor.previous_month();
        self.fetch(period);

        period
    }

    /// Fetch the current month again.
    pub fn refresh(&mut self) {
        self.fetch(self.cursor.period());
    }

    fn fetch(&mut self, period: Period) {
        self.snapshot = None;
        self.loading = true;
        self.generation += 1;

        let api = Arc::clone(&self.api);
        let credential = self.credential.clone();
        let source = self.source;
        let events = self.events.clone();
        let generation = self.generation;

        tracing::debug!("Fetching expenses for {period} from {source:?} source");

        tokio::spawn(async move {
            let outcome = fetch_month(api.as_ref(), period, &credential, source).await;

            let event = FetchEvent {
                period,
                generation,
                outcome,
            };

            if events.send(event).is_err() {
                tracing::debug!("Month view was dropped before the fetch for {period} finished");
            }
        });
    }

    /// Handle a finished fetch.
    ///
    /// Returns the new snapshot, or `None` if the event is from a fetch that
    /// a later navigation or refresh has superseded.
    ///
    /// # Errors
    /// Returns the fetch error if the fetch for the current month failed.
    /// The view stops loading and keeps no snapshot.
    pub fn apply(&mut self, event: FetchEvent) -> Result<Option<&MonthSnapshot>, Error> {
        let current = self.cursor.period();

        if event.generation != self.generation {
            tracing::debug!(
                "Discarding stale fetch #{} for {}, waiting for #{} for {current}",
                event.generation,
                event.period,
                self.generation
            );
            return Ok(None);
        }

        self.loading = false;

        let fetched = event.outcome.inspect_err(|error| {
            tracing::error!("Could not fetch expenses for {current}: {error}");
        })?;

        let summary = match self.top_categories {
            Some(n) => fetched.summary.truncate_top(n),
            None => fetched.summary,
        };
        let snapshot = MonthSnapshot::build(current, &fetched.records, summary, &self.timezone)?;

        Ok(Some(&*self.snapshot.insert(snapshot)))
    }
}

async fn fetch_month<A: ExpenseApi>(
    api: &A,
    period: Period,
    credential: &Credential,
    source: SummarySource,
) -> Result<FetchedMonth, Error> {
    match source {
        SummarySource::Server => {
            let (summary, records) = tokio::try_join!(
                api.fetch_summary(period, credential),
                api.fetch_records(period, credential)
            )?;

            Ok(FetchedMonth { records, summary })
        }
        SummarySource::Local => {
            let records = api.fetch_records(period, credential).await?;
            let summary = aggregate(&records);

            Ok(FetchedMonth { records, summary })
        }
    }
}
