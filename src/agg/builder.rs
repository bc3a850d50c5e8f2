use super::{avg::bucket_averages, AggregateResult};
use crate::{Event, EventStore, Interval};
use chrono::{DateTime, Utc};

/// Parses the interval selector and averages the events of its lookback window.
///
/// This is the one-call entry point for request handlers that receive the
/// interval as an optional query value.
///
/// # Errors
///
/// Returns [`crate::Error::InvalidInterval`] if `selector` is absent or unknown,
/// and [`crate::Error::UpstreamFetch`] if the store failed.
pub fn compute_aggregates<S: EventStore + ?Sized>(
    store: &S,
    selector: Option<&str>,
) -> crate::Result<Vec<AggregateResult>> {
    let interval = Interval::from_query(selector)?;
    Aggregation::new(store, interval).run()
}

/// Returns the raw events of the interval's lookback window, oldest first.
///
/// # Errors
///
/// Returns [`crate::Error::UpstreamFetch`] if the store failed.
pub fn recent_events<S: EventStore + ?Sized>(
    store: &S,
    interval: Interval,
) -> crate::Result<Vec<Event>> {
    Aggregation::new(store, interval).events()
}

/// Averages events over calendar-aligned buckets.
///
/// `now` is sampled once when the aggregation runs, unless pinned with
/// [`Aggregation::at`].
pub struct Aggregation<'a, S: EventStore + ?Sized> {
    /// Where events are read from
    store: &'a S,

    /// Bucket width and lookback window
    interval: Interval,

    /// Pinned "now"
    now: Option<DateTime<Utc>>,
}

impl<'a, S: EventStore + ?Sized> Clone for Aggregation<'a, S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store,
            interval: self.interval,
            now: self.now,
        }
    }
}

impl<'a, S: EventStore + ?Sized> Aggregation<'a, S> {
    /// Creates an aggregation over the given store.
    pub fn new(store: &'a S, interval: Interval) -> Self {
        Self {
            store,
            interval,
            now: None,
        }
    }

    /// Pins the reference time instead of reading the clock.
    #[must_use]
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    fn fetch(&self, now: DateTime<Utc>) -> crate::Result<Vec<Event>> {
        let start = self.interval.window_start(now);

        log::debug!(
            "Querying {} window [{start:?}..{now:?}]",
            self.interval
        );

        self.store
            .fetch_events_since(start)
            .map_err(|e| crate::Error::UpstreamFetch(Box::new(e)))
    }

    /// Runs the aggregation, returning one result per non-empty bucket,
    /// sorted by bucket start.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UpstreamFetch`] if the store failed.
    pub fn run(self) -> crate::Result<Vec<AggregateResult>> {
        let now = self.now.unwrap_or_else(crate::timestamp);
        let events = self.fetch(now)?;

        let result = bucket_averages(self.interval, &events, now);

        log::debug!(
            "Aggregated {} events into {} {} buckets",
            events.len(),
            result.len(),
            self.interval
        );

        Ok(result)
    }

    /// Returns the raw events of the window, sorted by timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UpstreamFetch`] if the store failed.
    pub fn events(self) -> crate::Result<Vec<Event>> {
        let now = self.now.unwrap_or_else(crate::timestamp);

        let mut events = self.fetch(now)?;
        events.sort_by_key(Event::timestamp);

        Ok(events)
    }
}
