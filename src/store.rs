use crate::Event;
use chrono::{DateTime, Utc};

/// Source of raw sale events.
///
/// [`crate::Database`] is the on-disk implementation. Any other backend
/// (or an in-memory fake) can be plugged into [`crate::Aggregation`] instead.
pub trait EventStore {
    /// Returns all events with `timestamp >= start`, in no particular order.
    ///
    /// # Errors
    ///
    /// Returns error if the backend failed.
    fn fetch_events_since(&self, start: DateTime<Utc>) -> crate::Result<Vec<Event>>;

    /// Persists an event, returning the stored record.
    ///
    /// # Errors
    ///
    /// Returns error if the backend failed.
    fn insert_event(&self, event: Event) -> crate::Result<Event>;
}

impl<S: EventStore + ?Sized> EventStore for &S {
    fn fetch_events_since(&self, start: DateTime<Utc>) -> crate::Result<Vec<Event>> {
        (**self).fetch_events_since(start)
    }

    fn insert_event(&self, event: Event) -> crate::Result<Event> {
        (**self).insert_event(event)
    }
}

impl<S: EventStore + ?Sized> EventStore for std::sync::Arc<S> {
    fn fetch_events_since(&self, start: DateTime<Utc>) -> crate::Result<Vec<Event>> {
        (**self).fetch_events_since(start)
    }

    fn insert_event(&self, event: Event) -> crate::Result<Event> {
        (**self).insert_event(event)
    }
}
