use chrono::{DateTime, Utc};

/// Returns the current timestamp.
#[must_use]
pub fn timestamp() -> DateTime<Utc> {
    Utc::now()
}

/// Drops sub-microsecond digits, which is the precision events are stored with.
///
/// Leap second representations roll over into the following second.
pub(crate) fn to_micros(ts: DateTime<Utc>) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_micros(ts.timestamp_micros())
}
