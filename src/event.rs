use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reason an event was rejected on ingestion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventError {
    /// Timestamp is missing, unparseable or out of the supported range.
    InvalidTimestamp,

    /// Sales rep is missing/empty, or amount is missing/non-numeric.
    InvalidInput,
}

impl std::fmt::Display for EventError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTimestamp => write!(f, "Invalid or missing timestamp"),
            Self::InvalidInput => write!(f, "Invalid input data"),
        }
    }
}

impl std::error::Error for EventError {}

/// A single sale.
///
/// Events are validated on construction and immutable afterwards.
///
/// ```
/// use fmetrics::Event;
///
/// let event = Event::parse("2024-01-01T10:15:00Z", "alice", 50.0)?;
/// assert_eq!("alice", event.sales_rep());
///
/// assert!(Event::parse("yesterday", "alice", 50.0).is_err());
/// assert!(Event::parse("2024-01-01T10:15:00Z", "", 50.0).is_err());
/// # Ok::<(), fmetrics::EventError>(())
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEvent")]
pub struct Event {
    timestamp: DateTime<Utc>,
    sales_rep: String,
    amount: f64,
}

impl Event {
    /// Creates a validated event.
    ///
    /// The timestamp is kept at microsecond precision.
    ///
    /// # Errors
    ///
    /// Returns an error if `sales_rep` is empty or `amount` is not a finite number.
    pub fn new<S: Into<String>>(
        timestamp: DateTime<Utc>,
        sales_rep: S,
        amount: f64,
    ) -> Result<Self, EventError> {
        let sales_rep = sales_rep.into();

        if sales_rep.is_empty() || !amount.is_finite() {
            return Err(EventError::InvalidInput);
        }

        let timestamp = crate::time::to_micros(timestamp).ok_or(EventError::InvalidTimestamp)?;

        Ok(Self {
            timestamp,
            sales_rep,
            amount,
        })
    }

    /// Creates a validated event from an RFC 3339 timestamp string.
    ///
    /// # Errors
    ///
    /// Returns an error if the timestamp does not parse, or see [`Event::new`].
    pub fn parse<S: Into<String>>(
        timestamp: &str,
        sales_rep: S,
        amount: f64,
    ) -> Result<Self, EventError> {
        let timestamp = DateTime::parse_from_rfc3339(timestamp)
            .map_err(|_| EventError::InvalidTimestamp)?
            .with_timezone(&Utc);

        Self::new(timestamp, sales_rep, amount)
    }

    /// When the sale happened.
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Who made the sale.
    #[must_use]
    pub fn sales_rep(&self) -> &str {
        &self.sales_rep
    }

    /// Sale amount.
    #[must_use]
    pub fn amount(&self) -> f64 {
        self.amount
    }
}

/// Unvalidated ingestion payload.
///
/// Every field is optional so that a missing field surfaces as an
/// [`EventError`] instead of a generic deserialization failure.
#[derive(Deserialize)]
struct RawEvent {
    timestamp: Option<String>,
    sales_rep: Option<String>,
    amount: Option<f64>,
}

impl TryFrom<RawEvent> for Event {
    type Error = EventError;

    fn try_from(raw: RawEvent) -> Result<Self, Self::Error> {
        // NOTE: Timestamp is checked first, so a payload that is broken
        // everywhere reports the timestamp
        let Some(timestamp) = raw.timestamp.filter(|ts| !ts.is_empty()) else {
            return Err(EventError::InvalidTimestamp);
        };

        let timestamp = DateTime::parse_from_rfc3339(&timestamp)
            .map_err(|_| EventError::InvalidTimestamp)?
            .with_timezone(&Utc);

        let (Some(sales_rep), Some(amount)) = (raw.sales_rep, raw.amount) else {
            return Err(EventError::InvalidInput);
        };

        Self::new(timestamp, sales_rep, amount)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn event_rejects_empty_sales_rep() {
        assert_eq!(
            Err(EventError::InvalidInput),
            Event::parse("2024-01-01T10:00:00Z", "", 10.0)
        );
    }

    #[test]
    fn event_rejects_non_finite_amount() {
        assert_eq!(
            Err(EventError::InvalidInput),
            Event::parse("2024-01-01T10:00:00Z", "bob", f64::NAN)
        );
        assert_eq!(
            Err(EventError::InvalidInput),
            Event::parse("2024-01-01T10:00:00Z", "bob", f64::INFINITY)
        );
    }

    #[test]
    fn event_accepts_negative_amount() {
        let event = Event::parse("2024-01-01T10:00:00Z", "bob", -12.5).unwrap();
        assert_eq!(-12.5, event.amount());
    }

    #[test]
    fn event_parses_offsets() {
        let event = Event::parse("2024-01-01T12:00:00+02:00", "bob", 1.0).unwrap();
        assert_eq!(
            Event::parse("2024-01-01T10:00:00Z", "bob", 1.0).unwrap(),
            event
        );
    }

    #[test]
    fn event_deserialize() {
        let event: Event = serde_json::from_str(
            r#"{"timestamp":"2024-01-01T10:15:00Z","sales_rep":"alice","amount":50}"#,
        )
        .unwrap();

        assert_eq!("alice", event.sales_rep());
        assert_eq!(50.0, event.amount());
    }

    #[test]
    fn event_deserialize_missing_timestamp() {
        let err = serde_json::from_str::<Event>(r#"{"sales_rep":"alice","amount":50}"#)
            .unwrap_err()
            .to_string();

        assert!(err.contains("Invalid or missing timestamp"), "{err}");
    }

    #[test]
    fn event_deserialize_missing_amount() {
        let err = serde_json::from_str::<Event>(
            r#"{"timestamp":"2024-01-01T10:15:00Z","sales_rep":"alice"}"#,
        )
        .unwrap_err()
        .to_string();

        assert!(err.contains("Invalid input data"), "{err}");
    }

    #[test]
    fn event_deserialize_string_amount() {
        assert!(serde_json::from_str::<Event>(
            r#"{"timestamp":"2024-01-01T10:15:00Z","sales_rep":"alice","amount":"50"}"#,
        )
        .is_err());
    }
}
