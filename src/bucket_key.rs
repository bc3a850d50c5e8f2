use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

/// Start of a time bucket.
///
/// Minute and hour buckets are keyed by the instant they start at,
/// day buckets by their UTC calendar date.
///
/// Keys produced by the same [`crate::Interval`] are always the same variant,
/// so ordering them orders by time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BucketKey {
    /// Bucket starting at a (truncated) instant
    Instant(DateTime<Utc>),

    /// Bucket spanning a calendar day
    Date(NaiveDate),
}

impl BucketKey {
    /// First instant covered by the bucket.
    #[must_use]
    pub fn start(&self) -> DateTime<Utc> {
        match self {
            Self::Instant(ts) => *ts,
            Self::Date(date) => date.and_time(chrono::NaiveTime::MIN).and_utc(),
        }
    }
}

impl std::fmt::Display for BucketKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Instant(ts) => write!(f, "{}", ts.to_rfc3339_opts(SecondsFormat::Millis, true)),
            Self::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

impl Serialize for BucketKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test_log::test]
    fn bucket_key_serialize() {
        let date = BucketKey::Date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(r#""2024-01-01""#, serde_json::to_string(&date).unwrap());

        let instant = BucketKey::Instant(date.start());
        assert_eq!(
            r#""2024-01-01T00:00:00.000Z""#,
            serde_json::to_string(&instant).unwrap()
        );
    }

    #[test_log::test]
    fn bucket_key_order() {
        let a = BucketKey::Date(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
        let b = BucketKey::Date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert!(a < b);
        assert!(BucketKey::Instant(a.start()) < BucketKey::Instant(b.start()));
    }
}
