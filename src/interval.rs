use crate::BucketKey;
use chrono::{DateTime, NaiveTime, TimeDelta, Timelike, Utc};
use std::str::FromStr;

/// Granularity of an aggregation.
///
/// Each interval has a fixed lookback window (how far back events are
/// considered) and a bucket width (how events are grouped):
///
/// | interval | lookback | bucket       |
/// |----------|----------|--------------|
/// | minute   | 1 hour   | 1 minute     |
/// | hour     | 1 day    | 1 hour       |
/// | day      | 7 days   | UTC calendar day |
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Interval {
    /// Minute buckets over the last hour
    Minute,

    /// Hour buckets over the last day
    Hour,

    /// Day buckets over the last week
    Day,
}

impl Interval {
    /// All intervals, from finest to coarsest.
    pub const ALL: [Self; 3] = [Self::Minute, Self::Hour, Self::Day];

    /// Parses an optional query value, e.g. from `?interval=hour`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidInterval`] if the value is absent or unknown.
    pub fn from_query(value: Option<&str>) -> crate::Result<Self> {
        value.ok_or(crate::Error::InvalidInterval(None))?.parse()
    }

    /// Name as used in queries.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Minute => "minute",
            Self::Hour => "hour",
            Self::Day => "day",
        }
    }

    /// How far back from "now" events are considered.
    #[must_use]
    pub fn lookback(self) -> TimeDelta {
        match self {
            Self::Minute => TimeDelta::hours(1),
            Self::Hour => TimeDelta::days(1),
            Self::Day => TimeDelta::days(7),
        }
    }

    /// Width of a single bucket.
    #[must_use]
    pub fn bucket_width(self) -> TimeDelta {
        match self {
            Self::Minute => TimeDelta::minutes(1),
            Self::Hour => TimeDelta::hours(1),
            Self::Day => TimeDelta::days(1),
        }
    }

    /// Lower bound of the query window, inclusive.
    #[must_use]
    pub fn window_start(self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_sub_signed(self.lookback())
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Truncates a timestamp to the start of its bucket.
    #[must_use]
    pub fn bucket_key(self, ts: DateTime<Utc>) -> BucketKey {
        let date = ts.date_naive();

        let since_midnight = match self {
            Self::Minute => TimeDelta::minutes(i64::from(ts.hour() * 60 + ts.minute())),
            Self::Hour => TimeDelta::hours(i64::from(ts.hour())),
            Self::Day => return BucketKey::Date(date),
        };

        BucketKey::Instant(date.and_time(NaiveTime::MIN + since_midnight).and_utc())
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Interval {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "minute" => Ok(Self::Minute),
            "hour" => Ok(Self::Hour),
            "day" => Ok(Self::Day),
            _ => Err(crate::Error::InvalidInterval(Some(s.to_owned()))),
        }
    }
}
