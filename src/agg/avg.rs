use super::{Accumulator, AggregateResult};
use crate::{BucketKey, Event, Interval};
use chrono::{DateTime, Utc};

/// Groups events into the interval's buckets and averages each bucket.
///
/// Events may arrive in any order. Events later than `now` are skipped.
/// Results are sorted by bucket start, ascending; empty buckets are not emitted.
pub(crate) fn bucket_averages<'a, I>(
    interval: Interval,
    events: I,
    now: DateTime<Utc>,
) -> Vec<AggregateResult>
where
    I: IntoIterator<Item = &'a Event>,
{
    let mut buckets: crate::HashMap<BucketKey, Accumulator> = crate::HashMap::default();
    let mut skipped = 0_usize;

    for event in events {
        if event.timestamp() > now {
            skipped += 1;
            continue;
        }

        buckets
            .entry(interval.bucket_key(event.timestamp()))
            .or_default()
            .push(event.amount());
    }

    if skipped > 0 {
        log::warn!("Skipped {skipped} events dated after {now}");
    }

    let mut result = buckets
        .into_iter()
        .map(|(time_bucket, accu)| AggregateResult {
            time_bucket,
            avg_sales: accu.average(),
        })
        .collect::<Vec<_>>();

    result.sort_unstable_by_key(|x| x.time_bucket);

    result
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use test_log::test;

    fn event(ts: &str, amount: f64) -> Event {
        Event::parse(ts, "rep-1", amount).unwrap()
    }

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-01-02T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn avg_empty() {
        for interval in Interval::ALL {
            assert!(bucket_averages(interval, std::iter::empty(), now()).is_empty());
        }
    }

    #[test]
    fn avg_day_single_bucket() {
        let events = [
            event("2024-01-01T10:00:00Z", 100.0),
            event("2024-01-01T23:59:00Z", 200.0),
        ];

        let result = bucket_averages(Interval::Day, &events, now());

        assert_eq!(1, result.len());
        assert_eq!("2024-01-01", result[0].time_bucket.to_string());
        assert_eq!(150.0, result[0].avg_sales);
    }

    #[test]
    fn avg_hour_single_bucket() {
        let events = [
            event("2024-01-01T10:15:00Z", 50.0),
            event("2024-01-01T10:45:00Z", 150.0),
        ];

        let result = bucket_averages(Interval::Hour, &events, now());

        assert_eq!(1, result.len());
        assert_eq!(
            "2024-01-01T10:00:00.000Z",
            result[0].time_bucket.to_string()
        );
        assert_eq!(100.0, result[0].avg_sales);
    }

    #[test]
    fn avg_minute_two_buckets() {
        let events = [
            event("2024-01-01T10:16:05Z", 30.0),
            event("2024-01-01T10:15:05Z", 10.0),
        ];

        let result = bucket_averages(Interval::Minute, &events, now());

        assert_eq!(2, result.len());
        assert_eq!(
            "2024-01-01T10:15:00.000Z",
            result[0].time_bucket.to_string()
        );
        assert_eq!(10.0, result[0].avg_sales);
        assert_eq!(
            "2024-01-01T10:16:00.000Z",
            result[1].time_bucket.to_string()
        );
        assert_eq!(30.0, result[1].avg_sales);
    }

    #[test]
    fn avg_bucket_boundaries() {
        let events = [
            event("2024-01-01T10:59:59.999Z", 1.0),
            event("2024-01-01T11:00:00Z", 3.0),
        ];

        let result = bucket_averages(Interval::Hour, &events, now());
        assert_eq!(2, result.len());
        assert_eq!(1.0, result[0].avg_sales);
        assert_eq!(3.0, result[1].avg_sales);
    }

    #[test]
    fn avg_independent_of_order() {
        let mut events = vec![
            event("2024-01-01T10:01:00Z", 4.0),
            event("2024-01-01T10:02:00Z", -2.0),
            event("2024-01-01T10:03:00Z", 8.0),
            event("2024-01-01T12:00:00Z", 5.0),
        ];

        let forward = bucket_averages(Interval::Hour, &events, now());
        events.reverse();
        let backward = bucket_averages(Interval::Hour, &events, now());

        assert_eq!(forward, backward);
        assert_eq!(2, forward.len());
        assert!((forward[0].avg_sales - 10.0 / 3.0).abs() < 1e-12);
        assert_eq!(5.0, forward[1].avg_sales);
    }

    #[test]
    fn avg_skips_future_events() {
        let events = [
            event("2024-01-01T23:00:00Z", 10.0),
            event("2024-01-02T00:00:00Z", 20.0),
            event("2024-01-02T00:00:01Z", 1_000.0),
        ];

        let result = bucket_averages(Interval::Day, &events, now());

        assert_eq!(2, result.len());
        assert_eq!("2024-01-01", result[0].time_bucket.to_string());
        assert_eq!(10.0, result[0].avg_sales);
        assert_eq!("2024-01-02", result[1].time_bucket.to_string());
        assert_eq!(20.0, result[1].avg_sales);
    }

    #[test]
    fn avg_serialize() {
        let events = [event("2024-01-01T10:15:00Z", 50.0)];
        let result = bucket_averages(Interval::Hour, &events, now());

        assert_eq!(
            r#"[{"time_bucket":"2024-01-01T10:00:00.000Z","avg_sales":50.0}]"#,
            serde_json::to_string(&result).unwrap()
        );
    }
}
