pub(crate) mod avg;
pub(crate) mod builder;

use crate::BucketKey;
use serde::Serialize;

/// Running sum of a bucket
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) struct Accumulator {
    pub total: f64,
    pub len: usize,
}

impl Accumulator {
    pub fn push(&mut self, value: f64) {
        self.total += value;
        self.len += 1;
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn average(&self) -> f64 {
        debug_assert!(self.len > 0, "buckets are only created on insert");
        self.total / self.len as f64
    }
}

/// Average of a single time bucket.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct AggregateResult {
    /// Start of the bucket
    pub time_bucket: BucketKey,

    /// Mean amount of all events in the bucket
    pub avg_sales: f64,
}
