//! A simple, embeddable store for sales metrics.
//!
//! It uses <https://github.com/fjall-rs/fjall> as its underlying storage engine.
//! Sale events are kept sorted by time, and aggregated on read into
//! calendar-aligned buckets (UTC):
//!
//! - `minute`: minute buckets over the last hour
//! - `hour`: hour buckets over the last day
//! - `day`: day buckets over the last 7 days
//!
//! Each bucket reports the average sale amount of the events that fall into it.
//! Empty buckets are not reported.
//!
//! ```
//! # let dir = tempfile::tempdir()?;
//! use fmetrics::{compute_aggregates, Database, Event, EventStore};
//!
//! let db = Database::new(&dir, /* cache size in MiB */ 64)?;
//!
//! let now = fmetrics::timestamp();
//!
//! db.write(now, "alice", 50.0)?;
//! db.insert_event(Event::new(now, "bob", 150.0)?)?;
//!
//! // e.g. GET /metrics?interval=hour
//! let buckets = compute_aggregates(&db, Some("hour"))?;
//! assert_eq!(1, buckets.len());
//! assert_eq!(100.0, buckets[0].avg_sales);
//!
//! println!("{}", serde_json::to_string(&buckets).unwrap());
//!
//! // Unknown intervals are rejected
//! assert!(compute_aggregates(&db, Some("week")).is_err());
//! #
//! # Ok::<(), fmetrics::Error>(())
//! ```
//!
//! Anything implementing [`EventStore`] can be aggregated, not only [`Database`].

#![forbid(unsafe_code)]
#![deny(clippy::all, missing_docs, clippy::cargo)]
#![deny(clippy::unwrap_used)]
#![warn(clippy::indexing_slicing)]
#![warn(clippy::pedantic, clippy::nursery)]
#![warn(clippy::expect_used)]
#![allow(clippy::missing_const_for_fn)]
#![warn(clippy::multiple_crate_versions)]
#![warn(clippy::result_unit_err)]

mod agg;
mod bucket_key;
mod codec;
mod db;
mod db_builder;
mod error;
mod event;
mod interval;
mod store;
mod time;

type HashMap<K, V> = std::collections::HashMap<K, V, rustc_hash::FxBuildHasher>;

pub use agg::builder::{compute_aggregates, recent_events, Aggregation};
pub use agg::AggregateResult;
pub use bucket_key::BucketKey;
pub use db::Database;
pub use db_builder::Builder;
pub use error::{Error, Result};
pub use event::{Event, EventError};
pub use interval::Interval;
pub use store::EventStore;
pub use time::timestamp;
