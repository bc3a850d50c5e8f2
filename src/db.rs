use crate::{
    agg::builder::Aggregation,
    codec,
    db_builder::Builder,
    Event, EventStore, Interval,
};
use chrono::{DateTime, Utc};
use fjall::{CompressionType, Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::{
    path::Path,
    sync::atomic::{AtomicU64, Ordering},
};

const PARTITION_NAME: &str = "_fmetrics#v1#events";

/// An embeddable store of sale events
///
/// Events are kept sorted by timestamp, so window queries are a single range scan.
///
/// ```
/// # let dir = tempfile::tempdir()?;
/// use fmetrics::{Database, Interval};
///
/// let db = Database::new(&dir, /* cache size in MiB */ 16)?;
///
/// let now = fmetrics::timestamp();
/// db.write(now, "alice", 100.0)?;
/// db.write(now, "bob", 200.0)?;
///
/// let buckets = db.avg(Interval::Day).at(now).run()?;
/// assert_eq!(1, buckets.len());
/// assert_eq!(150.0, buckets[0].avg_sales);
/// #
/// # Ok::<(), fmetrics::Error>(())
/// ```
pub struct Database {
    keyspace: Keyspace,
    events: PartitionHandle,
    seqno: AtomicU64,
}

impl Database {
    /// Creates a new database builder to create or open a database at `path`.
    #[must_use]
    pub fn builder() -> Builder {
        Builder::new()
    }

    /// Opens a new database at `path`, using the given block cache size.
    ///
    /// # Errors
    ///
    /// Returns error if an I/O error occurred.
    pub fn new<P: AsRef<Path>>(path: P, cache_size_mib: u64) -> crate::Result<Self> {
        Self::builder().cache_size_mib(cache_size_mib).open(path)
    }

    pub(crate) fn from_keyspace(keyspace: Keyspace) -> crate::Result<Self> {
        let opts = PartitionCreateOptions::default()
            .block_size(16_000)
            .compression(CompressionType::Lz4)
            .max_memtable_size(8_000_000);

        let events = keyspace.open_partition(PARTITION_NAME, opts)?;

        let seqno = match events.last_key_value()? {
            Some((key, _)) => codec::decode_seqno(&key)? + 1,
            None => 0,
        };

        log::debug!("Opened event partition, next seqno is {seqno}");

        Ok(Self {
            keyspace,
            events,
            seqno: AtomicU64::new(seqno),
        })
    }

    /// Validates and stores a sale.
    ///
    /// # Errors
    ///
    /// Returns error if the event is invalid (see [`Event::new`]),
    /// or an I/O error occurred.
    pub fn write<S: Into<String>>(
        &self,
        timestamp: DateTime<Utc>,
        sales_rep: S,
        amount: f64,
    ) -> crate::Result<Event> {
        let event = Event::new(timestamp, sales_rep, amount)?;
        self.insert_event(event)
    }

    /// Starts an average aggregation over this database.
    #[must_use]
    pub fn avg(&self, interval: Interval) -> Aggregation<'_, Self> {
        Aggregation::new(self, interval)
    }

    /// Approximate number of stored events.
    #[must_use]
    pub fn approximate_len(&self) -> usize {
        self.events.approximate_len()
    }

    /// Flushes the journal to disk.
    ///
    /// Only needed when the database was opened with
    /// [`Builder::manual_journal_persist`].
    ///
    /// # Errors
    ///
    /// Returns error if an I/O error occurred.
    pub fn persist(&self) -> crate::Result<()> {
        self.keyspace.persist(PersistMode::SyncAll)?;
        Ok(())
    }
}

impl EventStore for Database {
    fn fetch_events_since(&self, start: DateTime<Utc>) -> crate::Result<Vec<Event>> {
        self.events
            .range(codec::lower_bound(start)..)
            .map(|kv| {
                let (k, v) = kv?;
                codec::decode(&k, &v)
            })
            .collect()
    }

    fn insert_event(&self, event: Event) -> crate::Result<Event> {
        let seqno = self.seqno.fetch_add(1, Ordering::Relaxed);
        let key = codec::encode_key(event.timestamp(), seqno);

        log::trace!(
            "storing event #{seqno} at {:?} for {:?}",
            event.timestamp(),
            event.sales_rep()
        );

        self.events.insert(key, codec::encode_value(&event)?)?;

        Ok(event)
    }
}
