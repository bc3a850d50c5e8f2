use crate::Database;
use fjall::Keyspace;
use std::path::Path;

/// Builder for [`Database`].
pub struct Builder {
    cache_size_mib: u64,
    manual_journal_persist: bool,
}

impl Builder {
    pub(crate) fn new() -> Self {
        Self {
            cache_size_mib: 64,
            manual_journal_persist: false,
        }
    }

    /// Sets the cache size in MiB.
    ///
    /// Default = 64 MiB
    #[must_use]
    pub fn cache_size_mib(mut self, mib: u64) -> Self {
        self.cache_size_mib = mib;
        self
    }

    /// If `true`, writes become faster by skipping the `write()` syscall to OS buffers.
    ///
    /// However, writes are then not application-crash safe.
    #[must_use]
    pub fn manual_journal_persist(mut self, enabled: bool) -> Self {
        self.manual_journal_persist = enabled;
        self
    }

    /// Opens or recovers a metrics database.
    ///
    /// If you have a keyspace already in your application, you may
    /// want to use `open_in_keyspace` instead.
    ///
    /// # Errors
    ///
    /// Returns error if an I/O error occurred.
    pub fn open<P: AsRef<Path>>(self, path: P) -> crate::Result<Database> {
        let keyspace = fjall::Config::new(path)
            .cache_size(self.cache_size_mib * 1_024 * 1_024)
            .manual_journal_persist(self.manual_journal_persist)
            .open()?;

        Database::from_keyspace(keyspace)
    }

    /// Uses an existing `fjall` keyspace to open a metrics database.
    ///
    /// Partitions are prefixed with `_fmetrics#` to avoid name clashes with other applications.
    ///
    /// # Errors
    ///
    /// Returns error if an I/O error occurred.
    pub fn open_in_keyspace(self, keyspace: Keyspace) -> crate::Result<Database> {
        Database::from_keyspace(keyspace)
    }
}
