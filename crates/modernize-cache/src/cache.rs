//! Cache facade over a storage backend
//!
//! Adds tracing and memoisation helpers on top of [`CacheStorage`].

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, trace};

use crate::error::{CacheError, CacheResult};
use crate::storage::CacheStorage;

/// Statistics for cache usage monitoring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Loads that returned data
    pub hits: u64,
    /// Loads that returned nothing
    pub misses: u64,
    /// Successful saves
    pub writes: u64,
}

/// Content-addressed result cache
///
/// Stores expensive per-file results keyed by a content fingerprint
/// (`key`) and a selector for which sub-result is wanted (`variable_key`).
#[derive(Debug)]
pub struct Cache<S> {
    storage: S,
    stats: counters::Counters,
}

impl<S: CacheStorage> Cache<S> {
    /// Create cache over a storage backend
    #[inline]
    #[must_use]
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            stats: counters::Counters::default(),
        }
    }

    /// Get the underlying storage
    #[inline]
    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Load cached payload, `None` on any kind of miss
    pub fn load<T: DeserializeOwned>(&self, key: &str, variable_key: &str) -> Option<T> {
        let loaded = self.storage.load(key, variable_key);
        if loaded.is_some() {
            trace!(key, variable_key, "cache hit");
            self.stats.hit();
        } else {
            trace!(key, variable_key, "cache miss");
            self.stats.miss();
        }
        loaded
    }

    /// Store payload
    ///
    /// # Errors
    /// Returns error if the artifact could not be published
    pub fn save<T: Serialize>(&self, key: &str, variable_key: &str, data: &T) -> CacheResult<()> {
        self.storage.save(key, variable_key, data)?;
        self.stats.write();
        Ok(())
    }

    /// Remove a single entry
    ///
    /// # Errors
    /// Returns error if existing files could not be removed
    pub fn clean(&self, key: &str) -> CacheResult<()> {
        debug!(key, "cleaning cache entry");
        self.storage.clean(key)
    }

    /// Remove all entries
    ///
    /// # Errors
    /// Returns error if existing files could not be removed
    pub fn clear(&self) -> CacheResult<()> {
        debug!("clearing cache");
        self.storage.clear()
    }

    /// Load cached payload or compute and store it
    ///
    /// # Errors
    /// Returns the computation's error, or a cache write error converted
    /// into `E`
    pub fn get_or_compute<T, E, F>(&self, key: &str, variable_key: &str, f: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        E: From<CacheError>,
        F: FnOnce() -> Result<T, E>,
    {
        if let Some(cached) = self.load(key, variable_key) {
            return Ok(cached);
        }

        let computed = f()?;
        self.save(key, variable_key, &computed)?;
        Ok(computed)
    }

    /// Get usage statistics
    #[inline]
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot()
    }
}

mod counters {
    use std::sync::atomic::{AtomicU64, Ordering};

    use super::CacheStats;

    #[derive(Debug, Default)]
    pub(super) struct Counters {
        hits: AtomicU64,
        misses: AtomicU64,
        writes: AtomicU64,
    }

    impl Counters {
        pub(super) fn hit(&self) {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }

        pub(super) fn miss(&self) {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }

        pub(super) fn write(&self) {
            self.writes.fetch_add(1, Ordering::Relaxed);
        }

        pub(super) fn snapshot(&self) -> CacheStats {
            CacheStats {
                hits: self.hits.load(Ordering::Relaxed),
                misses: self.misses.load(Ordering::Relaxed),
                writes: self.writes.load(Ordering::Relaxed),
            }
        }
    }
}
