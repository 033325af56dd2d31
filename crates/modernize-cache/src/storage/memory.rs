//! Process-local cache storage
//!
//! Keeps JSON-encoded items in a concurrent map. Useful for tests and for
//! runs where persisting results across invocations is not wanted.

use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{CacheError, CacheResult};
use crate::item::CacheItem;
use crate::storage::CacheStorage;

/// In-memory cache storage
#[derive(Debug, Default)]
pub struct MemoryCacheStorage {
    storage: DashMap<String, CacheItem<serde_json::Value>>,
}

impl MemoryCacheStorage {
    /// Create empty storage
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Check if storage is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

impl CacheStorage for MemoryCacheStorage {
    fn load<T: DeserializeOwned>(&self, key: &str, variable_key: &str) -> Option<T> {
        let item = self.storage.get(key)?;
        if !item.is_variable_key_valid(variable_key) {
            return None;
        }
        serde_json::from_value(item.data().clone()).ok()
    }

    fn save<T: Serialize>(&self, key: &str, variable_key: &str, data: &T) -> CacheResult<()> {
        let value = serde_json::to_value(data).map_err(|source| CacheError::Serialization {
            key: key.to_string(),
            variable_key: variable_key.to_string(),
            source,
        })?;
        self.storage
            .insert(key.to_string(), CacheItem::new(variable_key, value));
        Ok(())
    }

    fn clean(&self, key: &str) -> CacheResult<()> {
        self.storage.remove(key);
        Ok(())
    }

    fn clear(&self) -> CacheResult<()> {
        self.storage.clear();
        Ok(())
    }
}
