//! Cache value objects
//!
//! [`CacheItem`] is the serialized unit stored per primary key, and
//! [`CacheFilePaths`] is the derived two-level shard layout for that key.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::hash::CacheKeyHash;

/// File extension of published cache artifacts
pub const CACHE_FILE_EXTENSION: &str = "json";

/// Stored payload plus the secondary key it was computed for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheItem<T> {
    variable_key: String,
    data: T,
}

impl<T> CacheItem<T> {
    /// Create new item
    #[inline]
    #[must_use]
    pub fn new(variable_key: impl Into<String>, data: T) -> Self {
        Self {
            variable_key: variable_key.into(),
            data,
        }
    }

    /// Whether this item was stored for the requested variable key
    #[inline]
    #[must_use]
    pub fn is_variable_key_valid(&self, variable_key: &str) -> bool {
        self.variable_key == variable_key
    }

    /// Get the variable key
    #[inline]
    #[must_use]
    pub fn variable_key(&self) -> &str {
        &self.variable_key
    }

    /// Get reference to the payload
    #[inline]
    #[must_use]
    pub fn data(&self) -> &T {
        &self.data
    }

    /// Consume item and return the payload
    #[inline]
    #[must_use]
    pub fn into_data(self) -> T {
        self.data
    }
}

/// Shard directories and artifact path for one primary key
///
/// Layout: `root/ab/cd/abcd…<40 hex>.json`, where `abcd…` is the SHA-1 of the
/// primary key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheFilePaths {
    first_directory: PathBuf,
    second_directory: PathBuf,
    file_path: PathBuf,
}

impl CacheFilePaths {
    /// Derive paths for a primary key under the cache root
    #[must_use]
    pub fn for_key(root: &Path, key: &str) -> Self {
        let key_hash = CacheKeyHash::of_key(key);
        let first_directory = root.join(key_hash.first_shard());
        let second_directory = first_directory.join(key_hash.second_shard());
        let file_path =
            second_directory.join(format!("{}.{}", key_hash.to_hex(), CACHE_FILE_EXTENSION));

        Self {
            first_directory,
            second_directory,
            file_path,
        }
    }

    /// `root/ab`
    #[inline]
    #[must_use]
    pub fn first_directory(&self) -> &Path {
        &self.first_directory
    }

    /// `root/ab/cd`
    #[inline]
    #[must_use]
    pub fn second_directory(&self) -> &Path {
        &self.second_directory
    }

    /// `root/ab/cd/abcd….json`
    #[inline]
    #[must_use]
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}
