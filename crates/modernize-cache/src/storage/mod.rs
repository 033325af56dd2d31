//! Cache storage backends
//!
//! - [`FileCacheStorage`]: sharded on-disk store with atomic publish
//! - [`MemoryCacheStorage`]: process-local store with the same contract

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::CacheResult;

mod file;
mod memory;

pub use file::FileCacheStorage;
pub use memory::MemoryCacheStorage;

/// Key/value storage for cached analysis results
///
/// Entries are addressed by a primary key plus a variable key. A load only
/// yields data when the stored variable key equals the requested one.
///
/// # Contract
/// - `load` never fails: missing, corrupt or stale entries are `None`
/// - `save` replaces the whole entry; readers never see a partial write
/// - `clean` and `clear` ignore entries that are already gone
pub trait CacheStorage: Send + Sync {
    /// Load payload stored under `key` for `variable_key`
    fn load<T: DeserializeOwned>(&self, key: &str, variable_key: &str) -> Option<T>;

    /// Store payload under `key` for `variable_key`
    ///
    /// # Errors
    /// Returns error if the entry could not be published
    fn save<T: Serialize>(&self, key: &str, variable_key: &str, data: &T) -> CacheResult<()>;

    /// Remove the entry stored under `key`
    ///
    /// # Errors
    /// Returns error if existing files could not be removed
    fn clean(&self, key: &str) -> CacheResult<()>;

    /// Remove every entry
    ///
    /// # Errors
    /// Returns error if existing files could not be removed
    fn clear(&self) -> CacheResult<()>;
}
