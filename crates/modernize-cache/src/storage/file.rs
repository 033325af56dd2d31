//! Sharded on-disk cache storage
//!
//! Every entry lives in its own JSON file under two levels of shard
//! directories derived from the SHA-1 of the primary key. Writes go to a
//! randomly named temp file in the cache root and are renamed onto the final
//! path, so concurrent readers never observe a half-written artifact.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{CacheError, CacheResult};
use crate::item::{CacheFilePaths, CacheItem};
use crate::storage::CacheStorage;

/// File-backed cache storage rooted at a directory
#[derive(Debug, Clone)]
pub struct FileCacheStorage {
    directory: PathBuf,
}

impl FileCacheStorage {
    /// Create storage rooted at `directory` (created lazily on first save)
    #[inline]
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Cache root directory
    #[inline]
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Derive shard paths for a primary key
    #[inline]
    #[must_use]
    pub fn cache_file_paths(&self, key: &str) -> CacheFilePaths {
        CacheFilePaths::for_key(&self.directory, key)
    }

    fn publish(&self, paths: &CacheFilePaths, exported: &[u8]) -> CacheResult<()> {
        create_shard_directories(paths)?;

        let mut tmp = tempfile::Builder::new()
            .prefix("")
            .suffix(".tmp")
            .rand_bytes(10)
            .tempfile_in(&self.directory)
            .map_err(|e| CacheError::write_failed(&self.directory, e.to_string()))?;

        if let Err(e) = tmp.write_all(exported).and_then(|()| tmp.flush()) {
            return Err(CacheError::write_failed(tmp.path(), e.to_string()));
        }

        persist(tmp, paths)
    }
}

/// Rename `tmp` onto the artifact path
///
/// A sibling key's `clean` may prune the shard directories between their
/// creation and the rename; that case is retried once.
fn persist(mut tmp: tempfile::NamedTempFile, paths: &CacheFilePaths) -> CacheResult<()> {
    let target = paths.file_path();
    let mut retried = false;

    loop {
        let tempfile::PersistError { error, file } = match tmp.persist(target) {
            Ok(_) => return Ok(()),
            Err(err) => err,
        };

        if error.kind() == ErrorKind::NotFound && !retried {
            debug!(path = %target.display(), "shard directory pruned before rename, retrying");
            create_shard_directories(paths)?;
            retried = true;
            tmp = file;
            continue;
        }

        // dropping the handle removes the temp file
        drop(file);

        if target.is_file() {
            warn!(
                path = %target.display(),
                %error,
                "rename failed but a concurrent writer already published the artifact"
            );
            return Ok(());
        }
        return Err(CacheError::write_failed(target, error.to_string()));
    }
}

fn create_shard_directories(paths: &CacheFilePaths) -> CacheResult<()> {
    fs::create_dir_all(paths.second_directory())
        .map_err(|e| CacheError::write_failed(paths.second_directory(), e.to_string()))
}

impl CacheStorage for FileCacheStorage {
    fn load<T: DeserializeOwned>(&self, key: &str, variable_key: &str) -> Option<T> {
        let paths = self.cache_file_paths(key);
        let file_path = paths.file_path();

        let bytes = match fs::read(file_path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                debug!(path = %file_path.display(), error = %e, "unreadable cache artifact");
                return None;
            }
        };

        let item: CacheItem<T> = match serde_json::from_slice(&bytes) {
            Ok(item) => item,
            Err(e) => {
                debug!(path = %file_path.display(), error = %e, "corrupt cache artifact");
                return None;
            }
        };

        if !item.is_variable_key_valid(variable_key) {
            debug!(key, variable_key, stored = item.variable_key(), "stale cache artifact");
            return None;
        }

        Some(item.into_data())
    }

    fn save<T: Serialize>(&self, key: &str, variable_key: &str, data: &T) -> CacheResult<()> {
        let paths = self.cache_file_paths(key);

        let exported = serde_json::to_vec(&CacheItem::new(variable_key, data)).map_err(|source| {
            CacheError::Serialization {
                key: key.to_string(),
                variable_key: variable_key.to_string(),
                source,
            }
        })?;

        self.publish(&paths, &exported)
    }

    fn clean(&self, key: &str) -> CacheResult<()> {
        let paths = self.cache_file_paths(key);

        match fs::remove_file(paths.file_path()) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(CacheError::io_error(paths.file_path(), e)),
        }

        remove_dir_if_empty(paths.second_directory())?;
        remove_dir_if_empty(paths.first_directory())
    }

    fn clear(&self) -> CacheResult<()> {
        match fs::remove_dir_all(&self.directory) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::io_error(&self.directory, e)),
        }
    }
}

/// Shard directories are shared between keys, so only empty ones go.
fn remove_dir_if_empty(path: &Path) -> CacheResult<()> {
    let is_empty = match fs::read_dir(path) {
        Ok(mut entries) => entries.next().is_none(),
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(CacheError::io_error(path, e)),
    };

    if is_empty {
        if let Err(e) = fs::remove_dir(path) {
            // a concurrent save may have repopulated the shard
            debug!(path = %path.display(), error = %e, "shard directory kept");
        }
    }
    Ok(())
}
