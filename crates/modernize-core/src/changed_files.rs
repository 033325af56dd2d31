//! Change detection between runs
//!
//! Remembers a digest of each processed file (content plus config
//! fingerprint) so unchanged files can be skipped.

use std::path::Path;

use modernize_cache::{Cache, CacheStorage, ContentHash};
use tracing::debug;

use crate::error::CoreResult;

/// Variable key under which file digests are stored
const FILE_HASH_KEY: &str = "file_hash";

/// Tracks which files changed since they were last recorded
#[derive(Debug)]
pub struct ChangedFilesDetector<S> {
    cache: Cache<S>,
    config_fingerprint: String,
}

impl<S: CacheStorage> ChangedFilesDetector<S> {
    /// Create detector; a different fingerprint makes every file changed
    #[inline]
    #[must_use]
    pub fn new(cache: Cache<S>, config_fingerprint: impl Into<String>) -> Self {
        Self {
            cache,
            config_fingerprint: config_fingerprint.into(),
        }
    }

    /// Record the current content of `path`
    ///
    /// # Errors
    /// Returns error if the digest could not be cached
    pub fn add_file(&self, path: &Path, content: &str) -> CoreResult<()> {
        let hash = self.file_hash(content);
        self.cache.save(&path_key(path), FILE_HASH_KEY, &hash)?;
        Ok(())
    }

    /// Whether `content` differs from what was last recorded for `path`
    ///
    /// Files never recorded count as changed.
    #[must_use]
    pub fn has_file_changed(&self, path: &Path, content: &str) -> bool {
        let recorded: Option<String> = self.cache.load(&path_key(path), FILE_HASH_KEY);
        let changed = recorded.as_deref() != Some(self.file_hash(content).as_str());
        if changed {
            debug!(path = %path.display(), "file changed");
        }
        changed
    }

    /// Forget `path`
    ///
    /// # Errors
    /// Returns error if the cache entry could not be removed
    pub fn invalidate_file(&self, path: &Path) -> CoreResult<()> {
        self.cache.clean(&path_key(path))?;
        Ok(())
    }

    /// Forget every file
    ///
    /// # Errors
    /// Returns error if the cache could not be cleared
    pub fn clear(&self) -> CoreResult<()> {
        self.cache.clear()?;
        Ok(())
    }

    fn file_hash(&self, content: &str) -> String {
        let mut data = Vec::with_capacity(content.len() + self.config_fingerprint.len());
        data.extend_from_slice(content.as_bytes());
        data.extend_from_slice(self.config_fingerprint.as_bytes());
        ContentHash::compute(&data).to_string()
    }
}

fn path_key(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use modernize_cache::MemoryCacheStorage;

    fn detector(fingerprint: &str) -> ChangedFilesDetector<MemoryCacheStorage> {
        ChangedFilesDetector::new(Cache::new(MemoryCacheStorage::new()), fingerprint)
    }

    #[test]
    fn tracks_content() {
        let detector = detector("cfg");
        let path = Path::new("src/a.php");
        assert!(detector.has_file_changed(path, "<?php 1;"));

        detector.add_file(path, "<?php 1;").unwrap();
        assert!(!detector.has_file_changed(path, "<?php 1;"));
        assert!(detector.has_file_changed(path, "<?php 2;"));
        assert!(detector.has_file_changed(Path::new("src/b.php"), "<?php 1;"));
    }

    #[test]
    fn invalidate_and_clear() {
        let detector = detector("cfg");
        let a = Path::new("a.php");
        let b = Path::new("b.php");
        detector.add_file(a, "x").unwrap();
        detector.add_file(b, "y").unwrap();

        detector.invalidate_file(a).unwrap();
        assert!(detector.has_file_changed(a, "x"));
        assert!(!detector.has_file_changed(b, "y"));

        detector.clear().unwrap();
        assert!(detector.has_file_changed(b, "y"));
    }

    #[test]
    fn fingerprint_is_part_of_the_digest() {
        let storage_dir = tempfile::tempdir().unwrap();
        let path = Path::new("a.php");
        let first = ChangedFilesDetector::new(
            Cache::new(modernize_cache::FileCacheStorage::new(storage_dir.path())),
            "one",
        );
        first.add_file(path, "x").unwrap();

        let second = ChangedFilesDetector::new(
            Cache::new(modernize_cache::FileCacheStorage::new(storage_dir.path())),
            "two",
        );
        assert!(second.has_file_changed(path, "x"));
        assert!(!first.has_file_changed(path, "x"));
    }
}
