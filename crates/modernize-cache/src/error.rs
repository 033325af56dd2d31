//! Error types for the cache store
//!
//! Only publishing an artifact can fail loudly. Read anomalies (missing,
//! corrupt or stale artifacts) are reported as cache misses instead.

use std::path::PathBuf;

/// Errors during cache operations
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Atomic publish failed and no artifact appeared at the target path
    #[error("could not write data to cache file {path}: {message}")]
    WriteFailed { path: PathBuf, message: String },

    /// Payload could not be serialized
    #[error("error occurred while saving item {key} ({variable_key}) to cache: {source}")]
    Serialization {
        key: String,
        variable_key: String,
        #[source]
        source: serde_json::Error,
    },

    /// IO error while removing cache entries
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CacheError {
    /// Create write failure for path
    pub fn write_failed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::WriteFailed {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_failed_display() {
        let err = CacheError::write_failed("/tmp/cache/ab/cd/abcd.json", "disk full");
        assert_eq!(
            err.to_string(),
            "could not write data to cache file /tmp/cache/ab/cd/abcd.json: disk full"
        );
    }

    #[test]
    fn io_error_keeps_source() {
        let err = CacheError::io_error(
            "/tmp/cache",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("/tmp/cache"));
    }
}
