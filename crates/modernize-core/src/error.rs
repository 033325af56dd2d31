//! Error types for the pipeline
//!
//! Rules never fail: a rule that does not apply leaves the tree alone.
//! Errors come from reading inputs, parsing them and publishing results.

use std::path::PathBuf;

use modernize_cache::{CacheError, HashError};
use modernize_syntax::ParseError;

/// Main pipeline error type
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Result could not be cached
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    /// Source is not valid PHP
    #[error("could not parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    /// Configuration is unusable
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Source file could not be read
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CoreError {
    /// Create parse error for path
    pub fn parse(path: impl Into<PathBuf>, source: ParseError) -> Self {
        Self::Parse {
            path: path.into(),
            source,
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

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config is not valid TOML for [`crate::ModernizeConfig`]
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config could not be fingerprinted
    #[error("failed to fingerprint config: {0}")]
    Fingerprint(#[from] HashError),
}

/// Result type for pipeline operations
pub type CoreResult<T> = Result<T, CoreError>;
