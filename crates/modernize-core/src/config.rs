//! Pipeline configuration
//!
//! Loaded from TOML; every field is optional and falls back to
//! [`ModernizeConfig::default`].

use std::path::{Path, PathBuf};

use modernize_cache::ContentHash;
use modernize_types::DetailedTypeAnalyzer;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Name of the cache directory under the system temp dir
const DEFAULT_CACHE_DIRECTORY: &str = "modernize_cached_files";

/// Cache backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheClass {
    /// Sharded files under `cache_directory`
    #[default]
    File,
    /// Process-local map
    Memory,
}

/// Configuration for the modernisation pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModernizeConfig {
    /// Root of the file cache
    pub cache_directory: PathBuf,
    /// Cache backend
    pub cache_class: CacheClass,
    /// Union size at which class-string unions are coarsened
    pub too_detailed_threshold: usize,
    /// Version of the rule set; results cached under another version are stale
    pub rules_version: String,
}

impl ModernizeConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With cache directory
    #[inline]
    #[must_use]
    pub fn with_cache_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.cache_directory = directory.into();
        self
    }

    /// With cache backend
    #[inline]
    #[must_use]
    pub fn with_cache_class(mut self, cache_class: CacheClass) -> Self {
        self.cache_class = cache_class;
        self
    }

    /// With detail threshold
    #[inline]
    #[must_use]
    pub fn with_too_detailed_threshold(mut self, threshold: usize) -> Self {
        self.too_detailed_threshold = threshold;
        self
    }

    /// With rules version
    #[inline]
    #[must_use]
    pub fn with_rules_version(mut self, version: impl Into<String>) -> Self {
        self.rules_version = version.into();
        self
    }

    /// Parse TOML, using defaults for omitted fields
    ///
    /// # Errors
    /// Returns error if the TOML is malformed or has wrongly typed fields
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Load TOML config file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Hex digest of the whole configuration
    ///
    /// Cached results are stored under this value, so any config change
    /// turns earlier results into misses.
    ///
    /// # Errors
    /// Returns error if the config cannot be serialized
    pub fn fingerprint(&self) -> Result<String, ConfigError> {
        Ok(ContentHash::compute_serializable(self)?.to_string())
    }

    /// Detail check configured by `too_detailed_threshold`
    #[inline]
    #[must_use]
    pub fn detailed_type_analyzer(&self) -> DetailedTypeAnalyzer {
        DetailedTypeAnalyzer::new(self.too_detailed_threshold)
    }
}

impl Default for ModernizeConfig {
    fn default() -> Self {
        Self {
            cache_directory: std::env::temp_dir().join(DEFAULT_CACHE_DIRECTORY),
            cache_class: CacheClass::default(),
            too_detailed_threshold: DetailedTypeAnalyzer::DEFAULT_THRESHOLD,
            rules_version: modernize_rules::VERSION.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults() {
        let config = ModernizeConfig::new();
        assert_eq!(config.cache_class, CacheClass::File);
        assert_eq!(config.too_detailed_threshold, 4);
        assert_eq!(config.rules_version, modernize_rules::VERSION);
        assert!(config.cache_directory.ends_with("modernize_cached_files"));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = ModernizeConfig::from_toml_str(
            r#"
            cache_class = "memory"
            too_detailed_threshold = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.cache_class, CacheClass::Memory);
        assert_eq!(config.too_detailed_threshold, 3);
        assert_eq!(config.rules_version, ModernizeConfig::default().rules_version);
    }

    #[test]
    fn invalid_toml_is_rejected() {
        let err = ModernizeConfig::from_toml_str("too_detailed_threshold = \"many\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("modernize.toml");
        std::fs::write(&path, "rules_version = \"2024.1\"\n").unwrap();
        assert_eq!(ModernizeConfig::load(&path).unwrap().rules_version, "2024.1");

        let missing = ModernizeConfig::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(missing, ConfigError::Read { .. }));
    }

    #[test]
    fn fingerprint_tracks_every_field() {
        let base = ModernizeConfig::new();
        let fingerprint = base.fingerprint().unwrap();
        assert_eq!(fingerprint, base.clone().fingerprint().unwrap());
        assert_eq!(fingerprint.len(), 64);

        for changed in [
            base.clone().with_rules_version("other"),
            base.clone().with_too_detailed_threshold(9),
            base.clone().with_cache_class(CacheClass::Memory),
        ] {
            assert_ne!(changed.fingerprint().unwrap(), fingerprint);
        }
    }
}
