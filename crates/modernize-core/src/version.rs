//! Version reporting

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::config::ModernizeConfig;

/// Versions that identify a pipeline build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    /// Crate version
    pub package: String,
    /// Rule set version from the configuration
    pub rules: String,
}

impl VersionInfo {
    /// Versions for the given configuration
    #[must_use]
    pub fn current(config: &ModernizeConfig) -> Self {
        Self {
            package: crate::VERSION.to_string(),
            rules: config.rules_version.clone(),
        }
    }
}

impl Display for VersionInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "modernize {} (rules {})", self.package, self.rules)
    }
}
