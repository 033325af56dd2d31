//! Modernize Core - per-file pipeline
//!
//! Ties the rules to the result cache:
//! - Loads configuration from TOML
//! - Selects the cache backend
//! - Parses, rewrites and prints each file
//! - Reuses outcomes for unchanged files
//!
//! # Example
//!
//! ```rust,ignore
//! use modernize_core::{FileProcessor, ModernizeConfig};
//!
//! modernize_core::logging::init_tracing("modernize=info");
//! let config = ModernizeConfig::load("modernize.toml")?;
//! let processor = FileProcessor::new(&config)?;
//!
//! let result = processor.process_path(Path::new("src/Router.php"))?;
//! if let Some(source) = result.outcome.new_source {
//!     std::fs::write("src/Router.php", source)?;
//! }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod changed_files;
pub mod config;
pub mod error;
pub mod logging;
pub mod processor;
pub mod storage;
pub mod version;

// Re-exports for convenience
pub use changed_files::ChangedFilesDetector;
pub use config::{CacheClass, ModernizeConfig};
pub use error::{ConfigError, CoreError, CoreResult};
pub use processor::{FileOutcome, FileProcessor, ProcessResult};
pub use storage::AnyCacheStorage;
pub use version::VersionInfo;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
