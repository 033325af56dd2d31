//! Modernize Cache
//!
//! Durable, content-addressed storage for expensive per-file analysis results.
//!
//! # Core Concepts
//!
//! - [`CacheStorage`]: load/save/clean/clear contract shared by all backends
//! - [`FileCacheStorage`]: sharded JSON artifacts published by atomic rename
//! - [`MemoryCacheStorage`]: process-local backend with the same contract
//! - [`Cache`]: facade adding hit/miss statistics and memoisation
//! - [`CacheKeyHash`]: SHA-1 of a primary key, which picks the shard path
//!
//! # Example
//!
//! ```rust,ignore
//! use modernize_cache::{Cache, FileCacheStorage};
//!
//! let cache = Cache::new(FileCacheStorage::new("/tmp/modernize"));
//! cache.save("src/Foo.php", "rules-v1", &vec!["StrStartsWithRector"])?;
//!
//! let applied: Option<Vec<String>> = cache.load("src/Foo.php", "rules-v1");
//! ```

#![warn(unreachable_pub)]
#![warn(missing_docs)]

mod cache;
mod error;
mod hash;
mod item;

/// Storage backends
pub mod storage;

pub use cache::{Cache, CacheStats};
pub use error::{CacheError, CacheResult};
pub use hash::{CacheKeyHash, ContentHash, HashError};
pub use item::{CacheFilePaths, CacheItem, CACHE_FILE_EXTENSION};
pub use storage::{CacheStorage, FileCacheStorage, MemoryCacheStorage};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
