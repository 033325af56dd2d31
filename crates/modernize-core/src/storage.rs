//! Cache backend selected at runtime

use modernize_cache::{CacheResult, CacheStorage, FileCacheStorage, MemoryCacheStorage};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::{CacheClass, ModernizeConfig};

/// Either bundled cache backend
///
/// [`CacheStorage`] has generic methods, so the choice is an enum rather
/// than a trait object.
#[derive(Debug)]
pub enum AnyCacheStorage {
    /// Sharded files on disk
    File(FileCacheStorage),
    /// In-process map
    Memory(MemoryCacheStorage),
}

impl AnyCacheStorage {
    /// Backend described by `config`
    #[must_use]
    pub fn from_config(config: &ModernizeConfig) -> Self {
        match config.cache_class {
            CacheClass::File => Self::File(FileCacheStorage::new(&config.cache_directory)),
            CacheClass::Memory => Self::Memory(MemoryCacheStorage::new()),
        }
    }
}

impl CacheStorage for AnyCacheStorage {
    fn load<T: DeserializeOwned>(&self, key: &str, variable_key: &str) -> Option<T> {
        match self {
            Self::File(storage) => storage.load(key, variable_key),
            Self::Memory(storage) => storage.load(key, variable_key),
        }
    }

    fn save<T: Serialize>(&self, key: &str, variable_key: &str, data: &T) -> CacheResult<()> {
        match self {
            Self::File(storage) => storage.save(key, variable_key, data),
            Self::Memory(storage) => storage.save(key, variable_key, data),
        }
    }

    fn clean(&self, key: &str) -> CacheResult<()> {
        match self {
            Self::File(storage) => storage.clean(key),
            Self::Memory(storage) => storage.clean(key),
        }
    }

    fn clear(&self) -> CacheResult<()> {
        match self {
            Self::File(storage) => storage.clear(),
            Self::Memory(storage) => storage.clear(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_follows_config() {
        let dir = tempfile::tempdir().unwrap();
        let file = AnyCacheStorage::from_config(&ModernizeConfig::new().with_cache_directory(dir.path()));
        assert!(matches!(&file, AnyCacheStorage::File(s) if s.directory() == dir.path()));

        let memory = AnyCacheStorage::from_config(&ModernizeConfig::new().with_cache_class(CacheClass::Memory));
        memory.save("k", "v", &1u8).unwrap();
        assert_eq!(memory.load::<u8>("k", "v"), Some(1));
    }
}
