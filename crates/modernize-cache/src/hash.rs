//! Hashing primitives for cache addressing
//!
//! Provides two strongly-typed digests:
//! - [`CacheKeyHash`]: SHA-1 of a primary cache key, which fixes the on-disk
//!   shard layout (`ab/cd/abcd…`) shared with external cache tooling
//! - [`ContentHash`]: Blake3 fingerprint of file contents and configuration

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use sha1::{Digest, Sha1};

/// SHA-1 digest of a primary cache key
///
/// The hex form of this hash names the artifact file and its two shard
/// directories, so it must stay SHA-1 for on-disk compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CacheKeyHash([u8; 20]);

impl CacheKeyHash {
    /// Hash a primary cache key
    #[inline]
    #[must_use]
    pub fn of_key(key: &str) -> Self {
        let out: [u8; 20] = Sha1::digest(key.as_bytes()).into();
        Self(out)
    }

    /// Get reference to the underlying bytes
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Full lowercase hex form (40 chars)
    #[inline]
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// First-level shard directory name (hex chars 0..2)
    #[inline]
    #[must_use]
    pub fn first_shard(&self) -> String {
        hex::encode(&self.0[..1])
    }

    /// Second-level shard directory name (hex chars 2..4)
    #[inline]
    #[must_use]
    pub fn second_shard(&self) -> String {
        hex::encode(&self.0[1..2])
    }
}

impl Display for CacheKeyHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// A 32-byte content hash (Blake3)
///
/// Used to fingerprint file contents and configuration so that cache keys
/// change whenever the analysed input does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Create a new ContentHash from raw bytes
    #[inline]
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Create hash from byte slice
    ///
    /// # Errors
    /// Returns error if slice length is not exactly 32 bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self, HashError> {
        let arr: [u8; 32] = bytes.try_into().map_err(|_| HashError::InvalidLength {
            expected: 32,
            actual: bytes.len(),
        })?;
        Ok(Self(arr))
    }

    /// Compute Blake3 hash of arbitrary data
    #[inline]
    #[must_use]
    pub fn compute(data: &[u8]) -> Self {
        Self::new(*blake3::hash(data).as_bytes())
    }

    /// Compute hash from serializable value (JSON encoding)
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn compute_serializable<T>(value: &T) -> Result<Self, HashError>
    where
        T: serde::Serialize,
    {
        let json = serde_json::to_vec(value)?;
        Ok(Self::compute(&json))
    }

    /// Short string representation (first 16 hex chars)
    #[inline]
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

impl Display for ContentHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl FromStr for ContentHash {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s)?;
        Self::from_slice(&bytes)
    }
}

/// Errors that can occur when working with hashes
#[derive(Debug, thiserror::Error)]
pub enum HashError {
    /// Invalid hash length
    #[error("invalid hash length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Hex encoding error
    #[error("hex decode error: {0}")]
    HexDecode(#[from] hex::FromHexError),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_key_hash_matches_sha1() {
        // sha1("abc")
        let hash = CacheKeyHash::of_key("abc");
        assert_eq!(hash.to_hex(), "a9993e364706816aba3e25717850c26c9cd0d89d");
    }

    #[test]
    fn cache_key_hash_shards() {
        let hash = CacheKeyHash::of_key("abc");
        assert_eq!(hash.first_shard(), "a9");
        assert_eq!(hash.second_shard(), "99");
        assert!(hash.to_hex().starts_with(&format!("{}{}", hash.first_shard(), hash.second_shard())));
    }

    #[test]
    fn content_hash_compute_deterministic() {
        let h1 = ContentHash::compute(b"hello world");
        let h2 = ContentHash::compute(b"hello world");
        assert_eq!(h1, h2);
        assert_ne!(h1, ContentHash::compute(b"hello world!"));
    }

    #[test]
    fn content_hash_display_and_parse() {
        let hash = ContentHash::compute(b"test");
        let parsed: ContentHash = hash.to_string().parse().unwrap();
        assert_eq!(hash, parsed);
    }

    #[test]
    fn content_hash_from_slice_invalid_length() {
        let result = ContentHash::from_slice(&[1u8; 31]);
        assert!(matches!(
            result,
            Err(HashError::InvalidLength {
                expected: 32,
                actual: 31
            })
        ));
    }

    #[test]
    fn content_hash_short_is_prefix() {
        let hash = ContentHash::compute(b"test");
        assert_eq!(hash.short().len(), 16);
        assert!(hash.to_string().starts_with(&hash.short()));
    }

    #[test]
    fn content_hash_of_serializable() {
        let a = ContentHash::compute_serializable(&("rules", 1)).unwrap();
        let b = ContentHash::compute_serializable(&("rules", 2)).unwrap();
        assert_ne!(a, b);
    }
}
