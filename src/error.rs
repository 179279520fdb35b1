//! Error types for the bounded LRU cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Errors surfaced by [`BoundedLruCache::put`](crate::cache::BoundedLruCache::put).
///
/// Every variant points at a broken size function. None of them can be
/// produced by correct usage, whatever the concurrency pattern.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The size function reported a negative size for a key/value pair.
    #[error("size function is not allowed to return a negative size: key={key}, value={value}, size={size}")]
    InvalidSize {
        key: String,
        value: String,
        size: i64,
    },

    /// The running total went below zero.
    #[error("size function is reporting inconsistent results: total size is negative ({size})")]
    NegativeTotalSize { size: i64 },

    /// The cache holds no entries but the running total is not zero.
    #[error("size function is reporting inconsistent results: cache is empty but total size is {size}")]
    SizeMismatch { size: i64 },

    /// Admitting an entry would overflow the running total.
    #[error("total size overflow: current={current}, added={added}")]
    SizeOverflow { current: i64, added: u64 },
}

impl CacheError {
    /// Returns true for the bookkeeping failures detected by the trim pass.
    ///
    /// These are fatal for the cache instance that reported them.
    pub fn is_consistency_error(&self) -> bool {
        matches!(
            self,
            CacheError::NegativeTotalSize { .. } | CacheError::SizeMismatch { .. }
        )
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
