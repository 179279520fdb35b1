//! Cache Module
//!
//! Provides a thread-safe LRU cache bounded by total size and entry count.

mod lru;
mod size;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub(crate) use lru::LruList;
pub use store::BoundedLruCache;

// == Public Constants ==
/// Default budget for the sum of entry sizes
pub const DEFAULT_MAX_TOTAL_SIZE: u64 = 10 * 1024 * 1024; // 10 MiB

/// Default maximum number of entries
pub const DEFAULT_MAX_ITEM_COUNT: usize = 10;
