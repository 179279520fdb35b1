//! Bounded LRU - a size-bounded, thread-safe LRU cache
//!
//! Entries are evicted least recently used first whenever either the total
//! logical size or the entry count exceeds its budget. The notion of size is
//! supplied by the caller.

pub mod cache;
pub mod config;
pub mod error;

pub use cache::BoundedLruCache;
pub use config::CacheConfig;
pub use error::{CacheError, Result};
