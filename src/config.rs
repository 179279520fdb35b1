//! Configuration Module
//!
//! Holds the two budgets a cache is built with.

use serde::{Deserialize, Serialize};

use crate::cache::{DEFAULT_MAX_ITEM_COUNT, DEFAULT_MAX_TOTAL_SIZE};

/// Cache limits.
///
/// Deserializable so a host application can embed it in its own
/// configuration; missing fields fall back to the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum sum of logical sizes across all entries
    pub max_total_size: u64,
    /// Maximum number of entries the cache can hold
    pub max_item_count: usize,
}

impl CacheConfig {
    /// Creates a config with explicit limits.
    pub fn new(max_total_size: u64, max_item_count: usize) -> Self {
        Self {
            max_total_size,
            max_item_count,
        }
    }

    /// Replaces the total size budget.
    pub fn with_max_total_size(mut self, max_total_size: u64) -> Self {
        self.max_total_size = max_total_size;
        self
    }

    /// Replaces the entry count budget.
    pub fn with_max_item_count(mut self, max_item_count: usize) -> Self {
        self.max_item_count = max_item_count;
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_total_size: DEFAULT_MAX_TOTAL_SIZE,
            max_item_count: DEFAULT_MAX_ITEM_COUNT,
        }
    }
}
