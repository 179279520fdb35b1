//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the cache against a simple reference model.

use proptest::prelude::*;

use crate::cache::BoundedLruCache;
use crate::error::CacheError;

// == Strategies ==
/// Small key space so that replacements, hits and misses all happen.
fn key_strategy() -> impl Strategy<Value = u8> {
    0u8..16
}

/// The value is its own size.
fn size_strategy() -> impl Strategy<Value = u32> {
    0u32..40
}

#[derive(Debug, Clone)]
enum CacheOp {
    Put { key: u8, size: u32 },
    Get { key: u8 },
    Remove { key: u8 },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        3 => (key_strategy(), size_strategy()).prop_map(|(key, size)| CacheOp::Put { key, size }),
        1 => key_strategy().prop_map(|key| CacheOp::Get { key }),
        1 => key_strategy().prop_map(|key| CacheOp::Remove { key }),
    ]
}

fn sized_cache(max_total_size: u64, max_item_count: usize) -> BoundedLruCache<u8, u32> {
    BoundedLruCache::with_limits(max_total_size, max_item_count, |_, size: &u32| *size as i64)
}

// == Reference Model ==
/// Entries in most-recently-used-first order.
#[derive(Debug, Default)]
struct Model {
    entries: Vec<(u8, u32)>,
    max_total_size: u64,
    max_item_count: usize,
}

impl Model {
    fn total(&self) -> u64 {
        self.entries.iter().map(|(_, size)| *size as u64).sum()
    }

    fn take(&mut self, key: u8) -> Option<u32> {
        let pos = self.entries.iter().position(|(k, _)| *k == key)?;
        Some(self.entries.remove(pos).1)
    }

    fn put(&mut self, key: u8, size: u32) -> Option<u32> {
        let previous = self.take(key);
        self.entries.insert(0, (key, size));
        while self.entries.len() > self.max_item_count || self.total() > self.max_total_size {
            self.entries.pop();
        }
        previous
    }

    fn get(&mut self, key: u8) -> Option<u32> {
        let size = self.take(key)?;
        self.entries.insert(0, (key, size));
        Some(size)
    }

    fn keys(&self) -> Vec<u8> {
        self.entries.iter().map(|(k, _)| *k).collect()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // **Property 1: Model Agreement**
    // *For any* sequence of put/get/remove, every return value, the recency
    // order and the running size SHALL match the reference model.
    #[test]
    fn prop_matches_reference_model(
        max_total_size in 0u64..120,
        max_item_count in 0usize..8,
        ops in prop::collection::vec(cache_op_strategy(), 1..80)
    ) {
        let cache = sized_cache(max_total_size, max_item_count);
        let mut model = Model { max_total_size, max_item_count, ..Model::default() };

        for op in ops {
            match op {
                CacheOp::Put { key, size } => {
                    prop_assert_eq!(cache.put(key, size).unwrap(), model.put(key, size));
                }
                CacheOp::Get { key } => {
                    prop_assert_eq!(cache.get(&key), model.get(key));
                }
                CacheOp::Remove { key } => {
                    prop_assert_eq!(cache.remove(&key), model.take(key));
                }
            }

            prop_assert_eq!(cache.keys(), model.keys());
            prop_assert_eq!(cache.size(), model.total() as i64);
        }
    }

    // **Property 2: Budget Enforcement**
    // *For any* sequence of puts, the entry count and total size SHALL never
    // exceed their budgets after a put returns.
    #[test]
    fn prop_budgets_hold_after_every_put(
        max_total_size in 0u64..120,
        max_item_count in 0usize..8,
        entries in prop::collection::vec((key_strategy(), size_strategy()), 1..100)
    ) {
        let cache = sized_cache(max_total_size, max_item_count);

        for (key, size) in entries {
            cache.put(key, size).unwrap();

            prop_assert!(cache.item_count() <= max_item_count);
            prop_assert!(cache.size() >= 0);
            prop_assert!(cache.size() as u64 <= max_total_size);
        }
    }

    // **Property 3: Oversized Entries Never Persist**
    // *For any* entry larger than the whole size budget, the put SHALL leave
    // it (and everything else) out of the cache.
    #[test]
    fn prop_oversized_entry_empties_cache(
        fill in prop::collection::vec((key_strategy(), 0u32..5), 0..10),
        extra in 1u32..20
    ) {
        let max_total_size = 50;
        let cache = sized_cache(max_total_size, 100);
        for (key, size) in fill {
            cache.put(key, size).unwrap();
        }

        cache.put(200, max_total_size as u32 + extra).unwrap();

        prop_assert_eq!(cache.item_count(), 0);
        prop_assert_eq!(cache.size(), 0);
    }

    // **Property 4: Recency Tracking**
    // *For any* filled cache, a get on the least recently used key SHALL
    // spare it from the next eviction.
    #[test]
    fn prop_get_spares_entry_from_eviction(capacity in 2usize..10, new_key in 100u8..200) {
        let cache = sized_cache(u64::MAX, capacity);
        for key in 0..capacity as u8 {
            cache.put(key, 1).unwrap();
        }

        prop_assert_eq!(cache.get(&0), Some(1));
        cache.put(new_key, 1).unwrap();

        prop_assert!(cache.contains_key(&0));
        prop_assert!(!cache.contains_key(&1));
        prop_assert!(cache.contains_key(&new_key));
        prop_assert_eq!(cache.item_count(), capacity);
    }

    // **Property 5: Negative Sizes Are Rejected**
    // *For any* key and negative size, put SHALL fail and store nothing.
    #[test]
    fn prop_negative_size_rejected(key in key_strategy(), size in i64::MIN..0) {
        let cache = BoundedLruCache::with_limits(u64::MAX, 100, |_: &u8, size: &i64| *size);

        let err = cache.put(key, size).unwrap_err();

        let is_invalid_size = matches!(err, CacheError::InvalidSize { .. });
        prop_assert!(is_invalid_size);
        prop_assert!(!cache.contains_key(&key));
        prop_assert_eq!(cache.size(), 0);
    }
}
