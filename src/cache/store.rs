//! Cache Store Module
//!
//! Main cache engine combining the recency list with running size accounting
//! behind a single lock.

use std::borrow::Borrow;
use std::fmt::{self, Debug};
use std::hash::Hash;

use parking_lot::Mutex;
use tracing::{debug, error, trace, warn};

use crate::cache::size::{checked_size, SizeFn};
use crate::cache::LruList;
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};

// == Cache State ==
/// Everything the lock guards.
struct CacheState<K, V> {
    entries: LruList<K, V>,
    /// Sum of sizes of all held entries
    size: i64,
}

// == Bounded LRU Cache ==
/// Thread-safe LRU cache bounded by total logical size and by entry count.
///
/// Every insert is followed by a trim pass that evicts least recently used
/// entries until both budgets hold again. The size of each pair is given by
/// a caller-supplied function, e.g. the byte footprint of the value.
///
/// Share it between threads with `Arc`; all methods take `&self`.
///
/// ```
/// use bounded_lru::BoundedLruCache;
///
/// let cache = BoundedLruCache::with_limits(10, 100, |_key: &u32, value: &Vec<u8>| {
///     value.len() as i64
/// });
///
/// cache.put(1, vec![0; 6]).unwrap();
/// cache.put(2, vec![0; 6]).unwrap();
///
/// // 12 bytes do not fit into 10, so key 1 was evicted.
/// assert_eq!(cache.get(&1), None);
/// assert_eq!(cache.size(), 6);
/// ```
pub struct BoundedLruCache<K, V> {
    state: Mutex<CacheState<K, V>>,
    size_of: SizeFn<K, V>,
    max_total_size: u64,
    max_item_count: usize,
}

impl<K, V> BoundedLruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    // == Constructors ==
    /// Creates a cache with the default limits (10 MiB, 10 items).
    pub fn new<F>(size_of: F) -> Self
    where
        F: Fn(&K, &V) -> i64 + Send + Sync + 'static,
    {
        Self::with_config(&CacheConfig::default(), size_of)
    }

    /// Creates a cache with the limits from `config`.
    pub fn with_config<F>(config: &CacheConfig, size_of: F) -> Self
    where
        F: Fn(&K, &V) -> i64 + Send + Sync + 'static,
    {
        Self::with_limits(config.max_total_size, config.max_item_count, size_of)
    }

    /// Creates a cache with explicit limits.
    ///
    /// # Arguments
    /// * `max_total_size` - Budget for the sum of all entry sizes
    /// * `max_item_count` - Maximum number of entries
    /// * `size_of` - Logical size of a key/value pair, never negative
    pub fn with_limits<F>(max_total_size: u64, max_item_count: usize, size_of: F) -> Self
    where
        F: Fn(&K, &V) -> i64 + Send + Sync + 'static,
    {
        Self {
            state: Mutex::new(CacheState {
                entries: LruList::new(),
                size: 0,
            }),
            size_of: Box::new(size_of),
            max_total_size,
            max_item_count,
        }
    }

    // == Get ==
    /// Returns a copy of the value and marks the entry most recently used.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.state.lock().entries.get(key).cloned()
    }

    // == Peek ==
    /// Returns a copy of the value without changing its recency.
    pub fn peek<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.state.lock().entries.peek(key).cloned()
    }

    // == Contains ==
    /// Checks membership without changing recency.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.state.lock().entries.contains(key)
    }

    // == Size ==
    /// Returns the sum of sizes of all held entries.
    pub fn size(&self) -> i64 {
        self.state.lock().size
    }

    // == Item Count ==
    /// Returns the number of held entries.
    pub fn item_count(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().entries.is_empty()
    }

    // == Keys ==
    /// Returns a snapshot of the keys, most recently used first.
    pub fn keys(&self) -> Vec<K> {
        self.state.lock().entries.keys_mru()
    }

    // == Clear ==
    /// Drops every entry and resets the running size.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.entries.clear();
        state.size = 0;
    }

    pub fn max_total_size(&self) -> u64 {
        self.max_total_size
    }

    pub fn max_item_count(&self) -> usize {
        self.max_item_count
    }
}

impl<K, V> BoundedLruCache<K, V>
where
    K: Hash + Eq + Clone + Debug,
    V: Debug,
{
    // == Put ==
    /// Stores a key/value pair and returns the value it replaced.
    ///
    /// The entry becomes the most recently used one. Least recently used
    /// entries are then evicted until both budgets hold; a value larger than
    /// the whole size budget is therefore evicted right away.
    ///
    /// # Errors
    /// - [`CacheError::InvalidSize`] if the size function returns a negative
    ///   size for the new or the replaced pair. Nothing is stored.
    /// - [`CacheError::SizeOverflow`] if the running total would overflow.
    ///   Nothing is stored.
    /// - [`CacheError::NegativeTotalSize`] / [`CacheError::SizeMismatch`] if
    ///   the trim pass finds the running total inconsistent, which only a
    ///   size function that changes its answers can cause.
    pub fn put(&self, key: K, value: V) -> Result<Option<V>> {
        let added = checked_size(&self.size_of, &key, &value)?;

        let mut evicted = Vec::new();
        let previous = {
            let mut state = self.state.lock();

            // Size the replaced pair before mutating so a failure stores nothing.
            let removed = match state.entries.peek(&key) {
                Some(old) => Some(checked_size(&self.size_of, &key, old)?),
                None => None,
            };

            let grown = i64::try_from(added)
                .ok()
                .and_then(|added| state.size.checked_add(added))
                .ok_or(CacheError::SizeOverflow {
                    current: state.size,
                    added,
                })?;

            if added > self.max_total_size {
                warn!(
                    ?key,
                    size = added,
                    max_total_size = self.max_total_size,
                    "entry exceeds the size budget and will be evicted immediately"
                );
            }

            state.size = grown;
            let previous = state.entries.insert(key, value);
            if let Some(removed) = removed {
                // `removed` was accounted for when the old pair went in.
                state.size = state.size.saturating_sub(removed as i64);
            }

            self.trim(&mut state, &mut evicted)?;
            previous
        };

        // Evicted values are dropped outside the lock.
        drop(evicted);
        Ok(previous)
    }

    // == Remove ==
    /// Removes an entry, returning its value.
    ///
    /// Never trims. A negative size reported here is logged and not
    /// subtracted; the next trim pass reports the mismatch. The running total
    /// saturates instead of wrapping, so a size function that drifts upward
    /// surfaces as [`CacheError::NegativeTotalSize`] on the next put.
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut state = self.state.lock();
        let (key, value) = state.entries.remove(key)?;
        if let Ok(size) = checked_size(&self.size_of, &key, &value) {
            state.size = state.size.saturating_sub(size as i64);
        }
        Some(value)
    }

    // == Trim ==
    /// Evicts least recently used entries until both budgets hold.
    ///
    /// Runs under the caller's lock. Evicted pairs are pushed onto `evicted`.
    fn trim(&self, state: &mut CacheState<K, V>, evicted: &mut Vec<(K, V)>) -> Result<()> {
        loop {
            if state.size < 0 {
                error!(size = state.size, "cache total size went negative");
                return Err(CacheError::NegativeTotalSize { size: state.size });
            }
            if state.entries.is_empty() && state.size != 0 {
                error!(size = state.size, "cache is empty but total size is not zero");
                return Err(CacheError::SizeMismatch { size: state.size });
            }

            // `size` is non-negative past the checks above.
            let over_size = state.size as u64 > self.max_total_size;
            let over_count = state.entries.len() > self.max_item_count;
            if !over_size && !over_count {
                break;
            }

            let Some((key, value)) = state.entries.pop_lru() else {
                break;
            };
            let size = checked_size(&self.size_of, &key, &value)?;
            state.size = state.size.saturating_sub(size as i64);
            trace!(?key, size, "evicted least recently used entry");
            evicted.push((key, value));
        }

        if !evicted.is_empty() {
            debug!(
                evicted = evicted.len(),
                size = state.size,
                items = state.entries.len(),
                "trim pass complete"
            );
        }
        Ok(())
    }
}

impl<K, V> Debug for BoundedLruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("BoundedLruCache")
            .field("size", &state.size)
            .field("item_count", &state.entries.len())
            .field("max_total_size", &self.max_total_size)
            .field("max_item_count", &self.max_item_count)
            .finish()
    }
}
