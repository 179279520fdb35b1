//! Size Function Module
//!
//! Wraps the caller-supplied size metric and rejects negative answers.

use std::fmt::Debug;

use tracing::error;

use crate::error::{CacheError, Result};

/// Caller-supplied logical size of a key/value pair.
///
/// Must be pure and never negative. The result is signed so that a broken
/// implementation can be detected rather than wrapped around.
pub(crate) type SizeFn<K, V> = Box<dyn Fn(&K, &V) -> i64 + Send + Sync>;

// == Checked Size ==
/// Evaluates `size_of` for a pair, failing on a negative result.
pub(crate) fn checked_size<K, V>(size_of: &SizeFn<K, V>, key: &K, value: &V) -> Result<u64>
where
    K: Debug,
    V: Debug,
{
    let size = size_of(key, value);
    u64::try_from(size).map_err(|_| {
        error!(?key, size, "size function returned a negative size");
        CacheError::InvalidSize {
            key: format!("{:?}", key),
            value: format!("{:?}", value),
            size,
        }
    })
}
