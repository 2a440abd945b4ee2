//! Read path: `get()` and `get_prefix()`.
//!
//! Neither operation takes a stripe lock — they rely entirely on the
//! index's own concurrency guarantees.

use std::sync::atomic::Ordering;
use tracing::warn;

use crate::{Engine, EngineError};

impl Engine {
    /// Looks up the current binding for `key`.
    ///
    /// Returns `Ok(None)` if no `Set` has ever been applied for this key.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EmptyKey`] if `key` is empty — this is the
    /// only way `get` can fail.
    pub fn get(&self, key: &[u8]) -> Result<Option<std::sync::Arc<[u8]>>, EngineError> {
        self.counters.get_count.fetch_add(1, Ordering::Relaxed);
        self.counters.total_requests.fetch_add(1, Ordering::Relaxed);

        if key.is_empty() {
            warn!("rejected get: empty key");
            return Err(EngineError::EmptyKey);
        }

        Ok(self.index.get(key))
    }

    /// Returns up to `max_results` `(key, value)` pairs whose keys begin
    /// with `prefix`, in ascending lexicographic order.
    ///
    /// An empty `prefix` matches every key, so this also returns the first
    /// `max_results` keys overall. `max_results == 0` means "no limit".
    pub fn get_prefix(
        &self,
        prefix: &[u8],
        max_results: usize,
    ) -> Vec<(Vec<u8>, std::sync::Arc<[u8]>)> {
        self.counters.getprefix_count.fetch_add(1, Ordering::Relaxed);
        self.counters.total_requests.fetch_add(1, Ordering::Relaxed);

        self.index.prefix_scan(prefix, max_results)
    }
}
