//! # Index
//!
//! The permanent in-memory mapping from key to value: the engine's only
//! store once a write has been durably logged. Backed by a `BTreeMap` for
//! ascending-order iteration, guarded by a `RwLock` so point reads and
//! prefix scans can proceed with only shared access while a `put` takes
//! exclusive access just long enough to swap a value in.
//!
//! There is no delete operation — the data model a key, once written,
//! lives for the life of the process (see spec's Key entity lifecycle).
//!
//! ## Example
//! ```rust
//! use index::Index;
//!
//! let idx = Index::new();
//! idx.put(b"hello".to_vec(), b"world".to_vec());
//! assert_eq!(idx.get(b"hello").as_deref(), Some(&b"world"[..]));
//! ```

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

/// A concurrent, ordered key -> value map.
///
/// Values are held behind an `Arc<[u8]>` so a `get` can clone a cheap handle
/// under a read lock and return it after releasing the lock — a caller
/// never observes a value that is only partially overwritten.
#[derive(Debug, Default)]
pub struct Index {
    map: RwLock<BTreeMap<Vec<u8>, Arc<[u8]>>>,
}

impl Index {
    /// Creates a new, empty index.
    pub fn new() -> Self {
        Self {
            map: RwLock::new(BTreeMap::new()),
        }
    }

    /// Replaces any prior binding for `key` with `value`.
    ///
    /// Takes the exclusive lock only for the duration of the map insert.
    pub fn put(&self, key: Vec<u8>, value: Vec<u8>) {
        let mut guard = self.map.write().unwrap_or_else(|p| p.into_inner());
        guard.insert(key, Arc::from(value.into_boxed_slice()));
    }

    /// Returns the current binding for `key`, if any.
    ///
    /// Takes only a shared lock, for the duration of the lookup.
    pub fn get(&self, key: &[u8]) -> Option<Arc<[u8]>> {
        let guard = self.map.read().unwrap_or_else(|p| p.into_inner());
        guard.get(key).cloned()
    }

    /// Returns up to `max_results` `(key, value)` pairs whose keys begin
    /// with `prefix`, in ascending lexicographic order.
    ///
    /// `max_results == 0` means "no limit". An empty `prefix` matches every
    /// key, so this also implements "the first `max_results` keys overall".
    ///
    /// Held under a single shared lock for the whole scan: the result is a
    /// snapshot in the sense each pair existed at some instant during the
    /// scan, though the set as a whole need not correspond to one instant
    /// relative to concurrent `put`s on keys outside the prefix.
    pub fn prefix_scan(&self, prefix: &[u8], max_results: usize) -> Vec<(Vec<u8>, Arc<[u8]>)> {
        let guard = self.map.read().unwrap_or_else(|p| p.into_inner());
        let mut out = Vec::new();
        for (key, value) in guard.range(prefix.to_vec()..) {
            if !key.starts_with(prefix) {
                break;
            }
            out.push((key.clone(), value.clone()));
            if max_results > 0 && out.len() >= max_results {
                break;
            }
        }
        out
    }

    /// Current number of bindings. May be observed slightly stale under
    /// concurrency — acceptable for a `Stat` query.
    pub fn len(&self) -> usize {
        let guard = self.map.read().unwrap_or_else(|p| p.into_inner());
        guard.len()
    }

    /// Returns `true` if the index has no bindings.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
