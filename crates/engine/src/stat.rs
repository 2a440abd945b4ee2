//! Counters and the `Stat` snapshot.

use std::sync::atomic::Ordering;

use crate::Engine;

/// A point-in-time snapshot of server counters, returned by [`Engine::stat`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatSnapshot {
    /// Current number of distinct keys in the index.
    pub key_count: u64,
    /// Absolute wall-clock timestamp the engine was constructed, ISO-8601.
    pub server_start_time: String,
    /// Total requests that reached the engine, across all operations.
    pub total_requests: u64,
    /// Number of `Set` calls that reached the engine.
    pub set_count: u64,
    /// Number of `Get` calls that reached the engine.
    pub get_count: u64,
    /// Number of `GetPrefix` calls that reached the engine.
    pub getprefix_count: u64,
}

impl Engine {
    /// Returns a snapshot of the engine's counters and key count.
    ///
    /// Does not itself increment any counter — a `Stat` call is an
    /// observation, not a mutation of the request tally.
    pub fn stat(&self) -> StatSnapshot {
        StatSnapshot {
            key_count: self.index.len() as u64,
            server_start_time: self.server_start_time.clone(),
            total_requests: self.counters.total_requests.load(Ordering::Relaxed),
            set_count: self.counters.set_count.load(Ordering::Relaxed),
            get_count: self.counters.get_count.load(Ordering::Relaxed),
            getprefix_count: self.counters.getprefix_count.load(Ordering::Relaxed),
        }
    }
}
