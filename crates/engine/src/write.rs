//! Write path: `set()`.
//!
//! Every accepted write follows the same order: validate, acquire the
//! stripe covering the key, append-and-sync to the WAL, publish to the
//! index, release the stripe. A failed append releases the lock without
//! ever touching the index.

use std::sync::atomic::Ordering;
use tracing::warn;

use crate::{Engine, EngineError};

impl Engine {
    /// Inserts or overwrites the binding for `key`.
    ///
    /// # Errors
    ///
    /// - [`EngineError::EmptyKey`] if `key` is empty.
    /// - [`EngineError::KeyTooLarge`] / [`EngineError::ValueTooLarge`] if
    ///   either exceeds the configured limit.
    /// - [`EngineError::Io`] if the WAL append or fsync fails. The index is
    ///   left untouched in this case.
    pub fn set(&self, key: &[u8], value: &[u8]) -> Result<(), EngineError> {
        // Every call that reaches the engine counts, even ones that go on
        // to fail validation.
        self.counters.set_count.fetch_add(1, Ordering::Relaxed);
        self.counters.total_requests.fetch_add(1, Ordering::Relaxed);

        if key.is_empty() {
            warn!("rejected set: empty key");
            return Err(EngineError::EmptyKey);
        }
        if key.len() > self.config.max_key_bytes {
            warn!(len = key.len(), max = self.config.max_key_bytes, "rejected set: key too large");
            return Err(EngineError::KeyTooLarge {
                len: key.len(),
                max: self.config.max_key_bytes,
            });
        }
        if value.len() > self.config.max_value_bytes {
            warn!(len = value.len(), max = self.config.max_value_bytes, "rejected set: value too large");
            return Err(EngineError::ValueTooLarge {
                len: value.len(),
                max: self.config.max_value_bytes,
            });
        }

        let _stripe = self.stripes.lock(key);

        let mut wal = self.wal.lock().unwrap_or_else(|p| p.into_inner());
        wal.append_and_sync(key, value)?;
        drop(wal);

        self.index.put(key.to_vec(), value.to_vec());
        Ok(())
    }
}
