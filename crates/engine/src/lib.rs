//! # Engine
//!
//! The central orchestrator tying the [`index`], [`wal`], and [`stripelock`]
//! crates into a complete key-value store.
//!
//! ## Architecture
//!
//! ```text
//! Client
//!   |
//!   v
//! ┌───────────────────────────────────────────────┐
//! │                   ENGINE                      │
//! │                                               │
//! │ write.rs → stripe lock → WAL append+sync      │
//! │              → index.put → release lock       │
//! │                                               │
//! │ read.rs  → index.get / index.prefix_scan      │
//! │              (no stripe lock)                 │
//! │                                               │
//! │ stat.rs  → atomic counters + start time       │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! ## Module responsibilities
//!
//! | Module      | Purpose                                                |
//! |-------------|---------------------------------------------------------|
//! | `lib.rs`    | `Engine` struct, constructor, `EngineError`, `Debug`     |
//! | `recovery`  | WAL replay into the index before the engine opens        |
//! | `write`     | `set()`                                                  |
//! | `read`      | `get()`, `get_prefix()`                                  |
//! | `stat`      | counters, `StatSnapshot`, `stat()`                       |
//!
//! ## Crash safety
//!
//! Every accepted write is appended to the WAL and fsync'd before it is
//! published to the index (see `write::Engine::set`). A failed append never
//! touches the index, so a crash never produces a false acknowledgement.

mod read;
mod recovery;
mod stat;
mod write;

pub use stat::StatSnapshot;

use chrono::Utc;
use config::EngineConfig;
use index::Index;
use std::sync::atomic::AtomicU64;
use std::sync::Mutex;
use stripelock::StripeLocks;
use thiserror::Error;
use wal::{WalError, WalWriter};

/// Errors surfaced by engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The caller supplied a zero-length key.
    #[error("key must not be empty")]
    EmptyKey,

    /// The key exceeds the configured limit.
    #[error("key too large: {len} bytes (max {max})")]
    KeyTooLarge {
        /// Length of the rejected key.
        len: usize,
        /// Configured ceiling.
        max: usize,
    },

    /// The value exceeds the configured limit.
    #[error("value too large: {len} bytes (max {max})")]
    ValueTooLarge {
        /// Length of the rejected value.
        len: usize,
        /// Configured ceiling.
        max: usize,
    },

    /// An underlying WAL write or fsync failed. The index was not updated.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The WAL contains mid-file corruption; recovery refuses to proceed.
    #[error("corrupt log: {detail}")]
    CorruptLog {
        /// Human-readable detail, for logs only.
        detail: String,
    },
}

impl From<WalError> for EngineError {
    fn from(err: WalError) -> Self {
        match err {
            WalError::Io(io_err) => EngineError::Io(io_err),
            WalError::CorruptLog { reason } => EngineError::CorruptLog { detail: reason },
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct Counters {
    pub(crate) set_count: AtomicU64,
    pub(crate) get_count: AtomicU64,
    pub(crate) getprefix_count: AtomicU64,
    pub(crate) total_requests: AtomicU64,
}

/// The storage engine: index, WAL, stripe locks, and counters bound
/// together with a single lifetime.
///
/// `Engine` is `Send + Sync` and is meant to be shared (typically behind an
/// `Arc`) across the worker threads a transport layer spawns; every
/// operation takes `&self`.
pub struct Engine {
    index: Index,
    wal: Mutex<WalWriter>,
    stripes: StripeLocks,
    config: EngineConfig,
    counters: Counters,
    server_start_time: String,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("wal_path", &self.config.wal_path)
            .field("stripe_count", &self.config.stripe_count)
            .field("key_count", &self.index.len())
            .field("server_start_time", &self.server_start_time)
            .finish()
    }
}

impl Engine {
    /// Opens the store at `config.wal_path`, replaying the WAL into a fresh
    /// index before returning. The engine must not accept traffic until
    /// this call completes.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::CorruptLog`] if the WAL contains mid-file
    /// corruption, or [`EngineError::Io`] on any other I/O failure during
    /// recovery or opening the writer.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let index = Index::new();
        recovery::recover(&config.wal_path, &index)?;

        let wal = WalWriter::open(&config.wal_path, config.fsync_on_append)?;
        let stripes = StripeLocks::new(config.stripe_count);

        Ok(Self {
            index,
            wal: Mutex::new(wal),
            stripes,
            config,
            counters: Counters::default(),
            server_start_time: Utc::now().to_rfc3339(),
        })
    }

    /// The configuration this engine was constructed with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
