//! # Config
//!
//! Construction options for the storage engine, with the same
//! env-var-with-fallback loading style used at the command-line entry
//! point, lifted into its own crate so any transport can share it.

use std::path::PathBuf;

/// Default WAL file path.
pub const DEFAULT_WAL_PATH: &str = "wal.log";
/// Default number of stripe locks.
pub const DEFAULT_STRIPE_COUNT: usize = 64;
/// Default maximum key size: 4 KiB.
pub const DEFAULT_MAX_KEY_BYTES: usize = 4 * 1024;
/// Default maximum value size: 1 MiB.
pub const DEFAULT_MAX_VALUE_BYTES: usize = 1024 * 1024;

/// Options recognized by the engine constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Path to the write-ahead log file.
    pub wal_path: PathBuf,
    /// Number of locks in the striped array.
    pub stripe_count: usize,
    /// Reject `Set` beyond this key length.
    pub max_key_bytes: usize,
    /// Reject `Set` beyond this value length.
    pub max_value_bytes: usize,
    /// If false, WAL flushes are elided. Testing only — violates the
    /// durability invariant.
    pub fsync_on_append: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            wal_path: PathBuf::from(DEFAULT_WAL_PATH),
            stripe_count: DEFAULT_STRIPE_COUNT,
            max_key_bytes: DEFAULT_MAX_KEY_BYTES,
            max_value_bytes: DEFAULT_MAX_VALUE_BYTES,
            fsync_on_append: true,
        }
    }
}

impl EngineConfig {
    /// Builds a config from defaults, as [`Default::default`] does.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads each option from the environment, falling back to the default
    /// for anything missing or unparseable.
    ///
    /// Recognized variables: `KV_WAL_PATH`, `KV_STRIPE_COUNT`,
    /// `KV_MAX_KEY_BYTES`, `KV_MAX_VALUE_BYTES`, `KV_FSYNC_ON_APPEND`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            wal_path: env_var("KV_WAL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.wal_path),
            stripe_count: env_parsed("KV_STRIPE_COUNT").unwrap_or(defaults.stripe_count),
            max_key_bytes: env_parsed("KV_MAX_KEY_BYTES").unwrap_or(defaults.max_key_bytes),
            max_value_bytes: env_parsed("KV_MAX_VALUE_BYTES")
                .unwrap_or(defaults.max_value_bytes),
            fsync_on_append: env_parsed("KV_FSYNC_ON_APPEND").unwrap_or(defaults.fsync_on_append),
        }
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn env_parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    env_var(key).and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests;
