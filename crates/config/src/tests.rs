use super::*;
use std::sync::Mutex;

// Environment variables are process-global; serialize tests that touch them.
static ENV_LOCK: Mutex<()> = Mutex::new(());

fn clear_all() {
    for key in [
        "KV_WAL_PATH",
        "KV_STRIPE_COUNT",
        "KV_MAX_KEY_BYTES",
        "KV_MAX_VALUE_BYTES",
        "KV_FSYNC_ON_APPEND",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn defaults_match_documented_values() {
    let cfg = EngineConfig::default();
    assert_eq!(cfg.wal_path, PathBuf::from("wal.log"));
    assert_eq!(cfg.stripe_count, 64);
    assert_eq!(cfg.max_key_bytes, 4 * 1024);
    assert_eq!(cfg.max_value_bytes, 1024 * 1024);
    assert!(cfg.fsync_on_append);
}

#[test]
fn from_env_falls_back_to_defaults_when_unset() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|p| p.into_inner());
    clear_all();
    let cfg = EngineConfig::from_env();
    assert_eq!(cfg, EngineConfig::default());
}

#[test]
fn from_env_honors_explicit_values() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|p| p.into_inner());
    clear_all();
    std::env::set_var("KV_WAL_PATH", "/tmp/custom.log");
    std::env::set_var("KV_STRIPE_COUNT", "8");
    std::env::set_var("KV_MAX_KEY_BYTES", "128");
    std::env::set_var("KV_MAX_VALUE_BYTES", "256");
    std::env::set_var("KV_FSYNC_ON_APPEND", "false");

    let cfg = EngineConfig::from_env();
    assert_eq!(cfg.wal_path, PathBuf::from("/tmp/custom.log"));
    assert_eq!(cfg.stripe_count, 8);
    assert_eq!(cfg.max_key_bytes, 128);
    assert_eq!(cfg.max_value_bytes, 256);
    assert!(!cfg.fsync_on_append);

    clear_all();
}

#[test]
fn from_env_falls_back_on_unparseable_values() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|p| p.into_inner());
    clear_all();
    std::env::set_var("KV_STRIPE_COUNT", "not-a-number");
    std::env::set_var("KV_FSYNC_ON_APPEND", "maybe");

    let cfg = EngineConfig::from_env();
    assert_eq!(cfg.stripe_count, EngineConfig::default().stripe_count);
    assert_eq!(cfg.fsync_on_append, EngineConfig::default().fsync_on_append);

    clear_all();
}

#[test]
fn new_is_equivalent_to_default() {
    assert_eq!(EngineConfig::new(), EngineConfig::default());
}
