use config::EngineConfig;
use std::path::PathBuf;
use tempfile::TempDir;

/// Keeps a `TempDir` alive alongside the config pointing inside it, so the
/// directory isn't cleaned up while a test still holds an `Engine`.
pub struct TestDir {
    _dir: TempDir,
    pub wal_path: PathBuf,
}

pub fn test_config() -> (EngineConfig, TestDir) {
    let dir = TempDir::new().unwrap();
    let wal_path = dir.path().join("wal.log");
    let config = EngineConfig {
        wal_path: wal_path.clone(),
        ..EngineConfig::default()
    };
    (config, TestDir { _dir: dir, wal_path })
}
