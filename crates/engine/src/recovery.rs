//! WAL replay into a fresh index, run once before the engine opens for
//! traffic.

use crate::EngineError;
use index::Index;
use std::path::Path;
use std::time::Instant;
use tracing::info;
use wal::WalReader;

/// Rebuilds `index` from the WAL at `path`.
///
/// If the file does not exist yet, it is created empty and recovery is a
/// no-op. Otherwise every record is replayed into `index` directly — no
/// stripe lock is needed, since this runs single-threaded before the engine
/// accepts requests.
pub(crate) fn recover<P: AsRef<Path>>(path: P, index: &Index) -> Result<(), EngineError> {
    let path = path.as_ref();

    if !path.exists() {
        std::fs::File::create(path)?;
        info!(path = %path.display(), "wal does not exist, starting fresh");
        return Ok(());
    }

    let started = Instant::now();
    let mut reader = WalReader::open(path)?;
    let summary = reader.replay(|key, value| {
        index.put(key, value);
    })?;

    info!(
        path = %path.display(),
        records_applied = summary.records_applied,
        truncated_tail_bytes = summary.truncated_tail_bytes,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "recovery complete"
    );

    Ok(())
}
