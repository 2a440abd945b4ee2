//! # WAL — Write-Ahead Log
//!
//! Provides crash-safe durability for the storage engine. Every accepted
//! `Set` is appended to the log and fsync'd **before** it is published to
//! the in-memory index. On restart the log is replayed to rebuild the
//! index, so no acknowledged write is lost.
//!
//! Framing and checksumming of individual records is delegated to the
//! [`record`] crate; this crate owns the file, the append/fsync discipline,
//! and the sequential-replay/recovery logic.
//!
//! ## Example
//!
//! ```rust,no_run
//! use wal::{WalReader, WalWriter};
//!
//! let mut w = WalWriter::open("wal.log", true).unwrap();
//! w.append_and_sync(b"hello", b"world").unwrap();
//! drop(w);
//!
//! let mut r = WalReader::open("wal.log").unwrap();
//! let summary = r.replay(|_key, _value| {}).unwrap();
//! println!("{} records applied", summary.records_applied);
//! ```

use record::RecordError;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info, trace, warn};

/// Errors raised by WAL operations.
#[derive(Debug, Error)]
pub enum WalError {
    /// An underlying I/O error.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// A non-final record failed its checksum or header checks while later,
    /// well-formed records still followed it in the file. The core does not
    /// attempt to recover from this.
    #[error("corrupt log: {reason}")]
    CorruptLog {
        /// Human-readable reason, for logs only.
        reason: String,
    },
}

/// Summary of a completed [`WalReader::replay`] pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplaySummary {
    /// Number of records successfully applied.
    pub records_applied: u64,
    /// Number of bytes discarded from a truncated trailing frame, if any.
    pub truncated_tail_bytes: u64,
}

/// Append-only WAL writer.
///
/// Each call to [`append_and_sync`](WalWriter::append_and_sync) serializes a
/// record, writes the whole frame in one `write_all`, and — unless
/// `fsync_on_append` is `false` — forces it to stable storage with
/// `sync_all` before returning. The caller must treat a failed append as
/// not durable: no index update may follow it.
pub struct WalWriter {
    file: File,
    fsync_on_append: bool,
}

impl WalWriter {
    /// Opens (or creates) a WAL file in append mode.
    pub fn open<P: AsRef<Path>>(path: P, fsync_on_append: bool) -> Result<Self, WalError> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .read(true)
            .open(path)?;
        info!(path = %path.display(), fsync_on_append, "wal writer opened");
        Ok(Self {
            file,
            fsync_on_append,
        })
    }

    /// Serializes `(key, value)` and appends it to the WAL file, flushing
    /// and (if configured) fsync-ing before returning.
    ///
    /// Returns only after the data has reached the point the durability
    /// contract requires: a failed append must not be followed by an index
    /// update.
    pub fn append_and_sync(&mut self, key: &[u8], value: &[u8]) -> Result<(), WalError> {
        let frame = record::encode(key, value).map_err(|e| {
            WalError::Io(io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))
        })?;

        self.file.write_all(&frame)?;
        self.file.flush()?;

        if self.fsync_on_append {
            self.file.sync_all()?;
        }

        trace!(key_len = key.len(), value_len = value.len(), "wal append");
        Ok(())
    }

    /// Forces any buffered data to stable storage.
    ///
    /// Useful when the writer was constructed with `fsync_on_append = false`
    /// and the caller wants an explicit durability checkpoint.
    pub fn sync_to_disk(&mut self) -> Result<(), WalError> {
        self.file.flush()?;
        self.file.sync_all()?;
        Ok(())
    }
}

/// Sequential WAL reader used only during recovery.
pub struct WalReader {
    path: PathBuf,
    buf: Vec<u8>,
}

impl WalReader {
    /// Opens an existing WAL file and reads it fully into memory for replay.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, WalError> {
        let path = path.as_ref().to_path_buf();
        let buf = std::fs::read(&path)?;
        Ok(Self { path, buf })
    }

    /// Replays every valid record, calling `visit(key, value)` for each one
    /// in file order.
    ///
    /// # Termination
    ///
    /// - Clean EOF, or a trailing partial frame (the stream ends before the
    ///   declared length completes) -> the file is truncated to the last
    ///   known-good offset and `Ok` is returned. Before truncating on an
    ///   overrun length, a resync scan checks whether a well-formed record
    ///   stream resumes later in the file; if one does, the declared length
    ///   was itself corrupt and this case falls through to `CorruptLog`
    ///   instead.
    /// - A corrupt record (bad magic/version/CRC) that is **not** the last
    ///   thing in the file -> [`WalError::CorruptLog`]; recovery refuses to
    ///   proceed.
    /// - A corrupt record that *is* the last thing in the file is treated
    ///   the same as a truncated tail: it is the plausible artifact of a
    ///   crash mid-write and is discarded.
    pub fn replay<F>(&mut self, mut visit: F) -> Result<ReplaySummary, WalError>
    where
        F: FnMut(Vec<u8>, Vec<u8>),
    {
        let total_len = self.buf.len();
        let mut offset = 0usize;
        let mut records_applied = 0u64;

        loop {
            let remaining = &self.buf[offset..];
            if remaining.is_empty() {
                break;
            }

            let header_len = record::header_len();
            if remaining.len() < header_len {
                self.truncate_to(offset)?;
                warn!(offset, "wal tail has partial header, truncated");
                break;
            }

            let frame_len = match record::peek_frame_len(&remaining[..header_len]) {
                Some(n) => n,
                None => {
                    // Declared lengths are nonsensical garbage. Only safe to
                    // recover if nothing of substance follows.
                    self.truncate_to(offset)?;
                    warn!(offset, "wal tail has unparseable header, truncated");
                    break;
                }
            };

            if remaining.len() < frame_len {
                // The declared length doesn't fit in what's left of the file.
                // This is consistent with a genuine crash mid-append — but a
                // single flipped bit in this record's key_len/value_len field
                // produces exactly the same symptom while well-formed records
                // still sit beyond it. Rule that out before truncating: if a
                // valid record stream resumes anywhere later in `remaining`
                // and runs cleanly to EOF, the declared length lied and this
                // is mid-file corruption, not a torn tail.
                if has_valid_trailing_records(remaining) {
                    error!(offset, frame_len, "wal record length implausible, well-formed records found beyond it");
                    return Err(WalError::CorruptLog {
                        reason: "declared frame length overruns the file with well-formed records following it".to_string(),
                    });
                }
                self.truncate_to(offset)?;
                warn!(offset, frame_len, "wal tail is a partial frame, truncated");
                break;
            }

            match record::decode(&remaining[..frame_len]) {
                Ok((key, value, consumed)) => {
                    debug_assert_eq!(consumed, frame_len);
                    visit(key, value);
                    records_applied += 1;
                    offset += frame_len;
                }
                Err(RecordError::CorruptRecord { reason }) => {
                    let frame_end = offset + frame_len;
                    if frame_end == total_len {
                        // Nothing follows: treat as a crash artifact, same
                        // as a truncated tail.
                        self.truncate_to(offset)?;
                        warn!(offset, reason, "wal tail record corrupt, truncated");
                        break;
                    } else {
                        error!(offset, reason, "wal mid-file corruption");
                        return Err(WalError::CorruptLog {
                            reason: reason.to_string(),
                        });
                    }
                }
                Err(other) => {
                    return Err(WalError::Io(io::Error::new(
                        io::ErrorKind::InvalidData,
                        other.to_string(),
                    )));
                }
            }
        }

        let truncated_tail_bytes = (total_len - offset) as u64;
        info!(
            path = %self.path.display(),
            records_applied,
            truncated_tail_bytes,
            "wal replay complete"
        );

        Ok(ReplaySummary {
            records_applied,
            truncated_tail_bytes,
        })
    }

    /// Physically truncates the WAL file to `offset` bytes, discarding the
    /// partial/corrupt tail frame so future appends start cleanly.
    fn truncate_to(&mut self, offset: usize) -> Result<(), WalError> {
        self.buf.truncate(offset);
        let file = OpenOptions::new().write(true).open(&self.path)?;
        file.set_len(offset as u64)?;
        file.sync_all()?;
        Ok(())
    }
}

/// Looks for proof that `bytes` contains a fully decodable record stream
/// starting somewhere after its first byte.
///
/// Used when a record's declared length overruns `bytes`: a genuinely torn
/// write never leaves a complete, checksum-valid record buried inside what
/// looks like its own unfinished tail, so finding one means the declared
/// length itself is the corrupt part, not the file's true end.
fn has_valid_trailing_records(bytes: &[u8]) -> bool {
    let header_len = record::header_len();
    let mut i = 1;
    while i + header_len <= bytes.len() {
        if bytes[i..i + 2] == record::MAGIC && decodes_cleanly_to_end(&bytes[i..]) {
            return true;
        }
        i += 1;
    }
    false
}

/// Returns `true` if `bytes` decodes as zero or more complete, valid records
/// with nothing left over.
fn decodes_cleanly_to_end(mut bytes: &[u8]) -> bool {
    let header_len = record::header_len();
    loop {
        if bytes.is_empty() {
            return true;
        }
        if bytes.len() < header_len {
            return false;
        }
        let frame_len = match record::peek_frame_len(&bytes[..header_len]) {
            Some(n) => n,
            None => return false,
        };
        if bytes.len() < frame_len {
            return false;
        }
        match record::decode(&bytes[..frame_len]) {
            Ok((_, _, consumed)) => bytes = &bytes[consumed..],
            Err(_) => return false,
        }
    }
}
