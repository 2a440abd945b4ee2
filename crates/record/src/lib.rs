//! # Record — on-disk frame for a single WAL entry
//!
//! Encodes and decodes one logical `(key, value)` pair to/from a
//! self-describing byte frame with length framing and an integrity check.
//!
//! ## Binary layout
//!
//! ```text
//! [magic: 2 | version: 1 | key_len: u32 BE | value_len: u32 BE | key_bytes | value_bytes | crc32: u32 BE]
//! ```
//!
//! `crc32` is computed over every byte from `magic` through `value_bytes`
//! (i.e. everything except the trailing checksum itself).
//!
//! The codec does not enforce the engine's configured key/value size limits
//! — those are a policy decision made by the caller. It only rejects frames
//! whose declared lengths cannot possibly be valid (absolute protocol
//! ceiling, truncated stream, or a failed checksum).

use crc32fast::Hasher as Crc32;
use thiserror::Error;

/// Magic bytes identifying a record frame.
pub const MAGIC: [u8; 2] = *b"KV";
/// Current frame format version.
pub const VERSION: u8 = 1;

/// Fixed header size: magic(2) + version(1) + key_len(4) + value_len(4).
const HEADER_LEN: usize = 2 + 1 + 4 + 4;
/// Trailing CRC32 size.
const CRC_LEN: usize = 4;

/// Errors raised while encoding or decoding a record frame.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    /// The frame's magic bytes, version, declared lengths, or checksum did
    /// not match what a well-formed record requires.
    #[error("corrupt record: {reason}")]
    CorruptRecord {
        /// Human-readable reason, for logs only — never matched on.
        reason: &'static str,
    },
    /// The caller asked to encode a key larger than the protocol allows.
    #[error("key too large: {len} bytes (protocol max {max})")]
    KeyTooLarge {
        /// Size of the rejected key.
        len: usize,
        /// Protocol ceiling.
        max: usize,
    },
    /// The caller asked to encode a value larger than the protocol allows.
    #[error("value too large: {len} bytes (protocol max {max})")]
    ValueTooLarge {
        /// Size of the rejected value.
        len: usize,
        /// Protocol ceiling.
        max: usize,
    },
}

/// Serializes `key` and `value` into a single self-describing frame.
///
/// # Errors
///
/// Returns [`RecordError::KeyTooLarge`] / [`RecordError::ValueTooLarge`] if
/// either length would overflow the frame's `u32` length field.
pub fn encode(key: &[u8], value: &[u8]) -> Result<Vec<u8>, RecordError> {
    if key.len() > u32::MAX as usize {
        return Err(RecordError::KeyTooLarge {
            len: key.len(),
            max: u32::MAX as usize,
        });
    }
    if value.len() > u32::MAX as usize {
        return Err(RecordError::ValueTooLarge {
            len: value.len(),
            max: u32::MAX as usize,
        });
    }

    let mut buf = Vec::with_capacity(HEADER_LEN + key.len() + value.len() + CRC_LEN);
    buf.extend_from_slice(&MAGIC);
    buf.push(VERSION);
    buf.extend_from_slice(&(key.len() as u32).to_be_bytes());
    buf.extend_from_slice(&(value.len() as u32).to_be_bytes());
    buf.extend_from_slice(key);
    buf.extend_from_slice(value);

    let mut hasher = Crc32::new();
    hasher.update(&buf);
    buf.extend_from_slice(&hasher.finalize().to_be_bytes());

    Ok(buf)
}

/// Decodes a single frame from `bytes`, returning the `(key, value)` pair
/// and the number of bytes consumed.
///
/// `bytes` may contain trailing data belonging to the next frame; only the
/// prefix this record occupies is consumed.
///
/// # Errors
///
/// Returns [`RecordError::CorruptRecord`] if the magic, version, or checksum
/// do not match, or if `bytes` is shorter than the frame the header
/// declares.
pub fn decode(bytes: &[u8]) -> Result<(Vec<u8>, Vec<u8>, usize), RecordError> {
    if bytes.len() < HEADER_LEN {
        return Err(RecordError::CorruptRecord {
            reason: "buffer shorter than frame header",
        });
    }
    if bytes[0..2] != MAGIC {
        return Err(RecordError::CorruptRecord {
            reason: "bad magic",
        });
    }
    if bytes[2] != VERSION {
        return Err(RecordError::CorruptRecord {
            reason: "unknown version",
        });
    }

    let key_len = u32::from_be_bytes(bytes[3..7].try_into().unwrap()) as usize;
    let value_len = u32::from_be_bytes(bytes[7..11].try_into().unwrap()) as usize;

    let frame_len = HEADER_LEN
        .checked_add(key_len)
        .and_then(|n| n.checked_add(value_len))
        .and_then(|n| n.checked_add(CRC_LEN))
        .ok_or(RecordError::CorruptRecord {
            reason: "declared lengths overflow",
        })?;

    if bytes.len() < frame_len {
        return Err(RecordError::CorruptRecord {
            reason: "buffer shorter than declared frame",
        });
    }

    let body_end = HEADER_LEN + key_len + value_len;
    let crc_start = body_end;
    let crc_bytes = &bytes[crc_start..crc_start + CRC_LEN];
    let expected_crc = u32::from_be_bytes(crc_bytes.try_into().unwrap());

    let mut hasher = Crc32::new();
    hasher.update(&bytes[0..body_end]);
    if hasher.finalize() != expected_crc {
        return Err(RecordError::CorruptRecord {
            reason: "crc mismatch",
        });
    }

    let key = bytes[HEADER_LEN..HEADER_LEN + key_len].to_vec();
    let value = bytes[HEADER_LEN + key_len..body_end].to_vec();

    Ok((key, value, frame_len))
}

/// Returns the exact byte length of the header portion, for callers that
/// need to peek at declared lengths before the full frame has arrived.
pub const fn header_len() -> usize {
    HEADER_LEN
}

/// Reads the `key_len`/`value_len` fields out of a header-sized prefix and
/// returns the total frame length they imply (header + key + value + crc).
///
/// This does **not** check `magic` or `version` — it exists so a WAL reader
/// can tell how many bytes a (possibly corrupt) frame claims to occupy
/// before deciding whether a decode failure is a truncated tail or mid-file
/// corruption. Returns `None` if `header` is shorter than [`header_len`] or
/// the declared lengths overflow a frame size.
pub fn peek_frame_len(header: &[u8]) -> Option<usize> {
    if header.len() < HEADER_LEN {
        return None;
    }
    let key_len = u32::from_be_bytes(header[3..7].try_into().unwrap()) as usize;
    let value_len = u32::from_be_bytes(header[7..11].try_into().unwrap()) as usize;
    HEADER_LEN
        .checked_add(key_len)
        .and_then(|n| n.checked_add(value_len))
        .and_then(|n| n.checked_add(CRC_LEN))
}
