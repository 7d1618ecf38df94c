//! Fatal decode errors. Per-value decode failures are not part of this enum
//! (see [`crate::reader::DecodeWarning`]): they are logged and the offending
//! value is demoted to [`adx_dtyp::Value::Unknown`] instead of aborting.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("I/O error reading snapshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("truncated read at offset {offset}: needed {needed} bytes, {available} available")]
    Truncated {
        offset: u64,
        needed: usize,
        available: usize,
    },

    #[error("corrupt snapshot at offset {offset}: {reason}")]
    CorruptSnapshot { offset: u64, reason: String },

    #[error("unsupported snapshot version {found}, supported versions: {supported:?}")]
    UnsupportedVersion { found: u32, supported: Vec<u32> },
}

impl CodecError {
    pub fn corrupt(offset: u64, reason: impl Into<String>) -> Self {
        CodecError::CorruptSnapshot {
            offset,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CodecError>;
