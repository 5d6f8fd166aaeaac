//! Error taxonomy for the shim.
//!
//! Every variant is fatal: the ABI entry point turns any of them into a
//! one-line diagnostic and `_exit(1)`.

use std::io;

use thiserror::Error;

/// Why the secret source could not produce a line.
#[derive(Debug, Error)]
pub enum ReadFailure {
    #[error("open failed: {0}")]
    Open(#[source] io::Error),
    #[error("read failed: {0}")]
    Read(#[source] io::Error),
    #[error("no data")]
    Empty,
    #[error("line contains a NUL byte")]
    InteriorNul,
    #[error("out of memory after {0} bytes")]
    OutOfMemory(usize),
}

#[derive(Debug, Error)]
pub enum KeysafeError {
    /// Index variable is empty, non-numeric, zero, overflowing or `>= argc`.
    #[error("Unable to parse argument index - {raw}")]
    InvalidIndex { raw: String },

    /// Secret file missing, unreadable or empty.
    #[error("Unable to replace argument - {path}")]
    ReadError {
        path: String,
        #[source]
        cause: ReadFailure,
    },

    #[error("Unable to allocate {requested} bytes for {context}")]
    AllocationError {
        context: &'static str,
        requested: usize,
    },

    #[error("Unable to rewrite LD_PRELOAD")]
    PreloadRewriteError(#[source] io::Error),
}

impl KeysafeError {
    pub(crate) fn invalid_index(raw: &[u8]) -> Self {
        Self::InvalidIndex {
            raw: String::from_utf8_lossy(raw).into_owned(),
        }
    }

    pub(crate) fn read(path: &[u8], cause: ReadFailure) -> Self {
        Self::ReadError {
            path: String::from_utf8_lossy(path).into_owned(),
            cause,
        }
    }
}
