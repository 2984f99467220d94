//! Error types for RenderWare chunk parsing.

use thiserror::Error;

/// Errors that can occur while parsing a chunk stream.
///
/// Only [`Error::Io`] is ever fatal to a whole run; the walker converts
/// the structural variants into per-chunk diagnostics and keeps going.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] rwsalvage_common::Error),

    /// Fewer than 12 bytes remained where a chunk header was expected.
    #[error("truncated chunk header at offset {offset:#x}: only {available} bytes remain")]
    TruncatedHeader { offset: u64, available: usize },

    /// A chunk's declared payload runs past its parent's end offset.
    #[error(
        "chunk at {offset:#x} declares {declared} payload bytes, exceeding parent bound {bound:#x}"
    )]
    BoundaryViolation {
        offset: u64,
        declared: u32,
        bound: u64,
    },

    /// A typed payload was smaller than its fixed layout requires.
    #[error("cannot unpack {what} at {offset:#x}: needed {needed} bytes, payload has {available}")]
    UnpackFailure {
        what: String,
        offset: u64,
        needed: usize,
        available: usize,
    },
}

/// Result type for chunk parsing operations.
pub type Result<T> = std::result::Result<T, Error>;
