//! Error types for archive carving.
//!
//! Per-record problems (bad lengths, short reads, exhausted filename
//! lists) are never errors here; they are counted and reported through
//! [`crate::CarveReport`]. This enum covers only the conditions that
//! abort a whole run.

use thiserror::Error;

/// Fatal carving errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Cannot open an input, create the output directory, or similar.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A filename pattern failed to compile.
    #[error("invalid filename pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Result type for carving operations.
pub type Result<T> = std::result::Result<T, Error>;
