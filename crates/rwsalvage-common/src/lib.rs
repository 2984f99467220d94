//! Common utilities for the rwsalvage workspace.
//!
//! Everything here operates on borrowed byte slices: the archive formats
//! this workspace recovers are all little-endian with fixed-layout
//! records, so a small cursor type covers every parsing need.

mod error;
mod reader;

pub use error::{Error, Result};
pub use reader::BinaryReader;
