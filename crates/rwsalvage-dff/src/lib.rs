//! RenderWare chunk tree parser for recovered game assets.
//!
//! Every RenderWare resource is a stream of self-describing chunks: a
//! 12-byte header (type id, payload size, version) followed by the
//! payload, which may itself contain nested chunks. This crate walks
//! that structure, decodes the typed payloads the recovery pipeline
//! cares about (frame hierarchies, HAnim bone tables, atomics,
//! material descriptors) and reports structural damage as per-chunk
//! diagnostics instead of failing a whole file.
//!
//! The interpretation of the generic `Struct` chunk id depends on its
//! parent container; [`types::classify`] is the single dispatch point
//! for that context.
//!
//! # Example
//!
//! ```no_run
//! use rwsalvage_dff::{parse_file, render_tree, ClumpSummary};
//!
//! let tree = parse_file("001_005_00003.dff")?;
//! print!("{}", render_tree(&tree));
//!
//! let summary = ClumpSummary::from_tree(&tree);
//! println!("{}", summary.tsv_row("001_005_00003.dff"));
//! # Ok::<(), rwsalvage_dff::Error>(())
//! ```

mod error;
mod header;
pub mod payload;
mod render;
mod summary;
pub mod types;
mod walker;

pub use error::{Error, Result};
pub use header::{ChunkHeader, HEADER_SIZE};
pub use payload::{
    BoneEntry, BoneIdMap, BoneType, Frame, HAnimPlg, Payload, FRAME_RECORD_SIZE,
};
pub use render::render_tree;
pub use summary::{ClumpSummary, SUMMARY_TSV_HEADER};
pub use types::{chunk_id, chunk_name, classify, is_container, PayloadKind};
pub use walker::{parse_file, walk, ChunkNode, ChunkTree, Diagnostic};
