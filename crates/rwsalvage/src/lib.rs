//! Rwsalvage - RenderWare game asset recovery library.
//!
//! This crate provides a unified interface to the rwsalvage library
//! ecosystem for recovering and inspecting assets from RenderWare-era
//! game archives.
//!
//! # Crates
//!
//! - [`rwsalvage_common`] - Common utilities (binary reading, errors)
//! - [`rwsalvage_dff`] - RenderWare chunk tree parsing and rendering
//! - [`rwsalvage_carve`] - Heuristic carving of combined archive blobs
//!
//! # Example
//!
//! ```no_run
//! use rwsalvage::prelude::*;
//!
//! // Inspect a recovered model file
//! let tree = parse_file("001_005_00003.dff")?;
//! print!("{}", render_tree(&tree));
//!
//! // Carve an archive pair
//! let metadata = std::fs::read("models.dir")?;
//! let recovered = recover_filenames(&metadata, AssetFamily::Model)?;
//! let mut feed = NameFeed::for_family(recovered.names, AssetFamily::Model);
//! let carver = Carver::new(AssetFamily::Model.marker());
//! let report = carver.carve_path("models.dat".as_ref(), &mut feed, "out".as_ref())?;
//! println!("{report}");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export all sub-crates
pub use rwsalvage_carve as carve;
pub use rwsalvage_common as common;
pub use rwsalvage_dff as dff;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use rwsalvage_carve::{
        recover_filenames, AssetFamily, CarveReport, Carver, NameFeed, RiffRouting,
        DEFAULT_WINDOW_SIZE,
    };
    pub use rwsalvage_common::BinaryReader;
    pub use rwsalvage_dff::{
        parse_file, render_tree, walk, ChunkTree, ClumpSummary, SUMMARY_TSV_HEADER,
    };
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
