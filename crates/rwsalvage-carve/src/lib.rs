//! Heuristic archive carving for paired asset archives.
//!
//! Each archive is a pair of blobs: a combined blob holding the raw
//! bytes of many asset files back to back with no table of contents,
//! and a metadata blob that lists the original filenames in archive
//! order. Records are found by scanning the combined blob for a known
//! 4-byte magic and trusting the length field embedded in each record
//! header; filenames are recovered from the metadata blob by pattern
//! match and paired with carved records strictly by position.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use rwsalvage_carve::{AssetFamily, Carver, NameFeed, recover_filenames};
//!
//! let family = AssetFamily::Model;
//! let metadata = std::fs::read("models.dir")?;
//! let recovered = recover_filenames(&metadata, family)?;
//! let mut feed = NameFeed::for_family(recovered.names, family);
//!
//! let carver = Carver::new(family.marker());
//! let report = carver.carve_path(Path::new("models.dat"), &mut feed, Path::new("out"))?;
//! println!("{report}");
//! # Ok::<(), rwsalvage_carve::Error>(())
//! ```

mod error;
mod marker;
mod names;
mod report;
mod scanner;
mod windowed;

pub use error::{Error, Result};
pub use marker::{
    parse_record_header, Marker, RecordHeader, RiffRouting, ANIMATION_TYPE_ID, CLUMP_TYPE_ID,
    RECORD_HEADER_SIZE,
};
pub use names::{recover_filenames, AssetFamily, NameFeed, NameQueue, RecoveredNames};
pub use report::CarveReport;
pub use scanner::Carver;
pub use windowed::DEFAULT_WINDOW_SIZE;
