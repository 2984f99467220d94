//! Record-start markers and record header parsing.

use rwsalvage_common::BinaryReader;

/// Size of both record headers this scanner understands: RenderWare
/// `magic + body size + version` and RIFF `magic + chunk size + form`.
pub const RECORD_HEADER_SIZE: usize = 12;

/// RenderWare Clump chunk type id (model records).
pub const CLUMP_TYPE_ID: u32 = 0x10;

/// RenderWare Animation chunk type id (animation records).
pub const ANIMATION_TYPE_ID: u32 = 0x1B;

/// What a record starts with inside the combined blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// A RenderWare chunk header whose type id equals the given value.
    RwChunk(u32),
    /// An ASCII `RIFF` header.
    Riff,
}

impl Marker {
    /// The 4 bytes the scanner searches for.
    pub fn magic(&self) -> [u8; 4] {
        match self {
            Self::RwChunk(type_id) => type_id.to_le_bytes(),
            Self::Riff => *b"RIFF",
        }
    }
}

/// A parsed record header: the record's total length including the
/// header itself, and the RIFF form type when applicable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    pub total_size: u64,
    pub form_type: Option<[u8; 4]>,
}

/// Parse the 12 bytes at a marker hit.
///
/// Returns `None` when the embedded length field is implausible (a
/// record no larger than its own header), the usual sign of the magic
/// recurring as a false positive inside payload bytes.
pub fn parse_record_header(marker: Marker, bytes: &[u8]) -> Option<RecordHeader> {
    debug_assert!(bytes.len() >= RECORD_HEADER_SIZE);
    let mut reader = BinaryReader::new(bytes);
    reader.advance(4);

    match marker {
        Marker::RwChunk(_) => {
            let body_size = reader.read_u32().ok()?;
            if body_size == 0 {
                return None;
            }
            Some(RecordHeader {
                total_size: RECORD_HEADER_SIZE as u64 + u64::from(body_size),
                form_type: None,
            })
        }
        Marker::Riff => {
            let chunk_size = reader.read_u32().ok()?;
            let total_size = u64::from(chunk_size) + 8;
            if total_size <= RECORD_HEADER_SIZE as u64 {
                return None;
            }
            let form = reader.read_bytes(4).ok()?;
            Some(RecordHeader {
                total_size,
                form_type: Some([form[0], form[1], form[2], form[3]]),
            })
        }
    }
}

/// RIFF form-type → filename-extension routing.
///
/// The default mapping (`WAVE` → wav, `DMSG`/`DMUS` → sgt) was inferred
/// from observed archives, not from a documented convention, so it can
/// be replaced or extended per run.
#[derive(Debug, Clone)]
pub struct RiffRouting {
    routes: Vec<([u8; 4], String)>,
}

impl Default for RiffRouting {
    fn default() -> Self {
        Self {
            routes: vec![
                (*b"WAVE", "wav".to_string()),
                (*b"DMSG", "sgt".to_string()),
                (*b"DMUS", "sgt".to_string()),
            ],
        }
    }
}

impl RiffRouting {
    /// Routing with no entries.
    pub fn empty() -> Self {
        Self { routes: Vec::new() }
    }

    /// Add or replace the route for a form type.
    pub fn with_route(mut self, form_type: [u8; 4], extension: &str) -> Self {
        self.routes.retain(|(form, _)| *form != form_type);
        self.routes.push((form_type, extension.to_string()));
        self
    }

    /// The filename extension for a form type, if routed.
    pub fn route(&self, form_type: &[u8; 4]) -> Option<&str> {
        self.routes
            .iter()
            .find(|(form, _)| form == form_type)
            .map(|(_, ext)| ext.as_str())
    }
}
