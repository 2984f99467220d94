//! Recursive descent over a chunk stream.
//!
//! The walker owns all cursor arithmetic. After a chunk is handled it
//! forces the cursor to the chunk's declared end, whatever the payload
//! decoder actually consumed, so one misbehaving payload can never
//! desynchronize sibling parsing. Structural problems abort only the
//! subtree they occur in; siblings already parsed stay valid.

use std::fs;
use std::path::Path;

use rwsalvage_common::BinaryReader;

use crate::header::{ChunkHeader, HEADER_SIZE};
use crate::payload::{self, BoneIdMap, Payload};
use crate::types::{self, chunk_id, PayloadKind};
use crate::{Error, Result};

/// A non-fatal finding recorded while walking a chunk stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Absolute byte offset the finding refers to.
    pub offset: u64,
    pub message: String,
}

impl Diagnostic {
    pub(crate) fn new(offset: u64, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:X}: {}", self.offset, self.message)
    }
}

/// One parsed chunk: its header, absolute offset, decoded payload (for
/// typed leaves) and child chunks (for containers).
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkNode {
    pub header: ChunkHeader,
    /// Absolute offset of the chunk header in the walked buffer.
    pub offset: u64,
    pub payload: Payload,
    pub children: Vec<ChunkNode>,
}

/// Result of walking a buffer: the top-level chunks plus every
/// diagnostic recorded anywhere in the tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChunkTree {
    pub nodes: Vec<ChunkNode>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Walk a whole buffer as a sequence of top-level chunks.
pub fn walk(data: &[u8]) -> ChunkTree {
    let mut diagnostics = Vec::new();
    let nodes = walk_range(data, 0, data.len(), None, None, &mut diagnostics);
    ChunkTree { nodes, diagnostics }
}

/// Read a file and walk it. Only the read itself can fail.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<ChunkTree> {
    let data = fs::read(path)?;
    Ok(walk(&data))
}

fn walk_range(
    data: &[u8],
    start: usize,
    end: usize,
    parent: Option<u32>,
    bones: Option<&BoneIdMap>,
    diags: &mut Vec<Diagnostic>,
) -> Vec<ChunkNode> {
    let mut nodes = Vec::new();
    let mut cursor = start;

    while cursor + HEADER_SIZE <= end {
        let mut reader = BinaryReader::new(&data[..end]);
        reader.seek(cursor);
        let header = match ChunkHeader::read(&mut reader) {
            Ok(header) => header,
            Err(_) => break,
        };

        let body_start = cursor + HEADER_SIZE;
        let body_end = body_start + header.payload_size as usize;
        if body_end > end {
            let err = Error::BoundaryViolation {
                offset: cursor as u64,
                declared: header.payload_size,
                bound: end as u64,
            };
            diags.push(Diagnostic::new(cursor as u64, err.to_string()));
            break;
        }
        let body = &data[body_start..body_end];

        let mut node = ChunkNode {
            header,
            offset: cursor as u64,
            payload: Payload::None,
            children: Vec::new(),
        };

        if header.type_id == chunk_id::FRAME_LIST && header.payload_size > 0 {
            // Bone identity lives in a sibling Extension chunk, not in
            // the frame array itself. Pre-scan this container's bytes
            // for the HAnim table so the Struct child can be decoded
            // with bone ids already resolved.
            let map = prescan_bone_ids(body);
            node.children = walk_range(
                data,
                body_start,
                body_end,
                Some(header.type_id),
                Some(&map),
                diags,
            );
        } else if types::classify(header.type_id, parent) == PayloadKind::Container
            && header.payload_size > 0
        {
            node.children = walk_range(data, body_start, body_end, Some(header.type_id), bones, diags);
        } else {
            let kind = types::classify(header.type_id, parent);
            match payload::decode(kind, body, bones, body_start as u64, diags) {
                Ok(decoded) => node.payload = decoded,
                Err(rwsalvage_common::Error::UnexpectedEof { needed, available }) => {
                    let err = Error::UnpackFailure {
                        what: types::chunk_name(header.type_id, parent),
                        offset: cursor as u64,
                        needed,
                        available,
                    };
                    diags.push(Diagnostic::new(cursor as u64, err.to_string()));
                }
                Err(other) => {
                    diags.push(Diagnostic::new(cursor as u64, other.to_string()));
                }
            }
        }

        nodes.push(node);
        cursor = body_end;
    }
    nodes
}

/// Scan a Frame List container's bytes for a nested Extension → HAnim
/// PLG chunk and collect its bone_number → bone_id table.
///
/// This does not touch the main cursor and suppresses diagnostics; the
/// same chunks are decoded again, loudly, during the normal walk.
fn prescan_bone_ids(body: &[u8]) -> BoneIdMap {
    let mut map = BoneIdMap::new();
    let mut reader = BinaryReader::new(body);

    while reader.remaining() >= HEADER_SIZE {
        let Ok(header) = ChunkHeader::read(&mut reader) else {
            break;
        };
        let child_start = reader.position();
        let child_end = child_start + header.payload_size as usize;
        if child_end > body.len() {
            break;
        }

        if header.type_id == chunk_id::EXTENSION {
            let ext = &body[child_start..child_end];
            let mut ext_reader = BinaryReader::new(ext);
            while ext_reader.remaining() >= HEADER_SIZE {
                let Ok(inner) = ChunkHeader::read(&mut ext_reader) else {
                    break;
                };
                let inner_start = ext_reader.position();
                let inner_end = inner_start + inner.payload_size as usize;
                if inner_end > ext.len() {
                    break;
                }
                if inner.type_id == chunk_id::HANIM_PLG {
                    payload::collect_bone_ids(&ext[inner_start..inner_end], &mut map);
                    if !map.is_empty() {
                        return map;
                    }
                }
                ext_reader.seek(inner_end);
            }
        }
        reader.seek(child_end);
    }
    map
}
