//! Frame List Struct decoding.
//!
//! A frame is one node of the rigid transform hierarchy, stored as a
//! flat array with parent-index links. Bone identity is *not* stored
//! here; it is joined on afterwards from a sibling HAnim table keyed by
//! array position (see [`crate::walker`]).

use std::collections::BTreeMap;

use rwsalvage_common::BinaryReader;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::walker::Diagnostic;

/// Map from bone number (frame array position) to bone id.
pub type BoneIdMap = BTreeMap<u32, u32>;

/// Size of one frame record in bytes.
pub const FRAME_RECORD_SIZE: usize = 56;

/// On-disk frame record.
///
/// The rotation matrix is stored as nine floats in column-major
/// (Right, Up, At) order. `parent_index` is 0-based, -1 for roots.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct RawFrame {
    pub rotation: [f32; 9],
    pub position: [f32; 3],
    pub parent_index: i32,
    pub flag: u32,
}

/// A decoded frame, annotated with its resolved bone id when a sibling
/// HAnim table provided one.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// 1-based position in the frame array.
    pub index: u32,
    pub rotation: [f32; 9],
    pub position: [f32; 3],
    /// 0-based index of the parent frame, -1 for roots. Always refers
    /// to a slot of the same flat array, so the hierarchy is acyclic by
    /// construction.
    pub parent_index: i32,
    pub bone_id: Option<u32>,
    pub flag: u32,
}

impl Frame {
    /// Parent reference the way the diagnostic listing shows it:
    /// "none" for roots, otherwise the 1-based frame number.
    pub fn parent_display(&self) -> String {
        if self.parent_index == -1 {
            "none".into()
        } else {
            (self.parent_index + 1).to_string()
        }
    }
}

/// Decode a Frame List Struct payload: u32 frame count, then that many
/// 56-byte records.
///
/// When the declared count does not fit the available bytes, the count
/// is recomputed from what the payload actually holds and a truncation
/// diagnostic is recorded instead of failing the chunk.
pub fn decode_frame_list(
    data: &[u8],
    bones: Option<&BoneIdMap>,
    offset: u64,
    diags: &mut Vec<Diagnostic>,
) -> rwsalvage_common::Result<Vec<Frame>> {
    let mut reader = BinaryReader::new(data);
    let declared = reader.read_u32()?;

    let mut count = declared as usize;
    let capacity = data.len().saturating_sub(4) / FRAME_RECORD_SIZE;
    if capacity < count {
        diags.push(Diagnostic::new(
            offset,
            format!(
                "frame list declares {declared} frames but the payload holds only {capacity}; \
                 decoding {capacity}"
            ),
        ));
        count = capacity;
    }

    let mut frames = Vec::with_capacity(count);
    for i in 0..count {
        let raw: RawFrame = reader.read_struct()?;
        let bone_id = bones.and_then(|map| map.get(&(i as u32)).copied());
        frames.push(Frame {
            index: i as u32 + 1,
            rotation: raw.rotation,
            position: raw.position,
            parent_index: raw.parent_index,
            bone_id,
            flag: raw.flag,
        });
    }
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use byteorder::{LittleEndian, WriteBytesExt};

    use super::*;

    fn write_frame(buf: &mut Vec<u8>, parent: i32, flag: u32) {
        // Identity rotation, position derived from the flag for variety.
        let rotation = [1.0f32, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];
        for v in rotation {
            buf.write_f32::<LittleEndian>(v).unwrap();
        }
        for v in [flag as f32, 0.0, -2.5] {
            buf.write_f32::<LittleEndian>(v).unwrap();
        }
        buf.write_i32::<LittleEndian>(parent).unwrap();
        buf.write_u32::<LittleEndian>(flag).unwrap();
    }

    #[test]
    fn test_decode_frame_list() {
        let mut payload = Vec::new();
        payload.write_u32::<LittleEndian>(2).unwrap();
        write_frame(&mut payload, -1, 0);
        write_frame(&mut payload, 0, 3);

        let mut diags = Vec::new();
        let frames = decode_frame_list(&payload, None, 0, &mut diags).unwrap();

        assert!(diags.is_empty());
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].index, 1);
        assert_eq!(frames[0].parent_index, -1);
        assert_eq!(frames[0].parent_display(), "none");
        assert_eq!(frames[1].parent_index, 0);
        assert_eq!(frames[1].parent_display(), "1");
        assert_eq!(frames[1].flag, 3);
        assert_eq!(frames[1].position[0], 3.0);
        assert_eq!(frames[1].bone_id, None);
    }

    #[test]
    fn test_truncated_count_is_recomputed() {
        let mut payload = Vec::new();
        payload.write_u32::<LittleEndian>(5).unwrap();
        write_frame(&mut payload, -1, 0);
        write_frame(&mut payload, 0, 1);

        let mut diags = Vec::new();
        let frames = decode_frame_list(&payload, None, 0x40, &mut diags).unwrap();

        assert_eq!(frames.len(), 2);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].offset, 0x40);
    }

    #[test]
    fn test_bone_ids_joined_by_position() {
        let mut payload = Vec::new();
        payload.write_u32::<LittleEndian>(3).unwrap();
        for i in 0..3 {
            write_frame(&mut payload, i - 1, i as u32);
        }

        let map: BoneIdMap = [(0, 100), (1, 101), (2, 102)].into_iter().collect();
        let mut diags = Vec::new();
        let joined = decode_frame_list(&payload, Some(&map), 0, &mut diags).unwrap();

        assert_eq!(joined.len(), 3);
        assert_eq!(joined[0].bone_id, Some(100));
        assert_eq!(joined[1].bone_id, Some(101));
        assert_eq!(joined[2].bone_id, Some(102));
    }

    #[test]
    fn test_frame_record_roundtrip() {
        let mut payload = Vec::new();
        payload.write_u32::<LittleEndian>(4).unwrap();
        for i in 0..4 {
            write_frame(&mut payload, i - 1, i as u32 * 7);
        }

        let mut diags = Vec::new();
        let frames = decode_frame_list(&payload, None, 0, &mut diags).unwrap();

        let mut repacked = Vec::new();
        repacked.write_u32::<LittleEndian>(frames.len() as u32).unwrap();
        for f in &frames {
            for v in f.rotation {
                repacked.write_f32::<LittleEndian>(v).unwrap();
            }
            for v in f.position {
                repacked.write_f32::<LittleEndian>(v).unwrap();
            }
            repacked.write_i32::<LittleEndian>(f.parent_index).unwrap();
            repacked.write_u32::<LittleEndian>(f.flag).unwrap();
        }
        assert_eq!(payload, repacked);
    }
}
