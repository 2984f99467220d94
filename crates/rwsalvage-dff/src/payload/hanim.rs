//! HAnim PLG decoding: the table mapping skeletal bone ids to frame
//! positions.

use rwsalvage_common::BinaryReader;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use super::frame::BoneIdMap;
use crate::walker::Diagnostic;

/// Size of one bone record in bytes.
pub const BONE_RECORD_SIZE: usize = 12;

#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
struct RawBone {
    bone_id: u32,
    bone_number: u32,
    bone_type: u32,
}

/// Bone classification stored in the HAnim table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoneType {
    Deformable,
    NubBone,
    Unknown,
    Rigid,
    /// Value outside the documented range, kept verbatim.
    Raw(u32),
}

impl BoneType {
    pub fn from_raw(value: u32) -> Self {
        match value {
            0 => Self::Deformable,
            1 => Self::NubBone,
            2 => Self::Unknown,
            3 => Self::Rigid,
            other => Self::Raw(other),
        }
    }
}

impl std::fmt::Display for BoneType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Deformable => write!(f, "Deformable"),
            Self::NubBone => write!(f, "Nub Bone"),
            Self::Unknown => write!(f, "Unknown"),
            Self::Rigid => write!(f, "Rigid"),
            Self::Raw(v) => write!(f, "Raw ({v})"),
        }
    }
}

/// One entry of the bone table. `bone_number` is the position in the
/// frame array; `bone_id` is the externally meaningful identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoneEntry {
    pub bone_id: u32,
    pub bone_number: u32,
    pub bone_type: BoneType,
}

/// Decoded HAnim PLG payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HAnimPlg {
    /// Bone id carried in the plugin header itself.
    pub owning_bone_id: u32,
    pub bone_count: u32,
    /// The 8-byte block present only when `bone_count > 0`.
    pub unknowns: Option<(u32, u32)>,
    pub bones: Vec<BoneEntry>,
}

/// Decode an HAnim PLG payload.
///
/// Layout: `(magic 256, owning bone id, bone count)`, then, only when
/// the count is non-zero, `(unknown1, unknown2)` and the bone records.
/// A zero-bone table with no optional block is valid.
pub fn decode_hanim(
    data: &[u8],
    offset: u64,
    diags: &mut Vec<Diagnostic>,
) -> rwsalvage_common::Result<HAnimPlg> {
    let mut reader = BinaryReader::new(data);
    let _magic = reader.read_u32()?;
    let owning_bone_id = reader.read_u32()?;
    let bone_count = reader.read_u32()?;

    let mut plg = HAnimPlg {
        owning_bone_id,
        bone_count,
        unknowns: None,
        bones: Vec::new(),
    };
    if bone_count == 0 {
        return Ok(plg);
    }

    if reader.remaining() < 8 {
        diags.push(Diagnostic::new(
            offset,
            format!(
                "HAnim table declares {bone_count} bones but the payload ends before the \
                 full header"
            ),
        ));
        return Ok(plg);
    }
    plg.unknowns = Some((reader.read_u32()?, reader.read_u32()?));

    let needed = bone_count as usize * BONE_RECORD_SIZE;
    if reader.remaining() < needed {
        diags.push(Diagnostic::new(
            offset,
            format!(
                "HAnim table declares {bone_count} bones ({needed} bytes) but only {} remain",
                reader.remaining()
            ),
        ));
        return Ok(plg);
    }
    for _ in 0..bone_count {
        let raw: RawBone = reader.read_struct()?;
        plg.bones.push(BoneEntry {
            bone_id: raw.bone_id,
            bone_number: raw.bone_number,
            bone_type: BoneType::from_raw(raw.bone_type),
        });
    }
    Ok(plg)
}

/// Quiet variant used by the frame-list pre-scan: collect the
/// bone_number → bone_id pairs and nothing else, ignoring any layout
/// problem instead of reporting it. The full decode of the same chunk
/// happens later during the normal walk.
pub fn collect_bone_ids(data: &[u8], map: &mut BoneIdMap) {
    let mut sink = Vec::new();
    if let Ok(plg) = decode_hanim(data, 0, &mut sink) {
        for bone in &plg.bones {
            map.insert(bone.bone_number, bone.bone_id);
        }
    }
}
