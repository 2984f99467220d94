//! Typed payload decoders for leaf chunks.
//!
//! Each decoder consumes a fixed or count-prefixed layout. Decoders
//! never seek: the walker owns cursor arithmetic and always resyncs to
//! the chunk's declared end, so a decoder that reads less than the
//! payload cannot desynchronize sibling parsing.

mod frame;
mod hanim;
mod scene;

pub use frame::{decode_frame_list, BoneIdMap, Frame, RawFrame, FRAME_RECORD_SIZE};
pub use hanim::{collect_bone_ids, decode_hanim, BoneEntry, BoneType, HAnimPlg};
pub use scene::{
    decode_string, AtomicStruct, GeometryListStruct, MaterialListStruct, MaterialStruct,
};

use crate::types::PayloadKind;
use crate::walker::Diagnostic;

/// A decoded chunk payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Container or opaque chunk; bytes kept in place, nothing decoded.
    None,
    FrameList(Vec<Frame>),
    HAnim(HAnimPlg),
    Atomic(AtomicStruct),
    GeometryList(GeometryListStruct),
    MaterialList(MaterialListStruct),
    Material(MaterialStruct),
    String(String),
}

/// Decode one payload according to its classified kind.
///
/// `offset` is the absolute position of the payload, used only for
/// diagnostics. Errors mean the fixed layout did not fit; the caller
/// downgrades them to a per-chunk diagnostic.
pub(crate) fn decode(
    kind: PayloadKind,
    data: &[u8],
    bones: Option<&BoneIdMap>,
    offset: u64,
    diags: &mut Vec<Diagnostic>,
) -> rwsalvage_common::Result<Payload> {
    Ok(match kind {
        PayloadKind::FrameListStruct => {
            Payload::FrameList(decode_frame_list(data, bones, offset, diags)?)
        }
        PayloadKind::HAnim => Payload::HAnim(decode_hanim(data, offset, diags)?),
        PayloadKind::AtomicStruct => {
            Payload::Atomic(scene::decode_fixed(data, "Atomic Struct", offset, diags)?)
        }
        PayloadKind::GeometryListStruct => Payload::GeometryList(scene::decode_fixed(
            data,
            "Geometry List Struct",
            offset,
            diags,
        )?),
        PayloadKind::MaterialListStruct => Payload::MaterialList(scene::decode_fixed(
            data,
            "Material List Struct",
            offset,
            diags,
        )?),
        PayloadKind::MaterialStruct => {
            Payload::Material(scene::decode_fixed(data, "Material Struct", offset, diags)?)
        }
        PayloadKind::String => Payload::String(decode_string(data)),
        PayloadKind::Container | PayloadKind::Opaque => Payload::None,
    })
}
