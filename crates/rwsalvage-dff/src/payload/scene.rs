//! Fixed-layout struct payloads for scene graph chunks, plus the
//! String chunk.

use rwsalvage_common::BinaryReader;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::walker::Diagnostic;

/// Atomic Struct: links a frame to a geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct AtomicStruct {
    pub frame_index: u32,
    pub geometry_index: u32,
    pub unknown1: u32,
    pub unknown2: u32,
}

/// Geometry List Struct: geometry count only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct GeometryListStruct {
    pub geometry_count: u32,
}

/// Material List Struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct MaterialListStruct {
    pub material_count: i32,
    pub unused: i32,
}

/// Material Struct.
#[derive(Debug, Clone, Copy, PartialEq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct MaterialStruct {
    pub flags: i32,
    /// Packed R,G,B,A from the low byte up.
    pub color_rgba: u32,
    pub unused: i32,
    pub texture_count: i32,
    pub unknown: f32,
}

impl MaterialStruct {
    /// Unpack the color into (r, g, b, a).
    pub fn rgba(&self) -> (u8, u8, u8, u8) {
        let raw = self.color_rgba;
        (
            (raw & 0xFF) as u8,
            (raw >> 8 & 0xFF) as u8,
            (raw >> 16 & 0xFF) as u8,
            (raw >> 24 & 0xFF) as u8,
        )
    }
}

/// Decode a payload as a single fixed-layout struct.
///
/// Trailing bytes beyond the struct are legal but unexpected, so they
/// are recorded as a diagnostic; a payload *smaller* than the struct is
/// an unpack failure.
pub(crate) fn decode_fixed<T: FromBytes>(
    data: &[u8],
    what: &'static str,
    offset: u64,
    diags: &mut Vec<Diagnostic>,
) -> rwsalvage_common::Result<T> {
    let mut reader = BinaryReader::new(data);
    let value = reader.read_struct::<T>()?;
    if reader.remaining() > 0 {
        diags.push(Diagnostic::new(
            offset,
            format!(
                "{what} carries {} bytes of unexpected extra data",
                reader.remaining()
            ),
        ));
    }
    Ok(value)
}

/// Decode a String chunk: strip trailing NUL padding and decode
/// permissively (invalid bytes are replaced, never fatal).
pub fn decode_string(data: &[u8]) -> String {
    let end = data
        .iter()
        .rposition(|&b| b != 0)
        .map_or(0, |pos| pos + 1);
    String::from_utf8_lossy(&data[..end]).into_owned()
}
