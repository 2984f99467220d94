//! Chunk type ids and parent-context classification.
//!
//! The id space observed in these archives does not match the public
//! RenderWare SDK numbering everywhere; in particular id `0x08` is a
//! nested container whose meaning depends on its parent, and the
//! generic `Struct` id `0x01` carries a different fixed layout under
//! each container type. All of that context dispatch lives here so the
//! walker and the renderer agree on one interpretation.

/// Known chunk type ids.
pub mod chunk_id {
    pub const STRUCT: u32 = 0x01;
    pub const STRING: u32 = 0x02;
    pub const EXTENSION: u32 = 0x03;
    pub const TEXTURE: u32 = 0x05;
    pub const MATERIAL: u32 = 0x06;
    pub const MATERIAL_LIST: u32 = 0x07;
    /// Context-dependent nested container (frame list struct or
    /// material list, depending on the parent).
    pub const NESTED: u32 = 0x08;
    pub const FRAME_LIST: u32 = 0x0E;
    pub const GEOMETRY: u32 = 0x0F;
    pub const CLUMP: u32 = 0x10;
    pub const ATOMIC: u32 = 0x14;
    pub const TEXTURE_NATIVE: u32 = 0x15;
    pub const TEXTURE_DICTIONARY: u32 = 0x16;
    pub const GEOMETRY_LIST: u32 = 0x1A;
    pub const ANIMATION: u32 = 0x1B;
    pub const LIGHT: u32 = 0x1C;
    pub const FRAME: u32 = 0x1E;
    pub const CAMERA: u32 = 0x20;
    pub const SKIN_PLG: u32 = 0x116;
    pub const HANIM_PLG: u32 = 0x11E;
    pub const USER_DATA_PLG: u32 = 0x133;
    pub const BIN_MESH_PLG: u32 = 0x50E;
}

use chunk_id::*;

/// Chunk ids the walker recurses into.
const CONTAINER_IDS: &[u32] = &[
    EXTENSION,
    TEXTURE,
    MATERIAL,
    MATERIAL_LIST,
    NESTED,
    FRAME_LIST,
    GEOMETRY,
    CLUMP,
    ATOMIC,
    TEXTURE_DICTIONARY,
    GEOMETRY_LIST,
];

/// Whether the walker should recurse into a chunk of this type.
pub fn is_container(type_id: u32) -> bool {
    CONTAINER_IDS.contains(&type_id)
}

/// How a chunk's payload should be decoded, given its parent's type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    FrameListStruct,
    AtomicStruct,
    GeometryListStruct,
    MaterialListStruct,
    MaterialStruct,
    HAnim,
    String,
    /// Recursed into, no typed payload of its own.
    Container,
    /// Skipped verbatim.
    Opaque,
}

/// Classify a chunk by `(type_id, parent_type)`.
///
/// This is the single dispatch point for the context-dependent ids:
/// a `Struct` chunk means five different layouts depending on the
/// container it sits in.
pub fn classify(type_id: u32, parent: Option<u32>) -> PayloadKind {
    match (type_id, parent) {
        (STRUCT, Some(FRAME_LIST)) => PayloadKind::FrameListStruct,
        (STRUCT, Some(ATOMIC)) => PayloadKind::AtomicStruct,
        (STRUCT, Some(GEOMETRY_LIST)) => PayloadKind::GeometryListStruct,
        (STRUCT, Some(NESTED)) => PayloadKind::MaterialListStruct,
        (STRUCT, Some(MATERIAL_LIST)) => PayloadKind::MaterialStruct,
        (HANIM_PLG, _) => PayloadKind::HAnim,
        (STRING, _) => PayloadKind::String,
        (id, _) if is_container(id) => PayloadKind::Container,
        _ => PayloadKind::Opaque,
    }
}

/// Human-readable chunk name, resolved with parent context.
pub fn chunk_name(type_id: u32, parent: Option<u32>) -> String {
    // Context overrides observed in these archives.
    match (type_id, parent) {
        (MATERIAL_LIST, Some(NESTED)) => return "Material".into(),
        (MATERIAL, Some(MATERIAL_LIST)) => return "Texture".into(),
        (NESTED, Some(GEOMETRY)) => return "Material List".into(),
        (NESTED, _) => return "Frame List Struct".into(),
        _ => {}
    }
    let name = match type_id {
        STRUCT => "Struct",
        STRING => "String",
        EXTENSION => "Extension",
        TEXTURE => "Texture",
        MATERIAL => "Material",
        MATERIAL_LIST => "Material List",
        FRAME_LIST => "Frame List",
        GEOMETRY => "Geometry",
        CLUMP => "Clump",
        ATOMIC => "Atomic",
        TEXTURE_NATIVE => "Texture Native",
        TEXTURE_DICTIONARY => "Texture Dictionary",
        GEOMETRY_LIST => "Geometry List",
        ANIMATION => "Animation",
        LIGHT => "Light",
        FRAME => "Frame",
        CAMERA => "Camera",
        SKIN_PLG => "Skin PLG",
        HANIM_PLG => "HAnim PLG",
        USER_DATA_PLG => "UserData PLG",
        BIN_MESH_PLG => "Bin Mesh PLG",
        other => return format!("Unknown (0x{other:X})"),
    };
    name.into()
}
