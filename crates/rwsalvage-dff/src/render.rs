//! Indented text listing of a walked chunk tree.
//!
//! The format mirrors the diagnostic output the recovery pipeline has
//! always produced, so listings stay comparable across tools:
//!
//! ```text
//! + Clump ( 1224 bytes @ 0x0 ) - [ 0x10 ]
//!   + Frame List ( 340 bytes @ 0xC ) - [ 0xE ]
//!     + Struct ( 116 bytes @ 0x18 ) - [ 0x1 ]
//!       [ Frame 1 of 2 (BoneID: 100) ]
//!       ...
//! ```

use std::fmt::Write;

use crate::payload::Payload;
use crate::types;
use crate::walker::{ChunkNode, ChunkTree};

/// Render the whole tree, including a trailing diagnostics section
/// when any were recorded.
pub fn render_tree(tree: &ChunkTree) -> String {
    let mut out = String::new();
    for node in &tree.nodes {
        render_node(node, None, 0, &mut out);
    }
    if !tree.diagnostics.is_empty() {
        let _ = writeln!(out, "--- {} diagnostic(s) ---", tree.diagnostics.len());
        for diag in &tree.diagnostics {
            let _ = writeln!(out, "{diag}");
        }
    }
    out
}

fn render_node(node: &ChunkNode, parent: Option<u32>, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    let name = types::chunk_name(node.header.type_id, parent);
    let decoded = !matches!(node.payload, Payload::None) || !node.children.is_empty();
    let prefix = if decoded { "+ " } else { "  " };
    let _ = writeln!(
        out,
        "{indent}{prefix}{name} ( {} bytes @ 0x{:X} ) - [ 0x{:X} ]",
        node.header.payload_size, node.offset, node.header.type_id
    );

    render_payload(&node.payload, &indent, out);

    for child in &node.children {
        render_node(child, Some(node.header.type_id), depth + 1, out);
    }
}

fn render_payload(payload: &Payload, indent: &str, out: &mut String) {
    match payload {
        Payload::None => {}
        Payload::FrameList(frames) => {
            let _ = writeln!(out, "{indent}  Frame Count: {}", frames.len());
            let total = frames.len();
            for frame in frames {
                let bone = frame
                    .bone_id
                    .map_or_else(|| "N/A".to_string(), |id| id.to_string());
                let _ = writeln!(
                    out,
                    "{indent}  [ Frame {} of {total} (BoneID: {bone}) ]",
                    frame.index
                );
                let r = frame.rotation;
                let _ = writeln!(
                    out,
                    "{indent}    Rotation Matrix: ({:.3}; {:.3}; {:.3}; ...)",
                    r[0], r[1], r[2]
                );
                let p = frame.position;
                let _ = writeln!(
                    out,
                    "{indent}    Position: ({:.3}; {:.3}; {:.3})",
                    p[0], p[1], p[2]
                );
                let _ = writeln!(out, "{indent}    Parent Frame: {}", frame.parent_display());
                let _ = writeln!(out, "{indent}    Integer: {}", frame.flag);
            }
        }
        Payload::HAnim(plg) => {
            let _ = writeln!(out, "{indent}  Bone ID: {}", plg.owning_bone_id);
            let _ = writeln!(out, "{indent}  Bone Count: {}", plg.bone_count);
            for (i, bone) in plg.bones.iter().enumerate() {
                let _ = writeln!(out, "{indent}  [ Bone {} ]", i + 1);
                let _ = writeln!(out, "{indent}    Bone ID: {}", bone.bone_id);
                let _ = writeln!(out, "{indent}    Bone No.: {}", bone.bone_number);
                let _ = writeln!(out, "{indent}    Type: {}", bone.bone_type);
            }
        }
        Payload::Atomic(atomic) => {
            let (frame_index, geometry_index) = (atomic.frame_index, atomic.geometry_index);
            let _ = writeln!(out, "{indent}  Frame Index: {frame_index}");
            let _ = writeln!(out, "{indent}  Geometry Index: {geometry_index}");
        }
        Payload::GeometryList(info) => {
            let count = info.geometry_count;
            let _ = writeln!(out, "{indent}  Geometry Count: {count}");
        }
        Payload::MaterialList(info) => {
            let count = info.material_count;
            let _ = writeln!(out, "{indent}  Material Count: {count}");
        }
        Payload::Material(material) => {
            let (r, g, b, a) = material.rgba();
            let (flags, raw) = (material.flags, material.color_rgba);
            let texture_count = material.texture_count;
            let _ = writeln!(out, "{indent}  Flags: {flags}");
            let _ = writeln!(
                out,
                "{indent}  Color RGBA: ({r}, {g}, {b}, {a}) (Raw: {raw})"
            );
            let _ = writeln!(out, "{indent}  Texture Count: {texture_count}");
        }
        Payload::String(value) => {
            let printable: String = value.chars().filter(|c| !c.is_control()).collect();
            let _ = writeln!(out, "{indent}  Value: \"{printable}\"");
        }
    }
}
