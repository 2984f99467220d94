//! Per-file structural summary, one tab-separated row per asset.

use crate::payload::Payload;
use crate::types::chunk_id;
use crate::walker::{ChunkNode, ChunkTree};

/// Header line for summary TSV output.
pub const SUMMARY_TSV_HEADER: &str = "filename\tframes\tgeometries\tmaterials\ttextures\tatomics";

/// Counts of the structurally interesting chunks in one asset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClumpSummary {
    pub frame_count: usize,
    pub geometry_count: usize,
    pub material_count: usize,
    pub texture_count: usize,
    pub atomic_count: usize,
}

impl ClumpSummary {
    /// Tally a walked tree.
    pub fn from_tree(tree: &ChunkTree) -> Self {
        let mut summary = Self::default();
        for node in &tree.nodes {
            summary.visit(node, None);
        }
        summary
    }

    fn visit(&mut self, node: &ChunkNode, parent: Option<u32>) {
        match node.header.type_id {
            chunk_id::GEOMETRY => self.geometry_count += 1,
            chunk_id::ATOMIC => self.atomic_count += 1,
            // Context-resolved ids: 0x07 under 0x08 is a material, and
            // both the texture id and 0x06 under a material count as
            // textures (see types::chunk_name).
            chunk_id::MATERIAL_LIST if parent == Some(chunk_id::NESTED) => {
                self.material_count += 1;
            }
            chunk_id::MATERIAL if parent == Some(chunk_id::MATERIAL_LIST) => {
                self.texture_count += 1;
            }
            chunk_id::TEXTURE => self.texture_count += 1,
            _ => {}
        }
        if let Payload::FrameList(frames) = &node.payload {
            self.frame_count += frames.len();
        }
        for child in &node.children {
            self.visit(child, Some(node.header.type_id));
        }
    }

    /// Render as one TSV row for the given filename.
    pub fn tsv_row(&self, filename: &str) -> String {
        format!(
            "{filename}\t{}\t{}\t{}\t{}\t{}",
            self.frame_count,
            self.geometry_count,
            self.material_count,
            self.texture_count,
            self.atomic_count
        )
    }
}

#[cfg(test)]
mod tests {
    use byteorder::{LittleEndian, WriteBytesExt};

    use super::*;
    use crate::header::ChunkHeader;
    use crate::walker::walk;

    fn chunk(type_id: u32, payload: &[u8]) -> Vec<u8> {
        let mut buf = Vec::new();
        ChunkHeader {
            type_id,
            payload_size: payload.len() as u32,
            version: 0x1803_FFFF,
        }
        .write_to(&mut buf);
        buf.extend_from_slice(payload);
        buf
    }

    #[test]
    fn test_summary_counts() {
        // Clump with a 2-frame frame list, one geometry holding one
        // material, and one atomic.
        let mut frame_payload = Vec::new();
        frame_payload.write_u32::<LittleEndian>(2).unwrap();
        for _ in 0..2 {
            for _ in 0..13 {
                frame_payload.write_f32::<LittleEndian>(0.0).unwrap();
            }
            frame_payload.write_u32::<LittleEndian>(0).unwrap();
        }
        let frame_list = chunk(
            chunk_id::FRAME_LIST,
            &chunk(chunk_id::STRUCT, &frame_payload),
        );

        let material = chunk(chunk_id::MATERIAL_LIST, &[]);
        let material_holder = chunk(chunk_id::NESTED, &material);
        let geometry = chunk(chunk_id::GEOMETRY, &material_holder);
        let atomic = chunk(chunk_id::ATOMIC, &[]);

        let mut body = frame_list;
        body.extend_from_slice(&geometry);
        body.extend_from_slice(&atomic);
        let clump = chunk(chunk_id::CLUMP, &body);

        let tree = walk(&clump);
        let summary = ClumpSummary::from_tree(&tree);

        assert_eq!(summary.frame_count, 2);
        assert_eq!(summary.geometry_count, 1);
        assert_eq!(summary.material_count, 1);
        assert_eq!(summary.texture_count, 0);
        assert_eq!(summary.atomic_count, 1);
        assert_eq!(
            summary.tsv_row("001_005_00003.dff"),
            "001_005_00003.dff\t2\t1\t1\t0\t1"
        );
    }
}
