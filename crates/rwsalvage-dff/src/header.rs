//! The 12-byte generic chunk header shared by every RenderWare chunk.

use rwsalvage_common::BinaryReader;

use crate::{Error, Result};

/// Size of the generic chunk header in bytes.
pub const HEADER_SIZE: usize = 12;

/// Generic chunk header: type id, payload size, library version stamp.
///
/// All three fields are little-endian u32. The payload of `payload_size`
/// bytes follows immediately after the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    pub type_id: u32,
    pub payload_size: u32,
    pub version: u32,
}

impl ChunkHeader {
    /// Read a header from the reader's current position.
    ///
    /// Fails with [`Error::TruncatedHeader`] when fewer than 12 bytes
    /// remain.
    pub fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        if reader.remaining() < HEADER_SIZE {
            return Err(Error::TruncatedHeader {
                offset: reader.position() as u64,
                available: reader.remaining(),
            });
        }
        Ok(Self {
            type_id: reader.read_u32()?,
            payload_size: reader.read_u32()?,
            version: reader.read_u32()?,
        })
    }

    /// Header plus payload size, as a chunk occupies it in the stream.
    #[inline]
    pub fn total_size(&self) -> u64 {
        HEADER_SIZE as u64 + u64::from(self.payload_size)
    }

    /// Append the encoded header to a byte buffer.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.type_id.to_le_bytes());
        out.extend_from_slice(&self.payload_size.to_le_bytes());
        out.extend_from_slice(&self.version.to_le_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_roundtrip() {
        let header = ChunkHeader {
            type_id: 0x10,
            payload_size: 256,
            version: 0x1803_FFFF,
        };
        let mut buf = Vec::new();
        header.write_to(&mut buf);
        assert_eq!(buf.len(), HEADER_SIZE);

        let mut reader = BinaryReader::new(&buf);
        assert_eq!(ChunkHeader::read(&mut reader).unwrap(), header);
    }

    #[test]
    fn test_truncated_header() {
        let mut reader = BinaryReader::new(&[0u8; 11]);
        let err = ChunkHeader::read(&mut reader).unwrap_err();
        assert!(matches!(
            err,
            Error::TruncatedHeader {
                offset: 0,
                available: 11
            }
        ));
    }
}
