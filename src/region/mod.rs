//! Minecraft Anvil region file format (.mca).
//!
//! Region files contain 32x32 chunks in a specific binary format:
//! - Bytes 0-4095: Location table (1024 entries × 4 bytes)
//! - Bytes 4096-8191: Timestamp table (1024 entries × 4 bytes)
//! - Bytes 8192+: Chunk data (variable size sectors)

mod file;
mod header;

pub use file::RegionFile;
pub use header::Header;

use std::io::{self, Read, Write};

use flate2::Compression;
use flate2::write::ZlibEncoder;

use crate::chunk::ChunkPos;

/// Size of one sector in bytes (4 KB).
pub const SECTOR_SIZE: usize = 4096;

/// Total header size (location table + timestamp table).
pub const HEADER_SIZE: usize = SECTOR_SIZE * 2; // 8192 bytes

/// Number of chunks per region dimension.
pub const REGION_SIZE: i32 = 32;

/// Chunk slots in one region file.
pub const CHUNKS_PER_REGION: usize = (REGION_SIZE * REGION_SIZE) as usize;

/// Compression types used in Minecraft Anvil format
pub mod compression {
    pub const GZIP: u8 = 1;
    pub const ZLIB: u8 = 2;
    pub const NONE: u8 = 3;
}

/// Convert chunk coordinates to local region coordinates (0-31).
#[inline]
pub fn chunk_to_local(chunk_coord: i32) -> i32 {
    chunk_coord.rem_euclid(REGION_SIZE)
}

/// Convert chunk coordinates to region coordinates.
#[inline]
pub fn chunk_to_region(chunk_coord: i32) -> i32 {
    chunk_coord.div_euclid(REGION_SIZE)
}

/// Calculate linear index for a chunk within a region (0-1023).
#[inline]
pub fn local_to_index(local_x: i32, local_z: i32) -> usize {
    (local_z * REGION_SIZE + local_x) as usize
}

/// Slot of a world chunk inside its region file.
#[inline]
pub fn chunk_index(pos: ChunkPos) -> usize {
    local_to_index(chunk_to_local(pos.x), chunk_to_local(pos.z))
}

/// Region file coordinates (parsed from filename like "r.0.-1.mca").
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct RegionPos {
    pub x: i32,
    pub z: i32,
}

impl RegionPos {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    pub fn of_chunk(pos: ChunkPos) -> Self {
        Self {
            x: chunk_to_region(pos.x),
            z: chunk_to_region(pos.z),
        }
    }

    /// Parse region position from filename (e.g., "r.0.-1.mca").
    pub fn from_filename(name: &str) -> Option<Self> {
        let parts: Vec<&str> = name.split('.').collect();
        if parts.len() == 4 && parts[0] == "r" && parts[3] == "mca" {
            let x = parts[1].parse().ok()?;
            let z = parts[2].parse().ok()?;
            Some(Self { x, z })
        } else {
            None
        }
    }

    pub fn filename(&self) -> String {
        format!("r.{}.{}.mca", self.x, self.z)
    }
}

/// Zlib-compress raw chunk NBT and frame it as `[length:4][type:1][data]`.
pub fn compress_and_wrap_chunk(nbt_data: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(nbt_data)?;
    let compressed = encoder.finish()?;

    let total_len = (compressed.len() + 1) as u32; // +1 byte for type
    let mut blob = Vec::with_capacity(5 + compressed.len());
    blob.extend_from_slice(&total_len.to_be_bytes());
    blob.push(compression::ZLIB);
    blob.extend_from_slice(&compressed);
    Ok(blob)
}

/// Unwrap and decompress a chunk blob.
pub fn unwrap_and_decompress_chunk(chunk_blob: &[u8]) -> io::Result<Vec<u8>> {
    if chunk_blob.len() < 5 {
        return Err(io::Error::new(io::ErrorKind::InvalidData, "chunk blob too short"));
    }

    let compression_type = chunk_blob[4];
    let compressed_data = &chunk_blob[5..];
    let mut decompressed = Vec::new();

    match compression_type {
        compression::ZLIB => {
            flate2::read::ZlibDecoder::new(compressed_data).read_to_end(&mut decompressed)?;
        }
        compression::GZIP => {
            flate2::read::GzDecoder::new(compressed_data).read_to_end(&mut decompressed)?;
        }
        compression::NONE => decompressed.extend_from_slice(compressed_data),
        other => {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("unknown compression type: {}", other),
            ));
        }
    }
    Ok(decompressed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_of_chunk() {
        assert_eq!(RegionPos::of_chunk(ChunkPos::new(0, 31)), RegionPos::new(0, 0));
        assert_eq!(RegionPos::of_chunk(ChunkPos::new(32, -1)), RegionPos::new(1, -1));
        assert_eq!(RegionPos::of_chunk(ChunkPos::new(-33, -32)), RegionPos::new(-2, -1));
    }

    #[test]
    fn test_chunk_index() {
        assert_eq!(chunk_index(ChunkPos::new(0, 0)), 0);
        assert_eq!(chunk_index(ChunkPos::new(31, 0)), 31);
        assert_eq!(chunk_index(ChunkPos::new(0, 1)), 32);
        assert_eq!(chunk_index(ChunkPos::new(-1, -1)), 1023);
    }

    #[test]
    fn test_filename_round_trip() {
        let pos = RegionPos::new(-3, 7);
        assert_eq!(pos.filename(), "r.-3.7.mca");
        assert_eq!(RegionPos::from_filename(&pos.filename()), Some(pos));
        assert_eq!(RegionPos::from_filename("r.0.0.mcr"), None);
    }

    #[test]
    fn test_wrap_and_unwrap() {
        let nbt = b"not really nbt but bytes all the same".to_vec();
        let blob = compress_and_wrap_chunk(&nbt).unwrap();
        let len = u32::from_be_bytes([blob[0], blob[1], blob[2], blob[3]]) as usize;
        assert_eq!(len, blob.len() - 4);
        assert_eq!(blob[4], compression::ZLIB);
        assert_eq!(unwrap_and_decompress_chunk(&blob).unwrap(), nbt);
    }

    #[test]
    fn test_uncompressed_and_unknown() {
        let mut blob = vec![0, 0, 0, 4, compression::NONE];
        blob.extend_from_slice(b"abc");
        assert_eq!(unwrap_and_decompress_chunk(&blob).unwrap(), b"abc");

        blob[4] = 9;
        assert!(unwrap_and_decompress_chunk(&blob).is_err());
        assert!(unwrap_and_decompress_chunk(&[0, 0]).is_err());
    }
}
