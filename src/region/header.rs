//! Region file header.
//!
//! The header consists of two tables:
//! - Location table: where each chunk is stored
//! - Timestamp table: when each chunk was last saved

use super::{CHUNKS_PER_REGION, HEADER_SIZE, SECTOR_SIZE};

/// Location of one chunk: start sector and sector count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Location {
    pub sector: u32,
    pub count: u8,
}

impl Location {
    pub fn is_present(&self) -> bool {
        self.sector >= 2 && self.count > 0
    }

    pub fn byte_range(&self) -> std::ops::Range<usize> {
        let start = self.sector as usize * SECTOR_SIZE;
        start..start + self.count as usize * SECTOR_SIZE
    }
}

/// MCA file header (location table + timestamp table).
#[derive(Debug, Clone)]
pub struct Header {
    pub locations: Vec<Location>,
    pub timestamps: Vec<u32>,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            locations: vec![Location::default(); CHUNKS_PER_REGION],
            timestamps: vec![0; CHUNKS_PER_REGION],
        }
    }
}

impl Header {
    /// Parse the first 8 KB of a region file. Returns `None` if too short.
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < HEADER_SIZE {
            return None;
        }

        let mut header = Self::default();
        for i in 0..CHUNKS_PER_REGION {
            let loc = &bytes[i * 4..i * 4 + 4];
            header.locations[i] = Location {
                sector: u32::from_be_bytes([0, loc[0], loc[1], loc[2]]),
                count: loc[3],
            };

            let ts = &bytes[SECTOR_SIZE + i * 4..SECTOR_SIZE + i * 4 + 4];
            header.timestamps[i] = u32::from_be_bytes([ts[0], ts[1], ts[2], ts[3]]);
        }
        Some(header)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![0u8; HEADER_SIZE];

        for (i, loc) in self.locations.iter().enumerate() {
            // [Offset:3 bytes][Count:1 byte], big endian
            let entry_offset = i * 4;
            bytes[entry_offset] = ((loc.sector >> 16) & 0xFF) as u8;
            bytes[entry_offset + 1] = ((loc.sector >> 8) & 0xFF) as u8;
            bytes[entry_offset + 2] = (loc.sector & 0xFF) as u8;
            bytes[entry_offset + 3] = loc.count;
        }

        for (i, ts) in self.timestamps.iter().enumerate() {
            let entry_offset = SECTOR_SIZE + i * 4;
            bytes[entry_offset..entry_offset + 4].copy_from_slice(&ts.to_be_bytes());
        }

        bytes
    }
}
