use std::fs;
use std::io;
use std::path::Path;

use super::header::{Header, Location};
use super::{CHUNKS_PER_REGION, HEADER_SIZE, SECTOR_SIZE};

/// In-memory image of one region file: a framed chunk blob per occupied slot.
///
/// Blobs are kept exactly as framed on disk (`[length:4][type:1][data]`),
/// so chunks read from an existing file are written back untouched.
pub struct RegionFile {
    blobs: Vec<Option<Vec<u8>>>,
    timestamps: Vec<u32>,
}

impl Default for RegionFile {
    fn default() -> Self {
        Self {
            blobs: vec![None; CHUNKS_PER_REGION],
            timestamps: vec![0; CHUNKS_PER_REGION],
        }
    }
}

impl RegionFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load an existing region file. A missing file yields an empty region.
    pub fn read(path: &Path) -> io::Result<Self> {
        match fs::read(path) {
            Ok(bytes) => Ok(Self::from_bytes(&bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::new()),
            Err(e) => Err(e),
        }
    }

    /// Parse a region image. Slots pointing outside the file are dropped.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut region = Self::new();
        let Some(header) = Header::parse(bytes) else {
            if !bytes.is_empty() {
                log::warn!("Region file shorter than its header ({} bytes), starting empty", bytes.len());
            }
            return region;
        };

        for (i, loc) in header.locations.iter().enumerate() {
            if !loc.is_present() {
                continue;
            }
            match frame_at(bytes, loc) {
                Some(blob) => {
                    region.blobs[i] = Some(blob.to_vec());
                    region.timestamps[i] = header.timestamps[i];
                }
                None => log::warn!("Dropping unreadable chunk slot {} in existing region", i),
            }
        }
        region
    }

    pub fn set_chunk(&mut self, index: usize, blob: Vec<u8>, timestamp: u32) {
        self.blobs[index] = Some(blob);
        self.timestamps[index] = timestamp;
    }

    pub fn chunk(&self, index: usize) -> Option<&[u8]> {
        self.blobs[index].as_deref()
    }

    pub fn chunk_count(&self) -> usize {
        self.blobs.iter().filter(|b| b.is_some()).count()
    }

    /// Serialize with chunks laid out back to back, each padded to whole sectors.
    pub fn to_bytes(&self) -> io::Result<Vec<u8>> {
        let mut header = Header::default();
        let mut data = Vec::new();
        let mut current_sector = (HEADER_SIZE / SECTOR_SIZE) as u32;

        for (i, blob) in self.blobs.iter().enumerate() {
            let Some(blob) = blob else { continue };

            let sectors = blob.len().div_ceil(SECTOR_SIZE);
            let count = u8::try_from(sectors).map_err(|_| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("chunk slot {} needs {} sectors, more than a region entry can address", i, sectors),
                )
            })?;

            header.locations[i] = Location {
                sector: current_sector,
                count,
            };
            header.timestamps[i] = self.timestamps[i];

            data.extend_from_slice(blob);
            data.resize(data.len().div_ceil(SECTOR_SIZE) * SECTOR_SIZE, 0);
            current_sector += sectors as u32;
        }

        let mut bytes = header.to_bytes();
        bytes.extend_from_slice(&data);
        Ok(bytes)
    }

    pub fn write(&self, path: &Path) -> io::Result<()> {
        fs::write(path, self.to_bytes()?)
    }
}

/// The framed blob a location entry points at, if it lies inside the file.
fn frame_at<'a>(bytes: &'a [u8], loc: &Location) -> Option<&'a [u8]> {
    let range = loc.byte_range();
    let start = range.start;
    let len_bytes = bytes.get(start..start + 4)?;
    let len = u32::from_be_bytes([len_bytes[0], len_bytes[1], len_bytes[2], len_bytes[3]]) as usize;
    if len == 0 || 4 + len > range.len() {
        return None;
    }
    bytes.get(start..start + 4 + len)
}
