//! Anvil storage backend: region files inside a Java-edition world directory.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use super::ChunkStorage;
use crate::chunk::{Chunk, ChunkEncoder, ChunkPos};
use crate::error::{ConvertError, Result};
use crate::region::{self, RegionFile, RegionPos};

/// Region directory of a dimension, relative to the world root.
pub fn dimension_dir(dimension: &str) -> Result<&'static str> {
    match dimension {
        "minecraft:overworld" => Ok("region"),
        "minecraft:the_nether" => Ok("DIM-1/region"),
        "minecraft:the_end" => Ok("DIM1/region"),
        other => Err(ConvertError::UnknownDimension(other.to_string())),
    }
}

/// Region headers store seconds as `u32`; later times saturate.
fn region_timestamp(secs: u64) -> u32 {
    u32::try_from(secs).unwrap_or(u32::MAX)
}

/// Stages compressed chunk blobs and merges them into region files on save.
///
/// Chunks of a region that were not put are left as they are on disk.
pub struct AnvilStorage {
    root: PathBuf,
    encoder: ChunkEncoder,
    // (region dir, chunk) -> framed blob
    staged: HashMap<(&'static str, ChunkPos), Vec<u8>>,
}

impl AnvilStorage {
    /// Open an existing world directory.
    pub fn load_level(path: &Path, data_version: i32) -> Result<Self> {
        let meta = fs::metadata(path).map_err(|e| ConvertError::persistence(path, e))?;
        if !meta.is_dir() {
            return Err(ConvertError::persistence(
                path,
                io::Error::new(io::ErrorKind::InvalidInput, "world path is not a directory"),
            ));
        }
        if !path.join("level.dat").exists() {
            log::warn!("{:?} has no level.dat, writing region files anyway", path);
        }

        log::info!("Opened world at {:?} (DataVersion {})", path, data_version);
        Ok(Self {
            root: path.to_path_buf(),
            encoder: ChunkEncoder::new(data_version),
            staged: HashMap::new(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn region_path(&self, dimension: &str, region: RegionPos) -> Result<PathBuf> {
        Ok(self.root.join(dimension_dir(dimension)?).join(region.filename()))
    }

    /// Decompressed NBT of a chunk: the staged copy if any, else the one on disk.
    pub fn load_chunk_nbt(&self, dimension: &str, pos: ChunkPos) -> Result<Option<Vec<u8>>> {
        let dir = dimension_dir(dimension)?;
        if let Some(blob) = self.staged.get(&(dir, pos)) {
            let nbt = region::unwrap_and_decompress_chunk(blob)
                .map_err(|e| ConvertError::persistence(&self.root, e))?;
            return Ok(Some(nbt));
        }

        let path = self.region_path(dimension, RegionPos::of_chunk(pos))?;
        let file = RegionFile::read(&path).map_err(|e| ConvertError::persistence(&path, e))?;
        file.chunk(region::chunk_index(pos))
            .map(region::unwrap_and_decompress_chunk)
            .transpose()
            .map_err(|e| ConvertError::persistence(&path, e))
    }

    pub fn staged_count(&self) -> usize {
        self.staged.len()
    }
}

impl ChunkStorage for AnvilStorage {
    fn put_chunk(&mut self, chunk: &Chunk, dimension: &str) -> Result<()> {
        let dir = dimension_dir(dimension)?;
        let nbt = self.encoder.encode(chunk)?;
        let blob = region::compress_and_wrap_chunk(&nbt)
            .map_err(|e| ConvertError::persistence(&self.root, e))?;
        self.staged.insert((dir, chunk.pos), blob);
        Ok(())
    }

    fn save(&mut self) -> Result<()> {
        let timestamp = match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(elapsed) => region_timestamp(elapsed.as_secs()),
            Err(e) => {
                log::warn!("System clock is before the Unix epoch ({}), writing timestamp 0", e);
                0
            }
        };

        let mut by_region: BTreeMap<(&'static str, RegionPos), Vec<(ChunkPos, Vec<u8>)>> =
            BTreeMap::new();
        for ((dir, pos), blob) in self.staged.drain() {
            by_region
                .entry((dir, RegionPos::of_chunk(pos)))
                .or_default()
                .push((pos, blob));
        }

        for ((dir, region_pos), chunks) in by_region {
            let dir_path = self.root.join(dir);
            fs::create_dir_all(&dir_path).map_err(|e| ConvertError::persistence(&dir_path, e))?;

            let path = dir_path.join(region_pos.filename());
            let mut file = RegionFile::read(&path).map_err(|e| ConvertError::persistence(&path, e))?;
            let written = chunks.len();
            for (pos, blob) in chunks {
                file.set_chunk(region::chunk_index(pos), blob, timestamp);
            }
            file.write(&path).map_err(|e| ConvertError::persistence(&path, e))?;

            log::debug!(
                "Wrote {} chunks to {:?} ({} total in region)",
                written,
                path,
                file.chunk_count()
            );
        }

        Ok(())
    }
}
