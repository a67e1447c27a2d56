//! Chunk-partitioned world store.
//!
//! Chunks are materialized on first touch with a bedrock floor, kept in an
//! unbounded cache for the whole run, and committed to the backing
//! `ChunkStorage` in one go at the end.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::chunk::{BlockPos, Chunk, ChunkPos, TileEntity, WorldHeight};
use crate::error::Result;
use crate::palette::BlockType;
use crate::storage::{ChunkStorage, OVERWORLD};

/// Layer filled with bedrock in every new chunk. Voxel writes never replace it.
pub const FLOOR_Y: i32 = 0;

#[derive(Debug, Clone)]
pub struct WorldConfig {
    pub dimension: String,
    pub height: WorldHeight,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            dimension: OVERWORLD.to_string(),
            height: WorldHeight::default(),
        }
    }
}

/// Single-writer world store over a persistence backend.
pub struct ChunkedWorld<S: ChunkStorage> {
    storage: S,
    config: WorldConfig,
    chunks: HashMap<ChunkPos, Chunk>,
    bedrock: BlockType,
}

impl<S: ChunkStorage> ChunkedWorld<S> {
    pub fn new(storage: S, config: WorldConfig) -> Self {
        Self {
            storage,
            config,
            chunks: HashMap::new(),
            bedrock: BlockType::bedrock(),
        }
    }

    /// Cached chunk, or a fresh one registered with storage and floored with bedrock.
    pub fn get_or_create_chunk(&mut self, pos: ChunkPos) -> Result<&mut Chunk> {
        match self.chunks.entry(pos) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let mut chunk = Chunk::new(pos, self.config.height);
                self.storage.put_chunk(&chunk, &self.config.dimension)?;
                chunk.fill_layer(FLOOR_Y, &self.bedrock)?;
                chunk.mark_dirty();
                log::debug!("Created chunk ({}, {})", pos.x, pos.z);
                Ok(entry.insert(chunk))
            }
        }
    }

    /// Returns `false` when the write was skipped because it targets the floor.
    pub fn set_block(&mut self, pos: BlockPos, block: &BlockType) -> Result<bool> {
        let chunk = self.get_or_create_chunk(pos.chunk())?;
        if pos.y == FLOOR_Y {
            log::warn!(
                "Skipping {} at ({}, {}, {}): the floor layer is reserved for bedrock",
                block.qualified_name(),
                pos.x,
                pos.y,
                pos.z
            );
            return Ok(false);
        }
        let (lx, lz) = pos.local();
        chunk.set_block(lx, pos.y, lz, block)?;
        Ok(true)
    }

    pub fn add_tile_entity(&mut self, entity: TileEntity) -> Result<()> {
        let chunk = self.get_or_create_chunk(entity.pos().chunk())?;
        chunk.add_tile_entity(entity);
        Ok(())
    }

    pub fn chunk(&self, pos: ChunkPos) -> Option<&Chunk> {
        self.chunks.get(&pos)
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn block_at(&self, pos: BlockPos) -> Option<&BlockType> {
        let (lx, lz) = pos.local();
        self.chunk(pos.chunk())?.block_at(lx, pos.y, lz)
    }

    /// Commit every cached chunk, then save the backend once.
    ///
    /// Consumes the store; the backend is handed back for inspection.
    pub fn flush_and_save(mut self) -> Result<S> {
        log::info!("Flushing {} chunks", self.chunks.len());
        for chunk in self.chunks.values_mut() {
            chunk.mark_dirty();
            self.storage.put_chunk(chunk, &self.config.dimension)?;
        }
        self.chunks.clear();
        self.storage.save()?;
        Ok(self.storage)
    }
}
