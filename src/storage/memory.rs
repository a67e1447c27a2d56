//! In-memory storage backend using HashMap.
//!
//! Useful for development and testing. Data is lost on exit.

use std::collections::HashMap;

use super::ChunkStorage;
use crate::chunk::{Chunk, ChunkPos};
use crate::error::Result;

/// Keeps the latest snapshot of every chunk put into it.
///
/// Also counts calls, so tests can check how the world store drives its
/// persistence layer.
#[derive(Default)]
pub struct MemoryStorage {
    chunks: HashMap<(String, ChunkPos), Chunk>,
    puts: usize,
    saves: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, dimension: &str, pos: ChunkPos) -> Option<&Chunk> {
        self.chunks.get(&(dimension.to_string(), pos))
    }

    pub fn exists(&self, dimension: &str, pos: ChunkPos) -> bool {
        self.get(dimension, pos).is_some()
    }

    pub fn list_chunks(&self) -> Vec<ChunkPos> {
        self.chunks.keys().map(|(_, pos)| *pos).collect()
    }

    pub fn put_count(&self) -> usize {
        self.puts
    }

    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl ChunkStorage for MemoryStorage {
    fn put_chunk(&mut self, chunk: &Chunk, dimension: &str) -> Result<()> {
        self.chunks
            .insert((dimension.to_string(), chunk.pos), chunk.clone());
        self.puts += 1;
        Ok(())
    }

    fn save(&mut self) -> Result<()> {
        self.saves += 1;
        Ok(())
    }
}
