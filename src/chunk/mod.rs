//! Chunk model and coordinate mapping.
//!
//! This module handles:
//! - Global block coordinates -> owning chunk + local offset (floor division)
//! - Sparse paletted section storage for one 16x16 column
//! - Tile entities attached to a column
//! - Chunk encoding to NBT (see `encoder`)

mod encoder;

pub use encoder::{ChunkEncoder, pack_block_states, unpack_block_states};

use crate::error::{ConvertError, Result};
use crate::palette::BlockType;
use crate::tag::Compound;

/// Horizontal size of a chunk, and the edge of a cubic section.
pub const CHUNK_SIZE: i32 = 16;

/// Blocks in one 16x16x16 section.
pub const SECTION_VOLUME: usize = 4096;

/// Absolute block position in world space.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Component-wise sum, `None` on overflow.
    pub fn checked_offset(&self, other: BlockPos) -> Option<BlockPos> {
        Some(BlockPos {
            x: self.x.checked_add(other.x)?,
            y: self.y.checked_add(other.y)?,
            z: self.z.checked_add(other.z)?,
        })
    }

    pub fn chunk(&self) -> ChunkPos {
        ChunkPos::containing(self.x, self.z)
    }

    /// Offset inside the owning chunk, always in `0..16`.
    pub fn local(&self) -> (usize, usize) {
        (
            self.x.rem_euclid(CHUNK_SIZE) as usize,
            self.z.rem_euclid(CHUNK_SIZE) as usize,
        )
    }
}

/// Coordinates for a chunk in the world.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct ChunkPos {
    pub x: i32,
    pub z: i32,
}

impl ChunkPos {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Chunk owning the column at block `(x, z)`. Floors toward negative infinity.
    #[inline]
    pub fn containing(x: i32, z: i32) -> Self {
        Self {
            x: x.div_euclid(CHUNK_SIZE),
            z: z.div_euclid(CHUNK_SIZE),
        }
    }
}

/// Vertical extent of the world, `min_y..max_y`. Both ends are section aligned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorldHeight {
    min_y: i32,
    max_y: i32,
}

impl WorldHeight {
    /// Bounds must be multiples of 16 with every section Y fitting in an `i8`.
    pub fn new(min_y: i32, max_y: i32) -> Result<Self> {
        let aligned = min_y.rem_euclid(CHUNK_SIZE) == 0 && max_y.rem_euclid(CHUNK_SIZE) == 0;
        let sections = i8::MIN as i32..=i8::MAX as i32 + 1;
        if !aligned
            || min_y >= max_y
            || !sections.contains(&min_y.div_euclid(CHUNK_SIZE))
            || !sections.contains(&max_y.div_euclid(CHUNK_SIZE))
        {
            return Err(ConvertError::InvalidWorldHeight { min_y, max_y });
        }
        Ok(Self { min_y, max_y })
    }

    pub fn min_y(&self) -> i32 {
        self.min_y
    }

    pub fn max_y(&self) -> i32 {
        self.max_y
    }

    pub fn contains(&self, y: i32) -> bool {
        y >= self.min_y && y < self.max_y
    }

    pub fn min_section(&self) -> i32 {
        self.min_y.div_euclid(CHUNK_SIZE)
    }

    pub fn section_count(&self) -> usize {
        (self.max_y - self.min_y).div_euclid(CHUNK_SIZE).max(0) as usize
    }
}

impl Default for WorldHeight {
    fn default() -> Self {
        Self {
            min_y: -64,
            max_y: 320,
        }
    }
}

/// Block-attached structured data (sign text, container contents, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct TileEntity {
    pub namespace: String,
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub data: Compound,
}

impl TileEntity {
    pub fn pos(&self) -> BlockPos {
        BlockPos::new(self.x, self.y, self.z)
    }

    pub fn id(&self) -> String {
        format!("{}:{}", self.namespace, self.name)
    }
}

/// One 16x16x16 cube of paletted storage.
///
/// `indices` stays empty while the whole section is `palette[0]` (air).
#[derive(Debug, Clone)]
pub struct Section {
    pub y: i8,
    palette: Vec<BlockType>,
    indices: Vec<u16>,
}

impl Section {
    fn new(y: i8) -> Self {
        Self {
            y,
            palette: vec![BlockType::air()],
            indices: Vec::new(),
        }
    }

    #[inline]
    fn index(x: usize, y: usize, z: usize) -> usize {
        (y * 16 + z) * 16 + x
    }

    fn palette_slot(&mut self, block: &BlockType) -> u16 {
        match self.palette.iter().position(|b| b == block) {
            Some(i) => i as u16,
            None => {
                self.palette.push(block.clone());
                (self.palette.len() - 1) as u16
            }
        }
    }

    fn set(&mut self, x: usize, y: usize, z: usize, block: &BlockType) {
        let slot = self.palette_slot(block);
        if self.indices.is_empty() {
            if slot == 0 {
                return;
            }
            self.indices = vec![0; SECTION_VOLUME];
        }
        self.indices[Self::index(x, y, z)] = slot;
    }

    fn get(&self, x: usize, y: usize, z: usize) -> &BlockType {
        let slot = if self.indices.is_empty() {
            0
        } else {
            self.indices[Self::index(x, y, z)] as usize
        };
        &self.palette[slot]
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Palette restricted to referenced entries, plus YZX-ordered indices into it.
    /// Blocks that were overwritten no longer appear.
    pub fn compacted(&self) -> (Vec<&BlockType>, Vec<u16>) {
        if self.indices.is_empty() {
            return (vec![&self.palette[0]], vec![0; SECTION_VOLUME]);
        }

        let mut remap: Vec<Option<u16>> = vec![None; self.palette.len()];
        let mut palette = Vec::new();
        let indices: Vec<u16> = self
            .indices
            .iter()
            .map(|&old| {
                *remap[old as usize].get_or_insert_with(|| {
                    palette.push(&self.palette[old as usize]);
                    (palette.len() - 1) as u16
                })
            })
            .collect();

        (palette, indices)
    }
}

/// A 16x16 column of the world, the unit of storage.
#[derive(Debug, Clone)]
pub struct Chunk {
    pub pos: ChunkPos,
    height: WorldHeight,
    sections: Vec<Section>,
    tile_entities: Vec<TileEntity>,
    dirty: bool,
}

impl Chunk {
    pub fn new(pos: ChunkPos, height: WorldHeight) -> Self {
        let min_section = height.min_section();
        let sections = (0..height.section_count())
            .map(|i| Section::new((min_section + i as i32) as i8))
            .collect();

        Self {
            pos,
            height,
            sections,
            tile_entities: Vec::new(),
            dirty: false,
        }
    }

    pub fn height(&self) -> WorldHeight {
        self.height
    }

    fn locate(&self, y: i32) -> Result<(usize, usize)> {
        if !self.height.contains(y) {
            return Err(ConvertError::BlockOutOfRange {
                y,
                min_y: self.height.min_y,
                max_y: self.height.max_y,
            });
        }
        let rel = y - self.height.min_y;
        Ok(((rel / CHUNK_SIZE) as usize, (rel % CHUNK_SIZE) as usize))
    }

    /// Set a block at chunk-local coordinates (x: 0..15, z: 0..15), absolute y.
    pub fn set_block(&mut self, x: usize, y: i32, z: usize, block: &BlockType) -> Result<()> {
        let (section, ly) = self.locate(y)?;
        self.sections[section].set(x, ly, z, block);
        self.dirty = true;
        Ok(())
    }

    pub fn block_at(&self, x: usize, y: i32, z: usize) -> Option<&BlockType> {
        let (section, ly) = self.locate(y).ok()?;
        Some(self.sections[section].get(x, ly, z))
    }

    /// Fill an entire Y-layer with a block.
    pub fn fill_layer(&mut self, y: i32, block: &BlockType) -> Result<()> {
        for x in 0..CHUNK_SIZE as usize {
            for z in 0..CHUNK_SIZE as usize {
                self.set_block(x, y, z, block)?;
            }
        }
        Ok(())
    }

    pub fn add_tile_entity(&mut self, entity: TileEntity) {
        self.tile_entities.push(entity);
        self.dirty = true;
    }

    pub fn tile_entities(&self) -> &[TileEntity] {
        &self.tile_entities
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
