//! routed-to-world: splat placed-and-routed designs into a Minecraft world.
//!
//! The router emits a palette-compressed flat block array (JSON). This crate
//! decodes it, maps every cell to world space, writes the blocks and their
//! tile entities into lazily created chunks, and commits those chunks as
//! Anvil region files.

pub mod chunk;
pub mod convert;
pub mod design;
pub mod error;
pub mod grid;
pub mod nbt;
pub mod palette;
pub mod region;
pub mod storage;
pub mod tag;
pub mod world;

pub use chunk::{BlockPos, Chunk, ChunkPos, TileEntity, WorldHeight};
pub use convert::{SplatStats, splat_design};
pub use design::RoutedDesign;
pub use error::{ConvertError, Result};
pub use palette::BlockType;
pub use storage::{AnvilStorage, ChunkStorage, MemoryStorage};
pub use world::{ChunkedWorld, WorldConfig};
