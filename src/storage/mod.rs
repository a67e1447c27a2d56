mod anvil;
mod memory;

pub use anvil::AnvilStorage;
pub use memory::MemoryStorage;

use crate::chunk::Chunk;
use crate::error::Result;

/// The overworld dimension id.
pub const OVERWORLD: &str = "minecraft:overworld";

/// Persistence boundary for converted chunks.
///
/// Implementations of this trait commit chunks to some backend:
/// - `AnvilStorage` - region files inside a world directory
/// - `MemoryStorage` - keeps snapshots in RAM (for testing/dry runs)
///
/// A chunk may be put more than once; the last put wins. Nothing is
/// guaranteed to be durable until `save` returns.
pub trait ChunkStorage {
    /// Stage the current state of a chunk for the given dimension.
    fn put_chunk(&mut self, chunk: &Chunk, dimension: &str) -> Result<()>;

    /// Commit everything staged so far.
    fn save(&mut self) -> Result<()>;
}
