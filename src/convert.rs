//! The conversion pipeline: decoded design -> world writes.

use fastnbt::Value;

use crate::chunk::{BlockPos, TileEntity};
use crate::design::{RoutedDesign, VoxelEntry};
use crate::error::{ConvertError, Result};
use crate::grid::GridWalker;
use crate::palette::decode_palette;
use crate::storage::ChunkStorage;
use crate::tag::json_to_compound;
use crate::world::ChunkedWorld;

/// Counters reported after a successful splat.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SplatStats {
    pub blocks: usize,
    pub tile_entities: usize,
    pub chunks: usize,
    /// Voxels dropped because they land on the bedrock floor.
    pub skipped: usize,
}

/// Build the tile entity for a voxel, if it carries metadata.
///
/// The decoded metadata is stamped with the absolute position and
/// `keepPacked = 0`; those keys overwrite same-named metadata keys.
pub fn tile_entity_for(index: usize, entry: &VoxelEntry, pos: BlockPos) -> Result<Option<TileEntity>> {
    let Some(metadata) = &entry.metadata else {
        return Ok(None);
    };

    let (Some(namespace), Some(name)) = (&entry.entity_namespace, &entry.entity_name) else {
        return Err(ConvertError::MalformedInput(format!(
            "block {} carries nbt but no namespace/base_name",
            index
        )));
    };

    let mut data = json_to_compound(metadata)?;
    data.insert("x".to_string(), Value::Int(pos.x));
    data.insert("y".to_string(), Value::Int(pos.y));
    data.insert("z".to_string(), Value::Int(pos.z));
    data.insert("keepPacked".to_string(), Value::Int(0));

    Ok(Some(TileEntity {
        namespace: namespace.clone(),
        name: name.clone(),
        x: pos.x,
        y: pos.y,
        z: pos.z,
        data,
    }))
}

/// Write every cell of the design into the world, offset by `base`.
///
/// Stops at the first error; the world is left partially written.
pub fn splat_design<S: ChunkStorage>(
    design: RoutedDesign,
    world: &mut ChunkedWorld<S>,
    base: BlockPos,
) -> Result<SplatStats> {
    let palette = decode_palette(&design.palette)?;
    log::info!(
        "Decoded palette with {} block types, extents {}x{}x{}",
        palette.len(),
        design.extents.x,
        design.extents.y,
        design.extents.z
    );

    let walker = GridWalker::new(design.extents, design.blocks)?;
    let mut stats = SplatStats::default();

    for (index, (offset, entry)) in walker.enumerate() {
        let block = palette.get(entry.palette_index).ok_or_else(|| {
            ConvertError::MalformedInput(format!(
                "block {} references palette index {} but the palette has {} entries",
                index,
                entry.palette_index,
                palette.len()
            ))
        })?;

        let pos = base.checked_offset(offset).ok_or_else(|| {
            ConvertError::MalformedInput(format!("block {} lands outside the coordinate range", index))
        })?;

        if !world.set_block(pos, block)? {
            stats.skipped += 1;
            continue;
        }
        stats.blocks += 1;

        if let Some(entity) = tile_entity_for(index, &entry, pos)? {
            world.add_tile_entity(entity)?;
            stats.tile_entities += 1;
        }
    }

    stats.chunks = world.chunk_count();
    log::info!(
        "Placed {} blocks and {} tile entities across {} chunks",
        stats.blocks,
        stats.tile_entities,
        stats.chunks
    );
    if stats.skipped > 0 {
        log::warn!("Dropped {} voxels on the bedrock floor", stats.skipped);
    }
    Ok(stats)
}
