//! Chunk -> NBT serialization.

use std::collections::HashMap;

use fastnbt::{LongArray, Value};

use super::{Chunk, SECTION_VOLUME, Section};
use crate::error::Result;
use crate::nbt::{BlockState, BlockStates, Biomes, ChunkData, Section as SectionData};
use crate::palette::BlockType;

/// Serializes chunks into uncompressed NBT documents.
pub struct ChunkEncoder {
    data_version: i32,
}

impl ChunkEncoder {
    pub fn new(data_version: i32) -> Self {
        Self { data_version }
    }

    pub fn to_chunk_data(&self, chunk: &Chunk) -> ChunkData {
        let block_entities = chunk
            .tile_entities()
            .iter()
            .map(|entity| {
                let mut compound = entity.data.clone();
                compound.insert("id".to_string(), Value::String(entity.id()));
                compound
            })
            .collect();

        ChunkData {
            data_version: self.data_version,
            x_pos: chunk.pos.x,
            z_pos: chunk.pos.z,
            y_pos: chunk.height().min_section(),
            status: "minecraft:full".to_string(),
            last_update: 0,
            inhabited_time: 0,
            is_light_on: 0,
            sections: chunk.sections().iter().map(encode_section).collect(),
            block_entities,
        }
    }

    /// Raw NBT bytes for one chunk.
    pub fn encode(&self, chunk: &Chunk) -> Result<Vec<u8>> {
        Ok(fastnbt::to_bytes(&self.to_chunk_data(chunk))?)
    }
}

fn encode_section(section: &Section) -> SectionData {
    let (palette, indices) = section.compacted();
    let data = if palette.len() > 1 {
        Some(LongArray::new(pack_block_states(&indices, palette.len())))
    } else {
        None
    };

    SectionData {
        y: section.y,
        block_states: BlockStates {
            palette: palette.into_iter().map(block_state).collect(),
            data,
        },
        biomes: Biomes {
            palette: vec!["minecraft:plains".to_string()],
        },
    }
}

fn block_state(block: &BlockType) -> BlockState {
    let properties = block.properties.as_ref().and_then(|props| {
        let rendered: HashMap<String, String> = props
            .iter()
            .filter_map(|(key, value)| match value {
                Value::String(s) => Some((key.clone(), s.clone())),
                Value::Byte(b) => Some((key.clone(), b.to_string())),
                Value::Int(i) => Some((key.clone(), i.to_string())),
                other => {
                    log::warn!(
                        "Dropping property {}={:?} of {}: not representable as a block state",
                        key,
                        other,
                        block.qualified_name()
                    );
                    None
                }
            })
            .collect();
        (!rendered.is_empty()).then_some(rendered)
    });

    BlockState {
        name: block.qualified_name(),
        properties,
    }
}

fn bits_per_entry(palette_size: usize) -> u32 {
    let needed = usize::BITS - palette_size.saturating_sub(1).leading_zeros();
    needed.max(4)
}

/// Pack palette indices into longs. Entries never span two longs.
pub fn pack_block_states(indices: &[u16], palette_size: usize) -> Vec<i64> {
    let bits = bits_per_entry(palette_size) as usize;
    let per_long = 64 / bits;
    let mask = (1u64 << bits) - 1;

    let mut packed = vec![0i64; indices.len().div_ceil(per_long)];
    for (i, &value) in indices.iter().enumerate() {
        let shift = (i % per_long) * bits;
        packed[i / per_long] |= (((value as u64) & mask) << shift) as i64;
    }
    packed
}

pub fn unpack_block_states(packed: &[i64], palette_size: usize) -> Vec<u16> {
    let bits = bits_per_entry(palette_size) as usize;
    let per_long = 64 / bits;
    let mask = (1u64 << bits) - 1;

    (0..SECTION_VOLUME)
        .map(|i| {
            let long = packed.get(i / per_long).copied().unwrap_or(0) as u64;
            ((long >> ((i % per_long) * bits)) & mask) as u16
        })
        .collect()
}
