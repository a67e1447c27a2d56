//! NBT (Named Binary Tag) structures for Minecraft chunk data.
//!
//! These structures are serialized using fastnbt to create chunk data in the
//! 1.18+ layout (lower-case `sections`, `block_states`, `block_entities`).

use std::collections::HashMap;

use fastnbt::{LongArray, Value};
use serde::{Deserialize, Serialize};

/// Minecraft data version for 1.21.11 (default).
pub const DEFAULT_DATA_VERSION: i32 = 4671;

/// Main chunk structure - the root of NBT hierarchy in .mca files.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChunkData {
    #[serde(rename = "DataVersion")]
    pub data_version: i32,

    // Chunk coordinates (absolute, not relative to region)
    #[serde(rename = "xPos")]
    pub x_pos: i32,
    #[serde(rename = "zPos")]
    pub z_pos: i32,
    #[serde(rename = "yPos")]
    pub y_pos: i32,

    // "minecraft:full" tells the server the chunk is fully generated.
    #[serde(rename = "Status")]
    pub status: String,

    #[serde(rename = "LastUpdate")]
    pub last_update: i64,

    #[serde(rename = "InhabitedTime")]
    pub inhabited_time: i64,

    // 0 asks the server to light the chunk on load
    #[serde(rename = "isLightOn")]
    pub is_light_on: i8,

    pub sections: Vec<Section>,

    #[serde(default)]
    pub block_entities: Vec<HashMap<String, Value>>,
}

// --- Section (16x16x16 Cube) ---
#[derive(Debug, Serialize, Deserialize)]
pub struct Section {
    #[serde(rename = "Y")]
    pub y: i8,

    pub block_states: BlockStates,

    pub biomes: Biomes,
}

// --- Block Palette ---
#[derive(Debug, Serialize, Deserialize)]
pub struct BlockStates {
    pub palette: Vec<BlockState>,
    // Indices into the palette. Omitted when the palette has one entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<LongArray>,
}

// --- Biome Palette ---
#[derive(Debug, Serialize, Deserialize)]
pub struct Biomes {
    pub palette: Vec<String>,
}

// --- Single Block ---
#[derive(Debug, Serialize, Deserialize)]
pub struct BlockState {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Properties", default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<HashMap<String, String>>,
}
