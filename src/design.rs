//! Router output: the palette-compressed flat block array.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};

use crate::error::{ConvertError, Result};

/// Root of the router's JSON document.
#[derive(Debug, Deserialize)]
pub struct RoutedDesign {
    pub extents: Extents,
    pub palette: Vec<PaletteEntry>,
    pub blocks: Vec<VoxelEntry>,
}

/// Size of the design's bounding cuboid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Extents {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl Extents {
    pub fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }

    /// Number of cells, `None` on overflow.
    pub fn volume(&self) -> Option<usize> {
        (self.x as usize)
            .checked_mul(self.y as usize)?
            .checked_mul(self.z as usize)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaletteEntry {
    /// Fully qualified block name, `<namespace>:<base>`.
    pub name: String,
    pub properties: Option<Map<String, JsonValue>>,
}

/// One cell of the flattened array.
#[derive(Debug, Clone, Deserialize)]
pub struct VoxelEntry {
    #[serde(rename = "pi")]
    pub palette_index: usize,
    #[serde(rename = "nbt")]
    pub metadata: Option<Map<String, JsonValue>>,
    #[serde(rename = "namespace")]
    pub entity_namespace: Option<String>,
    #[serde(rename = "base_name")]
    pub entity_name: Option<String>,
}

impl VoxelEntry {
    pub fn new(palette_index: usize) -> Self {
        Self {
            palette_index,
            metadata: None,
            entity_namespace: None,
            entity_name: None,
        }
    }
}

impl RoutedDesign {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        serde_json::from_reader(reader).map_err(|e| ConvertError::MalformedInput(e.to_string()))
    }

    pub fn from_json(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| ConvertError::MalformedInput(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| ConvertError::InputUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file))
    }
}
