//! Palette decoding: JSON entries -> block types.

use crate::design::PaletteEntry;
use crate::error::{ConvertError, Result};
use crate::tag::{Compound, json_to_compound};

/// A block type, e.g. `minecraft:lever[facing=north]`.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockType {
    pub namespace: String,
    pub name: String,
    pub properties: Option<Compound>,
}

impl BlockType {
    pub fn new(namespace: &str, name: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
            properties: None,
        }
    }

    pub fn air() -> Self {
        Self::new("minecraft", "air")
    }

    pub fn bedrock() -> Self {
        Self::new("minecraft", "bedrock")
    }

    /// `<namespace>:<name>`
    pub fn qualified_name(&self) -> String {
        format!("{}:{}", self.namespace, self.name)
    }
}

/// Decode a single entry. Splits on the first ':' only.
pub fn decode_entry(index: usize, entry: &PaletteEntry) -> Result<BlockType> {
    let (namespace, name) =
        entry
            .name
            .split_once(':')
            .ok_or_else(|| ConvertError::MalformedPaletteEntry {
                index,
                name: entry.name.clone(),
            })?;

    let properties = entry.properties.as_ref().map(json_to_compound).transpose()?;

    Ok(BlockType {
        namespace: namespace.to_string(),
        name: name.to_string(),
        properties,
    })
}

pub fn decode_palette(entries: &[PaletteEntry]) -> Result<Vec<BlockType>> {
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| decode_entry(i, entry))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fastnbt::Value;
    use serde_json::json;

    fn entry(value: serde_json::Value) -> PaletteEntry {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_simple_name() {
        let block = decode_entry(0, &entry(json!({"name": "minecraft:stone"}))).unwrap();
        assert_eq!(block, BlockType::new("minecraft", "stone"));
        assert!(block.properties.is_none());
    }

    #[test]
    fn test_splits_on_first_separator_only() {
        let block = decode_entry(0, &entry(json!({"name": "redstone:wire_junction:extra"}))).unwrap();
        assert_eq!(block.namespace, "redstone");
        assert_eq!(block.name, "wire_junction:extra");
    }

    #[test]
    fn test_missing_separator() {
        let err = decode_palette(&[
            entry(json!({"name": "minecraft:air"})),
            entry(json!({"name": "stone"})),
        ])
        .unwrap_err();
        assert!(matches!(err, ConvertError::MalformedPaletteEntry { index: 1, ref name } if name == "stone"));
    }

    #[test]
    fn test_properties_are_decoded() {
        let block = decode_entry(
            0,
            &entry(json!({"name": "minecraft:repeater", "properties": {"powered": true, "delay": 2}})),
        )
        .unwrap();
        let props = block.properties.unwrap();
        assert_eq!(props.get("powered"), Some(&Value::String("true".to_string())));
        assert_eq!(props.get("delay"), Some(&Value::Byte(2)));
    }

    #[test]
    fn test_palette_order_is_kept() {
        let palette = decode_palette(&[
            entry(json!({"name": "minecraft:air"})),
            entry(json!({"name": "minecraft:calcite"})),
        ])
        .unwrap();
        assert_eq!(palette[0].qualified_name(), "minecraft:air");
        assert_eq!(palette[1].qualified_name(), "minecraft:calcite");
    }
}
