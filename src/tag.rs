//! Typed tag model for block properties and tile-entity data.
//!
//! Tags are plain `fastnbt::Value`s. Decoding from the router's JSON only ever
//! produces three kinds: `Compound`, `String` and `Byte`. Booleans become the
//! strings `"true"`/`"false"` because that is how block-state properties are
//! spelled on disk.

use std::collections::HashMap;

use fastnbt::Value;
use serde_json::{Map, Value as JsonValue};

use crate::error::{ConvertError, Result};

/// A compound tag: name -> tag.
pub type Compound = HashMap<String, Value>;

/// Decode a JSON property map into a compound tag.
pub fn json_to_compound(map: &Map<String, JsonValue>) -> Result<Compound> {
    let mut compound = HashMap::with_capacity(map.len());
    for (k, v) in map {
        compound.insert(k.clone(), json_to_tag(k, v)?);
    }
    Ok(compound)
}

fn json_to_tag(key: &str, json: &JsonValue) -> Result<Value> {
    match json {
        JsonValue::Object(map) => Ok(Value::Compound(json_to_compound(map)?)),
        JsonValue::String(s) => Ok(Value::String(s.clone())),
        JsonValue::Bool(b) => Ok(Value::String(b.to_string())),
        JsonValue::Number(num) => num
            .as_i64()
            .and_then(|i| i8::try_from(i).ok())
            .map(Value::Byte)
            .ok_or_else(|| unsupported(key, format!("number {num} does not fit in a byte"))),
        JsonValue::Array(_) => Err(unsupported(key, "array".to_string())),
        JsonValue::Null => Err(unsupported(key, "null".to_string())),
    }
}

fn unsupported(key: &str, kind: String) -> ConvertError {
    ConvertError::UnsupportedTag {
        key: key.to_string(),
        kind,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(json: JsonValue) -> Result<Compound> {
        match json {
            JsonValue::Object(map) => json_to_compound(&map),
            other => panic!("test input must be an object: {:?}", other),
        }
    }

    #[test]
    fn test_bool_becomes_string() {
        let compound = decode(json!({"powered": true, "lit": false})).unwrap();
        assert_eq!(compound.get("powered"), Some(&Value::String("true".to_string())));
        assert_eq!(compound.get("lit"), Some(&Value::String("false".to_string())));
    }

    #[test]
    fn test_scalars_and_nesting() {
        let compound = decode(json!({
            "facing": "north",
            "power": 15,
            "inner": {"delay": -2}
        }))
        .unwrap();

        assert_eq!(compound.get("facing"), Some(&Value::String("north".to_string())));
        assert_eq!(compound.get("power"), Some(&Value::Byte(15)));
        match compound.get("inner") {
            Some(Value::Compound(inner)) => assert_eq!(inner.get("delay"), Some(&Value::Byte(-2))),
            other => panic!("inner decoded as {:?}", other),
        }
    }

    #[test]
    fn test_out_of_byte_range_is_rejected() {
        let err = decode(json!({"count": 300})).unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedTag { ref key, .. } if key == "count"));
    }

    #[test]
    fn test_unsupported_kinds_are_rejected() {
        assert!(decode(json!({"f": 1.5})).is_err());
        assert!(decode(json!({"a": [1, 2]})).is_err());
        assert!(decode(json!({"n": null})).is_err());
        assert!(decode(json!({"deep": {"n": null}})).is_err());
    }
}
