use std::fs;
use std::path::PathBuf;

use fastnbt::Value;
use routed_to_world::nbt::ChunkData;
use routed_to_world::{AnvilStorage, BlockPos, ChunkPos, ChunkedWorld, RoutedDesign, WorldConfig, splat_design};

const DESIGN: &str = r#"{
    "extents": {"x": 2, "y": 2, "z": 1},
    "palette": [
        {"name": "minecraft:air"},
        {"name": "minecraft:calcite"},
        {"name": "minecraft:lever", "properties": {"face": "wall", "facing": "north", "powered": false}}
    ],
    "blocks": [
        {"pi": 1},
        {"pi": 1},
        {"pi": 2, "nbt": {"CustomName": "clk"}, "namespace": "minecraft", "base_name": "sign"},
        {"pi": 0}
    ]
}"#;

fn temp_world(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("routed-to-world-it-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("level.dat"), b"").unwrap();
    dir
}

#[test]
fn test_design_round_trips_through_region_files() {
    let root = temp_world("round-trip");
    let storage = AnvilStorage::load_level(&root, 3955).unwrap();
    let mut world = ChunkedWorld::new(storage, WorldConfig::default());

    let design = RoutedDesign::from_json(DESIGN).unwrap();
    let stats = splat_design(design, &mut world, BlockPos::new(-1, 3, 0)).unwrap();
    assert_eq!(stats.blocks, 4);
    assert_eq!(stats.tile_entities, 1);
    // x = -1 and x = 0 straddle the chunk boundary
    assert_eq!(stats.chunks, 2);

    let storage = world.flush_and_save().unwrap();
    assert!(root.join("region").join("r.-1.0.mca").exists());
    assert!(root.join("region").join("r.0.0.mca").exists());

    // Lever sits at grid (0, 1, 0) -> world (-1, 4, 0), chunk (-1, 0)
    let nbt = storage
        .load_chunk_nbt("minecraft:overworld", ChunkPos::new(-1, 0))
        .unwrap()
        .expect("chunk (-1, 0) was written");
    let chunk: ChunkData = fastnbt::from_bytes(&nbt).unwrap();
    assert_eq!((chunk.x_pos, chunk.z_pos), (-1, 0));
    assert_eq!(chunk.data_version, 3955);

    let section = chunk.sections.iter().find(|s| s.y == 0).unwrap();
    let lever = section
        .block_states
        .palette
        .iter()
        .find(|b| b.name == "minecraft:lever")
        .expect("lever in palette");
    let props = lever.properties.as_ref().unwrap();
    assert_eq!(props.get("powered").map(String::as_str), Some("false"));
    assert_eq!(props.get("facing").map(String::as_str), Some("north"));
    assert!(section.block_states.palette.iter().any(|b| b.name == "minecraft:bedrock"));

    assert_eq!(chunk.block_entities.len(), 1);
    let entity = &chunk.block_entities[0];
    assert_eq!(entity.get("id"), Some(&Value::String("minecraft:sign".to_string())));
    assert_eq!(entity.get("x"), Some(&Value::Int(-1)));
    assert_eq!(entity.get("y"), Some(&Value::Int(4)));
    assert_eq!(entity.get("z"), Some(&Value::Int(0)));
    assert_eq!(entity.get("keepPacked"), Some(&Value::Int(0)));
    assert_eq!(entity.get("CustomName"), Some(&Value::String("clk".to_string())));

    let other = storage
        .load_chunk_nbt("minecraft:overworld", ChunkPos::new(0, 0))
        .unwrap()
        .expect("chunk (0, 0) was written");
    let other: ChunkData = fastnbt::from_bytes(&other).unwrap();
    assert!(other.block_entities.is_empty());

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn test_unknown_dimension_fails() {
    let root = temp_world("bad-dimension");
    let storage = AnvilStorage::load_level(&root, 3955).unwrap();
    let config = WorldConfig {
        dimension: "minecraft:moon".to_string(),
        ..WorldConfig::default()
    };
    let mut world = ChunkedWorld::new(storage, config);

    let design = RoutedDesign::from_json(DESIGN).unwrap();
    assert!(splat_design(design, &mut world, BlockPos::new(0, 3, 0)).is_err());

    let _ = fs::remove_dir_all(&root);
}
