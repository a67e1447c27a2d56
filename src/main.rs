//! routed-to-world: write MCPNR router output into a Minecraft world.
//!
//! Reads the router's JSON (palette + flat block array) and splats it into
//! the region files of an existing Java-edition world directory.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use routed_to_world::nbt::DEFAULT_DATA_VERSION;
use routed_to_world::{AnvilStorage, BlockPos, ChunkedWorld, RoutedDesign, WorldConfig, splat_design};

#[derive(Parser)]
#[command(name = "routed-to-world", about = "Splat MCPNR router output JSON into a minecraft world")]
pub struct Args {
    /// Input JSON file from the mcpnr router
    #[arg(value_name = "INFILE")]
    pub infile: PathBuf,

    /// Path to the output world
    #[arg(value_name = "OUTPUT_WORLD")]
    pub output_world: PathBuf,

    /// Base X coordinate for design splat
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub base_x: i32,

    /// Base Y coordinate for design splat
    #[arg(long, default_value_t = 3, allow_negative_numbers = true)]
    pub base_y: i32,

    /// Base Z coordinate for design splat
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub base_z: i32,

    /// Dimension the design is written into
    #[arg(long, env = "MC_DIMENSION", default_value = "minecraft:overworld")]
    pub dimension: String,

    /// DataVersion stamped into every written chunk
    #[arg(long, env = "MC_DATA_VERSION", default_value_t = DEFAULT_DATA_VERSION)]
    pub data_version: i32,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let design = RoutedDesign::load(&args.infile)
        .with_context(|| format!("Failed to load design from {:?}", args.infile))?;

    let storage = AnvilStorage::load_level(&args.output_world, args.data_version)
        .with_context(|| format!("Failed to open world {:?}", args.output_world))?;

    let config = WorldConfig {
        dimension: args.dimension.clone(),
        ..WorldConfig::default()
    };
    let mut world = ChunkedWorld::new(storage, config);
    let base = BlockPos::new(args.base_x, args.base_y, args.base_z);

    let stats = splat_design(design, &mut world, base).context("Failed to splat design")?;

    world
        .flush_and_save()
        .with_context(|| format!("Failed to save world {:?}", args.output_world))?;

    println!(
        "Wrote {} blocks, {} tile entities in {} chunks to {:?} ({} floor voxels dropped)",
        stats.blocks, stats.tile_entities, stats.chunks, args.output_world, stats.skipped
    );
    Ok(())
}
