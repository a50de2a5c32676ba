use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::time::Instant;

use clap::Parser;
use tilemesh_blocks::ResourcePack;
use tilemesh_mesh_cpu::{RenderedTile, TileGrid, render_tiles};
use tilemesh_world::{GeneratedWorld, RenderSettings, WorldGenConfig};

#[derive(Parser, Debug)]
#[command(name = "tilemesh", version, about = "Builds hires tile meshes from a generated world")]
struct Args {
    /// Resource pack describing blocks, models, textures and biomes
    #[arg(long, default_value = "assets/pack.toml")]
    pack: PathBuf,

    /// Render settings (ambient light, cave removal, bounds)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Terrain generator config
    #[arg(long)]
    worldgen: Option<PathBuf>,

    /// Override the generator seed
    #[arg(long)]
    seed: Option<i32>,

    /// First tile to render, as `x,z`
    #[arg(long, value_parser = parse_tile, default_value = "0,0")]
    from: (i32, i32),

    /// Last tile to render (inclusive), as `x,z`
    #[arg(long, value_parser = parse_tile, default_value = "0,0")]
    to: (i32, i32),

    /// Tile edge length in blocks
    #[arg(long, default_value_t = 32)]
    tile_size: i32,

    /// Write the low-res column colors of all tiles as a binary PPM
    #[arg(long)]
    map_out: Option<PathBuf>,
}

fn parse_tile(s: &str) -> Result<(i32, i32), String> {
    let (x, z) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `x,z`, got `{s}`"))?;
    let x = x.trim().parse().map_err(|e| format!("bad tile x `{x}`: {e}"))?;
    let z = z.trim().parse().map_err(|e| format!("bad tile z `{z}`: {e}"))?;
    Ok((x, z))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    if args.tile_size <= 0 {
        return Err(format!("tile size must be positive, got {}", args.tile_size).into());
    }

    let pack = ResourcePack::from_path(&args.pack)?;
    log::info!(
        "loaded pack {} ({} textures)",
        args.pack.display(),
        pack.texture_count()
    );

    let settings = match &args.settings {
        Some(path) => RenderSettings::from_path(path)?,
        None => RenderSettings::default(),
    };
    let mut cfg = match &args.worldgen {
        Some(path) => WorldGenConfig::from_path(path)?,
        None => WorldGenConfig::default(),
    };
    if let Some(seed) = args.seed {
        cfg.seed = seed;
    }
    let world = GeneratedWorld::new(cfg)?;

    let grid = TileGrid {
        tile_size_x: args.tile_size,
        tile_size_z: args.tile_size,
        ..TileGrid::default()
    };
    let (x0, x1) = (args.from.0.min(args.to.0), args.from.0.max(args.to.0));
    let (z0, z1) = (args.from.1.min(args.to.1), args.from.1.max(args.to.1));
    let tiles: Vec<(i32, i32)> = (x0..=x1)
        .flat_map(|x| (z0..=z1).map(move |z| (x, z)))
        .collect();

    let start = Instant::now();
    let cancel = AtomicBool::new(false);
    let mut rendered = render_tiles(&world, &pack, &settings, grid, &tiles, &cancel);
    rendered.sort_by_key(|t| (t.tile.1, t.tile.0));

    let mut total_tris = 0usize;
    for tile in &rendered {
        total_tris += tile.model.len();
        let heights: Vec<i32> = tile.meta.columns().iter().filter_map(|c| c.height).collect();
        let top = heights.iter().copied().max();
        log::info!(
            "tile ({}, {}) tris={} columns={} top={:?}",
            tile.tile.0,
            tile.tile.1,
            tile.model.len(),
            heights.len(),
            top
        );
    }
    log::info!(
        "rendered {} tiles, {} triangles in {} ms",
        rendered.len(),
        total_tris,
        start.elapsed().as_millis()
    );

    if let Some(path) = &args.map_out {
        write_map(path, &rendered, (x0, z0), (x1, z1), args.tile_size)?;
        log::info!("wrote column map to {}", path.display());
    }
    Ok(())
}

/// Stitches the tiles' column colors into one image, one pixel per column.
fn write_map(
    path: &Path,
    tiles: &[RenderedTile],
    first: (i32, i32),
    last: (i32, i32),
    tile_size: i32,
) -> std::io::Result<()> {
    let width = ((last.0 - first.0 + 1) * tile_size) as usize;
    let height = ((last.1 - first.1 + 1) * tile_size) as usize;
    let mut pixels = vec![0u8; width * height * 3];

    for tile in tiles {
        let ox = ((tile.tile.0 - first.0) * tile_size) as usize;
        let oz = ((tile.tile.1 - first.1) * tile_size) as usize;
        let (sx, sz) = tile.meta.size();
        for z in 0..sz {
            for x in 0..sx {
                let [r, g, b, _] = tile.meta.column(x, z).color.to_rgba8();
                let i = ((oz + z) * width + ox + x) * 3;
                pixels[i..i + 3].copy_from_slice(&[r, g, b]);
            }
        }
    }

    let mut out = BufWriter::new(File::create(path)?);
    write!(out, "P6\n{width} {height}\n255\n")?;
    out.write_all(&pixels)?;
    out.flush()
}
