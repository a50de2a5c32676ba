use std::sync::atomic::AtomicBool;
use std::time::Duration;

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use tilemesh_blocks::ResourcePack;
use tilemesh_mesh_cpu::{HiresModelRenderer, HiresTileModel, TileGrid, render_tiles};
use tilemesh_world::{GeneratedWorld, RenderSettings, WorldGenConfig};

fn load_pack() -> ResourcePack {
    let root = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    ResourcePack::from_path(root.join("../../assets/pack.toml")).unwrap()
}

fn load_world() -> GeneratedWorld {
    let root = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let cfg = WorldGenConfig::from_path(root.join("../../assets/worldgen.toml")).unwrap();
    GeneratedWorld::new(cfg).unwrap()
}

fn bench_single_tile(c: &mut Criterion) {
    let mut group = c.benchmark_group("hires_tile");
    let pack = load_pack();
    let settings = RenderSettings::default();
    let world = load_world();
    let grid = TileGrid::default();
    let ((min_x, min_z), (max_x, max_z)) = grid.tile_bounds(0, 0);
    let cancel = AtomicBool::new(false);
    let mut model = HiresTileModel::new();
    group.bench_function("generated_32x128x32", |b| {
        b.iter(|| {
            model.clear();
            let meta = HiresModelRenderer::new(&pack, &settings)
                .render(&world, (min_x, 0, min_z), (max_x, 127, max_z), &mut model, &cancel)
                .unwrap();
            black_box(meta);
        })
    });
    group.finish();
}

fn bench_parallel_tiles(c: &mut Criterion) {
    let mut group = c.benchmark_group("hires_tiles_parallel");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(10));
    let pack = load_pack();
    let settings = RenderSettings::default();
    let world = load_world();
    let tiles: Vec<(i32, i32)> = (0..4).flat_map(|x| (0..4).map(move |z| (x, z))).collect();
    let cancel = AtomicBool::new(false);
    group.bench_function("generated_4x4_tiles", |b| {
        b.iter(|| {
            let out = render_tiles(&world, &pack, &settings, TileGrid::default(), &tiles, &cancel);
            black_box(out);
        })
    });
    group.finish();
}

criterion_group!(benches, bench_single_tile, bench_parallel_tiles);
criterion_main!(benches);
