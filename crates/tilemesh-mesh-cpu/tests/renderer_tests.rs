use std::sync::atomic::AtomicBool;

use tilemesh_blocks::{BlockState, ResourcePack};
use tilemesh_geom::Color;
use tilemesh_mesh_cpu::{HiresModelRenderer, HiresTileModel, RenderError, TileGrid, render_tiles};
use tilemesh_world::{GeneratedWorld, RenderBounds, RenderSettings, VoxelWorld, WorldGenConfig};

fn load_pack() -> ResourcePack {
    let root = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    ResourcePack::from_path(root.join("../../assets/pack.toml")).unwrap()
}

#[test]
fn renders_blocks_at_tile_local_positions() {
    let pack = load_pack();
    let settings = RenderSettings::default();
    let mut world = VoxelWorld::new(0, 127);
    world.set_block(10, 64, 20, BlockState::new("minecraft:stone"));
    world.set_block(11, 64, 20, BlockState::new("minecraft:stone"));

    let mut model = HiresTileModel::new();
    let cancel = AtomicBool::new(false);
    let mut renderer = HiresModelRenderer::new(&pack, &settings);
    let meta = renderer
        .render(&world, (10, 0, 20), (11, 127, 21), &mut model, &cancel)
        .unwrap();

    // Two cubes sharing a face: five faces each.
    assert_eq!(model.len(), 20);
    for t in 0..model.len() {
        for v in model.positions(t) {
            assert!((0.0..=2.0).contains(&v.x));
            assert!((64.0..=65.0).contains(&v.y));
            assert!((0.0..=1.0).contains(&v.z));
        }
    }

    assert_eq!(meta.size(), (2, 2));
    let stone = Color::from_hex("#7d7d7d").unwrap();
    for x in 0..2 {
        let col = meta.column(x, 0);
        assert_eq!(col.height, Some(64));
        assert!((col.color.r - stone.r).abs() < 1e-5);
        assert!((col.color.a - 1.0).abs() < 1e-6);
    }
    assert_eq!(meta.column(0, 1).height, None);
    assert_eq!(meta.column(1, 1).color, Color::TRANSPARENT);
}

#[test]
fn translucent_blocks_composite_over_the_column() {
    let pack = load_pack();
    let settings = RenderSettings::default();
    let mut world = VoxelWorld::new(0, 127);
    world.set_block(0, 64, 0, BlockState::new("minecraft:sand"));
    world.set_block(0, 65, 0, BlockState::new("minecraft:water"));

    let mut model = HiresTileModel::new();
    let cancel = AtomicBool::new(false);
    let meta = HiresModelRenderer::new(&pack, &settings)
        .render(&world, (0, 0, 0), (0, 127, 0), &mut model, &cancel)
        .unwrap();

    let col = meta.column(0, 0);
    assert_eq!(col.height, Some(65));
    assert!((col.color.a - 1.0).abs() < 1e-5);
    let sand = Color::from_hex("#dbd3a0").unwrap();
    // Water tints the sand below toward blue.
    assert!(col.color.b > col.color.r);
    assert!(col.color.r < sand.r);
}

#[test]
fn blocks_outside_render_bounds_are_skipped() {
    let pack = load_pack();
    let mut world = VoxelWorld::new(0, 127);
    world.set_block(0, 64, 0, BlockState::new("minecraft:stone"));
    world.set_block(1, 64, 0, BlockState::new("minecraft:stone"));
    world.set_block(5, 64, 0, BlockState::new("minecraft:stone"));

    for render_edges in [false, true] {
        let settings = RenderSettings {
            render_edges,
            bounds: RenderBounds {
                max_x: Some(0),
                ..RenderBounds::default()
            },
            ..RenderSettings::default()
        };
        let mut model = HiresTileModel::new();
        let cancel = AtomicBool::new(false);
        let meta = HiresModelRenderer::new(&pack, &settings)
            .render(&world, (0, 0, 0), (7, 127, 0), &mut model, &cancel)
            .unwrap();

        assert_eq!(meta.size(), (8, 1));
        assert_eq!(meta.column(0, 0).height, Some(64));
        assert_eq!(meta.column(1, 0).height, None);
        assert_eq!(meta.column(5, 0).height, None);
        for t in 0..model.len() {
            for v in model.positions(t) {
                assert!(v.x <= 1.0, "render_edges={render_edges}: vertex at x={}", v.x);
            }
        }
        // With edges on, the stone at x=1 reads as air, so the east face stays.
        let expected = if render_edges { 12 } else { 10 };
        assert_eq!(model.len(), expected, "render_edges={render_edges}");
    }
}

#[test]
fn cancelled_render_reports_cancellation() {
    let pack = load_pack();
    let settings = RenderSettings::default();
    let mut world = VoxelWorld::new(0, 127);
    world.set_block(0, 64, 0, BlockState::new("minecraft:stone"));

    let mut model = HiresTileModel::new();
    let cancel = AtomicBool::new(true);
    let err = HiresModelRenderer::new(&pack, &settings)
        .render(&world, (0, 0, 0), (3, 127, 3), &mut model, &cancel)
        .unwrap_err();
    assert_eq!(err, RenderError::Cancelled);
}

#[test]
fn tile_grid_maps_tiles_and_columns() {
    let grid = TileGrid {
        tile_size_x: 32,
        tile_size_z: 16,
        offset_x: 2,
        offset_z: -3,
    };
    assert_eq!(grid.tile_bounds(0, 0), ((2, -3), (33, 12)));
    assert_eq!(grid.tile_bounds(-1, 1), ((-30, 13), (1, 28)));
    assert_eq!(grid.tile_at(2, -3), (0, 0));
    assert_eq!(grid.tile_at(1, -4), (-1, -1));
    assert_eq!(grid.tile_at(33, 12), (0, 0));
}

#[test]
fn parallel_tiles_match_sequential_renders() {
    let pack = load_pack();
    let settings = RenderSettings::default();
    let world = GeneratedWorld::new(WorldGenConfig::default()).unwrap();
    let grid = TileGrid {
        tile_size_x: 8,
        tile_size_z: 8,
        ..TileGrid::default()
    };
    let tiles = [(0, 0), (1, 0), (-1, 2)];
    let cancel = AtomicBool::new(false);

    let mut rendered = render_tiles(&world, &pack, &settings, grid, &tiles, &cancel);
    rendered.sort_by_key(|t| t.tile);
    assert_eq!(rendered.len(), tiles.len());

    for tile in &rendered {
        assert!(!tile.model.is_empty());
        let ((min_x, min_z), (max_x, max_z)) = grid.tile_bounds(tile.tile.0, tile.tile.1);
        let mut model = HiresTileModel::new();
        HiresModelRenderer::new(&pack, &settings)
            .render(&world, (min_x, 0, min_z), (max_x, 127, max_z), &mut model, &cancel)
            .unwrap();
        assert_eq!(model.raw_positions(), tile.model.raw_positions());
        assert!(tile.meta.columns().iter().all(|c| c.height.is_some()));
    }

    let cancelled = AtomicBool::new(true);
    assert!(render_tiles(&world, &pack, &settings, grid, &tiles, &cancelled).is_empty());
}
