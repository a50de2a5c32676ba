use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use rayon::prelude::*;
use thiserror::Error;
use tilemesh_blocks::ResourcePack;
use tilemesh_geom::Color;
use tilemesh_world::{BlockNeighborhood, RenderSettings, World};

use crate::arena::{HiresTileModel, TileModelView};
use crate::builder::ResourceModelBuilder;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("tile render cancelled")]
    Cancelled,
}

/// Low-detail summary of one block column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnMeta {
    /// Premultiplied composite of the column's block colors, bottom to top.
    pub color: Color,
    /// Highest block that contributed color.
    pub height: Option<i32>,
}

impl Default for ColumnMeta {
    fn default() -> Self {
        Self {
            color: Color::TRANSPARENT,
            height: None,
        }
    }
}

/// Per-column colors and heights of a rendered tile, indexed by tile-local
/// `(x, z)`.
#[derive(Clone, Debug)]
pub struct TileMeta {
    size_x: usize,
    size_z: usize,
    columns: Vec<ColumnMeta>,
}

impl TileMeta {
    pub fn new(size_x: usize, size_z: usize) -> Self {
        Self {
            size_x,
            size_z,
            columns: vec![ColumnMeta::default(); size_x * size_z],
        }
    }

    #[inline]
    pub fn size(&self) -> (usize, usize) {
        (self.size_x, self.size_z)
    }

    #[inline]
    pub fn column(&self, x: usize, z: usize) -> &ColumnMeta {
        &self.columns[z * self.size_x + x]
    }

    #[inline]
    fn column_mut(&mut self, x: usize, z: usize) -> &mut ColumnMeta {
        &mut self.columns[z * self.size_x + x]
    }

    pub fn columns(&self) -> &[ColumnMeta] {
        &self.columns
    }
}

/// Renders block ranges of a world into a [`HiresTileModel`].
pub struct HiresModelRenderer<'a> {
    pack: &'a ResourcePack,
    settings: &'a RenderSettings,
    builder: ResourceModelBuilder,
}

impl<'a> HiresModelRenderer<'a> {
    pub fn new(pack: &'a ResourcePack, settings: &'a RenderSettings) -> Self {
        Self {
            pack,
            settings,
            builder: ResourceModelBuilder::new(),
        }
    }

    /// Renders every block in the inclusive box `min..=max` into `model`,
    /// positioned relative to `min`. The box is clamped to the world's
    /// height range and to the render bounds.
    ///
    /// On cancellation the triangles already written are left in `model`
    /// and must be discarded by the caller.
    pub fn render(
        &mut self,
        world: &dyn World,
        min: (i32, i32, i32),
        max: (i32, i32, i32),
        model: &mut HiresTileModel,
        cancel: &AtomicBool,
    ) -> Result<TileMeta, RenderError> {
        let start = Instant::now();
        let size_x = (max.0 - min.0 + 1).max(0) as usize;
        let size_z = (max.2 - min.2 + 1).max(0) as usize;
        let mut meta = TileMeta::new(size_x, size_z);
        // Blocks outside the render bounds are never emitted, whether or
        // not edge faces are rendered.
        let bounds = &self.settings.bounds;
        let clamp = |lo: i32, hi: i32, b_lo: Option<i32>, b_hi: Option<i32>| {
            (b_lo.map_or(lo, |b| lo.max(b)), b_hi.map_or(hi, |b| hi.min(b)))
        };
        let (min_x, max_x) = clamp(min.0, max.0, bounds.min_x, bounds.max_x);
        let (min_z, max_z) = clamp(min.2, max.2, bounds.min_z, bounds.max_z);
        let (min_y, max_y) = clamp(
            min.1.max(world.min_y()),
            max.1.min(world.max_y()),
            bounds.min_y,
            bounds.max_y,
        );
        let first_tri = model.len();

        let pack = self.pack;
        let mut hood = BlockNeighborhood::new(pack, self.settings, world);
        let mut blocks = 0usize;

        for x in min_x..=max_x {
            for z in min_z..=max_z {
                if cancel.load(Ordering::Relaxed) {
                    return Err(RenderError::Cancelled);
                }
                let mut column = ColumnMeta::default();

                for y in min_y..=max_y {
                    hood.set(x, y, z);
                    let state = hood.block().block_state();
                    if state.is_air() {
                        continue;
                    }
                    let Some(resolved) = pack.resolved_model(state) else {
                        continue;
                    };

                    let mut block_color = Color::TRANSPARENT;
                    let mut view = TileModelView::new(model);
                    self.builder
                        .build(&mut hood, resolved, &mut view, &mut block_color);
                    if view.size() == 0 {
                        continue;
                    }
                    blocks += 1;
                    view.translate((x - min.0) as f32, (y - min.1) as f32, (z - min.2) as f32);

                    if block_color.a > 0.0 {
                        column.height = Some(y);
                        column.color.overlay(&block_color.to_premultiplied());
                    }
                }

                *meta.column_mut((x - min.0) as usize, (z - min.2) as usize) = column;
            }
        }

        log::info!(
            target: "perf",
            "ms={} hires_tile blocks={} tris={} min=({}, {}, {}) max=({}, {}, {})",
            start.elapsed().as_millis(),
            blocks,
            model.len() - first_tri,
            min.0,
            min.1,
            min.2,
            max.0,
            max.1,
            max.2
        );
        Ok(meta)
    }
}

/// Maps tile coordinates to the block columns they cover.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileGrid {
    pub tile_size_x: i32,
    pub tile_size_z: i32,
    pub offset_x: i32,
    pub offset_z: i32,
}

impl Default for TileGrid {
    fn default() -> Self {
        Self {
            tile_size_x: 32,
            tile_size_z: 32,
            offset_x: 0,
            offset_z: 0,
        }
    }
}

impl TileGrid {
    /// Inclusive block x/z bounds of a tile.
    pub fn tile_bounds(&self, tx: i32, tz: i32) -> ((i32, i32), (i32, i32)) {
        let min_x = tx * self.tile_size_x + self.offset_x;
        let min_z = tz * self.tile_size_z + self.offset_z;
        (
            (min_x, min_z),
            (min_x + self.tile_size_x - 1, min_z + self.tile_size_z - 1),
        )
    }

    /// The tile containing block column `(x, z)`.
    pub fn tile_at(&self, x: i32, z: i32) -> (i32, i32) {
        (
            (x - self.offset_x).div_euclid(self.tile_size_x),
            (z - self.offset_z).div_euclid(self.tile_size_z),
        )
    }
}

#[derive(Debug)]
pub struct RenderedTile {
    pub tile: (i32, i32),
    pub model: HiresTileModel,
    pub meta: TileMeta,
}

/// Renders tiles in parallel, each on its own renderer and arena. Tiles
/// that were cancelled are left out of the result.
pub fn render_tiles(
    world: &dyn World,
    pack: &ResourcePack,
    settings: &RenderSettings,
    grid: TileGrid,
    tiles: &[(i32, i32)],
    cancel: &AtomicBool,
) -> Vec<RenderedTile> {
    let start = Instant::now();
    let rendered: Vec<RenderedTile> = tiles
        .par_iter()
        .filter_map(|&(tx, tz)| {
            let ((min_x, min_z), (max_x, max_z)) = grid.tile_bounds(tx, tz);
            let mut renderer = HiresModelRenderer::new(pack, settings);
            let mut model = HiresTileModel::new();
            let meta = renderer
                .render(
                    world,
                    (min_x, world.min_y(), min_z),
                    (max_x, world.max_y(), max_z),
                    &mut model,
                    cancel,
                )
                .ok()?;
            Some(RenderedTile {
                tile: (tx, tz),
                model,
                meta,
            })
        })
        .collect();
    log::info!(
        target: "perf",
        "ms={} hires_tiles rendered={} requested={}",
        start.elapsed().as_millis(),
        rendered.len(),
        tiles.len()
    );
    rendered
}
