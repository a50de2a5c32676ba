//! CPU hires tile meshing: per-block model building into a flat triangle
//! arena, and tile rendering on top of it.
#![forbid(unsafe_code)]

pub mod ao;
pub mod arena;
pub mod builder;
pub mod renderer;

pub use arena::{HiresTileModel, TileModelView};
pub use builder::{ResourceModelBuilder, hash_to_float};
pub use renderer::{
    ColumnMeta, HiresModelRenderer, RenderError, RenderedTile, TileGrid, TileMeta, render_tiles,
};
