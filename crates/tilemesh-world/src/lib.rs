//! World access for tile rendering: the storage trait, render settings and
//! the cached per-block views the mesh builder reads through.
#![forbid(unsafe_code)]

pub mod color;
pub mod extended;
pub mod neighborhood;
pub mod settings;
pub mod voxel;
pub mod worldgen;

pub use color::BlockColorCalculator;
pub use extended::ExtendedBlock;
pub use neighborhood::BlockNeighborhood;
pub use settings::{RenderBounds, RenderSettings, SettingsError};
pub use voxel::VoxelWorld;
pub use worldgen::{GeneratedWorld, WorldGenConfig, WorldGenError};

use tilemesh_blocks::BlockState;

/// Sky and block light of one block, each `0..=15`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LightData {
    pub sky: u8,
    pub block: u8,
}

impl LightData {
    pub const DARK: LightData = LightData { sky: 0, block: 0 };
    pub const FULL_SKY: LightData = LightData { sky: 15, block: 0 };

    #[inline]
    pub const fn new(sky: u8, block: u8) -> Self {
        Self { sky, block }
    }

    /// Component-wise maximum.
    #[inline]
    pub fn max(self, other: LightData) -> LightData {
        LightData {
            sky: self.sky.max(other.sky),
            block: self.block.max(other.block),
        }
    }
}

/// Raw block storage. Implementations are shared read-only between tile
/// render threads.
pub trait World: Send + Sync {
    fn block_state_at(&self, x: i32, y: i32, z: i32) -> BlockState;
    fn light_data_at(&self, x: i32, y: i32, z: i32) -> LightData;
    /// Raw biome id as stored by the world; resolved through the resource pack.
    fn biome_id_at(&self, x: i32, y: i32, z: i32) -> &str;
    /// Sky light of open air, used for blocks at the render edge.
    fn sky_light(&self) -> u8;
    fn min_y(&self) -> i32;
    fn max_y(&self) -> i32;
}
