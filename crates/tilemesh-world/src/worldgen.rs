//! Noise-driven terrain exposed through the [`World`] trait. Blocks are
//! derived on demand from the column height, so the world has no storage
//! and can be sampled from any number of render threads.

use std::fs;
use std::path::{Path, PathBuf};

use fastnoise_lite::{FastNoiseLite, NoiseType};
use serde::Deserialize;
use thiserror::Error;
use tilemesh_blocks::BlockState;

use crate::{LightData, World};

#[derive(Debug, Error)]
pub enum WorldGenError {
    #[error("failed to read worldgen config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid worldgen config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid block state {value:?} for {field}: {reason}")]
    InvalidBlock {
        field: &'static str,
        value: String,
        reason: String,
    },
    #[error("world height range {min_y}..={max_y} is empty")]
    EmptyHeightRange { min_y: i32, max_y: i32 },
}

#[derive(Clone, Debug, Deserialize)]
pub struct WorldGenConfig {
    #[serde(default = "default_seed")]
    pub seed: i32,
    #[serde(default = "default_min_y")]
    pub min_y: i32,
    #[serde(default = "default_max_y")]
    pub max_y: i32,
    #[serde(default = "default_sea_level")]
    pub sea_level: i32,
    #[serde(default)]
    pub height: Height,
    #[serde(default)]
    pub surface: Surface,
    #[serde(default)]
    pub trees: Trees,
    #[serde(default)]
    pub biomes: Biomes,
}

fn default_seed() -> i32 {
    1337
}
fn default_min_y() -> i32 {
    0
}
fn default_max_y() -> i32 {
    127
}
fn default_sea_level() -> i32 {
    62
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            min_y: default_min_y(),
            max_y: default_max_y(),
            sea_level: default_sea_level(),
            height: Height::default(),
            surface: Surface::default(),
            trees: Trees::default(),
            biomes: Biomes::default(),
        }
    }
}

impl WorldGenConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, WorldGenError> {
        let path = path.as_ref();
        let s = fs::read_to_string(path).map_err(|source| WorldGenError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&s)?)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Height {
    #[serde(default = "default_height_base")]
    pub base: f32,
    #[serde(default = "default_height_amplitude")]
    pub amplitude: f32,
    #[serde(default = "default_height_freq")]
    pub frequency: f32,
}
fn default_height_base() -> f32 {
    66.0
}
fn default_height_amplitude() -> f32 {
    12.0
}
fn default_height_freq() -> f32 {
    0.01
}
impl Default for Height {
    fn default() -> Self {
        Self {
            base: default_height_base(),
            amplitude: default_height_amplitude(),
            frequency: default_height_freq(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Surface {
    #[serde(default = "default_top_block")]
    pub top: String,
    #[serde(default = "default_sub_block")]
    pub subsurface: String,
    #[serde(default = "default_stone_block")]
    pub stone: String,
    #[serde(default = "default_beach_block")]
    pub beach: String,
    #[serde(default = "default_water_block")]
    pub water: String,
    #[serde(default = "default_plant_block")]
    pub plant: String,
    #[serde(default = "default_subsurface_depth")]
    pub subsurface_depth: i32,
    #[serde(default = "default_plant_density")]
    pub plant_density: f32,
}
fn default_top_block() -> String {
    "minecraft:grass_block".into()
}
fn default_sub_block() -> String {
    "minecraft:dirt".into()
}
fn default_stone_block() -> String {
    "minecraft:stone".into()
}
fn default_beach_block() -> String {
    "minecraft:sand".into()
}
fn default_water_block() -> String {
    "minecraft:water".into()
}
fn default_plant_block() -> String {
    "minecraft:short_grass".into()
}
fn default_subsurface_depth() -> i32 {
    3
}
fn default_plant_density() -> f32 {
    0.15
}
impl Default for Surface {
    fn default() -> Self {
        Self {
            top: default_top_block(),
            subsurface: default_sub_block(),
            stone: default_stone_block(),
            beach: default_beach_block(),
            water: default_water_block(),
            plant: default_plant_block(),
            subsurface_depth: default_subsurface_depth(),
            plant_density: default_plant_density(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Trees {
    #[serde(default = "default_tree_prob")]
    pub probability: f32,
    #[serde(default = "default_trunk_min")]
    pub trunk_min: i32,
    #[serde(default = "default_trunk_max")]
    pub trunk_max: i32,
    #[serde(default = "default_leaf_radius")]
    pub leaf_radius: i32,
    #[serde(default = "default_log_block")]
    pub log: String,
    #[serde(default = "default_leaves_block")]
    pub leaves: String,
}
fn default_tree_prob() -> f32 {
    0.02
}
fn default_trunk_min() -> i32 {
    4
}
fn default_trunk_max() -> i32 {
    6
}
fn default_leaf_radius() -> i32 {
    2
}
fn default_log_block() -> String {
    "minecraft:oak_log[axis=y]".into()
}
fn default_leaves_block() -> String {
    "minecraft:oak_leaves".into()
}
impl Default for Trees {
    fn default() -> Self {
        Self {
            probability: default_tree_prob(),
            trunk_min: default_trunk_min(),
            trunk_max: default_trunk_max(),
            leaf_radius: default_leaf_radius(),
            log: default_log_block(),
            leaves: default_leaves_block(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Biomes {
    #[serde(default = "default_temp_freq")]
    pub frequency: f32,
    /// Temperature noise (in -1..1) above which columns are desert.
    #[serde(default = "default_desert_above")]
    pub desert_above: f32,
    /// Temperature noise below which columns are swamp.
    #[serde(default = "default_swamp_below")]
    pub swamp_below: f32,
}
fn default_temp_freq() -> f32 {
    0.004
}
fn default_desert_above() -> f32 {
    0.35
}
fn default_swamp_below() -> f32 {
    -0.35
}
impl Default for Biomes {
    fn default() -> Self {
        Self {
            frequency: default_temp_freq(),
            desert_above: default_desert_above(),
            swamp_below: default_swamp_below(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ColumnBiome {
    Plains,
    Desert,
    Swamp,
}

impl ColumnBiome {
    fn id(self) -> &'static str {
        match self {
            ColumnBiome::Plains => "minecraft:plains",
            ColumnBiome::Desert => "minecraft:desert",
            ColumnBiome::Swamp => "minecraft:swamp",
        }
    }
}

struct Palette {
    top: BlockState,
    subsurface: BlockState,
    stone: BlockState,
    beach: BlockState,
    water: BlockState,
    plant: BlockState,
    log: BlockState,
    leaves: BlockState,
}

fn parse_block(field: &'static str, value: &str) -> Result<BlockState, WorldGenError> {
    value
        .parse()
        .map_err(|reason| WorldGenError::InvalidBlock {
            field,
            value: value.to_string(),
            reason,
        })
}

// Salts for the per-column random streams.
const SALT_TREE: u32 = 0x5EED_7001;
const SALT_TRUNK: u32 = 0x5EED_7002;
const SALT_PLANT: u32 = 0x5EED_7003;

fn hash2(ix: i32, iz: i32, seed: u32) -> u32 {
    let mut h = (ix as u32).wrapping_mul(0x85eb_ca6b)
        ^ (iz as u32).wrapping_mul(0xc2b2_ae35)
        ^ seed.wrapping_mul(0x27d4_eb2d);
    h ^= h >> 16;
    h = h.wrapping_mul(0x7feb_352d);
    h ^= h >> 15;
    h = h.wrapping_mul(0x846c_a68b);
    h ^= h >> 16;
    h
}

fn rand01(world_seed: u32, ix: i32, iz: i32, salt: u32) -> f32 {
    let h = hash2(ix, iz, (world_seed ^ salt).wrapping_add(0x9E37_79B9));
    ((h & 0x00FF_FFFF) as f32) / 16_777_216.0
}

/// Terrain sampled from a 2D height noise, with beaches, water, scattered
/// plants and simple trees.
pub struct GeneratedWorld {
    cfg: WorldGenConfig,
    terrain: FastNoiseLite,
    temperature: FastNoiseLite,
    palette: Palette,
}

impl GeneratedWorld {
    pub fn new(cfg: WorldGenConfig) -> Result<Self, WorldGenError> {
        if cfg.min_y > cfg.max_y {
            return Err(WorldGenError::EmptyHeightRange {
                min_y: cfg.min_y,
                max_y: cfg.max_y,
            });
        }
        let palette = Palette {
            top: parse_block("surface.top", &cfg.surface.top)?,
            subsurface: parse_block("surface.subsurface", &cfg.surface.subsurface)?,
            stone: parse_block("surface.stone", &cfg.surface.stone)?,
            beach: parse_block("surface.beach", &cfg.surface.beach)?,
            water: parse_block("surface.water", &cfg.surface.water)?,
            plant: parse_block("surface.plant", &cfg.surface.plant)?,
            log: parse_block("trees.log", &cfg.trees.log)?,
            leaves: parse_block("trees.leaves", &cfg.trees.leaves)?,
        };
        let mut terrain = FastNoiseLite::with_seed(cfg.seed);
        terrain.set_noise_type(Some(NoiseType::OpenSimplex2));
        terrain.set_frequency(Some(cfg.height.frequency));
        let mut temperature = FastNoiseLite::with_seed(cfg.seed ^ 0x1203_5F31);
        temperature.set_noise_type(Some(NoiseType::OpenSimplex2));
        temperature.set_frequency(Some(cfg.biomes.frequency));
        log::info!(
            "worldgen: seed={} y={}..={} sea_level={}",
            cfg.seed,
            cfg.min_y,
            cfg.max_y,
            cfg.sea_level
        );
        Ok(Self {
            cfg,
            terrain,
            temperature,
            palette,
        })
    }

    pub fn config(&self) -> &WorldGenConfig {
        &self.cfg
    }

    /// Highest terrain block of the column, clamped to the world height.
    pub fn surface_height(&self, x: i32, z: i32) -> i32 {
        let n = self.terrain.get_noise_2d(x as f32, z as f32);
        let h = (self.cfg.height.base + n * self.cfg.height.amplitude).round() as i32;
        h.clamp(self.cfg.min_y, self.cfg.max_y)
    }

    fn column_biome(&self, x: i32, z: i32) -> ColumnBiome {
        let t = self.temperature.get_noise_2d(x as f32, z as f32);
        if t > self.cfg.biomes.desert_above {
            ColumnBiome::Desert
        } else if t < self.cfg.biomes.swamp_below {
            ColumnBiome::Swamp
        } else {
            ColumnBiome::Plains
        }
    }

    #[inline]
    fn seed(&self) -> u32 {
        self.cfg.seed as u32
    }

    fn is_dry_land(&self, h: i32) -> bool {
        h > self.cfg.sea_level + 1
    }

    /// Top of the trunk if a tree grows on this column.
    fn tree_top(&self, x: i32, z: i32) -> Option<i32> {
        if rand01(self.seed(), x, z, SALT_TREE) >= self.cfg.trees.probability {
            return None;
        }
        let h = self.surface_height(x, z);
        if !self.is_dry_land(h) || self.column_biome(x, z) == ColumnBiome::Desert {
            return None;
        }
        let span = (self.cfg.trees.trunk_max - self.cfg.trees.trunk_min).max(0);
        let extra = (rand01(self.seed(), x, z, SALT_TRUNK) * (span + 1) as f32) as i32;
        Some(h + self.cfg.trees.trunk_min + extra.min(span))
    }

    fn tree_block(&self, x: i32, y: i32, z: i32, h: i32) -> Option<&BlockState> {
        if y > h && self.tree_top(x, z).is_some_and(|top| y <= top) {
            return Some(&self.palette.log);
        }
        let r = self.cfg.trees.leaf_radius;
        for dz in -r..=r {
            for dx in -r..=r {
                let Some(top) = self.tree_top(x + dx, z + dz) else {
                    continue;
                };
                let dy = y - top;
                // Canopy: full radius around the trunk top, shrinking above.
                let radius = match dy {
                    -1 | 0 => r,
                    1 => (r - 1).max(0),
                    _ => continue,
                };
                let corner = dx.abs() == radius && dz.abs() == radius && radius > 0;
                if dx.abs() <= radius && dz.abs() <= radius && !corner {
                    return Some(&self.palette.leaves);
                }
            }
        }
        None
    }
}

impl World for GeneratedWorld {
    fn block_state_at(&self, x: i32, y: i32, z: i32) -> BlockState {
        if y < self.cfg.min_y || y > self.cfg.max_y {
            return BlockState::air();
        }
        let h = self.surface_height(x, z);
        let p = &self.palette;
        if y <= h {
            let beach = !self.is_dry_land(h) || self.column_biome(x, z) == ColumnBiome::Desert;
            let state = if y <= h - self.cfg.surface.subsurface_depth - 1 {
                &p.stone
            } else if beach {
                &p.beach
            } else if y == h {
                &p.top
            } else {
                &p.subsurface
            };
            return state.clone();
        }
        if let Some(state) = self.tree_block(x, y, z, h) {
            return state.clone();
        }
        if y <= self.cfg.sea_level {
            return p.water.clone();
        }
        if y == h + 1
            && self.is_dry_land(h)
            && self.column_biome(x, z) != ColumnBiome::Desert
            && rand01(self.seed(), x, z, SALT_PLANT) < self.cfg.surface.plant_density
        {
            return p.plant.clone();
        }
        BlockState::air()
    }

    fn light_data_at(&self, x: i32, y: i32, z: i32) -> LightData {
        if y > self.surface_height(x, z) {
            LightData::FULL_SKY
        } else {
            LightData::DARK
        }
    }

    fn biome_id_at(&self, x: i32, _y: i32, z: i32) -> &str {
        self.column_biome(x, z).id()
    }

    fn sky_light(&self) -> u8 {
        15
    }

    fn min_y(&self) -> i32 {
        self.cfg.min_y
    }

    fn max_y(&self) -> i32 {
        self.cfg.max_y
    }
}
