use hashbrown::HashMap;
use tilemesh_blocks::BlockState;

use crate::{LightData, World};

/// Sparse in-memory world. Unset positions are air under open sky.
#[derive(Clone, Debug)]
pub struct VoxelWorld {
    blocks: HashMap<(i32, i32, i32), BlockState>,
    light: HashMap<(i32, i32, i32), LightData>,
    biomes: HashMap<(i32, i32), String>,
    default_light: LightData,
    default_biome: String,
    sky_light: u8,
    min_y: i32,
    max_y: i32,
}

impl Default for VoxelWorld {
    fn default() -> Self {
        Self::new(0, 255)
    }
}

impl VoxelWorld {
    pub fn new(min_y: i32, max_y: i32) -> Self {
        Self {
            blocks: HashMap::new(),
            light: HashMap::new(),
            biomes: HashMap::new(),
            default_light: LightData::FULL_SKY,
            default_biome: "plains".to_string(),
            sky_light: 15,
            min_y,
            max_y,
        }
    }

    pub fn with_default_light(mut self, light: LightData) -> Self {
        self.default_light = light;
        self
    }

    pub fn with_default_biome(mut self, biome: &str) -> Self {
        self.default_biome = biome.to_string();
        self
    }

    pub fn with_sky_light(mut self, sky_light: u8) -> Self {
        self.sky_light = sky_light.min(15);
        self
    }

    /// Places a block; air removes the entry.
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, state: BlockState) {
        if state.is_air() {
            self.blocks.remove(&(x, y, z));
        } else {
            self.blocks.insert((x, y, z), state);
        }
    }

    pub fn set_light(&mut self, x: i32, y: i32, z: i32, light: LightData) {
        self.light.insert((x, y, z), light);
    }

    /// Assigns a biome to a whole column.
    pub fn set_biome(&mut self, x: i32, z: i32, biome: &str) {
        self.biomes.insert((x, z), biome.to_string());
    }

    pub fn fill(&mut self, min: (i32, i32, i32), max: (i32, i32, i32), state: &BlockState) {
        for x in min.0..=max.0 {
            for y in min.1..=max.1 {
                for z in min.2..=max.2 {
                    self.set_block(x, y, z, state.clone());
                }
            }
        }
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }
}

impl World for VoxelWorld {
    fn block_state_at(&self, x: i32, y: i32, z: i32) -> BlockState {
        self.blocks
            .get(&(x, y, z))
            .cloned()
            .unwrap_or_else(BlockState::air)
    }

    fn light_data_at(&self, x: i32, y: i32, z: i32) -> LightData {
        self.light
            .get(&(x, y, z))
            .copied()
            .unwrap_or(self.default_light)
    }

    fn biome_id_at(&self, x: i32, _y: i32, z: i32) -> &str {
        self.biomes
            .get(&(x, z))
            .map_or(self.default_biome.as_str(), String::as_str)
    }

    fn sky_light(&self) -> u8 {
        self.sky_light
    }

    fn min_y(&self) -> i32 {
        self.min_y
    }

    fn max_y(&self) -> i32 {
        self.max_y
    }
}
