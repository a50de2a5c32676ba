use tilemesh_blocks::{Biome, BlockProperties, BlockState, ResourcePack};

use crate::settings::RenderSettings;
use crate::{LightData, World};

/// A world position plus everything the mesh builder derives from it.
///
/// Each derived value is computed on first access and kept until the view
/// is moved to another position with [`ExtendedBlock::set`]. Outside the
/// render bounds with `render_edges` enabled the block reads as air lit by
/// the world's open-sky light, so faces along the edge are not culled.
pub struct ExtendedBlock<'a> {
    pack: &'a ResourcePack,
    settings: &'a RenderSettings,
    world: &'a dyn World,
    x: i32,
    y: i32,
    z: i32,
    block_state: Option<BlockState>,
    light_data: Option<LightData>,
    properties: Option<BlockProperties>,
    biome: Option<&'a Biome>,
    inside_render_bounds: Option<bool>,
}

impl<'a> ExtendedBlock<'a> {
    pub fn new(
        pack: &'a ResourcePack,
        settings: &'a RenderSettings,
        world: &'a dyn World,
        x: i32,
        y: i32,
        z: i32,
    ) -> Self {
        Self {
            pack,
            settings,
            world,
            x,
            y,
            z,
            block_state: None,
            light_data: None,
            properties: None,
            biome: None,
            inside_render_bounds: None,
        }
    }

    /// Moves the view, dropping cached values if the position changed.
    pub fn set(&mut self, x: i32, y: i32, z: i32) -> &mut Self {
        if (self.x, self.y, self.z) != (x, y, z) {
            self.x = x;
            self.y = y;
            self.z = z;
            self.reset();
        }
        self
    }

    pub fn reset(&mut self) {
        self.block_state = None;
        self.light_data = None;
        self.properties = None;
        self.biome = None;
        self.inside_render_bounds = None;
    }

    /// A fresh view of the block at the given offset.
    pub fn offset(&self, dx: i32, dy: i32, dz: i32) -> ExtendedBlock<'a> {
        ExtendedBlock::new(
            self.pack,
            self.settings,
            self.world,
            self.x + dx,
            self.y + dy,
            self.z + dz,
        )
    }

    #[inline]
    pub fn x(&self) -> i32 {
        self.x
    }
    #[inline]
    pub fn y(&self) -> i32 {
        self.y
    }
    #[inline]
    pub fn z(&self) -> i32 {
        self.z
    }
    #[inline]
    pub fn position(&self) -> (i32, i32, i32) {
        (self.x, self.y, self.z)
    }

    #[inline]
    pub fn pack(&self) -> &'a ResourcePack {
        self.pack
    }
    #[inline]
    pub fn settings(&self) -> &'a RenderSettings {
        self.settings
    }
    #[inline]
    pub fn world(&self) -> &'a dyn World {
        self.world
    }

    pub fn is_inside_render_bounds(&mut self) -> bool {
        let (x, y, z) = (self.x, self.y, self.z);
        let settings = self.settings;
        *self
            .inside_render_bounds
            .get_or_insert_with(|| settings.is_inside_render_bounds(x, y, z))
    }

    #[inline]
    fn is_render_edge(&mut self) -> bool {
        self.settings.render_edges && !self.is_inside_render_bounds()
    }

    pub fn block_state(&mut self) -> &BlockState {
        let edge = self.is_render_edge();
        let (world, x, y, z) = (self.world, self.x, self.y, self.z);
        self.block_state.get_or_insert_with(|| {
            if edge {
                BlockState::air()
            } else {
                world.block_state_at(x, y, z)
            }
        })
    }

    pub fn light_data(&mut self) -> LightData {
        if let Some(ld) = self.light_data {
            return ld;
        }
        let mut ld = self.world.light_data_at(self.x, self.y, self.z);
        if self.is_render_edge() {
            ld.sky = self.world.sky_light();
        }
        self.light_data = Some(ld);
        ld
    }

    pub fn properties(&mut self) -> BlockProperties {
        if let Some(p) = self.properties {
            return p;
        }
        let pack = self.pack;
        let p = pack.block_properties(self.block_state());
        self.properties = Some(p);
        p
    }

    /// The biome resolved from the world's raw biome id. Unknown ids
    /// resolve to the pack's default biome.
    pub fn biome(&mut self) -> &'a Biome {
        if let Some(b) = self.biome {
            return b;
        }
        let id = self.world.biome_id_at(self.x, self.y, self.z);
        let b = self.pack.biome(id);
        if b.id != id && b.id != id.trim_start_matches("minecraft:") {
            log::debug!("unknown biome {id:?} at {:?}, using {}", self.position(), b.id);
        }
        self.biome = Some(b);
        b
    }
}
