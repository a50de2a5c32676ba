use tilemesh_blocks::{Biome, TintSource};
use tilemesh_geom::Color;

use crate::extended::ExtendedBlock;

/// Resolves the tint applied to a block's tinted faces.
///
/// Biome-driven tints are averaged over a square of columns around the
/// block, `pack.blend_radius()` blocks in each horizontal direction.
#[derive(Clone, Copy, Debug, Default)]
pub struct BlockColorCalculator;

impl BlockColorCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Straight, opaque tint for the block; white for untinted blocks.
    pub fn block_color(&self, block: &mut ExtendedBlock<'_>) -> Color {
        let pack = block.pack();
        match pack.tint_source(block.block_state()) {
            TintSource::None => Color::WHITE,
            TintSource::Fixed(c) => {
                let mut c = c;
                c.straight();
                c.a = 1.0;
                c
            }
            TintSource::Grass => self.blended(block, |b| b.grass_color),
            TintSource::Foliage => self.blended(block, |b| b.foliage_color),
            TintSource::Water => self.blended(block, |b| b.water_color),
        }
    }

    fn blended(&self, block: &mut ExtendedBlock<'_>, pick: impl Fn(&Biome) -> Color) -> Color {
        let radius = block.pack().blend_radius();
        if radius == 0 {
            let mut c = pick(block.biome());
            c.straight();
            return c;
        }
        let (x, y, z) = block.position();
        let world = block.world();
        let pack = block.pack();
        let mut acc = Color::TRANSPARENT;
        for dz in -radius..=radius {
            for dx in -radius..=radius {
                let biome = pack.biome(world.biome_id_at(x + dx, y, z + dz));
                acc.add(&pick(biome));
            }
        }
        acc.flatten();
        acc.premultiplied = false;
        acc
    }
}
