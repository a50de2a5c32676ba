use tilemesh_blocks::ResourcePack;

use crate::extended::ExtendedBlock;
use crate::settings::RenderSettings;
use crate::World;

const SIDE: i32 = 3;

#[inline]
fn slot(x: i32, y: i32, z: i32) -> usize {
    // Any three consecutive coordinates land in distinct residues, so the
    // 27 positions around the center never share a slot.
    (x.rem_euclid(SIDE) * SIDE * SIDE + y.rem_euclid(SIDE) * SIDE + z.rem_euclid(SIDE)) as usize
}

/// The block being built and its 26 direct neighbors, as cached views.
///
/// Views live in slots keyed by position modulo 3, so stepping the center
/// by one block keeps the cached state of the 18 views that overlap.
/// Offsets beyond one block go through a single scratch view.
pub struct BlockNeighborhood<'a> {
    views: Vec<ExtendedBlock<'a>>,
    far: ExtendedBlock<'a>,
    x: i32,
    y: i32,
    z: i32,
}

impl<'a> BlockNeighborhood<'a> {
    pub fn new(pack: &'a ResourcePack, settings: &'a RenderSettings, world: &'a dyn World) -> Self {
        // Seed each slot with a position that maps to it.
        let views = (0..27)
            .map(|i| {
                let (sx, sy, sz) = (i / 9, (i / 3) % 3, i % 3);
                ExtendedBlock::new(pack, settings, world, sx, sy, sz)
            })
            .collect();
        Self {
            views,
            far: ExtendedBlock::new(pack, settings, world, 0, 0, 0),
            x: 0,
            y: 0,
            z: 0,
        }
    }

    /// Recenters the neighborhood. Cached views are revalidated lazily.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, z: i32) -> &mut Self {
        self.x = x;
        self.y = y;
        self.z = z;
        self
    }

    #[inline]
    pub fn position(&self) -> (i32, i32, i32) {
        (self.x, self.y, self.z)
    }

    /// The view of the center block.
    #[inline]
    pub fn block(&mut self) -> &mut ExtendedBlock<'a> {
        self.neighbor(0, 0, 0)
    }

    /// The view of the block at the given offset from the center.
    pub fn neighbor(&mut self, dx: i32, dy: i32, dz: i32) -> &mut ExtendedBlock<'a> {
        let (x, y, z) = (self.x + dx, self.y + dy, self.z + dz);
        if dx.abs() > 1 || dy.abs() > 1 || dz.abs() > 1 {
            let far = &mut self.far;
            far.set(x, y, z);
            return far;
        }
        let view = &mut self.views[slot(x, y, z)];
        view.set(x, y, z);
        view
    }
}

#[cfg(test)]
mod tests {
    use super::slot;

    #[test]
    fn neighborhood_slots_are_distinct() {
        for c in [-7, -1, 0, 1, 5] {
            let mut seen = [false; 27];
            for dx in -1..=1 {
                for dy in -1..=1 {
                    for dz in -1..=1 {
                        let s = slot(c + dx, c * 3 + dy, 2 - c + dz);
                        assert!(!seen[s]);
                        seen[s] = true;
                    }
                }
            }
        }
    }
}
