//! Per-vertex ambient occlusion from the occluding flags of the blocks
//! around a corner.

use tilemesh_geom::Vec3;

#[inline]
fn edge_sign(v: f32) -> i32 {
    if v == 16.0 {
        1
    } else if v == 0.0 {
        -1
    } else {
        0
    }
}

/// Occlusion factor in `[0, 1]` for a vertex of a face.
///
/// `vertex` is in block-local 0..16 units and `dir` is the face normal.
/// Only vertices on the block boundary look outward: each axis where the
/// vertex sits on a block edge contributes a step toward that neighbor.
/// `occluding` receives offsets relative to the block and is asked about
/// at most four neighbors; three or more occluders give the darkest value.
pub fn estimate(
    vertex: Vec3,
    dir: (i32, i32, i32),
    mut occluding: impl FnMut(i32, i32, i32) -> bool,
) -> f32 {
    let (x, y, z) = (edge_sign(vertex.x), edge_sign(vertex.y), edge_sign(vertex.z));
    let (dx, dy, dz) = dir;

    let mut occluders = 0;
    if x * dx + y * dy > 0 && occluding(x, y, 0) {
        occluders += 1;
    }
    if x * dx + z * dz > 0 && occluding(x, 0, z) {
        occluders += 1;
    }
    if y * dy + z * dz > 0 && occluding(0, y, z) {
        occluders += 1;
    }
    if x * dx + y * dy + z * dz > 0 && occluding(x, y, z) {
        occluders += 1;
    }
    let occluders = occluders.min(3);
    (1.0 - occluders as f32 * 0.25).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mid_edge_vertex_counts_the_facing_neighbor_per_test() {
        let mut asked = 0;
        let ao = estimate(Vec3::new(8.0, 8.0, 16.0), (0, 0, 1), |_, _, _| {
            asked += 1;
            true
        });
        assert_eq!(asked, 3);
        assert_eq!(ao, 0.25);
    }

    #[test]
    fn vertex_off_the_block_edge_asks_nothing() {
        let mut asked = 0;
        let ao = estimate(Vec3::new(8.0, 12.0, 8.0), (0, 1, 0), |_, _, _| {
            asked += 1;
            true
        });
        assert_eq!(asked, 0);
        assert_eq!(ao, 1.0);
    }
}
