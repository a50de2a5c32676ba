use proptest::prelude::*;
use tilemesh_geom::{Mat4, Vec3};
use tilemesh_mesh_cpu::ao;
use tilemesh_mesh_cpu::{HiresTileModel, TileModelView};

fn about_center(deg: f32) -> Mat4 {
    Mat4::IDENTITY
        .translate(-0.5, -0.5, -0.5)
        .then(&Mat4::from_rotation_y(deg))
        .translate(0.5, 0.5, 0.5)
}

fn coord() -> impl Strategy<Value = f32> {
    (0u8..=16).prop_map(|v| v as f32 / 16.0)
}

fn vertex() -> impl Strategy<Value = Vec3> {
    (coord(), coord(), coord()).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

fn edge_coord() -> impl Strategy<Value = f32> {
    prop_oneof![Just(0.0f32), Just(16.0f32), (1u8..16).prop_map(f32::from)]
}

#[test]
fn transforms_only_touch_the_marked_range() {
    let mut tile = HiresTileModel::new();
    let first = tile.add(1);
    tile.set_positions(first, [Vec3::ZERO, Vec3::ONE, Vec3::UP]);

    let mut view = TileModelView::new(&mut tile);
    let second = view.add(2);
    assert_eq!((view.start(), view.end(), view.size()), (1, 3, 2));
    view.model().set_positions(second, [Vec3::ZERO; 3]);
    view.translate(1.0, 2.0, 3.0);
    view.reset_to(0).translate(0.0, 0.0, 1.0);

    assert_eq!(tile.positions(0)[1], Vec3::new(1.0, 1.0, 2.0));
    assert_eq!(tile.positions(1)[0], Vec3::new(1.0, 2.0, 4.0));
    assert_eq!(tile.positions(2)[2], Vec3::new(1.0, 2.0, 4.0));
}

#[test]
fn new_triangles_default_to_white_and_unoccluded() {
    let mut tile = HiresTileModel::new();
    tile.add(3);
    assert_eq!(tile.len(), 3);
    assert_eq!(tile.color(2), [1.0; 3]);
    assert_eq!(tile.aos(1), [1.0; 3]);
    assert_eq!((tile.sunlight(0), tile.blocklight(0)), (0, 0));
    tile.clear();
    assert!(tile.is_empty());
    assert_eq!(tile.add(1), 0);
}

proptest! {
    #[test]
    fn half_turn_and_inverse_restore_positions(
        tris in proptest::collection::vec([vertex(), vertex(), vertex()], 1..8)
    ) {
        let mut tile = HiresTileModel::new();
        for t in &tris {
            let i = tile.add(1);
            tile.set_positions(i, *t);
        }
        let mut view = TileModelView::new(&mut tile);
        view.reset_to(0);
        view.transform(&about_center(180.0));
        view.transform(&about_center(-180.0));
        for (i, t) in tris.iter().enumerate() {
            for (a, b) in tile.positions(i).iter().zip(t) {
                prop_assert!((a.x - b.x).abs() < 1e-6);
                prop_assert!((a.y - b.y).abs() < 1e-6);
                prop_assert!((a.z - b.z).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn ao_stays_in_unit_range(
        x in edge_coord(), y in edge_coord(), z in edge_coord(),
        dir in 0usize..6,
        mask in any::<u32>(),
    ) {
        let dirs = [(0, -1, 0), (0, 1, 0), (0, 0, -1), (0, 0, 1), (-1, 0, 0), (1, 0, 0)];
        let v = ao::estimate(Vec3::new(x, y, z), dirs[dir], |dx, dy, dz| {
            let bit = ((dx + 1) * 9 + (dy + 1) * 3 + (dz + 1)) as u32;
            mask & (1 << bit) != 0
        });
        prop_assert!((0.0..=1.0).contains(&v));
        prop_assert!(v >= 0.25);
    }

    #[test]
    fn ao_counts_three_occluders_at_a_corner(sx in prop::bool::ANY, sz in prop::bool::ANY) {
        let x = if sx { 16.0 } else { 0.0 };
        let z = if sz { 16.0 } else { 0.0 };
        let all = ao::estimate(Vec3::new(x, 16.0, z), (0, 1, 0), |_, _, _| true);
        let none = ao::estimate(Vec3::new(x, 16.0, z), (0, 1, 0), |_, _, _| false);
        prop_assert_eq!(all, 0.25);
        prop_assert_eq!(none, 1.0);
    }
}
