use tilemesh_blocks::{Direction, ModelElement, ModelFace, TransformedBlockModel};
use tilemesh_geom::{Color, Mat4, Vec2, Vec3, deg_sin_cos};
use tilemesh_world::{BlockColorCalculator, BlockNeighborhood, LightData};

use crate::ao;
use crate::arena::TileModelView;

const BLOCK_SCALE: f32 = 1.0 / 16.0;

// Corner indices per face, counter-clockwise seen from outside.
const FACE_CORNERS: [[usize; 4]; 6] = [
    [0, 2, 3, 1], // down
    [5, 7, 6, 4], // up
    [2, 0, 4, 6], // north
    [1, 3, 7, 5], // south
    [0, 1, 5, 4], // west
    [3, 2, 6, 7], // east
];

/// Deterministic per-column value in `[0, 1)`.
pub fn hash_to_float(x: i32, z: i32, seed: i64) -> f32 {
    let h = i64::from(x.wrapping_mul(73_428_767) ^ z.wrapping_mul(4_382_893))
        ^ seed.wrapping_mul(457);
    (h.wrapping_mul(h.wrapping_add(456_149)) & 0x00ff_ffff) as f32 / 0x0100_0000 as f32
}

#[inline]
fn rotated_offset(rotation: &Mat4, dx: i32, dy: i32, dz: i32) -> (i32, i32, i32) {
    rotation
        .transform_vector(Vec3::new(dx as f32, dy as f32, dz as f32))
        .round_i32()
}

/// Values of the block being built that stay fixed across its faces.
#[derive(Clone, Copy)]
struct BlockInfo {
    y: i32,
    light: LightData,
}

/// Turns one block's resolved model into triangles.
///
/// One builder is owned per render thread and reused across blocks; the
/// tint cache and running opacity are reset at the start of every build.
#[derive(Debug, Default)]
pub struct ResourceModelBuilder {
    colors: BlockColorCalculator,
    tint: Option<Color>,
    opacity: f32,
}

impl ResourceModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits the model of the neighborhood's center block into `view` and
    /// accumulates its representative map color into `color`.
    ///
    /// Triangles land in block-local unit space (0..1, before any tile
    /// translation). `color` is left transparent if no face points up.
    pub fn build(
        &mut self,
        block: &mut BlockNeighborhood<'_>,
        model: &TransformedBlockModel,
        view: &mut TileModelView<'_>,
        color: &mut Color,
    ) {
        self.tint = None;
        self.opacity = 0.0;

        let center = block.block();
        let (x, y, z) = center.position();
        let info = BlockInfo {
            y,
            light: center.light_data(),
        };
        let random_offset = center.properties().random_offset;

        view.mark_start();
        let model_start = view.start();

        for element in &model.model().elements {
            view.mark_start();
            self.build_element(block, model, element, info, view, color);
            view.transform(&element.rotation.scale(BLOCK_SCALE, BLOCK_SCALE, BLOCK_SCALE));
        }

        if color.a > 0.0 {
            color.flatten().straight();
            color.a = self.opacity;
        }

        view.reset_to(model_start);

        if model.has_rotation() {
            view.transform(
                &Mat4::IDENTITY
                    .translate(-0.5, -0.5, -0.5)
                    .then(model.rotation_matrix())
                    .translate(0.5, 0.5, 0.5),
            );
        }

        if random_offset {
            let dx = (hash_to_float(x, z, 123_984) - 0.5) * 0.75;
            let dz = (hash_to_float(x, z, 345_542) - 0.5) * 0.75;
            view.translate(dx, 0.0, dz);
        }
    }

    fn build_element(
        &mut self,
        block: &mut BlockNeighborhood<'_>,
        model: &TransformedBlockModel,
        element: &ModelElement,
        info: BlockInfo,
        view: &mut TileModelView<'_>,
        color: &mut Color,
    ) {
        let lo = element.from.min(element.to);
        let hi = element.from.max(element.to);
        let corners = [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ];

        for dir in Direction::ALL {
            let Some(face) = element.face(dir) else {
                continue;
            };
            let quad = FACE_CORNERS[dir.index()].map(|i| corners[i]);
            self.build_face(block, model, element, face, dir, quad, info, view, color);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn build_face(
        &mut self,
        block: &mut BlockNeighborhood<'_>,
        model: &TransformedBlockModel,
        element: &ModelElement,
        face: &ModelFace,
        dir: Direction,
        quad: [Vec3; 4],
        info: BlockInfo,
        view: &mut TileModelView<'_>,
        color: &mut Color,
    ) {
        let rotation = model.rotation_matrix();

        if let Some(cullface) = face.cullface {
            let (dx, dy, dz) = cullface.delta();
            let (rx, ry, rz) = rotated_offset(rotation, dx, dy, dz);
            if block.neighbor(rx, ry, rz).properties().culling {
                return;
            }
        }

        let (dx, dy, dz) = dir.delta();
        let (fx, fy, fz) = rotated_offset(rotation, dx, dy, dz);
        let light = info.light.max(block.neighbor(fx, fy, fz).light_data());

        let settings = block.block().settings();
        if info.y < settings.remove_caves_below_y {
            let cave_channel = if settings.cave_detection_uses_block_light {
                light.block
            } else {
                light.sky
            };
            if cave_channel == 0 {
                return;
            }
        }

        let tri1 = view.add(2);
        let tri2 = tri1 + 1;
        let tile = view.model();

        tile.set_positions(tri1, [quad[0], quad[1], quad[2]]);
        tile.set_positions(tri2, [quad[0], quad[2], quad[3]]);

        tile.set_material_index(tri1, face.texture.0);
        tile.set_material_index(tri2, face.texture.0);

        let uvs = face_uvs(face, dir, model);
        tile.set_uvs(tri1, [uvs[0], uvs[1], uvs[2]]);
        tile.set_uvs(tri2, [uvs[0], uvs[2], uvs[3]]);

        let tint = if face.tinted {
            let tint = match self.tint {
                Some(t) => t,
                None => {
                    let t = self.colors.block_color(block.block());
                    self.tint = Some(t);
                    t
                }
            };
            Some(tint)
        } else {
            None
        };
        let rgb = tint.unwrap_or(Color::WHITE);
        let tile = view.model();
        tile.set_color(tri1, rgb.r, rgb.g, rgb.b);
        tile.set_color(tri2, rgb.r, rgb.g, rgb.b);

        tile.set_blocklight(tri1, light.block);
        tile.set_blocklight(tri2, light.block);
        tile.set_sunlight(tri1, light.sky);
        tile.set_sunlight(tri2, light.sky);

        let aos = if model.model().ambient_occlusion {
            quad.map(|corner| {
                ao::estimate(corner, (dx, dy, dz), |ox, oy, oz| {
                    let (rx, ry, rz) = rotated_offset(rotation, ox, oy, oz);
                    block.neighbor(rx, ry, rz).properties().occluding
                })
            })
        } else {
            [1.0; 4]
        };
        let tile = view.model();
        tile.set_aos(tri1, [aos[0], aos[1], aos[2]]);
        tile.set_aos(tri2, [aos[0], aos[2], aos[3]]);

        // Only faces that end up pointing up feed the map color.
        let normal = rotation.transform_vector(element.rotation.transform_vector(dir.normal()));
        if normal.y > 0.0 {
            let pack = block.block().pack();
            let Some(texture) = pack.texture(face.texture) else {
                return;
            };
            let mut map_color = texture.color_premultiplied();
            if let Some(tint) = tint {
                map_color.multiply(&tint);
            }
            let ambient = settings.ambient_light;
            let combined = f32::from(light.sky.max(light.block)) / 15.0;
            let combined = (1.0 - ambient) * combined + ambient;
            map_color.r *= combined;
            map_color.g *= combined;
            map_color.b *= combined;

            self.opacity = self.opacity.max(map_color.a);
            color.add(&map_color);
        }
    }
}

/// Texture coordinates of a face's four corners, in the corner order of
/// the quad, with face rotation and UV lock applied.
fn face_uvs(face: &ModelFace, dir: Direction, model: &TransformedBlockModel) -> [Vec2; 4] {
    let [u0, v0, u1, v1] = face.uv.map(|c| c / 16.0);
    let raw = [
        Vec2::new(u0, v1),
        Vec2::new(u1, v1),
        Vec2::new(u1, v0),
        Vec2::new(u0, v0),
    ];
    let steps = face.rotation.div_euclid(90).rem_euclid(4) as usize;
    let mut uvs: [Vec2; 4] = std::array::from_fn(|i| raw[(steps + i) % 4]);

    let uv_rotation = match model.rotation() {
        Some(rot) if model.is_uv_lock() => {
            let d = dir.normal();
            let (x_sin, x_cos) = deg_sin_cos(rot.x);
            rot.y * (d.y * x_cos + d.z * x_sin) + rot.x * (1.0 - d.y)
        }
        _ => 0.0,
    };

    if uv_rotation != 0.0 {
        let (sin, cos) = deg_sin_cos(uv_rotation);
        for uv in &mut uvs {
            *uv = uv.rotate_about(0.5, 0.5, cos, sin);
        }
    }
    uvs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_matches_reference_values() {
        // 32-bit wrapping products, widened before the 64-bit seed mix.
        let h = hash_to_float(0, 0, 0);
        assert_eq!(h, 0.0);
        let scale = 16_777_216.0;
        assert_eq!(hash_to_float(1, 2, 123_984), 8_138_674.0 / scale);
        assert_eq!(hash_to_float(-5, 77, 345_542), 2_439_238.0 / scale);
        assert_eq!(hash_to_float(100, -100, 123_984), 2_049_824.0 / scale);
        for (x, z) in [(1, 2), (-5, 77), (i32::MAX, i32::MIN)] {
            let v = hash_to_float(x, z, 123_984);
            assert!((0.0..1.0).contains(&v));
            assert_eq!(v, hash_to_float(x, z, 123_984));
        }
    }

    #[test]
    fn face_rotation_shifts_corner_assignment() {
        let face = ModelFace {
            texture: tilemesh_blocks::TextureId(0),
            uv: [0.0, 0.0, 16.0, 16.0],
            rotation: 90,
            tinted: false,
            cullface: None,
        };
        let model = TransformedBlockModel::unrotated(std::sync::Arc::new(
            tilemesh_blocks::BlockModel {
                elements: Vec::new(),
                ambient_occlusion: true,
            },
        ));
        let uvs = face_uvs(&face, Direction::Up, &model);
        assert_eq!(uvs[0], Vec2::new(1.0, 1.0));
        assert_eq!(uvs[3], Vec2::new(0.0, 1.0));

        let face = ModelFace { rotation: -90, ..face };
        let uvs = face_uvs(&face, Direction::Up, &model);
        assert_eq!(uvs[0], Vec2::new(0.0, 0.0));
    }
}
