use std::sync::Arc;

use tilemesh_geom::{Mat4, Vec3};

use crate::direction::Direction;
use crate::types::TextureId;

#[derive(Clone, Debug, PartialEq)]
pub struct ModelFace {
    pub texture: TextureId,
    /// `[u0, v0, u1, v1]` in 0..16 texture units.
    pub uv: [f32; 4],
    /// Texture rotation in degrees, a multiple of 90.
    pub rotation: i32,
    pub tinted: bool,
    pub cullface: Option<Direction>,
}

/// One cuboid of a block model, in 0..16 block-local units.
#[derive(Clone, Debug)]
pub struct ModelElement {
    pub from: Vec3,
    pub to: Vec3,
    /// Precomputed element rotation (about its declared origin).
    pub rotation: Mat4,
    pub faces: [Option<ModelFace>; 6],
}

impl ModelElement {
    pub fn new(from: Vec3, to: Vec3) -> Self {
        Self {
            from,
            to,
            rotation: Mat4::IDENTITY,
            faces: Default::default(),
        }
    }

    #[inline]
    pub fn face(&self, dir: Direction) -> Option<&ModelFace> {
        self.faces[dir.index()].as_ref()
    }

    pub fn with_face(mut self, dir: Direction, face: ModelFace) -> Self {
        self.faces[dir.index()] = Some(face);
        self
    }

    /// The UV rectangle a face gets when the model does not declare one.
    pub fn default_uv(&self, dir: Direction) -> [f32; 4] {
        let (f, t) = (self.from, self.to);
        match dir {
            Direction::Down => [f.x, 16.0 - t.z, t.x, 16.0 - f.z],
            Direction::Up => [f.x, f.z, t.x, t.z],
            Direction::North => [16.0 - t.x, 16.0 - t.y, 16.0 - f.x, 16.0 - f.y],
            Direction::South => [f.x, 16.0 - t.y, t.x, 16.0 - f.y],
            Direction::West => [f.z, 16.0 - t.y, t.z, 16.0 - f.y],
            Direction::East => [16.0 - t.z, 16.0 - t.y, 16.0 - f.z, 16.0 - f.y],
        }
    }
}

#[derive(Clone, Debug)]
pub struct BlockModel {
    pub elements: Vec<ModelElement>,
    pub ambient_occlusion: bool,
}

/// Pitch (`x`) and yaw (`y`) of a block-state variant, in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VariantRotation {
    pub x: f32,
    pub y: f32,
}

/// A block model as placed by one block-state variant.
#[derive(Clone, Debug)]
pub struct TransformedBlockModel {
    model: Arc<BlockModel>,
    rotation: Option<VariantRotation>,
    rotation_matrix: Mat4,
    uv_lock: bool,
}

impl TransformedBlockModel {
    pub fn new(model: Arc<BlockModel>, x: f32, y: f32, uv_lock: bool) -> Self {
        let rotation = (x != 0.0 || y != 0.0).then_some(VariantRotation { x, y });
        let rotation_matrix = match rotation {
            Some(r) => Mat4::from_euler_deg(-r.x, -r.y, 0.0),
            None => Mat4::IDENTITY,
        };
        Self {
            model,
            rotation,
            rotation_matrix,
            uv_lock,
        }
    }

    pub fn unrotated(model: Arc<BlockModel>) -> Self {
        Self::new(model, 0.0, 0.0, false)
    }

    #[inline]
    pub fn model(&self) -> &BlockModel {
        &self.model
    }

    #[inline]
    pub fn has_rotation(&self) -> bool {
        self.rotation.is_some()
    }

    #[inline]
    pub fn rotation(&self) -> Option<VariantRotation> {
        self.rotation
    }

    /// Identity when the variant is not rotated.
    #[inline]
    pub fn rotation_matrix(&self) -> &Mat4 {
        &self.rotation_matrix
    }

    #[inline]
    pub fn is_uv_lock(&self) -> bool {
        self.uv_lock
    }
}
