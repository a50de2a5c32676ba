use tilemesh_geom::{Mat4, Vec2, Vec3};

const POS: usize = 9;
const UV: usize = 6;
const COL: usize = 3;
const AO: usize = 3;

/// Append-only triangle storage for one hires tile.
///
/// Attributes are kept in flat per-triangle arrays: three positions, three
/// UVs, three AO factors, one RGB color, one material index and one
/// sky/block light pair. Newly added triangles are white, unlit and
/// unoccluded until written.
#[derive(Clone, Debug, Default)]
pub struct HiresTileModel {
    positions: Vec<f32>,
    uvs: Vec<f32>,
    colors: Vec<f32>,
    aos: Vec<f32>,
    materials: Vec<u32>,
    sunlight: Vec<u8>,
    blocklight: Vec<u8>,
    len: usize,
}

impl HiresTileModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(triangles: usize) -> Self {
        Self {
            positions: Vec::with_capacity(triangles * POS),
            uvs: Vec::with_capacity(triangles * UV),
            colors: Vec::with_capacity(triangles * COL),
            aos: Vec::with_capacity(triangles * AO),
            materials: Vec::with_capacity(triangles),
            sunlight: Vec::with_capacity(triangles),
            blocklight: Vec::with_capacity(triangles),
            len: 0,
        }
    }

    /// Number of triangles.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Appends `count` triangles and returns the index of the first.
    pub fn add(&mut self, count: usize) -> usize {
        let start = self.len;
        self.len += count;
        self.positions.resize(self.len * POS, 0.0);
        self.uvs.resize(self.len * UV, 0.0);
        self.colors.resize(self.len * COL, 1.0);
        self.aos.resize(self.len * AO, 1.0);
        self.materials.resize(self.len, 0);
        self.sunlight.resize(self.len, 0);
        self.blocklight.resize(self.len, 0);
        start
    }

    /// Drops all triangles, keeping the allocations.
    pub fn clear(&mut self) {
        self.positions.clear();
        self.uvs.clear();
        self.colors.clear();
        self.aos.clear();
        self.materials.clear();
        self.sunlight.clear();
        self.blocklight.clear();
        self.len = 0;
    }

    pub fn set_positions(&mut self, tri: usize, v: [Vec3; 3]) {
        let p = &mut self.positions[tri * POS..(tri + 1) * POS];
        for (dst, src) in p.chunks_exact_mut(3).zip(v) {
            dst.copy_from_slice(&[src.x, src.y, src.z]);
        }
    }

    pub fn positions(&self, tri: usize) -> [Vec3; 3] {
        let p = &self.positions[tri * POS..(tri + 1) * POS];
        [
            Vec3::new(p[0], p[1], p[2]),
            Vec3::new(p[3], p[4], p[5]),
            Vec3::new(p[6], p[7], p[8]),
        ]
    }

    pub fn set_uvs(&mut self, tri: usize, uv: [Vec2; 3]) {
        let t = &mut self.uvs[tri * UV..(tri + 1) * UV];
        for (dst, src) in t.chunks_exact_mut(2).zip(uv) {
            dst.copy_from_slice(&[src.x, src.y]);
        }
    }

    pub fn uvs(&self, tri: usize) -> [Vec2; 3] {
        let t = &self.uvs[tri * UV..(tri + 1) * UV];
        [
            Vec2::new(t[0], t[1]),
            Vec2::new(t[2], t[3]),
            Vec2::new(t[4], t[5]),
        ]
    }

    pub fn set_color(&mut self, tri: usize, r: f32, g: f32, b: f32) {
        self.colors[tri * COL..(tri + 1) * COL].copy_from_slice(&[r, g, b]);
    }

    pub fn color(&self, tri: usize) -> [f32; 3] {
        let c = &self.colors[tri * COL..(tri + 1) * COL];
        [c[0], c[1], c[2]]
    }

    pub fn set_aos(&mut self, tri: usize, ao: [f32; 3]) {
        self.aos[tri * AO..(tri + 1) * AO].copy_from_slice(&ao);
    }

    pub fn aos(&self, tri: usize) -> [f32; 3] {
        let a = &self.aos[tri * AO..(tri + 1) * AO];
        [a[0], a[1], a[2]]
    }

    #[inline]
    pub fn set_material_index(&mut self, tri: usize, material: u32) {
        self.materials[tri] = material;
    }

    #[inline]
    pub fn material_index(&self, tri: usize) -> u32 {
        self.materials[tri]
    }

    #[inline]
    pub fn set_sunlight(&mut self, tri: usize, light: u8) {
        self.sunlight[tri] = light;
    }

    #[inline]
    pub fn sunlight(&self, tri: usize) -> u8 {
        self.sunlight[tri]
    }

    #[inline]
    pub fn set_blocklight(&mut self, tri: usize, light: u8) {
        self.blocklight[tri] = light;
    }

    #[inline]
    pub fn blocklight(&self, tri: usize) -> u8 {
        self.blocklight[tri]
    }

    /// Applies `m` to every vertex of triangles `start..end`.
    pub fn transform_range(&mut self, start: usize, end: usize, m: &Mat4) {
        let end = end.min(self.len);
        if start >= end {
            return;
        }
        for v in self.positions[start * POS..end * POS].chunks_exact_mut(3) {
            let p = m.transform_point(Vec3::new(v[0], v[1], v[2]));
            v.copy_from_slice(&[p.x, p.y, p.z]);
        }
    }

    pub fn translate_range(&mut self, start: usize, end: usize, dx: f32, dy: f32, dz: f32) {
        let end = end.min(self.len);
        if start >= end {
            return;
        }
        for v in self.positions[start * POS..end * POS].chunks_exact_mut(3) {
            v[0] += dx;
            v[1] += dy;
            v[2] += dz;
        }
    }

    /// Flat vertex positions, nine floats per triangle.
    pub fn raw_positions(&self) -> &[f32] {
        &self.positions
    }

    /// Flat UVs, six floats per triangle.
    pub fn raw_uvs(&self) -> &[f32] {
        &self.uvs
    }

    /// Flat RGB colors, three floats per triangle.
    pub fn raw_colors(&self) -> &[f32] {
        &self.colors
    }

    /// Flat AO factors, three floats per triangle.
    pub fn raw_aos(&self) -> &[f32] {
        &self.aos
    }

    pub fn raw_materials(&self) -> &[u32] {
        &self.materials
    }

    pub fn raw_sunlight(&self) -> &[u8] {
        &self.sunlight
    }

    pub fn raw_blocklight(&self) -> &[u8] {
        &self.blocklight
    }
}

/// A window onto the triangles appended to a [`HiresTileModel`] since a
/// marked start. Transforms only touch `start..end`, where `end` is always
/// the current model length.
pub struct TileModelView<'m> {
    model: &'m mut HiresTileModel,
    start: usize,
}

impl<'m> TileModelView<'m> {
    /// A view starting at the current end of `model`.
    pub fn new(model: &'m mut HiresTileModel) -> Self {
        let start = model.len();
        Self { model, start }
    }

    /// Moves the start to the current end, so the view is empty again.
    pub fn mark_start(&mut self) -> &mut Self {
        self.start = self.model.len();
        self
    }

    /// Moves the start back to an earlier mark. Triangles are kept.
    pub fn reset_to(&mut self, start: usize) -> &mut Self {
        self.start = start.min(self.model.len());
        self
    }

    /// Appends triangles to the underlying model; returns the first index.
    #[inline]
    pub fn add(&mut self, count: usize) -> usize {
        self.model.add(count)
    }

    pub fn transform(&mut self, m: &Mat4) -> &mut Self {
        let end = self.model.len();
        self.model.transform_range(self.start, end, m);
        self
    }

    pub fn translate(&mut self, dx: f32, dy: f32, dz: f32) -> &mut Self {
        let end = self.model.len();
        self.model.translate_range(self.start, end, dx, dy, dz);
        self
    }

    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    #[inline]
    pub fn end(&self) -> usize {
        self.model.len()
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.model.len() - self.start
    }

    #[inline]
    pub fn model(&mut self) -> &mut HiresTileModel {
        self.model
    }
}
