use core::ops::Mul;

use crate::Vec3;

/// Sine and cosine of an angle in degrees. Quarter turns are exact so that
/// axis-aligned rotations keep integral neighbor offsets and clean normals.
#[inline]
pub fn deg_sin_cos(deg: f32) -> (f32, f32) {
    let quarter = deg / 90.0;
    if quarter.fract() == 0.0 {
        match (quarter as i64).rem_euclid(4) {
            0 => return (0.0, 1.0),
            1 => return (1.0, 0.0),
            2 => return (0.0, -1.0),
            _ => return (-1.0, 0.0),
        }
    }
    deg.to_radians().sin_cos()
}

/// Row-major affine 4x4 matrix acting on column vectors.
///
/// The builder-style methods (`translate`, `scale`, `then`) append an
/// operation that is applied *after* everything already in the matrix, so
/// `Mat4::IDENTITY.translate(-c).then(&r).translate(c)` rotates about `c`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mat4 {
    pub m: [[f32; 4]; 4],
}

impl Default for Mat4 {
    fn default() -> Self {
        Mat4::IDENTITY
    }
}

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4 {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub fn from_translation(x: f32, y: f32, z: f32) -> Mat4 {
        let mut out = Mat4::IDENTITY;
        out.m[0][3] = x;
        out.m[1][3] = y;
        out.m[2][3] = z;
        out
    }

    pub fn from_scale(x: f32, y: f32, z: f32) -> Mat4 {
        let mut out = Mat4::IDENTITY;
        out.m[0][0] = x;
        out.m[1][1] = y;
        out.m[2][2] = z;
        out
    }

    pub fn from_rotation_x(deg: f32) -> Mat4 {
        let (s, c) = deg_sin_cos(deg);
        let mut out = Mat4::IDENTITY;
        out.m[1][1] = c;
        out.m[1][2] = -s;
        out.m[2][1] = s;
        out.m[2][2] = c;
        out
    }

    pub fn from_rotation_y(deg: f32) -> Mat4 {
        let (s, c) = deg_sin_cos(deg);
        let mut out = Mat4::IDENTITY;
        out.m[0][0] = c;
        out.m[0][2] = s;
        out.m[2][0] = -s;
        out.m[2][2] = c;
        out
    }

    pub fn from_rotation_z(deg: f32) -> Mat4 {
        let (s, c) = deg_sin_cos(deg);
        let mut out = Mat4::IDENTITY;
        out.m[0][0] = c;
        out.m[0][1] = -s;
        out.m[1][0] = s;
        out.m[1][1] = c;
        out
    }

    /// Euler rotation in degrees: roll about Z first, then pitch about X,
    /// then yaw about Y.
    pub fn from_euler_deg(pitch: f32, yaw: f32, roll: f32) -> Mat4 {
        Mat4::from_rotation_y(yaw) * Mat4::from_rotation_x(pitch) * Mat4::from_rotation_z(roll)
    }

    /// Appends `other` (applied after `self`).
    #[inline]
    pub fn then(self, other: &Mat4) -> Mat4 {
        *other * self
    }

    #[inline]
    pub fn translate(self, x: f32, y: f32, z: f32) -> Mat4 {
        Mat4::from_translation(x, y, z) * self
    }

    #[inline]
    pub fn scale(self, x: f32, y: f32, z: f32) -> Mat4 {
        Mat4::from_scale(x, y, z) * self
    }

    #[inline]
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        let m = &self.m;
        Vec3::new(
            m[0][0] * p.x + m[0][1] * p.y + m[0][2] * p.z + m[0][3],
            m[1][0] * p.x + m[1][1] * p.y + m[1][2] * p.z + m[1][3],
            m[2][0] * p.x + m[2][1] * p.y + m[2][2] * p.z + m[2][3],
        )
    }

    /// Applies rotation and scale only, ignoring translation.
    #[inline]
    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        let m = &self.m;
        Vec3::new(
            m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
            m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
            m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
        )
    }

    pub fn is_identity(&self) -> bool {
        *self == Mat4::IDENTITY
    }
}

impl Mul for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Mat4 {
        let mut out = [[0.0f32; 4]; 4];
        for (r, row) in out.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = (0..4).map(|k| self.m[r][k] * rhs.m[k][c]).sum();
            }
        }
        Mat4 { m: out }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarter_turns_are_exact() {
        assert_eq!(deg_sin_cos(90.0), (1.0, 0.0));
        assert_eq!(deg_sin_cos(-90.0), (-1.0, 0.0));
        assert_eq!(deg_sin_cos(540.0), (0.0, -1.0));
    }

    #[test]
    fn rotate_about_center_keeps_center() {
        let m = Mat4::IDENTITY
            .translate(-0.5, -0.5, -0.5)
            .then(&Mat4::from_rotation_y(90.0))
            .translate(0.5, 0.5, 0.5);
        assert_eq!(m.transform_point(Vec3::splat(0.5)), Vec3::splat(0.5));
        // +X maps to -Z under a positive yaw
        assert_eq!(
            m.transform_point(Vec3::new(1.0, 0.5, 0.5)),
            Vec3::new(0.5, 0.5, 0.0)
        );
    }
}
