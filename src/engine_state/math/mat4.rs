//! Row-vector 4x4 matrix.
//!
//! Vectors are treated as rows and multiplied on the left: `v' = v · M`. Translation lives
//! in row 3 and the perspective divisor is produced through column 3. Composition reads
//! left to right, so `a * b` applies `a` first.

use std::f32::consts::PI;
use std::ops::Mul;

use super::Vec3;

/// A 4x4 matrix stored as `m[row][column]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Mat4 {
    /// Matrix elements, row-major
    pub m: [[f32; 4]; 4],
}

impl Mat4 {
    /// The identity matrix.
    pub fn identity() -> Self {
        let mut matrix = Mat4::default();
        for i in 0..4 {
            matrix.m[i][i] = 1.0;
        }
        matrix
    }

    /// Rotation around the X axis.
    pub fn rotation_x(angle_rad: f32) -> Self {
        let (sin, cos) = angle_rad.sin_cos();
        let mut matrix = Mat4::default();
        matrix.m[0][0] = 1.0;
        matrix.m[1][1] = cos;
        matrix.m[1][2] = sin;
        matrix.m[2][1] = -sin;
        matrix.m[2][2] = cos;
        matrix.m[3][3] = 1.0;
        matrix
    }

    /// Rotation around the Y axis.
    pub fn rotation_y(angle_rad: f32) -> Self {
        let (sin, cos) = angle_rad.sin_cos();
        let mut matrix = Mat4::default();
        matrix.m[0][0] = cos;
        matrix.m[0][2] = sin;
        matrix.m[2][0] = -sin;
        matrix.m[1][1] = 1.0;
        matrix.m[2][2] = cos;
        matrix.m[3][3] = 1.0;
        matrix
    }

    /// Rotation around the Z axis.
    pub fn rotation_z(angle_rad: f32) -> Self {
        let (sin, cos) = angle_rad.sin_cos();
        let mut matrix = Mat4::default();
        matrix.m[0][0] = cos;
        matrix.m[0][1] = sin;
        matrix.m[1][0] = -sin;
        matrix.m[1][1] = cos;
        matrix.m[2][2] = 1.0;
        matrix.m[3][3] = 1.0;
        matrix
    }

    /// Translation by `(x, y, z)`.
    pub fn translation(x: f32, y: f32, z: f32) -> Self {
        let mut matrix = Mat4::identity();
        matrix.m[3][0] = x;
        matrix.m[3][1] = y;
        matrix.m[3][2] = z;
        matrix
    }

    /// Perspective projection.
    ///
    /// `aspect` is `height / width` and scales the x row. View-space depth is mapped so
    /// that `near` lands on `0` and `far` on `1` after the divide, and the view-space `z`
    /// is copied into `w`. The caller is responsible for the divide ([`Vec3::homogenize`]).
    pub fn perspective(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        let focal = 1.0 / (fov_degrees * 0.5 / 180.0 * PI).tan();
        let mut matrix = Mat4::default();
        matrix.m[0][0] = aspect * focal;
        matrix.m[1][1] = focal;
        matrix.m[2][2] = far / (far - near);
        matrix.m[3][2] = (-far * near) / (far - near);
        matrix.m[2][3] = 1.0;
        matrix.m[3][3] = 0.0;
        matrix
    }

    /// Builds the "point at" matrix that places an object at `position` facing `target`.
    ///
    /// Rows are right, up, forward and position. The inverse of this matrix is a view
    /// matrix; see [`Mat4::fast_inverse`].
    pub fn look_at(position: Vec3, target: Vec3, up: Vec3) -> Self {
        let forward = (target - position).normalize();

        // Gram-Schmidt: strip the forward component out of up
        let projected = forward * up.dot(forward);
        let new_up = (up - projected).normalize();
        let right = new_up.cross(forward);

        Mat4 {
            m: [
                [right.x, right.y, right.z, 0.0],
                [new_up.x, new_up.y, new_up.z, 0.0],
                [forward.x, forward.y, forward.z, 0.0],
                [position.x, position.y, position.z, 1.0],
            ],
        }
    }

    /// Multiplies the row vector `v` by this matrix.
    pub fn transform(&self, v: Vec3) -> Vec3 {
        let m = &self.m;
        Vec3::with_w(
            v.x * m[0][0] + v.y * m[1][0] + v.z * m[2][0] + v.w * m[3][0],
            v.x * m[0][1] + v.y * m[1][1] + v.z * m[2][1] + v.w * m[3][1],
            v.x * m[0][2] + v.y * m[1][2] + v.z * m[2][2] + v.w * m[3][2],
            v.x * m[0][3] + v.y * m[1][3] + v.z * m[2][3] + v.w * m[3][3],
        )
    }

    /// Inverts a rigid transform.
    ///
    /// Only valid when the matrix is a pure rotation followed by a translation (no scale,
    /// shear or projection). The rotation block is transposed and the translation row is
    /// recomputed as `-(t · Rᵀ)`. Any other matrix silently produces a wrong result.
    pub fn fast_inverse(&self) -> Self {
        let m = &self.m;
        let mut inv = Mat4::default();
        for r in 0..3 {
            for c in 0..3 {
                inv.m[r][c] = m[c][r];
            }
        }
        for c in 0..3 {
            inv.m[3][c] =
                -(m[3][0] * inv.m[0][c] + m[3][1] * inv.m[1][c] + m[3][2] * inv.m[2][c]);
        }
        inv.m[3][3] = 1.0;
        inv
    }
}

impl Mul for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Mat4 {
        let mut matrix = Mat4::default();
        for r in 0..4 {
            for c in 0..4 {
                matrix.m[r][c] = (0..4).map(|k| self.m[r][k] * rhs.m[k][c]).sum();
            }
        }
        matrix
    }
}

impl Mul<Mat4> for Vec3 {
    type Output = Vec3;

    fn mul(self, rhs: Mat4) -> Vec3 {
        rhs.transform(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec_eq(a: Vec3, b: Vec3) {
        assert!(
            (a.x - b.x).abs() < 1e-5 && (a.y - b.y).abs() < 1e-5 && (a.z - b.z).abs() < 1e-5,
            "{a:?} != {b:?}"
        );
    }

    #[test]
    fn translation_moves_points_but_not_directions() {
        let t = Mat4::translation(1.0, 2.0, 3.0);
        assert_vec_eq(Vec3::new(1.0, 1.0, 1.0) * t, Vec3::new(2.0, 3.0, 4.0));
        let direction = Vec3::with_w(1.0, 1.0, 1.0, 0.0) * t;
        assert_vec_eq(direction, Vec3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn rotation_y_quarter_turn() {
        let r = Mat4::rotation_y(std::f32::consts::FRAC_PI_2);
        assert_vec_eq(Vec3::new(0.0, 0.0, 1.0) * r, Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn multiplication_composes_left_to_right() {
        let a = Mat4::translation(1.0, 0.0, 0.0);
        let b = Mat4::rotation_z(std::f32::consts::FRAC_PI_2);
        let p = Vec3::new(1.0, 0.0, 0.0);
        assert_vec_eq(p * (a * b), (p * a) * b);
    }

    #[test]
    fn fast_inverse_undoes_rigid_transform() {
        let rigid = Mat4::rotation_x(0.3) * Mat4::rotation_y(1.1) * Mat4::translation(4.0, -2.0, 7.0);
        let p = Vec3::new(0.5, -3.0, 2.0);
        assert_vec_eq((p * rigid) * rigid.fast_inverse(), p);
        let product = rigid * rigid.fast_inverse();
        for r in 0..4 {
            for c in 0..4 {
                let expected = if r == c { 1.0 } else { 0.0 };
                assert!((product.m[r][c] - expected).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn look_at_rows_form_orthonormal_basis() {
        let m = Mat4::look_at(Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 2.0, 7.0), Vec3::UP);
        let right = Vec3::new(m.m[0][0], m.m[0][1], m.m[0][2]);
        let up = Vec3::new(m.m[1][0], m.m[1][1], m.m[1][2]);
        let forward = Vec3::new(m.m[2][0], m.m[2][1], m.m[2][2]);
        assert!(right.dot(up).abs() < 1e-5);
        assert!(up.dot(forward).abs() < 1e-5);
        assert!((forward.length() - 1.0).abs() < 1e-5);
        assert_vec_eq(forward, Vec3::new(0.6, 0.0, 0.8));
    }

    #[test]
    fn perspective_puts_depth_in_w() {
        let p = Mat4::perspective(90.0, 1.0, 0.1, 1000.0);
        let near = Vec3::new(0.0, 0.0, 0.1) * p;
        let far = Vec3::new(0.0, 0.0, 1000.0) * p;
        assert!((near.w - 0.1).abs() < 1e-6);
        assert!(near.homogenize().z.abs() < 1e-4);
        assert!((far.homogenize().z - 1.0).abs() < 1e-4);
    }
}
