//! Homogeneous three component vector.

use std::ops::{Add, Div, Mul, Neg, Sub};

use cgmath::Point3;

/// A point or direction in homogeneous coordinates.
///
/// `w` defaults to `1.0` so that points pick up the translation row of a [`Mat4`](super::Mat4)
/// when multiplied. Arithmetic operators only touch `x`, `y` and `z` and always produce a
/// vector with `w == 1.0`; the perspective divide is the only place that reads `w`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec3 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
    /// Homogeneous component
    pub w: f32,
}

impl Default for Vec3 {
    fn default() -> Self {
        Vec3::ZERO
    }
}

impl Vec3 {
    /// The origin, with `w = 1`.
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);
    /// World up.
    pub const UP: Vec3 = Vec3::new(0.0, 1.0, 0.0);
    /// Canonical camera forward.
    pub const FORWARD: Vec3 = Vec3::new(0.0, 0.0, 1.0);

    /// Creates a vector with `w = 1`.
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Vec3 { x, y, z, w: 1.0 }
    }

    /// Creates a vector with an explicit homogeneous component.
    pub const fn with_w(x: f32, y: f32, z: f32, w: f32) -> Self {
        Vec3 { x, y, z, w }
    }

    /// Dot product of the `xyz` parts.
    pub fn dot(&self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product of the `xyz` parts.
    pub fn cross(&self, other: Vec3) -> Vec3 {
        Vec3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Euclidean length of the `xyz` part.
    pub fn length(&self) -> f32 {
        self.dot(*self).sqrt()
    }

    /// Returns the unit vector pointing the same way.
    ///
    /// The length must be non-zero. A zero vector yields NaN components; call sites that
    /// can see degenerate input should use [`Vec3::try_normalize`] instead.
    pub fn normalize(&self) -> Vec3 {
        *self / self.length()
    }

    /// Like [`Vec3::normalize`], but returns `None` for zero (or non-finite) lengths.
    pub fn try_normalize(&self) -> Option<Vec3> {
        let length = self.length();
        if length > f32::EPSILON && length.is_finite() {
            Some(*self / length)
        } else {
            None
        }
    }

    /// Linear interpolation of the `xyz` parts.
    pub fn lerp(&self, other: Vec3, t: f32) -> Vec3 {
        *self + (other - *self) * t
    }

    /// Divides `xyz` by `w` and resets `w` to one.
    ///
    /// Points with `w == 0` are returned untouched.
    pub fn homogenize(&self) -> Vec3 {
        if self.w == 0.0 {
            return Vec3::new(self.x, self.y, self.z);
        }
        *self / self.w
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;

    fn mul(self, k: f32) -> Vec3 {
        Vec3::new(self.x * k, self.y * k, self.z * k)
    }
}

impl Div<f32> for Vec3 {
    type Output = Vec3;

    fn div(self, k: f32) -> Vec3 {
        Vec3::new(self.x / k, self.y / k, self.z / k)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;

    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

impl From<Point3<i32>> for Vec3 {
    fn from(p: Point3<i32>) -> Self {
        Vec3::new(p.x as f32, p.y as f32, p.z as f32)
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from(v: [f32; 3]) -> Self {
        Vec3::new(v[0], v[1], v[2])
    }
}

impl From<Vec3> for [f32; 3] {
    fn from(v: Vec3) -> Self {
        [v.x, v.y, v.z]
    }
}
