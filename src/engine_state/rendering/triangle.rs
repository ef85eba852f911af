//! The triangle type consumed and produced by the geometry pipeline.

use crate::engine_state::math::Vec3;

/// What gets drawn on a triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Surface {
    /// A single color for the whole triangle.
    Flat {
        /// RGB in `[0, 1]`
        color: [f32; 3],
    },
    /// Atlas-textured voxel face.
    Textured {
        /// Per-vertex atlas UVs, in the same order as the points
        uvs: [[f32; 2]; 3],
        /// Face brightness multiplier
        brightness: f32,
    },
}

impl Surface {
    /// The per-triangle color handed to the presenter. Textured faces are tinted grey by
    /// their brightness.
    pub fn color(&self) -> [f32; 3] {
        match *self {
            Surface::Flat { color } => color,
            Surface::Textured { brightness, .. } => [brightness; 3],
        }
    }

    /// Per-vertex UVs, zeros for flat triangles.
    pub fn uvs(&self) -> [[f32; 2]; 3] {
        match *self {
            Surface::Flat { .. } => [[0.0; 2]; 3],
            Surface::Textured { uvs, .. } => uvs,
        }
    }
}

impl Default for Surface {
    fn default() -> Self {
        Surface::Flat { color: [1.0; 3] }
    }
}

/// Three points plus their surface.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Triangle {
    pub points: [Vec3; 3],
    pub surface: Surface,
}

impl Triangle {
    pub fn new(points: [Vec3; 3], surface: Surface) -> Self {
        Triangle { points, surface }
    }

    /// A flat colored triangle.
    pub fn flat(points: [Vec3; 3], color: [f32; 3]) -> Self {
        Triangle::new(points, Surface::Flat { color })
    }

    /// Unnormalized face normal, `(p1 - p0) × (p2 - p0)`.
    pub fn normal(&self) -> Vec3 {
        let [p0, p1, p2] = self.points;
        (p1 - p0).cross(p2 - p0)
    }

    /// Mean of the three z values, the painter's sort key.
    pub fn average_z(&self) -> f32 {
        (self.points[0].z + self.points[1].z + self.points[2].z) / 3.0
    }

    /// Area of the triangle projected onto the xy plane.
    pub fn screen_area(&self) -> f32 {
        self.normal().z.abs() * 0.5
    }
}
