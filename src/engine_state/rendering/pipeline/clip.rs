//! Triangle-versus-plane clipping.
//!
//! A plane keeps the half-space its normal points into. Clipping a triangle against it
//! yields zero, one or two triangles. Textured surfaces have their UVs interpolated
//! with the same parameter as the positions.

use crate::engine_state::math::Vec3;
use crate::engine_state::rendering::triangle::{Surface, Triangle};

/// A clipping plane given by a point on it and its inward normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub point: Vec3,
    /// Unit normal pointing into the kept half-space
    pub normal: Vec3,
}

impl Plane {
    /// Creates a plane. `normal` is normalized.
    pub fn new(point: Vec3, normal: Vec3) -> Self {
        Plane {
            point,
            normal: normal.normalize(),
        }
    }

    /// Signed distance of `p` from the plane; `>= 0` is inside.
    pub fn signed_distance(&self, p: Vec3) -> f32 {
        self.normal.dot(p) - self.normal.dot(self.point)
    }

    /// Where the segment `start → end` crosses the plane, with the interpolation
    /// parameter `t` such that the point is `start + t·(end − start)`.
    pub fn intersect(&self, start: Vec3, end: Vec3) -> (Vec3, f32) {
        let plane_d = -self.normal.dot(self.point);
        let ad = start.dot(self.normal);
        let bd = end.dot(self.normal);
        let t = (-plane_d - ad) / (bd - ad);
        (start.lerp(end, t), t)
    }
}

/// The outcome of clipping one triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClipResult {
    /// Entirely outside
    Discarded,
    /// Inside, or one vertex inside
    One(Triangle),
    /// Two vertices inside; the remaining quad split in two
    Two(Triangle, Triangle),
}

impl ClipResult {
    pub fn len(&self) -> usize {
        match self {
            ClipResult::Discarded => 0,
            ClipResult::One(_) => 1,
            ClipResult::Two(_, _) => 2,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ClipResult::Discarded)
    }
}

impl IntoIterator for ClipResult {
    type Item = Triangle;
    type IntoIter = std::iter::Flatten<std::array::IntoIter<Option<Triangle>, 2>>;

    fn into_iter(self) -> Self::IntoIter {
        match self {
            ClipResult::Discarded => [None, None],
            ClipResult::One(a) => [Some(a), None],
            ClipResult::Two(a, b) => [Some(a), Some(b)],
        }
        .into_iter()
        .flatten()
    }
}

fn lerp_uv(a: [f32; 2], b: [f32; 2], t: f32) -> [f32; 2] {
    [a[0] + (b[0] - a[0]) * t, a[1] + (b[1] - a[1]) * t]
}

fn with_uvs(surface: Surface, uvs: [[f32; 2]; 3]) -> Surface {
    match surface {
        Surface::Flat { .. } => surface,
        Surface::Textured { brightness, .. } => Surface::Textured { uvs, brightness },
    }
}

/// Clips `tri` against `plane`.
///
/// - no vertex inside: [`ClipResult::Discarded`]
/// - all inside: the triangle unchanged
/// - one inside: the inside vertex plus the two edge intersections
/// - two inside: two triangles covering the remaining quad
pub fn clip_against_plane(plane: &Plane, tri: &Triangle) -> ClipResult {
    let mut inside = [0usize; 3];
    let mut outside = [0usize; 3];
    let (mut inside_count, mut outside_count) = (0, 0);
    for (i, p) in tri.points.iter().enumerate() {
        if plane.signed_distance(*p) >= 0.0 {
            inside[inside_count] = i;
            inside_count += 1;
        } else {
            outside[outside_count] = i;
            outside_count += 1;
        }
    }

    let points = tri.points;
    let uvs = tri.surface.uvs();

    match inside_count {
        0 => ClipResult::Discarded,
        3 => ClipResult::One(*tri),
        1 => {
            let (a, b, c) = (inside[0], outside[0], outside[1]);
            let (pb, tb) = plane.intersect(points[a], points[b]);
            let (pc, tc) = plane.intersect(points[a], points[c]);
            ClipResult::One(Triangle::new(
                [points[a], pb, pc],
                with_uvs(
                    tri.surface,
                    [uvs[a], lerp_uv(uvs[a], uvs[b], tb), lerp_uv(uvs[a], uvs[c], tc)],
                ),
            ))
        }
        _ => {
            let (a, b, out) = (inside[0], inside[1], outside[0]);
            let (pa, ta) = plane.intersect(points[a], points[out]);
            let uv_a = lerp_uv(uvs[a], uvs[out], ta);
            let first = Triangle::new(
                [points[a], points[b], pa],
                with_uvs(tri.surface, [uvs[a], uvs[b], uv_a]),
            );

            let (pb, tb) = plane.intersect(points[b], points[out]);
            let second = Triangle::new(
                [points[b], pa, pb],
                with_uvs(tri.surface, [uvs[b], uv_a, lerp_uv(uvs[b], uvs[out], tb)]),
            );
            ClipResult::Two(first, second)
        }
    }
}
