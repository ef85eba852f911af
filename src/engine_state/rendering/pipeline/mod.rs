//! # Geometry Pipeline
//!
//! The software half of the renderer: it takes world-space triangles and produces a
//! flat, back-to-front ordered, screen-clipped triangle list ready for a single draw
//! call.
//!
//! ## Stages
//!
//! 1. World transform (identity unless set)
//! 2. Backface cull against the camera position; degenerate triangles are skipped
//! 3. Surface payload carried along
//! 4. View transform
//! 5. Near-plane clip in view space
//! 6. Projection, perspective divide, flip x and map to pixel coordinates
//! 7. Painter's sort by average depth, farthest first
//! 8. Screen-edge clip against top, bottom, left and right, worklist driven so pieces
//!    created at one edge are only tested against the following edges
//! 9. Pixels mapped back to `[-1, 1]` and flattened into the [`DrawList`]
//!
//! A frame may consist of several submissions (the world submits its opaque pass and
//! then its transparent pass); each submission is sorted on its own and appended to the
//! draw list in submission order.

use std::collections::VecDeque;

use log::debug;

use crate::engine_state::math::{Mat4, Vec3};
use crate::engine_state::rendering::triangle::Triangle;

pub mod clip;

use clip::{clip_against_plane, ClipResult, Plane};

/// Output surface size in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Viewport {
            width: width as f32,
            height: height as f32,
        }
    }

    /// `height / width`, the aspect convention of [`Mat4::perspective`].
    pub fn aspect(&self) -> f32 {
        self.height / self.width
    }

    /// The four screen-edge planes in pixel space: top, bottom, left, right.
    fn edge_planes(&self) -> [Plane; 4] {
        [
            Plane::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0)),
            Plane::new(
                Vec3::new(0.0, self.height - 1.0, 0.0),
                Vec3::new(0.0, -1.0, 0.0),
            ),
            Plane::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0)),
            Plane::new(
                Vec3::new(self.width - 1.0, 0.0, 0.0),
                Vec3::new(-1.0, 0.0, 0.0),
            ),
        ]
    }
}

/// Per-frame triangle counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    /// Triangles handed to the pipeline
    pub submitted: usize,
    /// Dropped by the backface test
    pub culled: usize,
    /// Dropped because their normal has zero length
    pub degenerate: usize,
    /// Dropped or split by the near plane
    pub near_clipped: usize,
    /// Triangles written to the draw list
    pub output: usize,
}

/// The flattened frame handed to a presenter.
///
/// - `positions`: 9 floats per triangle (x, y, z per vertex) in `[-1, 1]`, z is 0
/// - `colors`: one RGB per triangle
/// - `tex_coords`: 6 floats per triangle (u, v per vertex), zeros for flat triangles
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DrawList {
    pub positions: Vec<f32>,
    pub colors: Vec<[f32; 3]>,
    pub tex_coords: Vec<f32>,
}

impl DrawList {
    /// Drops all triangles while keeping the allocations.
    pub fn clear(&mut self) {
        self.positions.clear();
        self.colors.clear();
        self.tex_coords.clear();
    }

    pub fn triangle_count(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    fn push(&mut self, tri: &Triangle) {
        for p in tri.points {
            self.positions.extend_from_slice(&[p.x, p.y, 0.0]);
        }
        self.colors.push(tri.surface.color());
        for uv in tri.surface.uvs() {
            self.tex_coords.extend_from_slice(&uv);
        }
    }

    /// The screen-space triangle at `index` as three `[x, y]` points.
    pub fn triangle(&self, index: usize) -> Option<[[f32; 2]; 3]> {
        let base = index.checked_mul(9)?;
        let p = self.positions.get(base..base.checked_add(9)?)?;
        Some([[p[0], p[1]], [p[3], p[4]], [p[6], p[7]]])
    }
}

/// The explicit rendering context: projection, viewport and scratch buffers reused
/// across frames.
pub struct GeometryPipeline {
    projection: Mat4,
    world: Mat4,
    viewport: Viewport,
    near_plane: Plane,
    /// Triangles after projection, sorted before the screen clip
    projected: Vec<Triangle>,
    /// Screen clip worklist
    queue: VecDeque<Triangle>,
    draw_list: DrawList,
    stats: FrameStats,
}

impl GeometryPipeline {
    /// Creates a pipeline.
    ///
    /// # Arguments
    /// * `projection` - Projection matrix, usually [`Mat4::perspective`]
    /// * `viewport` - Output size in pixels
    /// * `near` - View-space depth of the near clipping plane
    pub fn new(projection: Mat4, viewport: Viewport, near: f32) -> Self {
        GeometryPipeline {
            projection,
            world: Mat4::identity(),
            viewport,
            near_plane: Plane::new(Vec3::new(0.0, 0.0, near), Vec3::new(0.0, 0.0, 1.0)),
            projected: Vec::new(),
            queue: VecDeque::new(),
            draw_list: DrawList::default(),
            stats: FrameStats::default(),
        }
    }

    pub fn set_projection(&mut self, projection: Mat4) {
        self.projection = projection;
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Sets the model-to-world transform applied before culling.
    pub fn set_world_matrix(&mut self, world: Mat4) {
        self.world = world;
    }

    /// Starts a new frame: clears the draw list and the counters.
    pub fn begin_frame(&mut self) {
        self.draw_list.clear();
        self.stats = FrameStats::default();
    }

    /// Logs the frame counters and returns the finished draw list.
    pub fn finish_frame(&self) -> &DrawList {
        debug!(
            "Frame: submitted {}, culled {}, degenerate {}, near clipped {}, output {}",
            self.stats.submitted,
            self.stats.culled,
            self.stats.degenerate,
            self.stats.near_clipped,
            self.stats.output
        );
        &self.draw_list
    }

    /// Convenience for a single-submission frame.
    pub fn render(&mut self, triangles: &[Triangle], camera_position: Vec3, view: &Mat4) -> &DrawList {
        self.begin_frame();
        self.submit(triangles, camera_position, view);
        self.finish_frame()
    }

    pub fn draw_list(&self) -> &DrawList {
        &self.draw_list
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Runs one batch of world-space triangles through every stage and appends the
    /// result to the draw list.
    ///
    /// # Arguments
    /// * `triangles` - World-space input
    /// * `camera_position` - Used by the backface test
    /// * `view` - World-to-view matrix
    pub fn submit(&mut self, triangles: &[Triangle], camera_position: Vec3, view: &Mat4) {
        self.stats.submitted += triangles.len();
        self.projected.clear();

        for tri in triangles {
            let points = tri.points.map(|p| self.world.transform(p));
            let Some(normal) = (points[1] - points[0]).cross(points[2] - points[0]).try_normalize()
            else {
                self.stats.degenerate += 1;
                continue;
            };
            if normal.dot(points[0] - camera_position) >= 0.0 {
                self.stats.culled += 1;
                continue;
            }

            let viewed = Triangle::new(points.map(|p| view.transform(p)), tri.surface);
            let clipped = clip_against_plane(&self.near_plane, &viewed);
            if clipped != ClipResult::One(viewed) {
                self.stats.near_clipped += 1;
            }
            for piece in clipped {
                let projected = self.project(&piece);
                self.projected.push(projected);
            }
        }

        self.projected
            .sort_by(|a, b| b.average_z().total_cmp(&a.average_z()));

        let planes = self.viewport.edge_planes();
        let half_width = self.viewport.width * 0.5;
        let half_height = self.viewport.height * 0.5;
        for tri in &self.projected {
            self.queue.clear();
            self.queue.push_back(*tri);
            let mut pending = 1;
            for plane in &planes {
                while pending > 0 {
                    pending -= 1;
                    let Some(candidate) = self.queue.pop_front() else {
                        break;
                    };
                    for piece in clip_against_plane(plane, &candidate) {
                        self.queue.push_back(piece);
                    }
                }
                pending = self.queue.len();
            }

            for screen in &self.queue {
                let mut normalized = *screen;
                for p in &mut normalized.points {
                    p.x = p.x / half_width - 1.0;
                    p.y = p.y / half_height - 1.0;
                }
                self.draw_list.push(&normalized);
                self.stats.output += 1;
            }
        }
    }

    /// Projects a view-space triangle into pixel coordinates.
    fn project(&self, tri: &Triangle) -> Triangle {
        let scale = Vec3::new(self.viewport.width * 0.5, self.viewport.height * 0.5, 1.0);
        let points = tri.points.map(|p| {
            let mut ndc = self.projection.transform(p).homogenize();
            ndc.x = -ndc.x;
            Vec3::new(
                (ndc.x + 1.0) * scale.x,
                (ndc.y + 1.0) * scale.y,
                ndc.z,
            )
        });
        Triangle::new(points, tri.surface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pipeline() -> GeometryPipeline {
        let viewport = Viewport::new(200, 100);
        GeometryPipeline::new(
            Mat4::perspective(90.0, viewport.aspect(), 0.1, 1000.0),
            viewport,
            0.1,
        )
    }

    /// A triangle in the plane `z = depth` facing a camera at the origin.
    fn facing(depth: f32, size: f32) -> Triangle {
        Triangle::flat(
            [
                Vec3::new(-size, -size, depth),
                Vec3::new(0.0, size, depth),
                Vec3::new(size, -size, depth),
            ],
            [1.0, 0.5, 0.25],
        )
    }

    #[test]
    fn visible_triangle_reaches_the_draw_list() {
        let mut pipeline = pipeline();
        let tri = facing(5.0, 1.0);
        assert!(tri.normal().dot(tri.points[0]) < 0.0);
        let list = pipeline.render(&[tri], Vec3::ZERO, &Mat4::identity());
        assert_eq!(list.triangle_count(), 1);
        assert_eq!(list.positions.len(), 9);
        assert_eq!(list.tex_coords.len(), 6);
        assert_eq!(list.colors[0], [1.0, 0.5, 0.25]);
        assert!(list.positions.iter().all(|v| (-1.0..=1.0).contains(v)));
        assert!(list.triangle(0).is_some());
        assert_eq!(list.triangle(1), None);
        assert_eq!(list.triangle(usize::MAX), None);
    }

    #[test]
    fn reversed_winding_is_culled() {
        let mut pipeline = pipeline();
        let mut tri = facing(5.0, 1.0);
        tri.points.swap(1, 2);
        assert!(pipeline.render(&[tri], Vec3::ZERO, &Mat4::identity()).is_empty());
        assert_eq!(pipeline.stats().culled, 1);
    }

    #[test]
    fn degenerate_triangles_are_counted_and_skipped() {
        let mut pipeline = pipeline();
        let p = Vec3::new(1.0, 1.0, 5.0);
        let tri = Triangle::flat([p, p, Vec3::new(2.0, 2.0, 5.0)], [1.0; 3]);
        pipeline.render(&[tri], Vec3::ZERO, &Mat4::identity());
        assert_eq!(pipeline.stats().degenerate, 1);
        assert_eq!(pipeline.stats().output, 0);
    }

    #[test]
    fn triangles_behind_the_camera_are_dropped() {
        let mut pipeline = pipeline();
        // Faces the camera but lies behind it.
        let mut tri = facing(-5.0, 1.0);
        tri.points.swap(1, 2);
        pipeline.render(&[tri], Vec3::ZERO, &Mat4::identity());
        assert_eq!(pipeline.stats().culled, 0);
        assert_eq!(pipeline.stats().near_clipped, 1);
        assert_eq!(pipeline.stats().output, 0);
    }

    #[test]
    fn oversized_triangle_is_clipped_to_the_screen() {
        let mut pipeline = pipeline();
        let list = pipeline.render(&[facing(2.0, 50.0)], Vec3::ZERO, &Mat4::identity());
        assert!(list.triangle_count() > 1);
        let lo = -1.0 - 1e-4;
        let hi = 1.0 + 1e-4;
        assert!(list.positions.iter().all(|v| (lo..=hi).contains(v)));
    }

    #[test]
    fn world_matrix_moves_triangles_before_culling() {
        let mut pipeline = pipeline();
        pipeline.set_world_matrix(Mat4::translation(0.0, 0.0, -10.0));
        let list = pipeline.render(&[facing(5.0, 1.0)], Vec3::ZERO, &Mat4::identity());
        assert!(list.is_empty());
        // Behind the camera its front side points away.
        assert_eq!(pipeline.stats().culled, 1);

        pipeline.set_world_matrix(Mat4::identity());
        let list = pipeline.render(&[facing(5.0, 1.0)], Vec3::ZERO, &Mat4::identity());
        assert_eq!(list.triangle_count(), 1);
    }

    #[test]
    fn submissions_append_in_order() {
        let mut pipeline = pipeline();
        pipeline.begin_frame();
        pipeline.submit(&[facing(5.0, 1.0)], Vec3::ZERO, &Mat4::identity());
        pipeline.submit(&[facing(3.0, 0.5)], Vec3::ZERO, &Mat4::identity());
        let list = pipeline.finish_frame();
        assert_eq!(list.triangle_count(), 2);
        assert_eq!(pipeline.stats().submitted, 2);
    }
}
