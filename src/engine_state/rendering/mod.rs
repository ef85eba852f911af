//! Rendering system for the voxel engine.
//!
//! This module turns the world's chunk meshes into a screen-space triangle list. It
//! contains the texture atlas, the chunk mesher, the software geometry pipeline and the
//! seam through which finished frames leave the crate.

use log::trace;
use web_time::Instant;

use super::camera_state::camera::Camera;
use super::voxels::world::{RenderPass, World};

pub mod atlas;
pub mod meshing;
pub mod pipeline;
pub mod presentation;
pub mod triangle;
mod vertex;

// Re-export commonly used types
pub use pipeline::{DrawList, FrameStats, GeometryPipeline, Viewport};
pub use triangle::{Surface, Triangle};
pub use vertex::Vertex;

/// Draws a [`World`] through a [`GeometryPipeline`].
///
/// Every frame the world is drawn in two submissions: the opaque streams of all chunks
/// in range, then the transparent streams. Each submission is depth sorted as a whole,
/// so ordering is correct across chunk boundaries.
pub struct MeshRenderer {
    /// The geometry pipeline and its scratch buffers
    pub pipeline: GeometryPipeline,
    /// Expanded chunk triangles, reused between passes and frames
    triangles: Vec<Triangle>,
}

impl MeshRenderer {
    pub fn new(pipeline: GeometryPipeline) -> Self {
        MeshRenderer {
            pipeline,
            triangles: Vec::new(),
        }
    }

    /// Renders one frame of `world` as seen by `camera`.
    ///
    /// # Returns
    /// The finished draw list, valid until the next frame.
    pub fn render(&mut self, world: &World, camera: &Camera) -> &DrawList {
        let start = Instant::now();
        let view = camera.view_matrix();
        let position = camera.position;

        self.pipeline.begin_frame();
        for pass in [RenderPass::Opaque, RenderPass::Transparent] {
            self.triangles.clear();
            world.append_pass_triangles(pass, &mut self.triangles);
            self.pipeline.submit(&self.triangles, position, &view);
        }
        trace!("Rendered frame in {:?}", start.elapsed());
        self.pipeline.finish_frame()
    }

    pub fn stats(&self) -> FrameStats {
        self.pipeline.stats()
    }
}
