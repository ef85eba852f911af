//! Vertex data structures for voxel meshes.
//!
//! Chunk meshes are stored as flat vertex (and optionally index) buffers so that a
//! presenter can upload them verbatim. The geometry pipeline expands them back into
//! [`Triangle`](super::triangle::Triangle)s before projecting.

use crate::engine_state::math::Vec3;

/// A vertex of a chunk mesh.
///
/// # Memory Layout
/// - Position: [f32; 3] (12 bytes)
/// - Texture Coordinates: [f32; 2] (8 bytes)
/// - Brightness: f32 (4 bytes)
///
/// Total size: 24 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position in world space
    pub position: [f32; 3],
    /// UV coordinates inside the texture atlas (normalized 0.0-1.0)
    pub tex_coords: [f32; 2],
    /// Face brightness multiplier
    pub brightness: f32,
}

impl Vertex {
    /// Creates a new vertex.
    ///
    /// # Arguments
    /// * `position` - World-space position
    /// * `tex_coords` - Atlas UV coordinates
    /// * `brightness` - Brightness of the face the vertex belongs to
    pub fn new(position: [f32; 3], tex_coords: [f32; 2], brightness: f32) -> Self {
        Vertex {
            position,
            tex_coords,
            brightness,
        }
    }

    /// The position as a homogeneous point.
    pub fn point(&self) -> Vec3 {
        Vec3::from(self.position)
    }
}
