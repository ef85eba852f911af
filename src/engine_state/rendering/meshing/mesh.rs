//! Mesh data structures for voxel chunks.
//!
//! A chunk mesh keeps opaque and transparent geometry apart so that the renderer can
//! draw every opaque face in the world before any transparent one. Buffers are cleared
//! and refilled on rebuild, keeping their allocations.

use serde::{Deserialize, Serialize};

use crate::engine_state::rendering::{
    triangle::{Surface, Triangle},
    vertex::Vertex,
};

/// Triangulation of one quad: `(0, 1, 2)` and `(0, 2, 3)`.
const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

/// How faces are laid out in a [`MeshBuffers`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaceLayout {
    /// Four vertices plus six indices per face.
    #[default]
    Indexed,
    /// Six vertices per face and no index buffer.
    Duplicated,
}

/// Vertex and index storage for one stream of a chunk mesh.
#[derive(Debug, Default, Clone)]
pub struct MeshBuffers {
    /// The vertex data
    pub vertices: Vec<Vertex>,
    /// The index data, empty for [`FaceLayout::Duplicated`]
    pub indices: Vec<u32>,
}

impl MeshBuffers {
    /// Drops all geometry while keeping the allocations.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Adds a quad given its corners in counter-clockwise order.
    ///
    /// # Arguments
    /// * `corners` - The four face vertices
    /// * `layout` - Whether to reference the corners by index or duplicate them
    pub fn push_face(&mut self, corners: [Vertex; 4], layout: FaceLayout) {
        match layout {
            FaceLayout::Indexed => {
                let base = self.vertices.len() as u32;
                self.vertices.extend_from_slice(&corners);
                self.indices.extend(QUAD_INDICES.iter().map(|i| base + i));
            }
            FaceLayout::Duplicated => {
                self.vertices
                    .extend(QUAD_INDICES.iter().map(|&i| corners[i as usize]));
            }
        }
    }

    /// Number of triangles stored in the buffers.
    pub fn triangle_count(&self) -> usize {
        if self.indices.is_empty() {
            self.vertices.len() / 3
        } else {
            self.indices.len() / 3
        }
    }

    /// Expands the buffers into textured triangles, appending them to `out`.
    pub fn append_triangles(&self, out: &mut Vec<Triangle>) {
        out.reserve(self.triangle_count());
        if self.indices.is_empty() {
            for tri in self.vertices.chunks_exact(3) {
                out.push(Self::triangle_from(&tri[0], &tri[1], &tri[2]));
            }
        } else {
            for tri in self.indices.chunks_exact(3) {
                out.push(Self::triangle_from(
                    &self.vertices[tri[0] as usize],
                    &self.vertices[tri[1] as usize],
                    &self.vertices[tri[2] as usize],
                ));
            }
        }
    }

    fn triangle_from(a: &Vertex, b: &Vertex, c: &Vertex) -> Triangle {
        Triangle::new(
            [a.point(), b.point(), c.point()],
            Surface::Textured {
                uvs: [a.tex_coords, b.tex_coords, c.tex_coords],
                brightness: a.brightness,
            },
        )
    }
}

/// The complete mesh of a chunk.
#[derive(Debug, Default, Clone)]
pub struct ChunkMesh {
    /// Faces of opaque block types
    pub opaque: MeshBuffers,
    /// Faces of transparent block types
    pub transparent: MeshBuffers,
    layout: FaceLayout,
}

impl ChunkMesh {
    /// Creates an empty mesh using the given face layout.
    pub fn new(layout: FaceLayout) -> Self {
        ChunkMesh {
            layout,
            ..Default::default()
        }
    }

    pub fn layout(&self) -> FaceLayout {
        self.layout
    }

    /// Changes the face layout. Existing geometry is dropped.
    pub fn set_layout(&mut self, layout: FaceLayout) {
        self.layout = layout;
        self.clear();
    }

    pub fn clear(&mut self) {
        self.opaque.clear();
        self.transparent.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.opaque.is_empty() && self.transparent.is_empty()
    }

    /// Adds a face to the opaque or transparent stream.
    pub fn push_face(&mut self, corners: [Vertex; 4], transparent: bool) {
        let layout = self.layout;
        if transparent {
            self.transparent.push_face(corners, layout);
        } else {
            self.opaque.push_face(corners, layout);
        }
    }

    /// Number of quads in both streams.
    pub fn face_count(&self) -> usize {
        (self.opaque.triangle_count() + self.transparent.triangle_count()) / 2
    }
}
