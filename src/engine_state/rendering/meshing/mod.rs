//! # Chunk Meshing
//!
//! Turns chunk block grids into vertex buffers.
//!
//! - [`culled`]: emits one quad per block face that borders air, checking neighbouring
//!   chunks at the boundary
//! - [`face`]: a single quad and its expansion into vertices
//! - [`mesh`]: the opaque/transparent buffers a chunk caches between edits

pub mod culled;
pub mod face;
pub mod mesh;

pub use mesh::{ChunkMesh, FaceLayout, MeshBuffers};
