//! # Voxel World
//!
//! This module contains everything that represents the voxel world itself, as opposed
//! to how it is drawn.
//!
//! ## Architecture
//!
//! * **Block**: Block type ids and the six block faces
//! * **Chunk**: Dense 16×16×16 block storage with a cached mesh and a dirty flag
//! * **Terrain**: Generators that fill freshly streamed chunks
//! * **World**: The chunk map, world-to-chunk coordinate resolution and chunk streaming
//!
//! ## Data Flow
//!
//! 1. The world streams chunks in and out as the camera changes chunk
//! 2. Block edits go through the world, which marks the touched chunks dirty
//! 3. Dirty chunks are remeshed before the next frame is drawn

pub mod block;
pub mod chunk;
pub mod terrain;
pub mod world;
