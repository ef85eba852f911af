//! Face-culled chunk meshing.
//!
//! Every non-air block emits the faces that look into air. Faces on the chunk boundary
//! consult the neighbouring chunk; if that chunk is not loaded the face is emitted.

use cgmath::{EuclideanSpace, Point3};
use log::trace;
use web_time::Instant;

use crate::engine_state::rendering::atlas::Atlas;
use crate::engine_state::voxels::{
    block::{block_side::BlockSide, block_type::BlockType},
    chunk::{Chunk, ChunkNeighbors, CHUNK_DIMENSION},
};

use super::{face::Face, ChunkMesh};

/// Whether the face of the block at local `position` on `side` borders air.
pub fn is_face_visible(
    chunk: &Chunk,
    neighbors: &ChunkNeighbors,
    position: Point3<i32>,
    side: BlockSide,
) -> bool {
    let target = position + side.normal();
    if Chunk::in_bounds(target.x, target.y, target.z) {
        return !chunk.is_block_solid(target.x, target.y, target.z);
    }
    match neighbors.get(side) {
        None => true,
        Some(neighbor) => !neighbor.is_block_solid(
            target.x.rem_euclid(CHUNK_DIMENSION),
            target.y.rem_euclid(CHUNK_DIMENSION),
            target.z.rem_euclid(CHUNK_DIMENSION),
        ),
    }
}

/// Rebuilds `mesh` from the blocks of `chunk`.
///
/// The mesh is cleared first; its buffers keep their capacity.
///
/// # Arguments
/// * `chunk` - The chunk to mesh
/// * `neighbors` - Loaded face-adjacent chunks
/// * `atlas` - Texture atlas for UV lookups
/// * `mesh` - Output mesh, its face layout decides indexed or duplicated output
pub fn mesh_chunk(chunk: &Chunk, neighbors: &ChunkNeighbors, atlas: &Atlas, mesh: &mut ChunkMesh) {
    let start = Instant::now();
    mesh.clear();

    let origin = chunk.world_origin().to_vec();
    for (local, block) in chunk.blocks() {
        let transparent = BlockType::is_transparent_id(block);
        for side in BlockSide::all() {
            if is_face_visible(chunk, neighbors, local, side) {
                let face = Face::new(local + origin, block, side);
                mesh.push_face(face.vertices(atlas), transparent);
            }
        }
    }

    trace!(
        "Meshed chunk {:?}: {} faces in {:?}",
        chunk.position,
        mesh.face_count(),
        start.elapsed()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::rendering::meshing::FaceLayout;

    fn mesh_of(chunk: &Chunk, neighbors: &ChunkNeighbors, layout: FaceLayout) -> ChunkMesh {
        let mut mesh = ChunkMesh::new(layout);
        mesh_chunk(chunk, neighbors, &Atlas::default(), &mut mesh);
        mesh
    }

    #[test]
    fn isolated_block_emits_six_faces() {
        let mut chunk = Chunk::empty(Point3::new(0, 0, 0));
        chunk.set_block(5, 5, 5, BlockType::STONE.id());

        let indexed = mesh_of(&chunk, &ChunkNeighbors::none(), FaceLayout::Indexed);
        assert_eq!(indexed.opaque.vertices.len(), 24);
        assert_eq!(indexed.opaque.indices.len(), 36);
        assert!(indexed.transparent.is_empty());

        let duplicated = mesh_of(&chunk, &ChunkNeighbors::none(), FaceLayout::Duplicated);
        assert_eq!(duplicated.opaque.vertices.len(), 36);
        assert!(duplicated.opaque.indices.is_empty());
    }

    #[test]
    fn touching_blocks_hide_shared_faces() {
        let mut chunk = Chunk::empty(Point3::new(0, 0, 0));
        chunk.set_block(5, 5, 5, 3);
        chunk.set_block(6, 5, 5, 3);
        let mesh = mesh_of(&chunk, &ChunkNeighbors::none(), FaceLayout::Indexed);
        assert_eq!(mesh.face_count(), 10);
    }

    #[test]
    fn transparent_blocks_use_their_own_stream() {
        let mut chunk = Chunk::empty(Point3::new(0, 0, 0));
        chunk.set_block(1, 1, 1, BlockType::GLASS.id());
        chunk.set_block(8, 8, 8, BlockType::DIRT.id());
        let mesh = mesh_of(&chunk, &ChunkNeighbors::none(), FaceLayout::Indexed);
        assert_eq!(mesh.transparent.vertices.len(), 24);
        assert_eq!(mesh.opaque.vertices.len(), 24);
    }

    #[test]
    fn boundary_faces_consult_the_neighbour() {
        let mut chunk = Chunk::empty(Point3::new(0, 0, 0));
        chunk.set_block(15, 0, 0, 3);
        let empty_right = Chunk::empty(Point3::new(1, 0, 0));
        let mut solid_right = Chunk::empty(Point3::new(1, 0, 0));
        solid_right.set_block(0, 0, 0, 3);

        let mut neighbors = ChunkNeighbors::none();
        neighbors.set(BlockSide::RIGHT, Some(&empty_right));
        assert!(is_face_visible(&chunk, &neighbors, Point3::new(15, 0, 0), BlockSide::RIGHT));

        neighbors.set(BlockSide::RIGHT, Some(&solid_right));
        assert!(!is_face_visible(&chunk, &neighbors, Point3::new(15, 0, 0), BlockSide::RIGHT));
        assert_eq!(mesh_of(&chunk, &neighbors, FaceLayout::Indexed).face_count(), 5);
    }

    #[test]
    fn vertices_are_in_world_space() {
        let mut chunk = Chunk::empty(Point3::new(-1, 0, 2));
        chunk.set_block(15, 0, 0, 3);
        let mesh = mesh_of(&chunk, &ChunkNeighbors::none(), FaceLayout::Indexed);
        for vertex in &mesh.opaque.vertices {
            assert!((-1.0..=0.0).contains(&vertex.position[0]));
            assert!((32.0..=33.0).contains(&vertex.position[2]));
        }
    }
}
