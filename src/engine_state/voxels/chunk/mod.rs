//! # Chunk Module
//!
//! This module provides the `Chunk` struct: a 16x16x16 block of voxel data together
//! with the mesh derived from it.
//!
//! ## Storage
//!
//! - `blocks`: one block id per cell, indexed `x + 16·y + 256·z`
//! - `solid_array`: a bit vector with one bit per cell, set for non-air cells
//!
//! The solid mask makes emptiness checks and iteration over solid blocks cheap
//! (see [`chunk_iteration`]), while the dense id grid keeps lookups O(1).
//!
//! ## Meshing
//!
//! A chunk caches its mesh and a dirty flag. Any edit marks it dirty; the world
//! rebuilds dirty chunks before rendering, handing each one read-only borrows of its
//! six face neighbours through [`ChunkNeighbors`].

use bitvec::prelude::BitVec;
use cgmath::{EuclideanSpace, Point3};

use super::block::{block_side::BlockSide, BlockTypeSize, AIR};
use crate::engine_state::rendering::{
    atlas::Atlas,
    meshing::{culled, ChunkMesh, FaceLayout},
};

pub mod chunk_creation;
pub mod chunk_iteration;

/// The dimension (width, height, depth) of a chunk in blocks.
pub const CHUNK_DIMENSION: i32 = 16;
/// The number of blocks in a single 2D plane of a chunk (CHUNK_DIMENSION²).
pub const CHUNK_PLANE_SIZE: i32 = CHUNK_DIMENSION * CHUNK_DIMENSION;
/// The total number of blocks in a chunk (CHUNK_DIMENSION³).
pub const CHUNK_SIZE: i32 = CHUNK_PLANE_SIZE * CHUNK_DIMENSION;

/// Represents a 16x16x16 collection of voxel blocks in the world.
#[derive(Debug, Clone)]
pub struct Chunk {
    /// The position of this chunk in chunk coordinates (not block coordinates).
    pub position: Point3<i32>,

    /// Block ids in storage order.
    blocks: Vec<BlockTypeSize>,

    /// A bit vector where each bit records whether the matching cell is non-air.
    solid_array: BitVec,

    /// The last mesh built for this chunk.
    mesh: ChunkMesh,

    /// Set when the blocks (or a neighbour's boundary blocks) changed since `mesh` was built.
    dirty: bool,
}

/// Read-only borrows of the six face-adjacent chunks, indexed by [`BlockSide`].
///
/// A `None` entry means the neighbour is not loaded; faces looking into it are emitted.
#[derive(Debug, Default, Clone, Copy)]
pub struct ChunkNeighbors<'a>([Option<&'a Chunk>; 6]);

impl<'a> ChunkNeighbors<'a> {
    /// No neighbours at all.
    pub fn none() -> Self {
        Self::default()
    }

    /// Builds the neighbour set by asking `lookup` for each side's chunk coordinate.
    ///
    /// # Arguments
    /// * `position` - Chunk coordinates of the chunk being meshed
    /// * `lookup` - Resolves a chunk coordinate to a loaded chunk
    pub fn gather<F>(position: Point3<i32>, mut lookup: F) -> Self
    where
        F: FnMut(Point3<i32>) -> Option<&'a Chunk>,
    {
        ChunkNeighbors(BlockSide::all().map(|side| lookup(position + side.normal())))
    }

    pub fn get(&self, side: BlockSide) -> Option<&'a Chunk> {
        self.0[side.index()]
    }

    pub fn set(&mut self, side: BlockSide, chunk: Option<&'a Chunk>) {
        self.0[side.index()] = chunk;
    }
}

impl Chunk {
    /// Creates a new, completely empty chunk (all blocks are air).
    ///
    /// # Arguments
    /// * `position` - The chunk coordinates of the new chunk
    pub fn empty(position: Point3<i32>) -> Self {
        Self::from_parts(
            position,
            vec![AIR; CHUNK_SIZE as usize],
            BitVec::repeat(false, CHUNK_SIZE as usize),
        )
    }

    /// Creates a chunk with every cell set to `block`.
    pub fn filled(position: Point3<i32>, block: BlockTypeSize) -> Self {
        let mut chunk = Self::empty(position);
        chunk.fill(block);
        chunk
    }

    /// Assembles a chunk from a full id grid and its matching solid mask.
    pub(crate) fn from_parts(
        position: Point3<i32>,
        blocks: Vec<BlockTypeSize>,
        solid_array: BitVec,
    ) -> Self {
        debug_assert_eq!(blocks.len(), CHUNK_SIZE as usize);
        debug_assert_eq!(solid_array.len(), CHUNK_SIZE as usize);
        Chunk {
            position,
            blocks,
            solid_array,
            mesh: ChunkMesh::default(),
            dirty: true,
        }
    }

    /// World-space coordinates of this chunk's minimum corner.
    pub fn world_origin(&self) -> Point3<i32> {
        Point3::from_vec(self.position.to_vec() * CHUNK_DIMENSION)
    }

    /// Whether local coordinates fall inside the chunk.
    pub fn in_bounds(x: i32, y: i32, z: i32) -> bool {
        (0..CHUNK_DIMENSION).contains(&x)
            && (0..CHUNK_DIMENSION).contains(&y)
            && (0..CHUNK_DIMENSION).contains(&z)
    }

    fn index(x: i32, y: i32, z: i32) -> usize {
        (x + CHUNK_DIMENSION * y + CHUNK_PLANE_SIZE * z) as usize
    }

    /// Gets the block id at the specified chunk-relative coordinates.
    ///
    /// # Returns
    /// The block id, or [`AIR`] if the coordinates are outside the chunk.
    pub fn get_block(&self, x: i32, y: i32, z: i32) -> BlockTypeSize {
        if Self::in_bounds(x, y, z) {
            self.blocks[Self::index(x, y, z)]
        } else {
            AIR
        }
    }

    /// Checks if the block at the specified chunk-relative coordinates is solid.
    ///
    /// # Returns
    /// `true` if the block is non-air, `false` if it's air or out of bounds.
    pub fn is_block_solid(&self, x: i32, y: i32, z: i32) -> bool {
        Self::in_bounds(x, y, z) && self.solid_array[Self::index(x, y, z)]
    }

    /// Sets the block at the specified chunk-relative coordinates and marks the chunk dirty.
    ///
    /// # Returns
    /// `true` if the block changed. Out of bounds coordinates and writes of the current
    /// value return `false` and leave the chunk untouched.
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, block: BlockTypeSize) -> bool {
        if !Self::in_bounds(x, y, z) {
            return false;
        }
        let index = Self::index(x, y, z);
        if self.blocks[index] == block {
            return false;
        }
        self.blocks[index] = block;
        self.solid_array.set(index, block != AIR);
        self.dirty = true;
        true
    }

    /// Sets every cell to `block`.
    pub fn fill(&mut self, block: BlockTypeSize) {
        self.blocks.fill(block);
        self.solid_array.fill(block != AIR);
        self.dirty = true;
    }

    /// Fills `height` horizontal layers starting at local `y` with `block`.
    ///
    /// Layers outside the chunk are skipped.
    pub fn set_horizontal_layer(&mut self, y: i32, height: i32, block: BlockTypeSize) {
        for layer in y.max(0)..(y + height).min(CHUNK_DIMENSION) {
            for z in 0..CHUNK_DIMENSION {
                for x in 0..CHUNK_DIMENSION {
                    let index = Self::index(x, layer, z);
                    self.blocks[index] = block;
                    self.solid_array.set(index, block != AIR);
                }
            }
        }
        self.dirty = true;
    }

    /// Number of non-air blocks.
    pub fn solid_count(&self) -> usize {
        self.solid_array.count_ones()
    }

    /// Whether the chunk holds only air.
    pub fn is_empty(&self) -> bool {
        self.solid_array.not_any()
    }

    /// Iterates over `(local_position, block_id)` of every non-air block.
    pub fn blocks(&self) -> chunk_iteration::ChunkBlockIterator<'_> {
        chunk_iteration::ChunkBlockIterator::new(self)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Flags the mesh for rebuilding, e.g. after a neighbour's boundary changed.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// The cached mesh. Stale while [`Chunk::is_dirty`] is true.
    pub fn mesh(&self) -> &ChunkMesh {
        &self.mesh
    }

    /// Changes the face layout of the cached mesh and marks the chunk dirty.
    pub fn set_face_layout(&mut self, layout: FaceLayout) {
        if self.mesh.layout() != layout {
            self.mesh.set_layout(layout);
            self.dirty = true;
        }
    }

    /// Rebuilds the cached mesh in place, reusing its buffers, and clears the dirty flag.
    ///
    /// # Arguments
    /// * `neighbors` - The loaded face-adjacent chunks
    /// * `atlas` - Texture atlas for UV lookups
    pub fn rebuild_mesh(&mut self, neighbors: &ChunkNeighbors, atlas: &Atlas) {
        let mut mesh = std::mem::take(&mut self.mesh);
        culled::mesh_chunk(self, neighbors, atlas, &mut mesh);
        self.mesh = mesh;
        self.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get_track_solidity() {
        let mut chunk = Chunk::empty(Point3::new(0, 0, 0));
        assert!(chunk.is_empty());
        assert!(chunk.set_block(3, 4, 5, 2));
        assert!(!chunk.set_block(3, 4, 5, 2));
        assert_eq!(chunk.get_block(3, 4, 5), 2);
        assert!(chunk.is_block_solid(3, 4, 5));
        assert!(chunk.set_block(3, 4, 5, AIR));
        assert!(chunk.is_empty());
    }

    #[test]
    fn out_of_bounds_reads_air_and_ignores_writes() {
        let mut chunk = Chunk::filled(Point3::new(0, 0, 0), 3);
        assert_eq!(chunk.get_block(-1, 0, 0), AIR);
        assert_eq!(chunk.get_block(0, 16, 0), AIR);
        assert!(!chunk.set_block(16, 0, 0, 1));
        assert!(!chunk.is_block_solid(0, 0, -1));
    }

    #[test]
    fn horizontal_layers_are_clamped_to_the_chunk() {
        let mut chunk = Chunk::empty(Point3::new(0, 0, 0));
        chunk.set_horizontal_layer(14, 5, 1);
        assert_eq!(chunk.solid_count(), 2 * CHUNK_PLANE_SIZE as usize);
        assert_eq!(chunk.get_block(7, 15, 7), 1);
        assert_eq!(chunk.get_block(7, 13, 7), AIR);
    }

    #[test]
    fn world_origin_scales_chunk_position() {
        let chunk = Chunk::empty(Point3::new(-1, 2, 0));
        assert_eq!(chunk.world_origin(), Point3::new(-16, 32, 0));
    }

    #[test]
    fn rebuild_clears_dirty_flag() {
        let mut chunk = Chunk::empty(Point3::new(0, 0, 0));
        assert!(chunk.is_dirty());
        chunk.rebuild_mesh(&ChunkNeighbors::none(), &Atlas::default());
        assert!(!chunk.is_dirty());
        assert!(chunk.mesh().is_empty());
        chunk.set_block(0, 0, 0, 3);
        assert!(chunk.is_dirty());
        chunk.rebuild_mesh(&ChunkNeighbors::none(), &Atlas::default());
        assert_eq!(chunk.mesh().face_count(), 6);
    }
}
