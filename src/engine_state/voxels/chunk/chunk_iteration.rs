//! # Chunk Iteration Module
//!
//! An iterator over the non-air blocks of a chunk. It walks the set bits of the solid
//! mask, so large empty regions cost one word scan instead of one lookup per block.

use bitvec::slice::IterOnes;
use bitvec::order::Lsb0;
use cgmath::Point3;

use crate::engine_state::voxels::block::BlockTypeSize;

use super::{Chunk, CHUNK_DIMENSION};

/// Yields `(local_position, block_id)` for every non-air block of a chunk in storage
/// order.
pub struct ChunkBlockIterator<'a> {
    /// Reference to the chunk being iterated over
    chunk_ref: &'a Chunk,
    /// Set bits of the solid mask not yet visited
    solid_offsets: IterOnes<'a, usize, Lsb0>,
}

impl<'a> ChunkBlockIterator<'a> {
    /// Creates a new iterator positioned before the first non-air block.
    pub fn new(chunk_ref: &'a Chunk) -> Self {
        ChunkBlockIterator {
            chunk_ref,
            solid_offsets: chunk_ref.solid_array.iter_ones(),
        }
    }
}

impl Iterator for ChunkBlockIterator<'_> {
    type Item = (Point3<i32>, BlockTypeSize);

    fn next(&mut self) -> Option<Self::Item> {
        let offset = self.solid_offsets.next()?;
        let index = offset as i32;
        let position = Point3::new(
            index % CHUNK_DIMENSION,
            (index / CHUNK_DIMENSION) % CHUNK_DIMENSION,
            index / (CHUNK_DIMENSION * CHUNK_DIMENSION),
        );
        Some((position, self.chunk_ref.blocks[offset]))
    }
}
