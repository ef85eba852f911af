//! # Chunk Creation Module
//!
//! A builder that fills a chunk one block at a time in storage order
//! (x fastest, then y, then z), keeping the block grid and the solid mask in step.
//! Terrain generators use it so they never touch the chunk's storage layout directly.

use bitvec::vec::BitVec;
use cgmath::Point3;

use crate::engine_state::voxels::block::{BlockTypeSize, AIR};

use super::{Chunk, CHUNK_DIMENSION, CHUNK_SIZE};

/// Builds a chunk by pushing block ids in storage order.
///
/// Positions that were never pushed are left as air when the chunk is returned.
pub struct ChunkCreationIterator {
    /// The chunk coordinates of the chunk being created
    position: Point3<i32>,
    /// Block ids pushed so far
    blocks: Vec<BlockTypeSize>,
    /// One bit per pushed block, set for non-air ids
    solid_array: BitVec,
}

impl ChunkCreationIterator {
    /// Creates a new builder for the chunk at `position`.
    ///
    /// # Arguments
    /// * `position` - The chunk coordinates of the chunk to create
    pub fn new(position: Point3<i32>) -> Self {
        ChunkCreationIterator {
            position,
            blocks: Vec::with_capacity(CHUNK_SIZE as usize),
            solid_array: BitVec::with_capacity(CHUNK_SIZE as usize),
        }
    }

    /// The local coordinates the next pushed block will land on, or `None` once the
    /// chunk is full.
    pub fn next_local_position(&self) -> Option<Point3<i32>> {
        let index = self.blocks.len() as i32;
        (index < CHUNK_SIZE).then(|| {
            Point3::new(
                index % CHUNK_DIMENSION,
                (index / CHUNK_DIMENSION) % CHUNK_DIMENSION,
                index / (CHUNK_DIMENSION * CHUNK_DIMENSION),
            )
        })
    }

    /// Adds a block at the current position and advances.
    ///
    /// Pushes past the end of the chunk are ignored.
    pub fn push_block(&mut self, block: BlockTypeSize) {
        if self.blocks.len() >= CHUNK_SIZE as usize {
            return;
        }
        self.blocks.push(block);
        self.solid_array.push(block != AIR);
    }

    /// Finalizes the chunk, padding any remaining positions with air.
    pub fn return_chunk(mut self) -> Chunk {
        self.blocks.resize(CHUNK_SIZE as usize, AIR);
        self.solid_array.resize(CHUNK_SIZE as usize, false);
        Chunk::from_parts(self.position, self.blocks, self.solid_array)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pushes_follow_storage_order() {
        let mut cci = ChunkCreationIterator::new(Point3::new(0, 0, 0));
        assert_eq!(cci.next_local_position(), Some(Point3::new(0, 0, 0)));
        for _ in 0..CHUNK_DIMENSION {
            cci.push_block(3);
        }
        assert_eq!(cci.next_local_position(), Some(Point3::new(0, 1, 0)));
        cci.push_block(5);
        let chunk = cci.return_chunk();
        assert_eq!(chunk.get_block(15, 0, 0), 3);
        assert_eq!(chunk.get_block(0, 1, 0), 5);
        assert_eq!(chunk.get_block(1, 1, 0), AIR);
        assert_eq!(chunk.solid_count(), CHUNK_DIMENSION as usize + 1);
    }

    #[test]
    fn overfilling_is_ignored() {
        let mut cci = ChunkCreationIterator::new(Point3::new(0, 0, 0));
        for _ in 0..CHUNK_SIZE + 10 {
            cci.push_block(1);
        }
        assert_eq!(cci.next_local_position(), None);
        assert_eq!(cci.return_chunk().solid_count(), CHUNK_SIZE as usize);
    }
}
