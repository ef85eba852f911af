//! Texture atlas lookups.
//!
//! The atlas image itself is loaded and uploaded by the presentation layer. This module
//! only knows the grid layout and which cell each block face uses, and turns that into
//! UV rectangles for the mesher.

use log::warn;
use phf::phf_map;

use crate::engine_state::voxels::block::{block_side::BlockSide, BlockTypeSize};

/// Atlas cell indices per block id, one entry per face in `BlockSide` index order:
/// `[front, back, top, bottom, right, left]`.
static BLOCK_FACE_CELLS: phf::Map<u8, [u16; 6]> = phf_map! {
    1u8 => [1, 1, 0, 2, 1, 1],       // GRASS
    2u8 => [2, 2, 2, 2, 2, 2],       // DIRT
    3u8 => [3, 3, 3, 3, 3, 3],       // STONE
    4u8 => [16, 16, 16, 16, 16, 16], // SAND
    5u8 => [18, 18, 19, 19, 18, 18], // LOG
    6u8 => [20, 20, 20, 20, 20, 20], // LEAVES
    7u8 => [17, 17, 17, 17, 17, 17], // GLASS
};

/// A rectangle in normalized texture space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtlasRect {
    /// Left edge
    pub u: f32,
    /// Top edge
    pub v: f32,
    /// Width of one cell
    pub width: f32,
    /// Height of one cell
    pub height: f32,
}

impl AtlasRect {
    /// Maps a cell-local coordinate in `[0, 1]²` into atlas space.
    pub fn map(&self, local: [f32; 2]) -> [f32; 2] {
        [self.u + local[0] * self.width, self.v + local[1] * self.height]
    }
}

/// Grid layout of the block texture atlas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Atlas {
    columns: u32,
    rows: u32,
}

impl Default for Atlas {
    fn default() -> Self {
        Atlas::new(16, 16)
    }
}

impl Atlas {
    /// Creates an atlas of `columns × rows` equally sized cells.
    ///
    /// # Panics
    /// Panics if either dimension is zero.
    pub fn new(columns: u32, rows: u32) -> Self {
        assert!(columns > 0 && rows > 0, "atlas grid must be non-empty");
        Atlas { columns, rows }
    }

    /// Width of one cell in UV units.
    pub fn cell_width(&self) -> f32 {
        1.0 / self.columns as f32
    }

    /// Height of one cell in UV units.
    pub fn cell_height(&self) -> f32 {
        1.0 / self.rows as f32
    }

    /// The UV rectangle of a cell, counting left to right then top to bottom.
    pub fn cell_rect(&self, cell: u16) -> AtlasRect {
        let cell = u32::from(cell);
        AtlasRect {
            u: (cell % self.columns) as f32 * self.cell_width(),
            v: (cell / self.columns) as f32 * self.cell_height(),
            width: self.cell_width(),
            height: self.cell_height(),
        }
    }

    /// The atlas cell used by `side` of a block with id `block`.
    ///
    /// Unknown ids fall back to cell 0.
    pub fn cell_of(&self, block: BlockTypeSize, side: BlockSide) -> u16 {
        match BLOCK_FACE_CELLS.get(&block) {
            Some(cells) => cells[side.index()],
            None => {
                warn!("no atlas entry for block type {block}, using cell 0");
                0
            }
        }
    }

    /// Looks up the UV rectangle for one face of a block type.
    pub fn lookup(&self, block: BlockTypeSize, side: BlockSide) -> AtlasRect {
        self.cell_rect(self.cell_of(block, side))
    }

    /// Same as [`Atlas::lookup`] with a raw face index.
    ///
    /// # Panics
    /// Panics if `face` is not in `0..6`.
    pub fn lookup_face(&self, block: BlockTypeSize, face: usize) -> AtlasRect {
        self.lookup(block, BlockSide::from_index(face))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::block_type::BlockType;

    #[test]
    fn grass_uses_distinct_top_and_bottom() {
        let atlas = Atlas::default();
        let grass = BlockType::GRASS.id();
        assert_eq!(atlas.cell_of(grass, BlockSide::TOP), 0);
        assert_eq!(atlas.cell_of(grass, BlockSide::BOTTOM), 2);
        assert_eq!(atlas.cell_of(grass, BlockSide::LEFT), 1);
    }

    #[test]
    fn cells_wrap_onto_following_rows() {
        let atlas = Atlas::default();
        let sand = atlas.lookup(BlockType::SAND.id(), BlockSide::FRONT);
        assert_eq!(sand.u, 0.0);
        assert!((sand.v - 1.0 / 16.0).abs() < 1e-6);
        let log_top = atlas.lookup(BlockType::LOG.id(), BlockSide::TOP);
        assert!((log_top.u - 3.0 / 16.0).abs() < 1e-6);
        assert!((log_top.width - 1.0 / 16.0).abs() < 1e-6);
    }

    #[test]
    fn unknown_block_falls_back_to_first_cell() {
        let atlas = Atlas::default();
        assert_eq!(atlas.lookup(99, BlockSide::TOP), atlas.cell_rect(0));
    }

    #[test]
    fn map_scales_into_cell() {
        let rect = Atlas::new(4, 2).cell_rect(5);
        assert_eq!(rect.map([0.0, 0.0]), [0.25, 0.5]);
        assert_eq!(rect.map([1.0, 1.0]), [0.5, 1.0]);
    }

    #[test]
    #[should_panic]
    fn invalid_face_index_fails_fast() {
        Atlas::default().lookup_face(1, 9);
    }
}
