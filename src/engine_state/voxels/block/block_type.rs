//! # Block Type Module
//!
//! This module defines the different types of blocks in the voxel world.
//! It provides functionality for block type identification, conversion, and random generation.

use num_derive::FromPrimitive;

use super::BlockTypeSize;

/// Enumerates all block types known to the renderer.
///
/// The discriminant is the raw id stored in chunks. `AIR` (0) is the empty sentinel used
/// by face culling and skipped entirely by the mesher. The `FromPrimitive` derive allows
/// conversion from the raw id.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockType {
    /// Empty space. Never meshed.
    AIR = 0,

    /// Grass on top of dirt; the top, sides and bottom use different atlas cells.
    GRASS = 1,

    /// Plain dirt.
    DIRT = 2,

    /// Stone, the bulk of generated terrain.
    STONE = 3,

    /// Sand.
    SAND = 4,

    /// A tree trunk with ring textures on top and bottom.
    LOG = 5,

    /// Foliage. Drawn in the transparent pass.
    LEAVES = 6,

    /// Glass. Drawn in the transparent pass.
    GLASS = 7,
}

impl BlockType {
    /// Converts a raw block id to a `BlockType`.
    ///
    /// # Returns
    /// `None` if the id does not name a known block type.
    pub fn from_id(id: BlockTypeSize) -> Option<Self> {
        num::FromPrimitive::from_u8(id)
    }

    /// The raw id stored in chunk grids.
    pub fn id(self) -> BlockTypeSize {
        self as BlockTypeSize
    }

    /// Whether geometry of this type is drawn after all opaque geometry.
    pub fn is_transparent(self) -> bool {
        matches!(self, BlockType::LEAVES | BlockType::GLASS)
    }

    /// Same as [`BlockType::is_transparent`] for a raw id. Unknown ids are opaque.
    pub fn is_transparent_id(id: BlockTypeSize) -> bool {
        Self::from_id(id).is_some_and(Self::is_transparent)
    }

    /// Picks a random solid block type (excluding `AIR`) from the given generator.
    ///
    /// Used by the random terrain generator.
    pub fn random_solid(rng: &mut fastrand::Rng) -> Self {
        num::FromPrimitive::from_u8(rng.u8(1..=7)).unwrap_or(BlockType::STONE)
    }
}
