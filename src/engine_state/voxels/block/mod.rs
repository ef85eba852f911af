//! # Block Module
//!
//! Block ids, the block type catalogue and the six block faces.
//!
//! Chunks store raw [`BlockTypeSize`] ids rather than [`block_type::BlockType`] values so
//! that terrain collaborators can hand over ids the renderer does not know about; those
//! are still meshed and fall back to the first atlas cell.

pub mod block_side;
pub mod block_type;

/// The underlying integer type used to represent block types in memory.
pub type BlockTypeSize = u8;

/// The id reserved for empty space.
pub const AIR: BlockTypeSize = 0;
