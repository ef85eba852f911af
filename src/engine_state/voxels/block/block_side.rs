//! # Block Side Module
//!
//! This module defines the six faces of a voxel block, their outward directions, the
//! quad corners the mesher emits for each of them and the fixed brightness used as a
//! cheap directional light.

use cgmath::Vector3;

/// Represents the six possible faces of a voxel block.
///
/// The discriminant is the face index used by the atlas table, in the order
/// `[FRONT, BACK, TOP, BOTTOM, RIGHT, LEFT]`.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The front face (facing positive Z)
    FRONT = 0,

    /// The back face (facing negative Z)
    BACK = 1,

    /// The top face (facing positive Y)
    TOP = 2,

    /// The bottom face (facing negative Y)
    BOTTOM = 3,

    /// The right face (facing positive X)
    RIGHT = 4,

    /// The left face (facing negative X)
    LEFT = 5,
}

/// Unit-cube corners for each side, listed counter-clockwise as seen from outside the
/// block. Triangulating `(0, 1, 2)` and `(0, 2, 3)` gives outward facing normals.
const SIDE_CORNERS: [[[f32; 3]; 4]; 6] = [
    // FRONT
    [[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 1.0], [0.0, 1.0, 1.0]],
    // BACK
    [[1.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0]],
    // TOP
    [[0.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
    // BOTTOM
    [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 1.0], [0.0, 0.0, 1.0]],
    // RIGHT
    [[1.0, 0.0, 1.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [1.0, 1.0, 1.0]],
    // LEFT
    [[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 1.0], [0.0, 1.0, 0.0]],
];

/// Texture coordinates matching `SIDE_CORNERS`: bottom-left, bottom-right, top-right,
/// top-left with `v` growing downwards in the atlas image.
pub const CORNER_UVS: [[f32; 2]; 4] = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];

impl BlockSide {
    /// Returns an array containing all six block faces in index order.
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::FRONT,
            BlockSide::BACK,
            BlockSide::TOP,
            BlockSide::BOTTOM,
            BlockSide::RIGHT,
            BlockSide::LEFT,
        ]
    }

    /// Converts a face index back to a side.
    ///
    /// # Panics
    /// Panics if `index` is not in `0..6`. Face indices are produced by this crate only,
    /// so an out of range value is a programming error.
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => BlockSide::FRONT,
            1 => BlockSide::BACK,
            2 => BlockSide::TOP,
            3 => BlockSide::BOTTOM,
            4 => BlockSide::RIGHT,
            5 => BlockSide::LEFT,
            _ => panic!("invalid block face index {index}, expected 0..6"),
        }
    }

    /// The face index of this side.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Unit offset to the neighbouring cell this face looks at.
    pub fn normal(self) -> Vector3<i32> {
        match self {
            BlockSide::FRONT => Vector3::new(0, 0, 1),
            BlockSide::BACK => Vector3::new(0, 0, -1),
            BlockSide::TOP => Vector3::new(0, 1, 0),
            BlockSide::BOTTOM => Vector3::new(0, -1, 0),
            BlockSide::RIGHT => Vector3::new(1, 0, 0),
            BlockSide::LEFT => Vector3::new(-1, 0, 0),
        }
    }

    /// Fixed per-face brightness standing in for a directional light.
    pub fn brightness(self) -> f32 {
        match self {
            BlockSide::FRONT | BlockSide::BACK => 0.86,
            BlockSide::TOP | BlockSide::BOTTOM => 1.0,
            BlockSide::RIGHT | BlockSide::LEFT => 0.8,
        }
    }

    /// The four unit-cube corners of this face, counter-clockwise from outside.
    pub fn corners(self) -> &'static [[f32; 3]; 4] {
        &SIDE_CORNERS[self as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::math::Vec3;

    #[test]
    fn index_round_trips() {
        for side in BlockSide::all() {
            assert_eq!(BlockSide::from_index(side.index()), side);
        }
    }

    #[test]
    #[should_panic(expected = "invalid block face index")]
    fn out_of_range_index_panics() {
        BlockSide::from_index(6);
    }

    #[test]
    fn corner_winding_matches_outward_normal() {
        for side in BlockSide::all() {
            let c = (*side.corners()).map(Vec3::from);
            let normal = (c[1] - c[0]).cross(c[2] - c[0]).normalize();
            let expected = side.normal();
            assert_eq!(normal.x.round() as i32, expected.x, "{side:?}");
            assert_eq!(normal.y.round() as i32, expected.y, "{side:?}");
            assert_eq!(normal.z.round() as i32, expected.z, "{side:?}");
        }
    }
}
