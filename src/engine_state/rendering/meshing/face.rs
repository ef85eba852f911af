use cgmath::Point3;

use crate::engine_state::rendering::{atlas::Atlas, vertex::Vertex};
use crate::engine_state::voxels::block::{
    block_side::{BlockSide, CORNER_UVS},
    BlockTypeSize,
};

/// A single visible quad of one voxel.
///
/// Faces are produced by the culled mesher for every block side that borders air and
/// are expanded into four vertices in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    /// World-space block position (the block's minimum corner)
    pub position: Point3<i32>,
    /// The block type, used for the atlas lookup
    pub block_type: BlockTypeSize,
    /// Which side of the block this face represents
    pub block_side: BlockSide,
}

impl Face {
    /// Creates a new face for the block at `position`.
    ///
    /// # Arguments
    /// * `position` - World-space block coordinates
    /// * `block_type` - The raw block id
    /// * `block_side` - Which side of the block this face represents
    pub fn new(position: Point3<i32>, block_type: BlockTypeSize, block_side: BlockSide) -> Self {
        Face {
            position,
            block_type,
            block_side,
        }
    }

    /// Generates the four corners of the face, counter-clockwise from outside.
    ///
    /// # Arguments
    /// * `atlas` - The atlas used to resolve texture coordinates
    ///
    /// # Returns
    /// Four vertices that form two triangles with the index pattern `0 1 2, 0 2 3`.
    pub fn vertices(&self, atlas: &Atlas) -> [Vertex; 4] {
        let rect = atlas.lookup(self.block_type, self.block_side);
        let brightness = self.block_side.brightness();
        let corners = self.block_side.corners();
        let origin = [
            self.position.x as f32,
            self.position.y as f32,
            self.position.z as f32,
        ];

        std::array::from_fn(|i| {
            let corner = corners[i];
            Vertex::new(
                [
                    origin[0] + corner[0],
                    origin[1] + corner[1],
                    origin[2] + corner[2],
                ],
                rect.map(CORNER_UVS[i]),
                brightness,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::block_type::BlockType;

    #[test]
    fn top_face_sits_one_unit_above_block() {
        let face = Face::new(Point3::new(-3, 4, 7), BlockType::GRASS.id(), BlockSide::TOP);
        let vertices = face.vertices(&Atlas::default());
        for vertex in vertices {
            assert_eq!(vertex.position[1], 5.0);
            assert_eq!(vertex.brightness, 1.0);
        }
        assert_eq!(vertices[0].position, [-3.0, 5.0, 8.0]);
    }

    #[test]
    fn uvs_stay_inside_the_atlas_cell() {
        let atlas = Atlas::default();
        let face = Face::new(Point3::new(0, 0, 0), BlockType::LOG.id(), BlockSide::FRONT);
        let rect = atlas.lookup(BlockType::LOG.id(), BlockSide::FRONT);
        for vertex in face.vertices(&atlas) {
            let [u, v] = vertex.tex_coords;
            assert!(u >= rect.u && u <= rect.u + rect.width + 1e-6);
            assert!(v >= rect.v && v <= rect.v + rect.height + 1e-6);
        }
    }
}
