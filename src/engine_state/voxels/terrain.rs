//! # Terrain Generation
//!
//! Terrain generators hand the world a freshly filled chunk for a chunk coordinate.
//! They are deliberately simple; the world only depends on the [`TerrainGenerator`]
//! trait, so richer generators can be plugged in without touching meshing.

use cgmath::Point3;
use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

use super::block::{block_type::BlockType, AIR};
use super::chunk::{chunk_creation::ChunkCreationIterator, Chunk, CHUNK_DIMENSION, CHUNK_SIZE};

/// Threshold above which Perlin noise is considered solid for terrain generation.
pub const PERLIN_POSITIVE_THRESHOLD: f64 = 0.2;
/// Threshold below which Perlin noise is considered solid for terrain generation.
pub const PERLIN_NEGATIVE_THRESHOLD: f64 = -0.2;
/// Scaling factor applied to world coordinates when sampling Perlin noise.
pub const PERLIN_SCALE_FACTOR: f64 = 0.02;
/// Fraction of cells left empty by [`RandomTerrain`].
pub const RANDOM_SPARSENESS: f64 = 0.9;

/// Produces the initial contents of a chunk.
pub trait TerrainGenerator {
    /// Generates the chunk at chunk coordinates `position`.
    fn generate(&self, position: Point3<i32>) -> Chunk;
}

/// The built-in generators, selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerrainKind {
    /// Flat stone, dirt and grass strata
    #[default]
    Layered,
    /// Thresholded 3D Perlin noise
    Perlin,
    /// Sparse random blocks
    Random,
    /// Every chunk full of dirt
    Solid,
    /// Nothing but air
    Empty,
}

impl TerrainKind {
    /// Creates the generator for this kind.
    ///
    /// # Arguments
    /// * `seed` - Seed for the noise and random generators; ignored by the others
    pub fn build(self, seed: u64) -> Box<dyn TerrainGenerator> {
        match self {
            TerrainKind::Layered => Box::new(LayeredTerrain),
            TerrainKind::Perlin => Box::new(PerlinTerrain::new(seed)),
            TerrainKind::Random => Box::new(RandomTerrain::new(seed)),
            TerrainKind::Solid => Box::new(SolidTerrain),
            TerrainKind::Empty => Box::new(EmptyTerrain),
        }
    }
}

/// Stone below chunk layer 3, a stone/dirt/grass surface in layer 3, air above.
#[derive(Debug, Default, Clone, Copy)]
pub struct LayeredTerrain;

/// Chunk layer that holds the surface.
const SURFACE_CHUNK_Y: i32 = 3;

impl TerrainGenerator for LayeredTerrain {
    fn generate(&self, position: Point3<i32>) -> Chunk {
        match position.y {
            y if y < SURFACE_CHUNK_Y => Chunk::filled(position, BlockType::STONE.id()),
            SURFACE_CHUNK_Y => {
                let mut chunk = Chunk::empty(position);
                chunk.set_horizontal_layer(0, 10, BlockType::STONE.id());
                chunk.set_horizontal_layer(10, 4, BlockType::DIRT.id());
                chunk.set_horizontal_layer(14, 1, BlockType::GRASS.id());
                chunk
            }
            _ => Chunk::empty(position),
        }
    }
}

/// Caves and overhangs carved out of 3D Perlin noise.
///
/// A cell is solid where the noise leaves the `[-0.2, 0.2]` band. Solid cells get a
/// random block type drawn from a generator seeded by the chunk position, so the same
/// chunk always comes out the same.
pub struct PerlinTerrain {
    perlin: Perlin,
    seed: u64,
}

impl PerlinTerrain {
    pub fn new(seed: u64) -> Self {
        PerlinTerrain {
            perlin: Perlin::new(seed as u32),
            seed,
        }
    }

    /// Converts world block coordinates to noise-space coordinates.
    fn to_perlin_pos(pos: Point3<i32>, scale_factor: f64) -> [f64; 3] {
        [
            pos.x as f64 * scale_factor,
            pos.y as f64 * scale_factor,
            pos.z as f64 * scale_factor,
        ]
    }
}

impl TerrainGenerator for PerlinTerrain {
    fn generate(&self, position: Point3<i32>) -> Chunk {
        let mut rng = fastrand::Rng::with_seed(chunk_seed(self.seed, position));
        let mut cci = ChunkCreationIterator::new(position);

        while let Some(local) = cci.next_local_position() {
            let world = Point3::new(
                local.x + CHUNK_DIMENSION * position.x,
                local.y + CHUNK_DIMENSION * position.y,
                local.z + CHUNK_DIMENSION * position.z,
            );
            let sample = self
                .perlin
                .get(Self::to_perlin_pos(world, PERLIN_SCALE_FACTOR));
            if (PERLIN_NEGATIVE_THRESHOLD..=PERLIN_POSITIVE_THRESHOLD).contains(&sample) {
                cci.push_block(AIR);
            } else {
                cci.push_block(BlockType::random_solid(&mut rng).id());
            }
        }

        cci.return_chunk()
    }
}

/// Mostly empty chunks with a scattering of random blocks.
#[derive(Debug, Clone, Copy)]
pub struct RandomTerrain {
    seed: u64,
}

impl RandomTerrain {
    pub fn new(seed: u64) -> Self {
        RandomTerrain { seed }
    }
}

impl TerrainGenerator for RandomTerrain {
    fn generate(&self, position: Point3<i32>) -> Chunk {
        let mut rng = fastrand::Rng::with_seed(chunk_seed(self.seed, position));
        let mut cci = ChunkCreationIterator::new(position);

        for _ in 0..CHUNK_SIZE {
            if rng.f64() < RANDOM_SPARSENESS {
                cci.push_block(AIR);
            } else {
                cci.push_block(BlockType::random_solid(&mut rng).id());
            }
        }

        cci.return_chunk()
    }
}

/// Every chunk completely filled with dirt.
#[derive(Debug, Default, Clone, Copy)]
pub struct SolidTerrain;

impl TerrainGenerator for SolidTerrain {
    fn generate(&self, position: Point3<i32>) -> Chunk {
        Chunk::filled(position, BlockType::DIRT.id())
    }
}

/// Every chunk empty.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyTerrain;

impl TerrainGenerator for EmptyTerrain {
    fn generate(&self, position: Point3<i32>) -> Chunk {
        Chunk::empty(position)
    }
}

/// Mixes a world seed with a chunk coordinate.
fn chunk_seed(seed: u64, position: Point3<i32>) -> u64 {
    let mix = |v: i32, k: u64| (v as u32 as u64).wrapping_mul(k);
    seed ^ mix(position.x, 0x9E37_79B9_7F4A_7C15)
        ^ mix(position.y, 0xC2B2_AE3D_27D4_EB4F)
        ^ mix(position.z, 0x1656_67B1_9E37_79F9)
}
