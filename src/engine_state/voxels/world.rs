//! # World Module
//!
//! This module provides the `World` struct, the chunk manager of the voxel engine. It
//! owns every loaded chunk, resolves world block coordinates to chunks, keeps chunk
//! meshes up to date and hands visible geometry to the renderer.
//!
//! ## Architecture
//!
//! Chunks live in a sparse hash map keyed by chunk coordinate. Chunks never point at
//! each other; neighbour lookups are map queries. When a chunk is remeshed it is taken
//! out of the map for the duration of the rebuild so that its neighbours can be borrowed
//! immutably from the map at the same time.
//!
//! ## Coordinates
//!
//! World block coordinates map to chunks with floor division and to chunk-local cells
//! with the euclidean remainder, so negative coordinates resolve correctly:
//! `(-1, 5, 20)` lives in chunk `(-1, 0, 1)` at local `(15, 5, 4)`.
//!
//! ## Streaming
//!
//! The world tracks which chunk the camera is in. When that changes it generates the
//! missing chunks inside the render distance and drops the ones that left it.

use std::collections::HashMap;

use cgmath::Point3;
use log::{debug, info};
use web_time::Instant;

use super::block::{block_side::BlockSide, block_type::BlockType, BlockTypeSize, AIR};
use super::chunk::{Chunk, ChunkNeighbors, CHUNK_DIMENSION};
use super::terrain::TerrainGenerator;
use crate::engine_state::math::Vec3;
use crate::engine_state::rendering::{atlas::Atlas, meshing::FaceLayout, triangle::Triangle};

/// Which mesh stream a render pass draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPass {
    /// Opaque faces, drawn first
    Opaque,
    /// Transparent faces, drawn after every opaque face
    Transparent,
}

/// What changed during a call to [`World::update_camera_chunk`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StreamingUpdate {
    /// Chunks generated and inserted
    pub loaded: usize,
    /// Chunks dropped
    pub unloaded: usize,
}

/// Represents a voxel world composed of multiple chunks.
pub struct World {
    /// A mapping from chunk coordinates to chunk data.
    chunks: HashMap<Point3<i32>, Chunk>,
    /// Fills newly loaded chunks
    generator: Box<dyn TerrainGenerator>,
    /// Atlas used when meshing
    atlas: Atlas,
    /// Face layout given to every chunk mesh
    face_layout: FaceLayout,
    /// Horizontal streaming radius in chunks
    render_distance: i32,
    /// Number of chunk layers streamed, starting at chunk y = 0
    world_height: i32,
    /// The chunk the camera was last seen in
    camera_chunk: Option<Point3<i32>>,
}

impl World {
    /// Creates a new, empty world.
    ///
    /// # Arguments
    /// * `generator` - Produces the contents of streamed chunks
    /// * `atlas` - Texture atlas for meshing
    /// * `face_layout` - Indexed or duplicated mesh output
    pub fn new(generator: Box<dyn TerrainGenerator>, atlas: Atlas, face_layout: FaceLayout) -> Self {
        World {
            chunks: HashMap::new(),
            generator,
            atlas,
            face_layout,
            render_distance: 5,
            world_height: 8,
            camera_chunk: None,
        }
    }

    /// Sets the streaming window used by [`World::update_camera_chunk`].
    ///
    /// # Arguments
    /// * `render_distance` - Horizontal radius in chunks
    /// * `world_height` - Number of chunk layers, starting at chunk y = 0
    pub fn with_streaming(mut self, render_distance: u32, world_height: u32) -> Self {
        self.render_distance = render_distance as i32;
        self.world_height = world_height as i32;
        self
    }

    /// The chunk containing world block coordinates `world`.
    pub fn chunk_coord_of(world: Point3<i32>) -> Point3<i32> {
        Point3::new(
            world.x.div_euclid(CHUNK_DIMENSION),
            world.y.div_euclid(CHUNK_DIMENSION),
            world.z.div_euclid(CHUNK_DIMENSION),
        )
    }

    /// The cell of `world` inside its chunk; every component is in `0..16`.
    pub fn local_coord_of(world: Point3<i32>) -> Point3<i32> {
        Point3::new(
            world.x.rem_euclid(CHUNK_DIMENSION),
            world.y.rem_euclid(CHUNK_DIMENSION),
            world.z.rem_euclid(CHUNK_DIMENSION),
        )
    }

    /// The block containing a floating point world position.
    pub fn block_coord_of(position: Vec3) -> Point3<i32> {
        Point3::new(
            position.x.floor() as i32,
            position.y.floor() as i32,
            position.z.floor() as i32,
        )
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Retrieves the chunk at the specified chunk coordinates.
    pub fn get_chunk_at(&self, position: Point3<i32>) -> Option<&Chunk> {
        self.chunks.get(&position)
    }

    /// Iterates over all loaded chunks in no particular order.
    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    /// Generates and adds the chunk at `position` if it is not loaded yet.
    ///
    /// # Returns
    /// `true` if a chunk was generated.
    pub fn add_chunk_at(&mut self, position: Point3<i32>) -> bool {
        if self.chunks.contains_key(&position) {
            return false;
        }
        let chunk = self.generator.generate(position);
        self.insert_chunk(chunk);
        true
    }

    /// Inserts a chunk, replacing any chunk at the same position.
    ///
    /// The new chunk and its loaded neighbours are marked for remeshing, since faces on
    /// their shared boundary may have become hidden.
    pub fn insert_chunk(&mut self, mut chunk: Chunk) {
        let position = chunk.position;
        chunk.set_face_layout(self.face_layout);
        chunk.mark_dirty();
        self.chunks.insert(position, chunk);
        self.mark_neighbors_dirty(position);
    }

    /// Removes and returns the chunk at `position`. Neighbours are marked for remeshing.
    pub fn remove_chunk(&mut self, position: Point3<i32>) -> Option<Chunk> {
        let removed = self.chunks.remove(&position);
        if removed.is_some() {
            self.mark_neighbors_dirty(position);
        }
        removed
    }

    fn mark_neighbors_dirty(&mut self, position: Point3<i32>) {
        for side in BlockSide::all() {
            if let Some(neighbor) = self.chunks.get_mut(&(position + side.normal())) {
                neighbor.mark_dirty();
            }
        }
    }

    /// Gets the block id at world block coordinates.
    ///
    /// # Returns
    /// The block id, or [`AIR`] when the chunk is not loaded.
    pub fn get_block(&self, world: Point3<i32>) -> BlockTypeSize {
        let local = Self::local_coord_of(world);
        self.chunks
            .get(&Self::chunk_coord_of(world))
            .map_or(AIR, |chunk| chunk.get_block(local.x, local.y, local.z))
    }

    /// Sets the block at world block coordinates.
    ///
    /// The owning chunk is marked for remeshing; when the block sits on a chunk
    /// boundary, so is every loaded neighbour sharing that boundary face.
    ///
    /// # Returns
    /// `true` if the block changed. Writes into chunks that are not loaded are ignored
    /// and return `false`.
    pub fn set_block(&mut self, world: Point3<i32>, block: BlockTypeSize) -> bool {
        let chunk_position = Self::chunk_coord_of(world);
        let local = Self::local_coord_of(world);
        let changed = match self.chunks.get_mut(&chunk_position) {
            Some(chunk) => chunk.set_block(local.x, local.y, local.z, block),
            None => false,
        };

        if changed {
            for side in Self::boundary_sides(local) {
                if let Some(neighbor) = self.chunks.get_mut(&(chunk_position + side.normal())) {
                    neighbor.mark_dirty();
                }
            }
        }
        changed
    }

    /// The sides of the chunk a local cell touches.
    fn boundary_sides(local: Point3<i32>) -> impl Iterator<Item = BlockSide> {
        let last = CHUNK_DIMENSION - 1;
        [
            (local.z == last, BlockSide::FRONT),
            (local.z == 0, BlockSide::BACK),
            (local.y == last, BlockSide::TOP),
            (local.y == 0, BlockSide::BOTTOM),
            (local.x == last, BlockSide::RIGHT),
            (local.x == 0, BlockSide::LEFT),
        ]
        .into_iter()
        .filter_map(|(touches, side)| touches.then_some(side))
    }

    /// Places a block into an empty cell.
    ///
    /// # Returns
    /// `true` if the cell was air and is now `block`.
    pub fn place_block(&mut self, world: Point3<i32>, block: BlockType) -> bool {
        self.get_block(world) == AIR && self.set_block(world, block.id())
    }

    /// Removes the block at `world`.
    ///
    /// # Returns
    /// `true` if there was a block to remove.
    pub fn delete_block(&mut self, world: Point3<i32>) -> bool {
        self.set_block(world, AIR)
    }

    /// Sets every block in the inclusive box spanned by `a` and `b`.
    ///
    /// # Returns
    /// The number of blocks that changed.
    pub fn fill_blocks(&mut self, a: Point3<i32>, b: Point3<i32>, block: BlockTypeSize) -> usize {
        let mut changed = 0;
        for z in a.z.min(b.z)..=a.z.max(b.z) {
            for y in a.y.min(b.y)..=a.y.max(b.y) {
                for x in a.x.min(b.x)..=a.x.max(b.x) {
                    if self.set_block(Point3::new(x, y, z), block) {
                        changed += 1;
                    }
                }
            }
        }
        changed
    }

    /// Whether a chunk lies inside the streaming window around `center`.
    fn in_range(&self, center: Point3<i32>, position: Point3<i32>) -> bool {
        (position.x - center.x).abs() <= self.render_distance
            && (position.z - center.z).abs() <= self.render_distance
            && (0..self.world_height).contains(&position.y)
    }

    /// Tracks the camera and streams chunks when it enters a new chunk.
    ///
    /// # Arguments
    /// * `camera_position` - The camera's world position
    ///
    /// # Returns
    /// How many chunks were loaded and unloaded. Both are zero while the camera stays
    /// inside the same chunk.
    pub fn update_camera_chunk(&mut self, camera_position: Vec3) -> StreamingUpdate {
        let center = Self::chunk_coord_of(Self::block_coord_of(camera_position));
        if self.camera_chunk == Some(center) {
            return StreamingUpdate::default();
        }
        self.camera_chunk = Some(center);

        let start = Instant::now();
        let stale: Vec<Point3<i32>> = self
            .chunks
            .keys()
            .copied()
            .filter(|&position| !self.in_range(center, position))
            .collect();
        let mut update = StreamingUpdate::default();
        for position in stale {
            if self.remove_chunk(position).is_some() {
                update.unloaded += 1;
            }
        }

        let rd = self.render_distance;
        for x in center.x - rd..=center.x + rd {
            for z in center.z - rd..=center.z + rd {
                for y in 0..self.world_height {
                    if self.add_chunk_at(Point3::new(x, y, z)) {
                        update.loaded += 1;
                    }
                }
            }
        }

        info!(
            "Camera entered chunk {:?}: loaded {}, unloaded {} chunks in {:?}",
            center,
            update.loaded,
            update.unloaded,
            start.elapsed()
        );
        update
    }

    /// Remeshes every dirty chunk.
    ///
    /// Each chunk is removed from the map while it is rebuilt so its loaded neighbours
    /// can be borrowed from the map, then put back.
    ///
    /// # Returns
    /// The number of chunks rebuilt.
    pub fn rebuild_dirty_meshes(&mut self) -> usize {
        let dirty: Vec<Point3<i32>> = self
            .chunks
            .iter()
            .filter(|(_, chunk)| chunk.is_dirty())
            .map(|(position, _)| *position)
            .collect();
        if dirty.is_empty() {
            return 0;
        }

        let start = Instant::now();
        for position in &dirty {
            let Some(mut chunk) = self.chunks.remove(position) else {
                continue;
            };
            let chunks = &self.chunks;
            let neighbors = ChunkNeighbors::gather(*position, |p| chunks.get(&p));
            chunk.rebuild_mesh(&neighbors, &self.atlas);
            self.chunks.insert(*position, chunk);
        }
        debug!("Rebuilt {} chunk meshes in {:?}", dirty.len(), start.elapsed());
        dirty.len()
    }

    /// Appends the triangles of one render pass to `out`.
    ///
    /// Only chunks inside the streaming window around the camera chunk are visited;
    /// before the camera has been tracked every loaded chunk is.
    pub fn append_pass_triangles(&self, pass: RenderPass, out: &mut Vec<Triangle>) {
        for chunk in self.chunks.values() {
            if let Some(center) = self.camera_chunk {
                if !self.in_range(center, chunk.position) {
                    continue;
                }
            }
            let mesh = chunk.mesh();
            match pass {
                RenderPass::Opaque => mesh.opaque.append_triangles(out),
                RenderPass::Transparent => mesh.transparent.append_triangles(out),
            }
        }
    }
}
