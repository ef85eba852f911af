//! # Engine State Module
//!
//! The core engine module that owns every subsystem of the voxel renderer.
//!
//! ## Key Components
//!
//! * `EngineState` - The main state container for the engine
//! * `camera_state` - Handles camera positioning and movement
//! * `config` - Engine configuration loaded from JSON
//! * `math` - Row-vector vector and matrix types used by the pipeline
//! * `rendering` - Texture atlas, chunk meshing and the software geometry pipeline
//! * `voxels` - Handles voxel data, chunks, terrain and the chunk-streaming world
//!
//! ## Frame Flow
//!
//! Each frame the driver hands the engine a processed input snapshot, then asks it to
//! update the world around the camera and render:
//!
//! 1. `process_input` moves the camera and reports whether exit was requested
//! 2. `update` streams chunks around the camera chunk and remeshes dirty chunks
//! 3. `render` runs the opaque and transparent passes through the geometry pipeline

use cgmath::Point3;
use log::{debug, info};
use web_time::Duration;

use crate::application_state::input_state::ProcessedInputState;

pub mod camera_state;
pub mod config;
pub mod math;
pub mod rendering;
pub mod voxels;

use camera_state::CameraState;
use config::EngineConfig;
use rendering::{atlas::Atlas, DrawList, FrameStats, GeometryPipeline, MeshRenderer, Viewport};
use voxels::world::{StreamingUpdate, World};

/// The main state container for the voxel engine
///
/// This struct owns the camera, the world and the renderer, and sequences their work
/// within a frame.
///
/// # Examples
///
/// ```no_run
/// use voxel_painter::engine_state::{config::EngineConfig, EngineState};
///
/// let mut engine_state = EngineState::new(&EngineConfig::default());
/// engine_state.update();
/// let frame = engine_state.render();
/// println!("{} triangles", frame.triangle_count());
/// ```
pub struct EngineState {
    /// Camera state managing position, orientation and movement
    pub camera_state: CameraState,
    /// The voxel world containing all chunk data
    pub world: World,
    /// Draws the world through the geometry pipeline
    pub renderer: MeshRenderer,
    /// The configuration the engine was built from
    config: EngineConfig,
}

impl EngineState {
    /// Creates a new engine state with all subsystems initialized
    ///
    /// No chunks are loaded until the first call to [`EngineState::update`].
    pub fn new(config: &EngineConfig) -> Self {
        let camera_state = CameraState::new(&config.camera, &config.projection, &config.viewport);

        let atlas = Atlas::new(config.atlas.columns, config.atlas.rows);
        let world = World::new(
            config.world.terrain.build(config.world.seed),
            atlas,
            config.world.face_layout,
        )
        .with_streaming(config.world.render_distance, config.world.world_height);

        let projection = &camera_state.projection;
        let pipeline = GeometryPipeline::new(
            projection.calc_matrix(),
            Viewport::new(config.viewport.width, config.viewport.height),
            projection.znear(),
        );

        info!(
            "Engine initialized: {}x{} viewport, {:?} terrain, render distance {}",
            config.viewport.width,
            config.viewport.height,
            config.world.terrain,
            config.world.render_distance
        );

        Self {
            camera_state,
            world,
            renderer: MeshRenderer::new(pipeline),
            config: *config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Resizes the output viewport, keeping the projection's aspect ratio in step.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.camera_state.projection.resize(width, height);
        self.renderer
            .pipeline
            .set_projection(self.camera_state.projection.calc_matrix());
        self.renderer.pipeline.set_viewport(Viewport::new(width, height));
    }

    /// Processes input and updates the camera
    ///
    /// # Arguments
    ///
    /// * `input` - The processed input of this frame
    /// * `dt` - The time elapsed since the last frame
    ///
    /// # Returns
    ///
    /// `true` if the application should exit.
    pub fn process_input(&mut self, input: &ProcessedInputState, dt: Duration) -> bool {
        let updates = self.camera_state.update(input, dt);
        if updates.chunk_changed {
            debug!("Camera moved to chunk {:?}", updates.new_chunk_position);
        }
        updates.exit_requested
    }

    /// Streams chunks around the camera and remeshes the chunks that changed.
    pub fn update(&mut self) -> StreamingUpdate {
        let streaming = self.world.update_camera_chunk(self.camera_state.camera.position);
        self.world.rebuild_dirty_meshes();
        streaming
    }

    /// Renders the current frame
    ///
    /// # Returns
    ///
    /// The screen-space draw list, valid until the next render.
    pub fn render(&mut self) -> &DrawList {
        self.renderer.render(&self.world, &self.camera_state.camera)
    }

    pub fn frame_stats(&self) -> FrameStats {
        self.renderer.stats()
    }

    /// The chunk the camera is currently in.
    pub fn camera_chunk(&self) -> Point3<i32> {
        World::chunk_coord_of(World::block_coord_of(self.camera_state.camera.position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::terrain::TerrainKind;
    use winit::keyboard::KeyCode;

    fn small_config() -> EngineConfig {
        let mut config = EngineConfig::default();
        config.viewport.width = 320;
        config.viewport.height = 240;
        config.world.render_distance = 1;
        config.world.world_height = 1;
        config.camera.spawn = [8.0, 6.0, 8.0];
        config
    }

    #[test]
    fn update_streams_the_window_around_the_camera() {
        let mut engine = EngineState::new(&small_config());
        assert_eq!(engine.world.chunk_count(), 0);

        let update = engine.update();
        assert_eq!(update.loaded, 9);
        assert_eq!(engine.world.chunk_count(), 9);
        assert!(engine.world.chunks().all(|chunk| !chunk.is_dirty()));

        assert_eq!(engine.update(), StreamingUpdate::default());
    }

    #[test]
    fn terrain_below_the_camera_is_drawn() {
        let mut config = small_config();
        config.world.terrain = TerrainKind::Solid;
        config.camera.spawn = [8.0, 20.0, 8.0];
        let mut engine = EngineState::new(&config);
        engine.camera_state.camera.pitch = cgmath::Rad(1.2);
        engine.update();

        let triangles = engine.render().triangle_count();
        assert!(triangles > 0);
        assert_eq!(engine.frame_stats().output, triangles);
    }

    #[test]
    fn empty_world_renders_nothing() {
        let mut config = small_config();
        config.world.terrain = TerrainKind::Empty;
        let mut engine = EngineState::new(&config);
        engine.update();
        assert!(engine.render().is_empty());
        assert_eq!(engine.frame_stats().submitted, 0);
    }

    #[test]
    fn escape_requests_exit() {
        let mut engine = EngineState::new(&small_config());
        let dt = Duration::from_millis(16);
        assert!(!engine.process_input(&ProcessedInputState::default(), dt));
        assert!(engine.process_input(&ProcessedInputState::from_held(&[KeyCode::Escape], None), dt));
    }

    #[test]
    fn resize_updates_the_viewport() {
        let mut engine = EngineState::new(&small_config());
        engine.resize(640, 480);
        assert_eq!(engine.renderer.pipeline.viewport(), Viewport::new(640, 480));
        engine.resize(0, 480);
        assert_eq!(engine.renderer.pipeline.viewport(), Viewport::new(640, 480));
    }
}
