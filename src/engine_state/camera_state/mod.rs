//! # Camera State Management
//!
//! This module handles all camera-related functionality including:
//! - Camera position and orientation tracking
//! - View and projection matrix calculations
//! - Player input processing for camera control
//! - Chunk tracking based on camera position
//!
//! ## Core Components
//! - `Camera`: the camera's position and orientation, plus its movement controls
//! - `Projection`: the perspective projection parameters

use cgmath::{Point3, Rad};
use web_time::Duration;

use crate::application_state::input_state::ProcessedInputState;
use crate::engine_state::config::{CameraConfig, ProjectionConfig, ViewportConfig};
use crate::engine_state::math::Vec3;
use crate::engine_state::voxels::world::World;

pub mod camera;

/// Manages the camera and its projection.
pub struct CameraState {
    /// The current camera position and orientation
    pub camera: camera::Camera,
    /// The perspective projection
    pub projection: camera::Projection,
    /// The chunk the camera was in after the last update
    chunk_position: Point3<i32>,
}

impl CameraState {
    /// Creates a camera at the configured spawn point, looking down +Z.
    pub fn new(
        camera_config: &CameraConfig,
        projection_config: &ProjectionConfig,
        viewport: &ViewportConfig,
    ) -> Self {
        let [x, y, z] = camera_config.spawn;
        let camera = camera::Camera::new(Vec3::new(x, y, z), Rad(0.0), Rad(0.0)).with_controls(
            camera_config.move_speed,
            camera_config.mouse_sensitivity,
            camera_config.level_strafe,
        );
        let projection = camera::Projection::new(
            viewport.width,
            viewport.height,
            projection_config.fov_degrees,
            projection_config.near,
            projection_config.far,
        );
        let chunk_position = Self::chunk_of(camera.position);

        CameraState {
            camera,
            projection,
            chunk_position,
        }
    }

    fn chunk_of(position: Vec3) -> Point3<i32> {
        World::chunk_coord_of(World::block_coord_of(position))
    }

    /// Applies one frame of input to the camera.
    ///
    /// # Arguments
    /// * `input` - The processed input of this frame
    /// * `dt` - Time elapsed since the last update
    ///
    /// # Returns
    /// - `CameraUpdates` describing the new chunk and whether exit was requested
    pub fn update(&mut self, input: &ProcessedInputState, dt: Duration) -> CameraUpdates {
        if let Some((dx, dy)) = input.get_mouse_delta() {
            self.camera.process_mouse_input(dx, dy, dt);
        }
        let exit_requested = self.camera.process_keyboard_input(input, dt);

        let new_chunk_position = Self::chunk_of(self.camera.position);
        let chunk_changed = new_chunk_position != self.chunk_position;
        self.chunk_position = new_chunk_position;

        CameraUpdates {
            new_chunk_position,
            chunk_changed,
            exit_requested,
        }
    }
}

/// Represents updates to the camera's state that affect game world interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraUpdates {
    /// The current chunk position of the camera
    pub new_chunk_position: Point3<i32>,
    /// Whether the camera crossed into another chunk this frame
    pub chunk_changed: bool,
    /// Escape was down
    pub exit_requested: bool,
}
