//! # Camera Implementation
//!
//! This module contains the core camera implementation including:
//! - Camera position and yaw/pitch orientation
//! - View matrix derivation
//! - Keyboard and mouse driven movement
//! - Projection matrix handling
//!
//! ## Conventions
//!
//! Matrices are row-vector (`v' = v·M`). The look direction is the forward axis
//! `(0, 0, 1)` rotated by `RotX(pitch) · RotY(yaw)`; a positive pitch looks down.

use cgmath::Rad;
use web_time::Duration;
use winit::keyboard::KeyCode;

use crate::application_state::input_state::ProcessedInputState;
use crate::engine_state::math::{Mat4, Vec3};

/// Pitch limit in radians, just short of straight up or down.
pub const PITCH_LIMIT: f32 = 1.5;

/// Represents a first-person camera in 3D space.
#[derive(Debug, Clone)]
pub struct Camera {
    /// The camera's position in world space
    pub position: Vec3,
    /// Horizontal rotation (around Y axis); grows without bound
    pub yaw: Rad<f32>,
    /// Vertical rotation (around X axis), clamped to `±PITCH_LIMIT`
    pub pitch: Rad<f32>,
    /// Movement speed in units per second
    pub speed: f32,
    /// Radians of rotation per unit of mouse motion per second
    pub sensitivity: f32,
    /// Normalize the strafe vector so sideways speed does not depend on pitch
    pub level_strafe: bool,
}

impl Camera {
    /// Creates a new camera with the specified position and orientation.
    ///
    /// # Arguments
    /// * `position` - Initial position of the camera in world space
    /// * `yaw` - Initial yaw. Can be any type that converts to `Rad<f32>`.
    /// * `pitch` - Initial pitch. Can be any type that converts to `Rad<f32>`.
    ///
    /// # Returns
    /// A camera moving at 5 units per second with a mouse sensitivity of 2.
    pub fn new<Y: Into<Rad<f32>>, P: Into<Rad<f32>>>(position: Vec3, yaw: Y, pitch: P) -> Self {
        let mut camera = Self {
            position,
            yaw: yaw.into(),
            pitch: Rad(0.0),
            speed: 5.0,
            sensitivity: 2.0,
            level_strafe: false,
        };
        camera.set_pitch(pitch.into());
        camera
    }

    /// Overrides the movement parameters.
    pub fn with_controls(mut self, speed: f32, sensitivity: f32, level_strafe: bool) -> Self {
        self.speed = speed;
        self.sensitivity = sensitivity;
        self.level_strafe = level_strafe;
        self
    }

    fn set_pitch(&mut self, pitch: Rad<f32>) {
        self.pitch = Rad(pitch.0.clamp(-PITCH_LIMIT, PITCH_LIMIT));
    }

    /// The camera's rotation, `RotX(pitch) · RotY(yaw)`.
    fn rotation(&self) -> Mat4 {
        Mat4::rotation_x(self.pitch.0) * Mat4::rotation_y(self.yaw.0)
    }

    /// Gets the direction the camera is facing, a unit vector.
    pub fn look_direction(&self) -> Vec3 {
        self.rotation().transform(Vec3::FORWARD)
    }

    /// The sideways movement vector, `(look.z, 0, -look.x)`.
    ///
    /// Equal to `up × look`. It is not normalized unless `level_strafe` is set, so by
    /// default strafing slows down as the camera pitches towards vertical.
    pub fn lateral_direction(&self) -> Vec3 {
        let look = self.look_direction();
        let lateral = Vec3::new(look.z, 0.0, -look.x);
        if self.level_strafe {
            lateral.try_normalize().unwrap_or(lateral)
        } else {
            lateral
        }
    }

    /// Calculates the view matrix for this camera.
    ///
    /// The view matrix transforms world coordinates to view (camera) space; it is the
    /// inverse of the matrix that places the camera at its position facing
    /// `position + look`.
    pub fn view_matrix(&self) -> Mat4 {
        let target = self.position + self.look_direction();
        Mat4::look_at(self.position, target, Vec3::UP).fast_inverse()
    }

    /// Applies mouse movement to yaw and pitch.
    ///
    /// # Arguments
    /// * `dx` - Horizontal mouse motion
    /// * `dy` - Vertical mouse motion; positive turns the view downwards
    /// * `dt` - Time elapsed since the last update
    pub fn process_mouse_input(&mut self, dx: f64, dy: f64, dt: Duration) {
        let dt = dt.as_secs_f32();
        self.yaw += Rad(dx as f32 * self.sensitivity * dt);
        self.set_pitch(self.pitch + Rad(dy as f32 * self.sensitivity * dt));
    }

    /// Applies held movement keys.
    ///
    /// - W / S: along the look direction
    /// - A / D: along the lateral direction
    /// - Space / Left Shift: straight up or down
    ///
    /// # Returns
    /// `true` if Escape is down and the application should exit.
    pub fn process_keyboard_input(&mut self, input: &ProcessedInputState, dt: Duration) -> bool {
        let step = self.speed * dt.as_secs_f32();
        let forward = self.look_direction() * step;
        let lateral = self.lateral_direction() * step;

        if input.is_key_active(KeyCode::KeyW) {
            self.position = self.position + forward;
        }
        if input.is_key_active(KeyCode::KeyS) {
            self.position = self.position - forward;
        }
        if input.is_key_active(KeyCode::KeyA) {
            self.position = self.position + lateral;
        }
        if input.is_key_active(KeyCode::KeyD) {
            self.position = self.position - lateral;
        }
        if input.is_key_active(KeyCode::Space) {
            self.position.y += step;
        }
        if input.is_key_active(KeyCode::ShiftLeft) {
            self.position.y -= step;
        }

        input.is_key_active(KeyCode::Escape)
    }
}

/// Represents a camera's projection matrix and related parameters.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    /// `height / width`
    aspect: f32,
    /// Field of view in degrees
    fov_degrees: f32,
    /// Near clipping plane distance
    znear: f32,
    /// Far clipping plane distance
    zfar: f32,
}

impl Projection {
    /// Creates a new projection with the given parameters.
    ///
    /// # Arguments
    /// * `width` - Viewport width in pixels
    /// * `height` - Viewport height in pixels
    /// * `fov_degrees` - Field of view
    /// * `znear` - Near clipping plane distance
    /// * `zfar` - Far clipping plane distance
    pub fn new(width: u32, height: u32, fov_degrees: f32, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: height as f32 / width as f32,
            fov_degrees,
            znear,
            zfar,
        }
    }

    /// Updates the projection's aspect ratio for viewport resizing.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = height as f32 / width as f32;
    }

    pub fn znear(&self) -> f32 {
        self.znear
    }

    /// Calculates the projection matrix.
    pub fn calc_matrix(&self) -> Mat4 {
        Mat4::perspective(self.fov_degrees, self.aspect, self.znear, self.zfar)
    }
}
