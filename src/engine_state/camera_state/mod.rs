//! # Camera State Management
//!
//! This module handles all camera-related functionality including:
//! - Camera position and orientation tracking
//! - Player input processing for camera control
//! - The turntable animation applied between frames
//!
//! ## Core Components
//! - `Camera`: Represents the camera's position and orientation in 3D space
//! - `CameraController`: Handles player input and updates camera state
//! - `CameraBasis`: The per-frame orientation used to build rays
//!
//! The camera is stored in an `MtResource` so a frame can hold a read lock
//! while rendering and the driver can take a write lock between frames.

use camera::{Camera, CameraController};
use cgmath::Deg;
use log::debug;

use crate::core::MtResource;

use super::PlayerAction;

pub mod camera;

/// Default movement speed of the camera controller, in units per second.
const CAMERA_SPEED: f32 = 8.0;
/// Default rotation of the camera controller, in degrees per unit of mouse movement.
const CAMERA_SENSITIVITY: f32 = 0.2;

/// Manages the camera, its controller and the turntable animation.
pub struct CameraState {
    /// The shared camera position and orientation
    pub camera: MtResource<Camera>,
    /// Handles player input and camera movement
    pub camera_controller: CameraController,
    /// Yaw added after every frame
    yaw_per_frame: Deg<f32>,
    /// Pitch added after every frame
    pitch_per_frame: Deg<f32>,
}

impl CameraState {
    /// Creates a new CameraState.
    ///
    /// # Arguments
    /// * `camera` - The initial camera
    /// * `yaw_per_frame` - Yaw added between frames
    /// * `pitch_per_frame` - Pitch added between frames
    pub fn new(camera: Camera, yaw_per_frame: Deg<f32>, pitch_per_frame: Deg<f32>) -> Self {
        CameraState {
            camera: MtResource::new(camera),
            camera_controller: CameraController::new(CAMERA_SPEED, CAMERA_SENSITIVITY),
            yaw_per_frame,
            pitch_per_frame,
        }
    }

    /// Returns a copy of the current camera.
    pub fn snapshot(&self) -> Camera {
        *self.camera.get()
    }

    /// Processes player input actions and updates the camera controller state.
    ///
    /// # Arguments
    /// * `actions` - The player's input actions to process
    pub fn intake_actions(&mut self, actions: &PlayerAction) {
        self.camera_controller.intake_actions(actions);
    }

    /// Applies pending input and the turntable animation.
    ///
    /// Must only be called between frames.
    ///
    /// # Arguments
    /// * `dt` - Time elapsed since the last update
    ///
    /// # Returns
    /// `true` if the camera changed
    pub fn update(&mut self, dt: web_time::Duration) -> bool {
        let animated = self.yaw_per_frame.0 != 0.0 || self.pitch_per_frame.0 != 0.0;
        if !animated && !self.camera_controller.has_updates() {
            return false;
        }

        let mut camera = self.camera.get_mut();
        if self.camera_controller.has_updates() {
            camera.get_controller_updates_and_reset_controller(&mut self.camera_controller, dt);
        }
        if animated {
            camera.turn(self.yaw_per_frame, self.pitch_per_frame);
        }

        debug!(
            "Camera at {:?}, yaw {:.2}, pitch {:.2}",
            camera.position, camera.yaw.0, camera.pitch.0
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Point3;
    use web_time::Duration;

    #[test]
    fn test_static_camera_does_not_update() {
        let mut state = CameraState::new(Camera::default(), Deg(0.0), Deg(0.0));
        assert!(!state.update(Duration::from_millis(16)));
        assert_eq!(state.snapshot(), Camera::default());
    }

    #[test]
    fn test_turntable_advances_between_frames() {
        let start = Camera::new(Point3::new(1.0, 2.0, 3.0), Deg(0.0), Deg(0.0));
        let mut state = CameraState::new(start, Deg(5.0), Deg(-1.0));

        assert!(state.update(Duration::from_millis(16)));
        assert!(state.update(Duration::from_millis(16)));

        let camera = state.snapshot();
        assert_eq!(camera.position, start.position);
        assert_eq!(camera.yaw, Deg(10.0));
        assert_eq!(camera.pitch, Deg(-2.0));
    }

    #[test]
    fn test_player_actions_reach_the_shared_camera() {
        let mut state = CameraState::new(Camera::default(), Deg(0.0), Deg(0.0));
        let shared = state.camera.clone();

        state.intake_actions(&PlayerAction {
            move_up: true,
            ..Default::default()
        });
        assert!(state.update(Duration::from_secs(1)));

        assert_eq!(shared.get().position.y, CAMERA_SPEED);
    }
}
