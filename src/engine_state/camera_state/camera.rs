//! # Camera Implementation
//!
//! This module contains the camera model used by the ray marcher:
//! - Camera position and orientation in degrees
//! - The right/up/forward basis derived from yaw and pitch
//! - Per-pixel primary ray directions
//! - Camera controller for input processing
//!
//! ## Key Components
//! - `Camera`: the camera's position and orientation in 3D space
//! - `CameraBasis`: the orthonormal frame for one frame's yaw and pitch
//! - `Projection`: resolution and field of view, producing camera-space rays
//! - `CameraController`: accumulates player input between frames
//!
//! ## Angles
//!
//! All angles are in degrees. Trig helpers divide by `180 / PI` before calling
//! `sin`/`cos`/`tan`, and rotations use the `t = 1 - cos` expansion of
//! Rodrigues' formula, so the directions agree bit for bit with other
//! renderers that follow the same arithmetic.

use std::f32::consts::PI;

use cgmath::{Deg, InnerSpace, Point3, Vector3};
use web_time::Duration;

use crate::engine_state::PlayerAction;

/// Default horizontal field of view before aspect scaling, in degrees.
pub const DEFAULT_FOV_DEGREES: f32 = 90.0;
/// Lowest allowed pitch, in degrees.
pub const MIN_PITCH_DEGREES: f32 = -90.0;
/// Highest allowed pitch, in degrees.
pub const MAX_PITCH_DEGREES: f32 = 90.0;

/// Sine of an angle given in degrees.
#[inline]
pub fn deg_sin(angle: f32) -> f32 {
    (angle / (180.0 / PI)).sin()
}

/// Cosine of an angle given in degrees.
#[inline]
pub fn deg_cos(angle: f32) -> f32 {
    (angle / (180.0 / PI)).cos()
}

/// Tangent of an angle given in degrees.
#[inline]
pub fn deg_tan(angle: f32) -> f32 {
    (angle / (180.0 / PI)).tan()
}

/// Clamps a pitch angle to `[MIN_PITCH_DEGREES, MAX_PITCH_DEGREES]`.
#[inline]
pub fn clamp_pitch(pitch: Deg<f32>) -> Deg<f32> {
    Deg(pitch.0.clamp(MIN_PITCH_DEGREES, MAX_PITCH_DEGREES))
}

/// Precomputed terms of a rotation by a fixed angle about a fixed unit axis.
#[derive(Debug, Clone, Copy, PartialEq)]
struct AxisRotation {
    axis: Vector3<f32>,
    c: f32,
    s: f32,
    t: f32,
}

impl AxisRotation {
    fn new(axis: Vector3<f32>, angle_degrees: f32) -> Self {
        AxisRotation {
            axis,
            c: deg_cos(angle_degrees),
            s: deg_sin(angle_degrees),
            t: 1.0 - deg_cos(angle_degrees),
        }
    }

    #[inline]
    fn apply(&self, v: Vector3<f32>) -> Vector3<f32> {
        let Vector3 { x, y, z } = self.axis;
        let (c, s, t) = (self.c, self.s, self.t);
        Vector3::new(
            v.x * (t * x * x + c) + v.y * (t * x * y - s * z) + v.z * (t * x * z + s * y),
            v.x * (t * x * y + s * z) + v.y * (t * y * y + c) + v.z * (t * y * z - s * x),
            v.x * (t * x * z - s * y) + v.y * (t * y * z + s * x) + v.z * (t * z * z + c),
        )
    }
}

/// Rotates `v` by `angle_degrees` about the unit vector `axis` (Rodrigues' formula).
///
/// The result is not renormalized.
pub fn rotate_about_axis(v: Vector3<f32>, axis: Vector3<f32>, angle_degrees: f32) -> Vector3<f32> {
    AxisRotation::new(axis, angle_degrees).apply(v)
}

/// Represents a first-person camera in 3D space.
///
/// The camera is read-only while a frame renders; controllers and animations
/// mutate it between frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// The camera's position in world space
    pub position: Point3<f32>,
    /// Horizontal rotation (around Y axis), unbounded
    pub yaw: Deg<f32>,
    /// Vertical rotation, kept in `[-90, 90]` by the mutating methods
    pub pitch: Deg<f32>,
}

impl Camera {
    /// Creates a new camera with the specified position and orientation.
    ///
    /// # Arguments
    /// * `position` - Initial position of the camera in world space
    /// * `yaw` - Initial yaw in degrees
    /// * `pitch` - Initial pitch in degrees, clamped to `[-90, 90]`
    ///
    /// # Example
    /// ```rust
    /// use cgmath::{Deg, Point3};
    /// use voxel_raymarch::engine_state::camera_state::camera::Camera;
    ///
    /// let camera = Camera::new(Point3::new(0.5, 0.5, 0.5), Deg(0.0), Deg(120.0));
    /// assert_eq!(camera.pitch, Deg(90.0));
    /// ```
    pub fn new<V: Into<Point3<f32>>, Y: Into<Deg<f32>>, P: Into<Deg<f32>>>(
        position: V,
        yaw: Y,
        pitch: P,
    ) -> Self {
        Self {
            position: position.into(),
            yaw: yaw.into(),
            pitch: clamp_pitch(pitch.into()),
        }
    }

    /// Derives this frame's basis from the current yaw and pitch.
    pub fn basis(&self) -> CameraBasis {
        CameraBasis::from_angles(self.yaw, self.pitch)
    }

    /// Turns the camera by the given amounts. Yaw wraps into `(-360, 360)`, pitch is clamped.
    pub fn turn(&mut self, yaw_delta: Deg<f32>, pitch_delta: Deg<f32>) {
        self.yaw = Deg((self.yaw.0 + yaw_delta.0) % 360.0);
        self.pitch = clamp_pitch(self.pitch + pitch_delta);
    }

    /// Updates the camera's position and orientation based on controller input.
    ///
    /// # Arguments
    /// * `controller` - The camera controller containing input state
    /// * `dt` - Time elapsed since the last update
    ///
    /// # Notes
    /// - Movement follows the viewing direction projected onto the ground plane
    /// - Rotation amounts are in degrees and are not scaled by `dt`
    pub fn get_controller_updates_and_reset_controller(
        &mut self,
        controller: &mut CameraController,
        dt: Duration,
    ) {
        let dt = dt.as_secs_f32();

        let basis = self.basis();
        let ahead = Vector3::new(-basis.forward.x, 0.0, -basis.forward.z);
        let ahead = if ahead.magnitude2() > 0.0 {
            ahead.normalize()
        } else {
            Vector3::new(-deg_sin(self.yaw.0), 0.0, -deg_cos(self.yaw.0))
        };

        self.position += ahead * (controller.amount_forward - controller.amount_backward) * dt;
        self.position += basis.right * (controller.amount_right - controller.amount_left) * dt;
        self.position.y += (controller.amount_up - controller.amount_down) * dt;

        self.turn(
            Deg(controller.rotate_horizontal),
            Deg(-controller.rotate_vertical),
        );

        controller.reset();
    }
}

impl Default for Camera {
    fn default() -> Self {
        Camera::new(Point3::new(0.0, 0.0, 0.0), Deg(0.0), Deg(0.0))
    }
}

/// The right/up/forward frame for one yaw and pitch.
///
/// The camera looks down `-forward`: a ray through the center of the screen
/// points opposite to `forward`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBasis {
    /// Unit vector to the camera's right
    pub right: Vector3<f32>,
    /// Unit vector pointing up from the camera
    pub up: Vector3<f32>,
    /// Unit vector pointing out of the back of the camera
    pub forward: Vector3<f32>,
    yaw_rotation: AxisRotation,
    pitch_rotation: AxisRotation,
}

impl CameraBasis {
    /// Computes the basis. Pitch is clamped to `[-90, 90]` first.
    pub fn from_angles(yaw: Deg<f32>, pitch: Deg<f32>) -> Self {
        let pitch = clamp_pitch(pitch).0;
        let yaw = yaw.0;

        let cos_pitch = deg_cos(pitch);
        let sin_pitch = deg_sin(pitch);
        let cos_yaw = deg_cos(yaw);
        let sin_yaw = deg_sin(yaw);

        let right = Vector3::new(cos_yaw, 0.0, -sin_yaw);
        let up = Vector3::new(sin_yaw * sin_pitch, cos_pitch, cos_yaw * sin_pitch);
        let forward = Vector3::new(sin_yaw * cos_pitch, -sin_pitch, cos_pitch * cos_yaw);

        CameraBasis {
            right,
            up,
            forward,
            yaw_rotation: AxisRotation::new(Vector3::unit_y(), yaw),
            pitch_rotation: AxisRotation::new(right, pitch),
        }
    }

    /// Rotates a camera-space direction into world space.
    ///
    /// Yaw is applied first about the world up axis, then pitch about `right`.
    #[inline]
    pub fn orient(&self, camera_space: Vector3<f32>) -> Vector3<f32> {
        self.pitch_rotation.apply(self.yaw_rotation.apply(camera_space))
    }

    /// The direction through the center of the screen.
    pub fn view_direction(&self) -> Vector3<f32> {
        -self.forward
    }
}

/// Resolution and field of view of the rendered image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    width: u32,
    height: u32,
    /// Aspect ratio (width / height)
    aspect: f32,
    /// `tan(fov / 2)`
    tan_half_fov: f32,
}

impl Projection {
    /// Creates a new projection.
    ///
    /// # Arguments
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    /// * `fov` - Field of view; the horizontal extent is additionally scaled by the aspect ratio
    pub fn new<F: Into<Deg<f32>>>(width: u32, height: u32, fov: F) -> Self {
        let fov: Deg<f32> = fov.into();
        Self {
            width,
            height,
            aspect: width as f32 / height as f32,
            tan_half_fov: deg_tan(fov.0 / 2.0),
        }
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the normalized camera-space direction through the center of pixel `(x, y)`.
    ///
    /// Raster coordinates are mapped to `[-1, 1]` on both axes; the ray's
    /// depth component is `-1` before normalization.
    #[inline]
    pub fn camera_space_direction(&self, x: u32, y: u32) -> Vector3<f32> {
        let px = ((x as f32 + 0.5) / self.width as f32 - 0.5) * 2.0;
        let py = ((y as f32 + 0.5) / self.height as f32 - 0.5) * 2.0;

        let v = Vector3::new(px * self.tan_half_fov * self.aspect, py * self.tan_half_fov, -1.0);
        v / v.magnitude()
    }

    /// Returns the world-space primary ray direction for pixel `(x, y)`.
    #[inline]
    pub fn primary_ray(&self, basis: &CameraBasis, x: u32, y: u32) -> Vector3<f32> {
        basis.orient(self.camera_space_direction(x, y))
    }
}

/// Handles camera movement and rotation based on user input.
///
/// This struct tracks the current state of movement keys and mouse input,
/// and applies them to the camera between frames.
#[derive(Debug)]
pub struct CameraController {
    // Movement amounts (units per second)
    amount_left: f32,
    amount_right: f32,
    amount_forward: f32,
    amount_backward: f32,
    amount_up: f32,
    amount_down: f32,

    // Rotation amounts (in degrees)
    rotate_horizontal: f32,
    rotate_vertical: f32,

    // Configuration
    speed: f32,
    sensitivity: f32,
}

impl CameraController {
    /// Creates a new camera controller with the given speed and sensitivity.
    ///
    /// # Arguments
    /// * `speed` - Base movement speed in units per second
    /// * `sensitivity` - Degrees of rotation per unit of mouse movement
    pub fn new(speed: f32, sensitivity: f32) -> Self {
        Self {
            amount_left: 0.0,
            amount_right: 0.0,
            amount_forward: 0.0,
            amount_backward: 0.0,
            amount_up: 0.0,
            amount_down: 0.0,
            rotate_horizontal: 0.0,
            rotate_vertical: 0.0,
            speed,
            sensitivity,
        }
    }

    /// Processes player actions and updates controller state accordingly.
    ///
    /// # Arguments
    /// * `actions` - The player's input actions to process
    pub fn intake_actions(&mut self, actions: &PlayerAction) {
        if actions.move_forward {
            self.amount_forward = self.speed;
        }
        if actions.move_backward {
            self.amount_backward = self.speed;
        }
        if actions.move_left {
            self.amount_left = self.speed;
        }
        if actions.move_right {
            self.amount_right = self.speed;
        }
        if actions.move_up {
            self.amount_up = self.speed;
        }
        if actions.move_down {
            self.amount_down = self.speed;
        }
        if let Some((delta_x, delta_y)) = actions.rotate_view {
            if delta_x.abs() > 0.5 {
                self.rotate_horizontal = (delta_x as f32) * self.sensitivity;
            }
            if delta_y.abs() > 0.5 {
                self.rotate_vertical = (delta_y as f32) * self.sensitivity;
            }
        }
    }

    /// Checks if there are any pending updates that would affect the camera.
    pub fn has_updates(&self) -> bool {
        self.amount_forward > 0.0
            || self.amount_backward > 0.0
            || self.amount_left > 0.0
            || self.amount_right > 0.0
            || self.amount_up > 0.0
            || self.amount_down > 0.0
            || self.rotate_horizontal != 0.0
            || self.rotate_vertical != 0.0
    }

    fn reset(&mut self) {
        self.rotate_horizontal = 0.0;
        self.rotate_vertical = 0.0;
        self.amount_up = 0.0;
        self.amount_down = 0.0;
        self.amount_left = 0.0;
        self.amount_right = 0.0;
        self.amount_forward = 0.0;
        self.amount_backward = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f32 = 1e-5;

    fn assert_close(a: Vector3<f32>, b: Vector3<f32>) {
        assert!(
            (a - b).magnitude() < TOLERANCE,
            "expected {:?} to be close to {:?}",
            a,
            b
        );
    }

    #[test]
    fn test_level_basis_is_exact() {
        let basis = CameraBasis::from_angles(Deg(0.0), Deg(0.0));
        assert_eq!(basis.right, Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(basis.up, Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(basis.forward.x, 0.0);
        assert_eq!(basis.forward.y, 0.0);
        assert_eq!(basis.forward.z, 1.0);
    }

    #[test]
    fn test_basis_is_orthonormal() {
        for (yaw, pitch) in [(0.0, 0.0), (37.0, 12.5), (-170.0, -80.0), (725.0, 90.0), (12.0, -90.0)] {
            let basis = CameraBasis::from_angles(Deg(yaw), Deg(pitch));
            for v in [basis.right, basis.up, basis.forward] {
                assert!((v.magnitude() - 1.0).abs() < TOLERANCE);
            }
            assert!(basis.right.dot(basis.up).abs() < TOLERANCE);
            assert!(basis.right.dot(basis.forward).abs() < TOLERANCE);
            assert!(basis.up.dot(basis.forward).abs() < TOLERANCE);
        }
    }

    #[test]
    fn test_pitch_is_clamped_before_use() {
        assert_eq!(
            CameraBasis::from_angles(Deg(10.0), Deg(135.0)),
            CameraBasis::from_angles(Deg(10.0), Deg(90.0))
        );
        assert_eq!(
            CameraBasis::from_angles(Deg(10.0), Deg(-400.0)),
            CameraBasis::from_angles(Deg(10.0), Deg(-90.0))
        );
    }

    #[test]
    fn test_yaw_is_periodic() {
        let a = CameraBasis::from_angles(Deg(30.0), Deg(20.0));
        let b = CameraBasis::from_angles(Deg(390.0), Deg(20.0));
        assert_close(a.right, b.right);
        assert_close(a.up, b.up);
        assert_close(a.forward, b.forward);
    }

    #[test]
    fn test_rotation_about_axis() {
        let rotated = rotate_about_axis(Vector3::unit_x(), Vector3::unit_y(), 90.0);
        assert_close(rotated, Vector3::new(0.0, 0.0, -1.0));

        let unchanged = rotate_about_axis(Vector3::unit_y(), Vector3::unit_y(), 57.0);
        assert_close(unchanged, Vector3::unit_y());
    }

    #[test]
    fn test_rotation_order_is_yaw_then_pitch() {
        let basis = CameraBasis::from_angles(Deg(90.0), Deg(45.0));
        let v = Vector3::new(0.0, 0.0, -1.0);

        let expected = rotate_about_axis(rotate_about_axis(v, Vector3::unit_y(), 90.0), basis.right, 45.0);
        let swapped = rotate_about_axis(rotate_about_axis(v, basis.right, 45.0), Vector3::unit_y(), 90.0);

        assert_eq!(basis.orient(v), expected);
        assert!((expected - swapped).magnitude() > 0.1);
    }

    #[test]
    fn test_center_ray_follows_view_direction() {
        let projection = Projection::new(2, 2, Deg(DEFAULT_FOV_DEGREES));
        let basis = CameraBasis::from_angles(Deg(-63.0), Deg(28.0));

        // the four pixels of a 2x2 image straddle the center symmetrically
        let sum = projection.primary_ray(&basis, 0, 0)
            + projection.primary_ray(&basis, 1, 0)
            + projection.primary_ray(&basis, 0, 1)
            + projection.primary_ray(&basis, 1, 1);
        assert_close(sum.normalize(), basis.view_direction());
    }

    #[test]
    fn test_camera_space_direction_is_normalized() {
        let projection = Projection::new(640, 480, Deg(DEFAULT_FOV_DEGREES));
        for (x, y) in [(0, 0), (639, 479), (320, 240), (17, 400)] {
            let v = projection.camera_space_direction(x, y);
            assert!((v.magnitude() - 1.0).abs() < TOLERANCE);
            assert!(v.z < 0.0);
        }
    }

    #[test]
    fn test_camera_space_corners_scale_with_aspect() {
        let projection = Projection::new(4, 2, Deg(DEFAULT_FOV_DEGREES));
        let v = projection.camera_space_direction(3, 1);
        // px = 0.75, py = 0.5, tan(45) ~ 1, aspect 2
        let expected = Vector3::new(1.5, 0.5, -1.0).normalize();
        assert_close(v, expected);
    }

    #[test]
    fn test_turn_wraps_yaw_and_clamps_pitch() {
        let mut camera = Camera::new(Point3::new(0.0, 0.0, 0.0), Deg(350.0), Deg(80.0));
        camera.turn(Deg(20.0), Deg(15.0));
        assert!((camera.yaw.0 - 10.0).abs() < TOLERANCE);
        assert_eq!(camera.pitch, Deg(90.0));
    }

    #[test]
    fn test_controller_moves_along_view_direction() {
        let mut camera = Camera::default();
        let mut controller = CameraController::new(2.0, 1.0);
        let actions = PlayerAction {
            move_forward: true,
            ..Default::default()
        };
        controller.intake_actions(&actions);
        assert!(controller.has_updates());

        camera.get_controller_updates_and_reset_controller(&mut controller, Duration::from_secs(1));

        assert_close(camera.position.to_homogeneous().truncate(), Vector3::new(0.0, 0.0, -2.0));
        assert!(!controller.has_updates());
    }

    #[test]
    fn test_controller_ignores_small_mouse_jitter() {
        let mut controller = CameraController::new(1.0, 0.5);
        let actions = PlayerAction {
            rotate_view: Some((0.2, 4.0)),
            ..Default::default()
        };
        controller.intake_actions(&actions);

        let mut camera = Camera::default();
        camera.get_controller_updates_and_reset_controller(&mut controller, Duration::from_millis(16));
        assert_eq!(camera.yaw, Deg(0.0));
        assert_eq!(camera.pitch, Deg(-2.0));
    }
}
