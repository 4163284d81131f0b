//! # Ray Marcher
//!
//! Walks a ray through the voxel world one voxel boundary at a time (a DDA
//! traversal) and reports the first solid voxel it enters.
//!
//! Each step measures, per axis, how far along the ray the next cell boundary
//! lies, takes the nearest one and moves a small epsilon past it. The ray
//! therefore enters every cell it crosses exactly once and cannot skip thin
//! geometry the way a fixed-length step would.
//!
//! ## States
//!
//! * `Marching` - still inside `max_distance`, no solid voxel found yet
//! * `Hit` - entered a solid voxel; carries its color
//! * `Miss` - traveled `max_distance` without a hit
//!
//! Cells outside the world are treated as air and the ray keeps going.

use cgmath::{Point3, Vector3};

use crate::engine_state::voxels::{voxel::VoxelColor, world::VoxelWorld};

/// Distance added to every step so the ray lands just past the boundary it reached.
pub const DEFAULT_STEP_EPSILON: f32 = 0.01;
/// Distance after which a ray gives up, in world units.
pub const DEFAULT_MAX_DISTANCE: f32 = 128.0;
/// Largest accepted `max_distance`.
pub const MAX_MARCH_DISTANCE: f32 = 4096.0;
/// Smallest accepted `step_epsilon`. Above half an f32 ulp at
/// `MAX_MARCH_DISTANCE`, so every step grows `distance_traveled`.
pub const MIN_STEP_EPSILON: f32 = 1e-3;

/// The state of a single ray march.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarchState {
    /// The ray is still traveling.
    Marching,
    /// The ray entered a solid voxel of this color.
    Hit(VoxelColor),
    /// The ray reached its maximum distance.
    Miss,
}

impl MarchState {
    /// `true` for `Hit` and `Miss`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, MarchState::Marching)
    }

    /// The color this state resolves to. Anything but a hit is background.
    pub fn color(&self) -> VoxelColor {
        match self {
            MarchState::Hit(color) => *color,
            _ => VoxelColor::AIR,
        }
    }
}

/// Tuning values shared by every ray of a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarchSettings {
    /// Overshoot added to each step
    pub step_epsilon: f32,
    /// Distance at which the ray terminates with `Miss`
    pub max_distance: f32,
}

impl Default for MarchSettings {
    fn default() -> Self {
        MarchSettings {
            step_epsilon: DEFAULT_STEP_EPSILON,
            max_distance: DEFAULT_MAX_DISTANCE,
        }
    }
}

impl MarchSettings {
    /// Upper bound on the number of steps a ray can take before terminating.
    pub fn max_steps(&self) -> usize {
        (self.max_distance / self.step_epsilon).ceil() as usize + 1
    }
}

/// Parametric distance from `position` to the next cell boundary along one axis.
#[inline]
fn axis_boundary_distance(position: f32, direction: f32) -> f32 {
    if direction == 0.0 {
        return f32::INFINITY;
    }
    let mut remaining = position - position.floor();
    if direction > 0.0 {
        remaining = 1.0 - remaining;
    }
    (remaining / direction).abs()
}

/// Returns the integer cell containing `position`.
#[inline]
pub fn cell_of(position: Point3<f32>) -> Point3<i32> {
    Point3::new(
        position.x.floor() as i32,
        position.y.floor() as i32,
        position.z.floor() as i32,
    )
}

/// Incremental DDA march of one ray.
pub struct RayMarcher<'w> {
    world: &'w VoxelWorld,
    position: Point3<f32>,
    direction: Vector3<f32>,
    distance_traveled: f32,
    settings: MarchSettings,
    state: MarchState,
    steps: usize,
}

impl<'w> RayMarcher<'w> {
    /// Starts a march at `origin`.
    ///
    /// `direction` is expected to be roughly unit length; it is used as given.
    /// An all-zero direction can never cross a boundary and starts out as `Miss`.
    pub fn new(
        world: &'w VoxelWorld,
        origin: Point3<f32>,
        direction: Vector3<f32>,
        settings: MarchSettings,
    ) -> Self {
        let state = if direction == Vector3::new(0.0, 0.0, 0.0) {
            MarchState::Miss
        } else {
            MarchState::Marching
        };

        RayMarcher {
            world,
            position: origin,
            direction,
            distance_traveled: 0.0,
            settings,
            state,
            steps: 0,
        }
    }

    /// Current position along the ray.
    pub fn position(&self) -> Point3<f32> {
        self.position
    }

    /// Sum of all step lengths so far.
    pub fn distance_traveled(&self) -> f32 {
        self.distance_traveled
    }

    /// Current state.
    pub fn state(&self) -> MarchState {
        self.state
    }

    /// Number of boundary crossings made so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Performs one transition: tests the current cell, then advances past the next boundary.
    ///
    /// Terminal states are sticky; stepping a finished march returns the same state.
    pub fn step(&mut self) -> MarchState {
        if self.state.is_terminal() {
            return self.state;
        }

        if !(self.distance_traveled < self.settings.max_distance) {
            self.state = MarchState::Miss;
            return self.state;
        }

        if let Some(color) = self.world.solid_voxel_at(cell_of(self.position)) {
            self.state = MarchState::Hit(color);
            return self.state;
        }

        let nearest = axis_boundary_distance(self.position.x, self.direction.x)
            .min(axis_boundary_distance(self.position.y, self.direction.y))
            .min(axis_boundary_distance(self.position.z, self.direction.z));
        if !nearest.is_finite() {
            self.state = MarchState::Miss;
            return self.state;
        }

        let step = nearest + self.settings.step_epsilon;
        self.position += self.direction * step;
        self.distance_traveled += step;
        self.steps += 1;

        self.state
    }

    /// Steps until the march reaches `Hit` or `Miss`.
    pub fn run(&mut self) -> MarchState {
        while !self.state.is_terminal() {
            self.step();
        }
        self.state
    }
}

/// Marches a ray from `origin` along `direction` and returns its terminal state.
#[inline]
pub fn march(
    world: &VoxelWorld,
    origin: Point3<f32>,
    direction: Vector3<f32>,
    settings: MarchSettings,
) -> MarchState {
    RayMarcher::new(world, origin, direction, settings).run()
}
