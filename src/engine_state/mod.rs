//! # Engine State Module
//!
//! The core engine module that owns the world, the camera and the renderer,
//! and drives them frame by frame.
//!
//! ## Key Components
//!
//! * `EngineState` - The main state container for the engine
//! * `camera_state` - Handles camera positioning and movement
//! * `rendering` - Ray marching, frame packing and export
//! * `voxels` - Handles voxel data, chunks, and world generation
//!
//! ## Frame Lifecycle
//!
//! 1. `render_frame` takes a read lock on the camera and renders every pixel in parallel
//! 2. The lock is released only once every pixel is written
//! 3. `advance` applies pending input and the turntable under the write lock
//!
//! The world is never mutated after construction, and the camera only
//! changes between frames, so a frame always sees one consistent scene.

use cgmath::{Deg, Point3};
use log::info;
use web_time::{Duration, Instant};

use camera_state::{camera::Camera, CameraState};
use rendering::{frame_writer::FrameBuffer, ray_marcher::MarchSettings, RenderSettings, Renderer};
use voxels::{generation::WorldGenerator, world::VoxelWorld};

use crate::config::EngineConfig;

pub mod camera_state;
pub mod rendering;
pub mod voxels;

/// The main state container for the engine.
///
/// # Examples
///
/// ```
/// use voxel_raymarch::config::EngineConfig;
/// use voxel_raymarch::engine_state::{voxels::world::VoxelWorld, EngineState};
///
/// let mut config = EngineConfig::default();
/// config.width = 8;
/// config.height = 6;
///
/// let mut engine = EngineState::with_world(&config, VoxelWorld::empty());
/// let frame = engine.render_frame();
/// assert!(frame.bytes().chunks_exact(4).all(|pixel| pixel == [0, 0, 0, 255]));
/// ```
pub struct EngineState {
    /// Camera state managing position, orientation and movement
    pub camera_state: CameraState,
    /// Current player actions, applied on the next `advance`
    pub player_actions: PlayerAction,
    /// Ray generation and traversal
    renderer: Renderer,
    /// The voxel world, immutable once built
    world: VoxelWorld,
    /// The output of the most recent frame
    frame: FrameBuffer,
    /// Number of frames rendered so far
    frame_index: usize,
    /// When the previous `advance` happened
    last_update: Instant,
}

impl EngineState {
    /// Creates an engine, generating the world described by `config`.
    ///
    /// This builds the whole world up front and can take a while.
    pub fn new(config: &EngineConfig) -> Self {
        let generator = WorldGenerator::new(config.world.method, config.world.seed, config.world.density);
        Self::with_world(config, generator.generate())
    }

    /// Creates an engine around an already built world.
    pub fn with_world(config: &EngineConfig, world: VoxelWorld) -> Self {
        let settings = RenderSettings {
            march: MarchSettings {
                step_epsilon: config.render.step_epsilon,
                max_distance: config.render.max_distance,
            },
            traversal: config.render.traversal,
        };
        let renderer = Renderer::new(
            config.width,
            config.height,
            Deg(config.render.fov_degrees),
            settings,
        );
        let frame = renderer.create_frame();

        let camera = Camera::new(
            Point3::from(config.camera.position),
            Deg(config.camera.yaw),
            Deg(config.camera.pitch),
        );
        let camera_state = CameraState::new(
            camera,
            Deg(config.camera.yaw_per_frame),
            Deg(config.camera.pitch_per_frame),
        );

        info!(
            "Engine ready: {}x{}, {:?} traversal, {} occupied chunks",
            config.width,
            config.height,
            config.render.traversal,
            world.occupied_chunk_count()
        );

        Self {
            camera_state,
            player_actions: PlayerAction::default(),
            renderer,
            world,
            frame,
            frame_index: 0,
            last_update: Instant::now(),
        }
    }

    /// The voxel world being rendered.
    pub fn world(&self) -> &VoxelWorld {
        &self.world
    }

    /// The renderer used for every frame.
    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// The most recently rendered frame.
    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    /// Number of frames rendered so far.
    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    /// Renders the current frame without touching the camera.
    pub fn render(&mut self) -> &FrameBuffer {
        let start = Instant::now();
        {
            let camera = self.camera_state.camera.get();
            self.renderer.render(&self.world, &camera, &mut self.frame);
        }

        info!("Rendered frame {} in {:?}", self.frame_index, start.elapsed());
        self.frame_index += 1;
        &self.frame
    }

    /// Applies pending player actions and the camera animation.
    ///
    /// Must not overlap with `render`; the `&mut self` receiver enforces that.
    pub fn advance(&mut self) {
        let now = Instant::now();
        let dt = now - self.last_update;
        self.last_update = now;
        self.advance_by(dt);
    }

    /// Like `advance`, with an explicit time step for the controller.
    pub fn advance_by(&mut self, dt: Duration) {
        self.camera_state.intake_actions(&self.player_actions);
        self.player_actions = PlayerAction::default();
        self.camera_state.update(dt);
    }

    /// Renders one frame, then advances the camera for the next one.
    pub fn render_frame(&mut self) -> &FrameBuffer {
        self.render();
        self.advance();
        &self.frame
    }
}

/// Represents player actions derived from input
///
/// This struct contains flags for the movement and camera controls an input
/// layer can request. They are consumed by the next `EngineState::advance`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PlayerAction {
    /// Move along the viewing direction
    pub move_forward: bool,
    /// Move against the viewing direction
    pub move_backward: bool,
    /// Strafe left
    pub move_left: bool,
    /// Strafe right
    pub move_right: bool,
    /// Move up along the world Y axis
    pub move_up: bool,
    /// Move down along the world Y axis
    pub move_down: bool,

    /// View rotation - Some if the mouse moved while held
    pub rotate_view: Option<(f64, f64)>,
}
