//! Rendering system for the voxel engine.
//!
//! Every pixel is an independent, pure computation: build the pixel's ray
//! from the camera, march it through the world and pack the resolved color.
//! A frame fans those computations out over a rayon thread pool, with each
//! worker owning the four bytes of the pixel it writes, so no locking is
//! needed inside a frame.

use cgmath::{Deg, Point3};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::{
    camera_state::camera::{Camera, CameraBasis, Projection},
    voxels::world::VoxelWorld,
};

pub mod bresenham;
pub mod capture;
pub mod frame_writer;
pub mod ray_marcher;

use frame_writer::{resolve_pixel, FrameBuffer, BYTES_PER_PIXEL};
use ray_marcher::{MarchSettings, MarchState};

/// The algorithm used to walk rays through the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraversalMethod {
    /// Incremental boundary-to-boundary march
    #[default]
    Dda,
    /// Integer line rasterization between the start and end cells
    Bresenham,
}

/// Per-frame constants shared by every pixel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RenderSettings {
    /// Step epsilon and maximum distance
    pub march: MarchSettings,
    /// Which traversal to use
    pub traversal: TraversalMethod,
}

/// Renders frames of a voxel world from a camera.
#[derive(Debug, Clone)]
pub struct Renderer {
    projection: Projection,
    settings: RenderSettings,
}

impl Renderer {
    /// Creates a renderer for a `width` x `height` image.
    ///
    /// # Arguments
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    /// * `fov` - Field of view
    /// * `settings` - March settings and traversal method
    pub fn new<F: Into<Deg<f32>>>(width: u32, height: u32, fov: F, settings: RenderSettings) -> Self {
        Renderer {
            projection: Projection::new(width, height, fov),
            settings,
        }
    }

    /// The projection rays are generated with.
    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// The settings every pixel is rendered with.
    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Allocates a frame buffer matching this renderer's resolution.
    pub fn create_frame(&self) -> FrameBuffer {
        FrameBuffer::new(self.projection.width(), self.projection.height())
    }

    /// Marches the ray of pixel `(x, y)` and returns its terminal state.
    ///
    /// Depends only on its arguments, so it can run on any thread in any order.
    #[inline]
    pub fn trace_pixel(
        &self,
        world: &VoxelWorld,
        origin: Point3<f32>,
        basis: &CameraBasis,
        x: u32,
        y: u32,
    ) -> MarchState {
        let direction = self.projection.primary_ray(basis, x, y);
        match self.settings.traversal {
            TraversalMethod::Dda => ray_marcher::march(world, origin, direction, self.settings.march),
            TraversalMethod::Bresenham => {
                bresenham::march_bresenham(world, origin, direction, self.settings.march)
            }
        }
    }

    /// Renders one frame into `frame`, overwriting every pixel.
    ///
    /// # Panics
    /// Panics if `frame` does not match the renderer's resolution.
    pub fn render(&self, world: &VoxelWorld, camera: &Camera, frame: &mut FrameBuffer) {
        assert_eq!(
            (frame.width(), frame.height()),
            (self.projection.width(), self.projection.height()),
            "frame size does not match the renderer"
        );

        let basis = camera.basis();
        let origin = camera.position;
        let width = frame.width() as usize;

        frame
            .bytes_mut()
            .par_chunks_exact_mut(BYTES_PER_PIXEL)
            .enumerate()
            .for_each(|(index, pixel)| {
                let x = (index % width) as u32;
                let y = (index / width) as u32;
                let state = self.trace_pixel(world, origin, &basis, x, y);
                pixel.copy_from_slice(&resolve_pixel(state));
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::{voxel::VoxelColor, world::WorldBuilder};

    fn wall_world() -> VoxelWorld {
        let mut builder = WorldBuilder::new();
        for x in -6..6 {
            for y in -6..6 {
                let color = VoxelColor::new(0.5 + x as f32 / 20.0, 0.5 + y as f32 / 20.0, 0.8);
                builder.set_voxel(Point3::new(x, y, -10), color);
            }
        }
        builder.build()
    }

    #[test]
    fn test_parallel_render_matches_serial_trace() {
        let world = wall_world();
        let camera = Camera::new(Point3::new(0.5, 0.5, 0.5), Deg(10.0), Deg(-5.0));
        let renderer = Renderer::new(16, 12, Deg(90.0), RenderSettings::default());
        let mut frame = renderer.create_frame();

        renderer.render(&world, &camera, &mut frame);

        let basis = camera.basis();
        for y in 0..12 {
            for x in 0..16 {
                let state = renderer.trace_pixel(&world, camera.position, &basis, x, y);
                assert_eq!(frame.pixel(x, y), resolve_pixel(state), "pixel ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_center_pixels_see_the_wall() {
        let world = wall_world();
        let camera = Camera::new(Point3::new(0.5, 0.5, 0.5), Deg(0.0), Deg(0.0));
        let renderer = Renderer::new(4, 4, Deg(90.0), RenderSettings::default());
        let mut frame = renderer.create_frame();
        renderer.render(&world, &camera, &mut frame);

        for (x, y) in [(1, 1), (2, 1), (1, 2), (2, 2)] {
            assert_ne!(frame.pixel(x, y), [0, 0, 0, 255], "pixel ({}, {})", x, y);
        }
    }

    #[test]
    fn test_camera_facing_away_sees_nothing() {
        let world = wall_world();
        let camera = Camera::new(Point3::new(0.5, 0.5, 0.5), Deg(180.0), Deg(0.0));
        let renderer = Renderer::new(8, 8, Deg(60.0), RenderSettings::default());
        let mut frame = renderer.create_frame();
        renderer.render(&world, &camera, &mut frame);

        assert!(frame.bytes().chunks_exact(4).all(|pixel| pixel == [0, 0, 0, 255]));
    }

    #[test]
    fn test_bresenham_traversal_renders_the_wall() {
        let world = wall_world();
        let camera = Camera::new(Point3::new(0.5, 0.5, 0.5), Deg(0.0), Deg(0.0));
        let settings = RenderSettings {
            traversal: TraversalMethod::Bresenham,
            ..RenderSettings::default()
        };
        let renderer = Renderer::new(4, 4, Deg(90.0), settings);
        let mut frame = renderer.create_frame();
        renderer.render(&world, &camera, &mut frame);

        assert_ne!(frame.pixel(1, 1), [0, 0, 0, 255]);
    }

    #[test]
    #[should_panic(expected = "frame size")]
    fn test_mismatched_frame_panics() {
        let renderer = Renderer::new(4, 4, Deg(90.0), RenderSettings::default());
        let mut frame = FrameBuffer::new(5, 4);
        renderer.render(&VoxelWorld::empty(), &Camera::default(), &mut frame);
    }
}
