//! # World Generation
//!
//! Procedural fills used to build a `VoxelWorld` once at startup. Every method
//! is a per-voxel function evaluated by `VoxelWorld::from_fn`, which visits the
//! voxels in a fixed order, so a given method and seed always produce the same world.
//!
//! Supported methods:
//! - `random`: sparse voxels with random colors
//! - `perlin`: thresholded 3D Perlin noise, colored by position
//! - `shell`: the faces of a 32-voxel cube around the origin, plus a sparse interior
//! - `checkerboard`, `solid`, `empty`: test patterns

use cgmath::Point3;
use log::info;
use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};
use web_time::Instant;

use super::voxel::VoxelColor;
use super::world::{VoxelWorld, WORLD_CHUNK_DIMENSION, WORLD_VOXEL_BIAS};
use super::chunk::CHUNK_DIMENSION;

/// Threshold above which Perlin noise is considered solid.
pub const PERLIN_POSITIVE_THRESHOLD: f64 = 0.2;
/// Threshold below which Perlin noise is considered solid.
pub const PERLIN_NEGATIVE_THRESHOLD: f64 = -0.2;
/// Scaling factor applied to voxel coordinates when sampling Perlin noise.
pub const PERLIN_SCALE_FACTOR: f64 = 0.05;
/// Half the side length of the `shell` cube, in voxels.
pub const SHELL_HALF_EXTENT: i32 = 16;
/// Lowest channel value of a randomly colored voxel.
const MIN_RANDOM_CHANNEL: f32 = 0.3;

/// Number of voxels along each axis of the world.
const WORLD_VOXEL_SPAN: f32 = (WORLD_CHUNK_DIMENSION * CHUNK_DIMENSION) as f32;

/// The procedural fill used to build the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMethod {
    /// Each voxel is solid with probability `density`, with a random color.
    #[default]
    Random,
    /// Voxels where 3D Perlin noise leaves the neutral band are solid.
    Perlin,
    /// The faces of a cube around the origin, with a sparse random interior.
    Shell,
    /// Alternating solid and air voxels.
    Checkerboard,
    /// Every voxel is solid.
    Solid,
    /// Every voxel is air.
    Empty,
}

/// Builds voxel worlds from a generation method, seed and density.
#[derive(Debug, Clone, Copy)]
pub struct WorldGenerator {
    method: GenerationMethod,
    seed: u64,
    density: f64,
}

impl WorldGenerator {
    /// Creates a generator.
    ///
    /// # Arguments
    /// * `method` - The procedural fill to use
    /// * `seed` - Seed for the random and Perlin methods
    /// * `density` - Probability of a solid voxel for the random methods, in `[0, 1]`
    pub fn new(method: GenerationMethod, seed: u64, density: f64) -> Self {
        WorldGenerator {
            method,
            seed,
            density,
        }
    }

    /// Builds the world. This evaluates the fill for every voxel and may take a while.
    pub fn generate(&self) -> VoxelWorld {
        let start = Instant::now();
        let world = VoxelWorld::from_fn(self.voxel_fn());

        info!(
            "Generated {:?} world (seed {}): {} occupied chunks, {} palette entries in {:?}",
            self.method,
            self.seed,
            world.occupied_chunk_count(),
            world.palette_len(),
            start.elapsed()
        );

        world
    }

    /// Returns the per-voxel fill for the configured method.
    pub fn voxel_fn(&self) -> Box<dyn FnMut(Point3<i32>) -> VoxelColor> {
        let density = self.density;
        match self.method {
            GenerationMethod::Random => {
                let mut rng = fastrand::Rng::with_seed(self.seed);
                Box::new(move |_| {
                    if rng.f64() < density {
                        random_color(&mut rng)
                    } else {
                        VoxelColor::AIR
                    }
                })
            }
            GenerationMethod::Perlin => {
                let perlin = Perlin::new(self.seed as u32);
                Box::new(move |voxel| {
                    let sample = perlin.get(to_perlin_pos(voxel, PERLIN_SCALE_FACTOR));
                    if (PERLIN_NEGATIVE_THRESHOLD..=PERLIN_POSITIVE_THRESHOLD).contains(&sample) {
                        VoxelColor::AIR
                    } else {
                        position_color(voxel)
                    }
                })
            }
            GenerationMethod::Shell => {
                let mut rng = fastrand::Rng::with_seed(self.seed);
                Box::new(move |voxel| {
                    let inside = |c: i32| (-SHELL_HALF_EXTENT..SHELL_HALF_EXTENT).contains(&c);
                    if !(inside(voxel.x) && inside(voxel.y) && inside(voxel.z)) {
                        return VoxelColor::AIR;
                    }
                    let on_face = |c: i32| c == -SHELL_HALF_EXTENT || c == SHELL_HALF_EXTENT - 1;
                    if on_face(voxel.x) || on_face(voxel.y) || on_face(voxel.z) {
                        shell_color(voxel)
                    } else if rng.f64() < density {
                        random_color(&mut rng)
                    } else {
                        VoxelColor::AIR
                    }
                })
            }
            GenerationMethod::Checkerboard => Box::new(|voxel| {
                if (voxel.x + voxel.y + voxel.z).rem_euclid(2) == 0 {
                    position_color(voxel)
                } else {
                    VoxelColor::AIR
                }
            }),
            GenerationMethod::Solid => Box::new(position_color),
            GenerationMethod::Empty => Box::new(|_| VoxelColor::AIR),
        }
    }
}

fn random_color(rng: &mut fastrand::Rng) -> VoxelColor {
    let spread = 1.0 - MIN_RANDOM_CHANNEL;
    VoxelColor::new(
        rng.f32() * spread + MIN_RANDOM_CHANNEL,
        rng.f32() * spread + MIN_RANDOM_CHANNEL,
        rng.f32() * spread + MIN_RANDOM_CHANNEL,
    )
}

/// A color that varies smoothly across the world and is never air.
fn position_color(voxel: Point3<i32>) -> VoxelColor {
    let channel = |c: i32| {
        MIN_RANDOM_CHANNEL + (1.0 - MIN_RANDOM_CHANNEL) * (c + WORLD_VOXEL_BIAS) as f32 / WORLD_VOXEL_SPAN
    };
    VoxelColor::new(channel(voxel.x), channel(voxel.y), channel(voxel.z))
}

/// Distance from the origin per axis, scaled so the shell faces reach 1.0.
fn shell_color(voxel: Point3<i32>) -> VoxelColor {
    let channel = |c: i32| (c as f32).abs() / SHELL_HALF_EXTENT as f32;
    VoxelColor::new(channel(voxel.x), channel(voxel.y), channel(voxel.z))
}

/// Converts voxel coordinates to scaled coordinates for Perlin noise sampling.
fn to_perlin_pos(pos: Point3<i32>, scale_factor: f64) -> [f64; 3] {
    [
        pos.x as f64 * scale_factor,
        pos.y as f64 * scale_factor,
        pos.z as f64 * scale_factor,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(method: GenerationMethod, seed: u64, density: f64, points: &[Point3<i32>]) -> Vec<VoxelColor> {
        let mut voxel_fn = WorldGenerator::new(method, seed, density).voxel_fn();
        points.iter().map(|p| voxel_fn(*p)).collect()
    }

    fn points() -> Vec<Point3<i32>> {
        (0..2000).map(|i| Point3::new(i % 13 - 6, i % 7 - 3, i / 91 - 11)).collect()
    }

    #[test]
    fn test_random_fill_is_seeded() {
        let a = sample(GenerationMethod::Random, 7, 0.3, &points());
        let b = sample(GenerationMethod::Random, 7, 0.3, &points());
        let c = sample(GenerationMethod::Random, 8, 0.3, &points());
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_random_colors_stay_in_range() {
        let colors = sample(GenerationMethod::Random, 1, 1.0, &points());
        for color in colors {
            for channel in [color.red, color.green, color.blue] {
                assert!((MIN_RANDOM_CHANNEL..=1.0).contains(&channel));
            }
        }
    }

    #[test]
    fn test_density_zero_is_all_air() {
        let colors = sample(GenerationMethod::Random, 3, 0.0, &points());
        assert!(colors.iter().all(VoxelColor::is_air));
    }

    #[test]
    fn test_shell_faces_are_solid() {
        let colors = sample(
            GenerationMethod::Shell,
            0,
            0.0,
            &[
                Point3::new(-16, 0, 0),
                Point3::new(0, 15, 0),
                Point3::new(3, -2, -16),
                Point3::new(0, 0, 0),
                Point3::new(16, 0, 0),
            ],
        );
        assert!(colors[0].is_solid());
        assert!(colors[1].is_solid());
        assert!(colors[2].is_solid());
        assert!(colors[3].is_air());
        assert!(colors[4].is_air());
        assert_eq!(colors[0], VoxelColor::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_checkerboard_alternates() {
        let colors = sample(
            GenerationMethod::Checkerboard,
            0,
            0.0,
            &[Point3::new(0, 0, 0), Point3::new(1, 0, 0), Point3::new(-1, 0, 0), Point3::new(1, 1, 0)],
        );
        assert!(colors[0].is_solid());
        assert!(colors[1].is_air());
        assert!(colors[2].is_air());
        assert!(colors[3].is_solid());
    }

    #[test]
    fn test_solid_fill_never_produces_air() {
        let colors = sample(
            GenerationMethod::Solid,
            0,
            0.0,
            &[Point3::new(-128, -128, -128), Point3::new(135, 135, 135)],
        );
        assert!(colors.iter().all(VoxelColor::is_solid));
    }

    #[test]
    fn test_empty_method_generates_empty_world() {
        let world = WorldGenerator::new(GenerationMethod::Empty, 0, 0.5).generate();
        assert_eq!(world.occupied_chunk_count(), 0);
    }
}
