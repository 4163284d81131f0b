//! # Bresenham Traversal
//!
//! An integer alternative to the DDA march. The ray is reduced to the line
//! between the cell containing its origin and the cell containing the point
//! `max_distance` along it, and that line is rasterized with a 3D Bresenham
//! walk along the axis of largest extent.
//!
//! The walk visits exactly one cell per unit of the driving axis, so on
//! diagonal rays it can step past cells the exact ray only clips at a corner.

use cgmath::{Point3, Vector3};

use super::ray_marcher::{cell_of, MarchSettings, MarchState};
use crate::engine_state::voxels::world::VoxelWorld;

/// Iterator over the cells of a 3D Bresenham line, both endpoints included.
#[derive(Debug, Clone)]
pub struct BresenhamLine {
    current: [i64; 3],
    end: [i64; 3],
    step: [i64; 3],
    delta: [i64; 3],
    /// Index of the driving axis
    driving: usize,
    /// Error terms of the two other axes
    errors: [i64; 2],
    /// The two non-driving axes, in the order their error terms are stored
    others: [usize; 2],
    done: bool,
    started: bool,
}

impl BresenhamLine {
    /// Creates the line from `start` to `end`.
    pub fn new(start: Point3<i32>, end: Point3<i32>) -> Self {
        let start = [start.x as i64, start.y as i64, start.z as i64];
        let end = [end.x as i64, end.y as i64, end.z as i64];

        let delta = [
            (end[0] - start[0]).abs(),
            (end[1] - start[1]).abs(),
            (end[2] - start[2]).abs(),
        ];
        let step = [
            if end[0] > start[0] { 1 } else { -1 },
            if end[1] > start[1] { 1 } else { -1 },
            if end[2] > start[2] { 1 } else { -1 },
        ];

        let (driving, others) = if delta[0] >= delta[1] && delta[0] >= delta[2] {
            (0, [1, 2])
        } else if delta[1] >= delta[0] && delta[1] >= delta[2] {
            (1, [0, 2])
        } else {
            (2, [1, 0])
        };

        let errors = [
            2 * delta[others[0]] - delta[driving],
            2 * delta[others[1]] - delta[driving],
        ];

        BresenhamLine {
            current: start,
            end,
            step,
            delta,
            driving,
            errors,
            others,
            done: false,
            started: false,
        }
    }

    fn current_point(&self) -> Point3<i32> {
        Point3::new(
            self.current[0] as i32,
            self.current[1] as i32,
            self.current[2] as i32,
        )
    }
}

impl Iterator for BresenhamLine {
    type Item = Point3<i32>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            if self.current[self.driving] == self.end[self.driving] {
                self.done = true;
            }
            return Some(self.current_point());
        }

        let driving = self.driving;
        self.current[driving] += self.step[driving];

        for (error, axis) in self.errors.iter_mut().zip(self.others) {
            if *error >= 0 {
                self.current[axis] += self.step[axis];
                *error -= 2 * self.delta[driving];
            }
            *error += 2 * self.delta[axis];
        }

        if self.current[driving] == self.end[driving] {
            self.done = true;
        }
        Some(self.current_point())
    }
}

/// Marches a ray by rasterizing it as a Bresenham line.
///
/// Uses the same occupancy rule as the DDA march: out-of-world cells are air,
/// and the first solid cell visited is the hit. Reaching the end cell is a miss.
pub fn march_bresenham(
    world: &VoxelWorld,
    origin: Point3<f32>,
    direction: Vector3<f32>,
    settings: MarchSettings,
) -> MarchState {
    if direction == Vector3::new(0.0, 0.0, 0.0) {
        return MarchState::Miss;
    }

    let start = cell_of(origin);
    let end = cell_of(origin + direction * settings.max_distance);

    BresenhamLine::new(start, end)
        .find_map(|cell| world.solid_voxel_at(cell))
        .map_or(MarchState::Miss, MarchState::Hit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::{voxel::VoxelColor, world::WorldBuilder};

    #[test]
    fn test_straight_line_visits_every_cell() {
        let cells: Vec<_> = BresenhamLine::new(Point3::new(0, 0, 0), Point3::new(4, 0, 0)).collect();
        assert_eq!(
            cells,
            (0..=4).map(|x| Point3::new(x, 0, 0)).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_single_cell_line() {
        let cells: Vec<_> = BresenhamLine::new(Point3::new(3, -2, 1), Point3::new(3, -2, 1)).collect();
        assert_eq!(cells, vec![Point3::new(3, -2, 1)]);
    }

    #[test]
    fn test_line_is_connected_and_reaches_end() {
        let start = Point3::new(-5, 7, 2);
        let end = Point3::new(9, -3, 20);
        let cells: Vec<_> = BresenhamLine::new(start, end).collect();

        assert_eq!(cells.first(), Some(&start));
        assert_eq!(cells.last(), Some(&end));
        // driving axis is z, one cell per unit
        assert_eq!(cells.len(), 19);
        for pair in cells.windows(2) {
            let d = pair[1] - pair[0];
            assert!(d.x.abs() <= 1 && d.y.abs() <= 1 && d.z.abs() <= 1);
        }
    }

    #[test]
    fn test_bresenham_finds_voxel_ahead() {
        let color = VoxelColor::new(0.9, 0.1, 0.1);
        let mut builder = WorldBuilder::new();
        builder.set_voxel(Point3::new(0, 0, -12), color);
        let world = builder.build();

        let state = march_bresenham(
            &world,
            Point3::new(0.5, 0.5, 0.5),
            Vector3::new(0.0, 0.0, -1.0),
            MarchSettings::default(),
        );
        assert_eq!(state, MarchState::Hit(color));
    }

    #[test]
    fn test_bresenham_misses_in_empty_world() {
        let world = VoxelWorld::empty();
        let state = march_bresenham(
            &world,
            Point3::new(0.5, 0.5, 0.5),
            Vector3::new(0.6, 0.0, -0.8),
            MarchSettings::default(),
        );
        assert_eq!(state, MarchState::Miss);
    }
}
