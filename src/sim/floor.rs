//! Floors: the eight scrolling lanes Jack climbs through

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::holes::{Hole, HoleGeometry, Segment};
use crate::consts::*;
use crate::tuning::Tuning;

/// One horizontal lane. Its vertical position is fixed; only its holes move.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Floor {
    /// 0 (top) to 7 (bottom)
    pub index: usize,
    /// Top surface
    pub y: f32,
    pub height: f32,
    /// Signed hole velocity (px/s); even lanes scroll right, odd lanes left
    pub speed: f32,
    pub geometry: HoleGeometry,
    max_holes: usize,
}

impl Floor {
    /// Build lane `index` with one randomly placed hole
    pub fn new<R: Rng>(index: usize, tuning: &Tuning, rng: &mut R) -> Self {
        let direction = if index % 2 == 0 { 1.0 } else { -1.0 };
        let mut floor = Self {
            index,
            y: floor_top(index),
            height: FLOOR_THICKNESS,
            speed: direction * (tuning.lane_base_speed + index as f32 * tuning.lane_speed_step),
            geometry: HoleGeometry::new(SCREEN_WIDTH),
            max_holes: tuning.max_holes_per_floor,
        };
        floor.add_hole(rng);

        // Jack respawns at the middle of the bottom lane
        if index == BOTTOM_FLOOR {
            let center = SCREEN_WIDTH / 2.0;
            let radius = tuning.spawn_safe_radius;
            floor
                .geometry
                .retain(|h| (h.start + h.width / 2.0 - center).abs() > radius);
            if floor.geometry.is_empty() {
                floor.geometry.push(Hole::new(100.0, HOLE_WIDTH));
            }
        }

        floor
    }

    /// Build a lane with an explicit hole layout
    pub fn with_holes(index: usize, speed: f32, holes: Vec<Hole>) -> Self {
        Self {
            index,
            y: floor_top(index),
            height: FLOOR_THICKNESS,
            speed,
            geometry: HoleGeometry::with_holes(SCREEN_WIDTH, holes),
            max_holes: Tuning::default().max_holes_per_floor,
        }
    }

    /// Underside of the lane
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Scroll every hole; a hole that leaves the screen re-enters at the far edge
    pub fn tick(&mut self, dt: f32) {
        let width = self.geometry.lane_width();
        let speed = self.speed;
        for hole in self.geometry.holes_mut() {
            hole.start += speed * dt;

            if speed > 0.0 && hole.start > width {
                hole.start = -hole.width;
            } else if speed < 0.0 && hole.end() < 0.0 {
                hole.start = width;
            }
        }
    }

    /// Punch a new hole at a random offset. No-op once the lane is at its cap.
    ///
    /// Returns whether a hole was added.
    pub fn add_hole<R: Rng>(&mut self, rng: &mut R) -> bool {
        if self.geometry.len() >= self.max_holes {
            return false;
        }
        let start = rng.random_range(0.0..SCREEN_WIDTH - HOLE_WIDTH);
        self.geometry.push(Hole::new(start, HOLE_WIDTH));
        true
    }

    /// Is `x` over a hole in this lane?
    #[inline]
    pub fn query_hole_at(&self, x: f32) -> bool {
        self.geometry.occupies_point(x)
    }

    /// Solid pieces to draw
    pub fn solid_segments(&self) -> Vec<Segment> {
        self.geometry.solid_segments()
    }
}

/// Top surface of lane `index`
#[inline]
pub fn floor_top(index: usize) -> f32 {
    (index as f32 + 1.0) * FLOOR_SPACING - FLOOR_THICKNESS
}

/// Fresh set of all lanes for a level
pub fn init_floors<R: Rng>(tuning: &Tuning, rng: &mut R) -> Vec<Floor> {
    (0..FLOOR_COUNT).map(|i| Floor::new(i, tuning, rng)).collect()
}
