//! Patrolling enemies
//!
//! An enemy walks along the top of one lane, ignoring holes, and bounces off
//! the screen edges. Touching Jack queues a stun intent.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::event::Intent;
use super::floor::Floor;
use crate::consts::*;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub size: Vec2,
    /// Speed magnitude (px/s)
    pub speed: f32,
    /// -1.0 or +1.0
    pub direction: f32,
    /// Lane this enemy patrols
    pub floor_index: usize,
}

impl Enemy {
    /// Spawn on top of `floor` at a random position, speed and heading
    pub fn spawn<R: Rng>(floor: &Floor, tuning: &Tuning, rng: &mut R) -> Self {
        let size = Vec2::splat(ENEMY_SIZE);
        let x = rng.random_range(0.0..SCREEN_WIDTH - size.x);
        Self {
            pos: Vec2::new(x, floor.y - size.y),
            size,
            speed: tuning.enemy_base_speed + rng.random::<f32>() * tuning.enemy_speed_spread,
            direction: if rng.random_bool(0.5) { 1.0 } else { -1.0 },
            floor_index: floor.index,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    /// Patrol, then test contact with Jack
    pub fn tick(&mut self, dt: f32, player: &Aabb, intents: &mut Vec<Intent>) {
        self.patrol(dt);
        if self.bounds().overlaps(player) {
            intents.push(Intent::StunPlayer);
        }
    }

    /// Walk and bounce off the screen edges
    pub fn patrol(&mut self, dt: f32) {
        self.pos.x += self.speed * self.direction * dt;

        if self.pos.x < 0.0 {
            self.pos.x = 0.0;
            self.direction = 1.0;
        }
        if self.pos.x + self.size.x > SCREEN_WIDTH {
            self.pos.x = SCREEN_WIDTH - self.size.x;
            self.direction = -1.0;
        }
    }
}

/// One enemy per level past the first, each on a random lane
pub fn init_enemies<R: Rng>(level: u32, floors: &[Floor], tuning: &Tuning, rng: &mut R) -> Vec<Enemy> {
    let count = level.saturating_sub(1) as usize;
    (0..count)
        .map(|_| {
            let floor = &floors[rng.random_range(0..floors.len())];
            Enemy::spawn(floor, tuning, rng)
        })
        .collect()
}
