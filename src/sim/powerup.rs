//! Collectible power-ups

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::consts::*;
use crate::tuning::Tuning;

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Absorbs one life loss
    Shield,
    /// Halves the simulation speed for a few real seconds
    Time,
    /// +1 life, up to the cap
    ExtraLife,
}

impl PowerUpKind {
    /// Weighted pick: extra life, then shield, remainder time-slow
    pub fn roll<R: Rng>(tuning: &Tuning, rng: &mut R) -> Self {
        Self::from_roll(rng.random::<f32>(), tuning)
    }

    fn from_roll(roll: f32, tuning: &Tuning) -> Self {
        if roll < tuning.extra_life_weight {
            PowerUpKind::ExtraLife
        } else if roll < tuning.extra_life_weight + tuning.shield_weight {
            PowerUpKind::Shield
        } else {
            PowerUpKind::Time
        }
    }
}

/// A floating collectible
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    /// Hitbox corner; bobbing never moves it
    pub pos: Vec2,
    pub size: Vec2,
    /// Animation phase (radians)
    pub float_phase: f32,
}

impl PowerUp {
    pub fn new(kind: PowerUpKind, pos: Vec2) -> Self {
        Self {
            kind,
            pos,
            size: Vec2::splat(POWERUP_SIZE),
            float_phase: 0.0,
        }
    }

    /// Drop a power-up somewhere in the open middle of the screen
    pub fn spawn_random<R: Rng>(kind: PowerUpKind, rng: &mut R) -> Self {
        let x = rng.random_range(0.0..SCREEN_WIDTH - 50.0);
        let y = rng.random_range(100.0..SCREEN_HEIGHT - 100.0);
        Self::new(kind, Vec2::new(x, y))
    }

    pub fn tick(&mut self, dt: f32) {
        self.float_phase += dt * 4.0;
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_kind_thresholds() {
        let tuning = Tuning::default();
        assert_eq!(PowerUpKind::from_roll(0.0, &tuning), PowerUpKind::ExtraLife);
        assert_eq!(PowerUpKind::from_roll(0.049, &tuning), PowerUpKind::ExtraLife);
        assert_eq!(PowerUpKind::from_roll(0.05, &tuning), PowerUpKind::Shield);
        assert_eq!(PowerUpKind::from_roll(0.52, &tuning), PowerUpKind::Shield);
        assert_eq!(PowerUpKind::from_roll(0.53, &tuning), PowerUpKind::Time);
        assert_eq!(PowerUpKind::from_roll(0.99, &tuning), PowerUpKind::Time);
    }

    #[test]
    fn test_kind_distribution() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(11);
        let mut counts = [0u32; 3];
        for _ in 0..20_000 {
            match PowerUpKind::roll(&tuning, &mut rng) {
                PowerUpKind::ExtraLife => counts[0] += 1,
                PowerUpKind::Shield => counts[1] += 1,
                PowerUpKind::Time => counts[2] += 1,
            }
        }
        assert!((600..1400).contains(&counts[0]));
        assert!((8_500..10_500).contains(&counts[1]));
        assert!((8_500..10_500).contains(&counts[2]));
    }

    #[test]
    fn test_bobbing_does_not_move_hitbox() {
        let mut p = PowerUp::new(PowerUpKind::Shield, Vec2::new(200.0, 300.0));
        let before = p.bounds();
        for _ in 0..100 {
            p.tick(0.05);
        }
        assert_eq!(p.bounds(), before);
        assert!(p.float_phase > 0.0);
    }

    #[test]
    fn test_spawn_random_stays_in_play_area() {
        let mut rng = Pcg32::seed_from_u64(5);
        for _ in 0..100 {
            let p = PowerUp::spawn_random(PowerUpKind::Time, &mut rng);
            assert!(p.pos.x >= 0.0 && p.pos.x < SCREEN_WIDTH - 50.0);
            assert!(p.pos.y >= 100.0 && p.pos.y < SCREEN_HEIGHT - 100.0);
        }
    }
}
