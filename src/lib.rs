//! Jumping Jack - a single-screen arcade platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (floors, holes, enemies, combo, player physics)
//! - `tuning`: Data-driven game balance
//! - `input`: Keyboard action mapping with edge-triggered presses
//! - `highscores`: Leaderboard snapshot cache and submission service
//! - `settings`: Presentation preferences (theme, sound)

pub mod highscores;
pub mod input;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::{LeaderboardService, LocalLeaderboard, ScoreBoard, ScoreEntry};
pub use input::{Action, InputState};
pub use settings::{Settings, Theme};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the shell will feed into the accumulator
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Playfield dimensions
    pub const SCREEN_WIDTH: f32 = 1024.0;
    pub const SCREEN_HEIGHT: f32 = 768.0;

    /// Lanes, indexed 0 (top) to 7 (bottom)
    pub const FLOOR_COUNT: usize = 8;
    pub const FLOOR_SPACING: f32 = 96.0;
    pub const FLOOR_THICKNESS: f32 = 12.0;
    pub const BOTTOM_FLOOR: usize = FLOOR_COUNT - 1;

    /// Every hole is the same width
    pub const HOLE_WIDTH: f32 = 80.0;

    /// Jack
    pub const PLAYER_WIDTH: f32 = 48.0;
    pub const PLAYER_HEIGHT: f32 = 64.0;

    /// Patrolling enemy
    pub const ENEMY_SIZE: f32 = 40.0;

    /// Collectible
    pub const POWERUP_SIZE: f32 = 32.0;
}

/// Wrap a horizontal coordinate into `[0, width)`
#[inline]
pub fn wrap_x(x: f32, width: f32) -> f32 {
    let wrapped = x.rem_euclid(width);
    // rem_euclid can round up to exactly `width` for tiny negative inputs
    if wrapped >= width { 0.0 } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_x() {
        assert_eq!(wrap_x(10.0, 100.0), 10.0);
        assert_eq!(wrap_x(101.0, 100.0), 1.0);
        assert_eq!(wrap_x(-1.0, 100.0), 99.0);
        assert_eq!(wrap_x(100.0, 100.0), 0.0);
        assert!(wrap_x(-1e-9, 100.0) < 100.0);
    }
}
