//! Data-driven game balance
//!
//! Defaults reproduce the classic feel. A JSON override can be loaded with
//! [`Tuning::from_json`]; missing fields keep their defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a tuning table
#[derive(Debug, Error)]
pub enum TuningError {
    /// JSON could not be parsed
    #[error("Failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value parsed but is unusable
    #[error("Invalid tuning value '{field}': {reason}")]
    OutOfRange { field: &'static str, reason: String },
}

/// Gameplay balance table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    /// Horizontal run speed (px/s)
    pub run_speed: f32,
    /// Vertical velocity applied on jump (negative = up)
    pub jump_velocity: f32,
    /// Downward acceleration (px/s²)
    pub gravity: f32,
    /// Band below a floor surface (and above its underside) that still counts as contact
    pub contact_tolerance: f32,
    /// Impact speed above which a landing fires effects
    pub hard_landing_speed: f32,
    /// Interval between footstep events while walking
    pub step_interval: f32,
    /// Stun duration after touching an enemy
    pub stun_duration: f32,
    /// Upward hop given on stun (negative = up)
    pub stun_hop_velocity: f32,

    // === Lanes ===
    /// Lane speed magnitude is `lane_base_speed + index * lane_speed_step`
    pub lane_base_speed: f32,
    pub lane_speed_step: f32,
    /// Maximum holes a single lane may carry
    pub max_holes_per_floor: usize,
    /// Hole-free radius around screen center on the bottom lane at level start
    pub spawn_safe_radius: f32,
    /// Seconds between periodic hole spawns
    pub hole_interval: f32,

    // === Enemies ===
    pub enemy_base_speed: f32,
    pub enemy_speed_spread: f32,

    // === Power-ups ===
    /// Chance a hole spawn also spawns a power-up
    pub powerup_chance: f32,
    /// Conditional kind weights (time-slow takes the remainder)
    pub extra_life_weight: f32,
    pub shield_weight: f32,
    /// Time scale while slow-mo is active
    pub slow_time_scale: f32,
    /// Real-time duration of slow-mo
    pub slow_duration: f32,

    // === Scoring ===
    pub points_per_climb: u64,
    /// Seconds a combo survives without another climb
    pub combo_window: f32,
    /// Climbs per multiplier step
    pub combo_step: u32,
    /// Multiplier added per step
    pub combo_bonus: f32,
    /// Score multiple that grants an extra-life spawn
    pub milestone_points: u64,

    // === Session ===
    pub start_lives: u8,
    pub max_lives: u8,
    pub final_level: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            run_speed: 300.0,
            jump_velocity: -900.0,
            gravity: 2500.0,
            contact_tolerance: 20.0,
            hard_landing_speed: 500.0,
            step_interval: 0.15,
            stun_duration: 1.0,
            stun_hop_velocity: -200.0,

            lane_base_speed: 40.0,
            lane_speed_step: 15.0,
            max_holes_per_floor: 2,
            spawn_safe_radius: 200.0,
            hole_interval: 8.0,

            enemy_base_speed: 100.0,
            enemy_speed_spread: 80.0,

            powerup_chance: 0.15,
            extra_life_weight: 0.05,
            shield_weight: 0.475,
            slow_time_scale: 0.5,
            slow_duration: 5.0,

            points_per_climb: 10,
            combo_window: 2.0,
            combo_step: 5,
            combo_bonus: 0.5,
            milestone_points: 750,

            start_lives: 3,
            max_lives: 6,
            final_level: 10,
        }
    }
}

impl Tuning {
    /// Parse a tuning table from JSON and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!("Loaded tuning overrides");
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(TuningError::OutOfRange {
                    field,
                    reason: format!("must be positive, got {value}"),
                })
            }
        }

        positive("gravity", self.gravity)?;
        positive("hole_interval", self.hole_interval)?;
        positive("combo_window", self.combo_window)?;
        positive("slow_duration", self.slow_duration)?;
        positive("slow_time_scale", self.slow_time_scale)?;

        if self.jump_velocity >= 0.0 {
            return Err(TuningError::OutOfRange {
                field: "jump_velocity",
                reason: "must point upward (negative)".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.powerup_chance) {
            return Err(TuningError::OutOfRange {
                field: "powerup_chance",
                reason: format!("must be a probability, got {}", self.powerup_chance),
            });
        }
        if self.extra_life_weight + self.shield_weight > 1.0 {
            return Err(TuningError::OutOfRange {
                field: "shield_weight",
                reason: "kind weights exceed 1.0".to_string(),
            });
        }
        if self.combo_step == 0 {
            return Err(TuningError::OutOfRange {
                field: "combo_step",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.milestone_points == 0 {
            return Err(TuningError::OutOfRange {
                field: "milestone_points",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.start_lives == 0 || self.start_lives > self.max_lives {
            return Err(TuningError::OutOfRange {
                field: "start_lives",
                reason: format!("must be within 1..={}", self.max_lives),
            });
        }
        if self.final_level == 0 {
            return Err(TuningError::OutOfRange {
                field: "final_level",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "gravity": 3000.0, "max_lives": 9 }"#).unwrap();
        assert_eq!(tuning.gravity, 3000.0);
        assert_eq!(tuning.max_lives, 9);
        assert_eq!(tuning.run_speed, Tuning::default().run_speed);
    }

    #[test]
    fn test_rejects_bad_json() {
        assert!(matches!(
            Tuning::from_json("{ gravity: "),
            Err(TuningError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_downward_jump() {
        let err = Tuning::from_json(r#"{ "jump_velocity": 100.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::OutOfRange { field: "jump_velocity", .. }
        ));
    }

    #[test]
    fn test_rejects_overweight_kinds() {
        let err = Tuning::from_json(r#"{ "extra_life_weight": 0.6, "shield_weight": 0.6 }"#)
            .unwrap_err();
        assert!(err.to_string().contains("shield_weight"));
    }
}
