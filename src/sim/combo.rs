//! Climb combo tracking
//!
//! Only upward lane changes build the combo. The streak dies when the decay
//! timer runs out or a life is lost. The multiplier is derived from the count
//! and never stored.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComboState {
    pub count: u32,
    /// Seconds left before the streak expires
    pub decay_timer: f32,
}

impl ComboState {
    pub fn new() -> Self {
        Self::default()
    }

    /// `1 + floor(count / step) * bonus`
    pub fn multiplier(&self, tuning: &Tuning) -> f32 {
        1.0 + (self.count / tuning.combo_step) as f32 * tuning.combo_bonus
    }

    /// Count one climb and return the points it is worth
    pub fn register_climb(&mut self, tuning: &Tuning) -> u64 {
        self.count += 1;
        self.decay_timer = tuning.combo_window;
        (tuning.points_per_climb as f32 * self.multiplier(tuning)).round() as u64
    }

    /// Run the decay timer. Returns the lost streak length when it expires.
    pub fn tick(&mut self, dt: f32) -> Option<u32> {
        if self.count == 0 {
            return None;
        }
        self.decay_timer -= dt;
        if self.decay_timer <= 0.0 {
            self.reset()
        } else {
            None
        }
    }

    /// Drop the streak. Returns its length if there was one.
    pub fn reset(&mut self) -> Option<u32> {
        let lost = self.count;
        self.count = 0;
        self.decay_timer = 0.0;
        (lost > 0).then_some(lost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_multiplier_is_one_without_combo() {
        assert_eq!(ComboState::new().multiplier(&Tuning::default()), 1.0);
    }

    #[test]
    fn test_points_grow_every_five_climbs() {
        let tuning = Tuning::default();
        let mut combo = ComboState::new();
        let points: Vec<u64> = (0..10).map(|_| combo.register_climb(&tuning)).collect();
        assert_eq!(points, vec![10, 10, 10, 10, 15, 15, 15, 15, 15, 20]);
        assert_eq!(combo.decay_timer, 2.0);
    }

    #[test]
    fn test_decay_expires_streak() {
        let tuning = Tuning::default();
        let mut combo = ComboState::new();
        combo.register_climb(&tuning);
        combo.register_climb(&tuning);
        assert_eq!(combo.tick(1.5), None);
        assert_eq!(combo.count, 2);
        assert_eq!(combo.tick(0.5), Some(2));
        assert_eq!(combo.count, 0);
        assert_eq!(combo.multiplier(&tuning), 1.0);
    }

    #[test]
    fn test_climb_refreshes_timer() {
        let tuning = Tuning::default();
        let mut combo = ComboState::new();
        combo.register_climb(&tuning);
        combo.tick(1.9);
        combo.register_climb(&tuning);
        assert_eq!(combo.tick(1.9), None);
        assert_eq!(combo.count, 2);
    }

    #[test]
    fn test_idle_combo_does_not_tick() {
        let mut combo = ComboState::new();
        assert_eq!(combo.tick(10.0), None);
        assert_eq!(combo.reset(), None);
    }

    proptest! {
        #[test]
        fn prop_multiplier_formula(count in 0u32..10_000) {
            let tuning = Tuning::default();
            let combo = ComboState { count, decay_timer: 1.0 };
            let expected = 1.0 + (count / 5) as f32 * 0.5;
            prop_assert_eq!(combo.multiplier(&tuning), expected);
        }
    }
}
