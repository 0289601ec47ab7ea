//! Keyboard input state
//!
//! Tracks which keys are currently held down, enabling:
//!   - Continuous movement and jumping while a key is held
//!   - Edge-triggered menu confirm, pause and theme (only fire on initial press)
//!
//! Keys are identified by their DOM `KeyboardEvent.code` string.

use std::collections::HashSet;

use crate::sim::TickInput;

/// Logical actions the game understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Left,
    Right,
    Jump,
    Pause,
    Theme,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Left,
        Action::Right,
        Action::Jump,
        Action::Pause,
        Action::Theme,
    ];

    /// Physical key codes bound to this action
    pub fn key_codes(self) -> &'static [&'static str] {
        match self {
            Action::Left => &["ArrowLeft", "KeyA"],
            Action::Right => &["ArrowRight", "KeyD"],
            Action::Jump => &["Space", "ArrowUp", "KeyW"],
            Action::Pause => &["KeyP", "Escape"],
            Action::Theme => &["KeyT"],
        }
    }

    /// Reverse lookup of [`Action::key_codes`]
    pub fn from_key_code(code: &str) -> Option<Action> {
        Self::ALL
            .into_iter()
            .find(|action| action.key_codes().contains(&code))
    }
}

#[derive(Debug, Default)]
pub struct InputState {
    /// Key codes currently held
    held: HashSet<String>,
    /// Actions that went down since they were last consumed
    fresh_presses: HashSet<Action>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press. Auto-repeat does not count as a fresh press.
    /// Returns true if the key is bound to an action.
    pub fn key_down(&mut self, code: &str) -> bool {
        let Some(action) = Action::from_key_code(code) else {
            return false;
        };
        if self.held.insert(code.to_string()) {
            self.fresh_presses.insert(action);
        }
        true
    }

    pub fn key_up(&mut self, code: &str) {
        self.held.remove(code);
    }

    /// Is any key bound to this action held down?
    pub fn is_held(&self, action: Action) -> bool {
        action.key_codes().iter().any(|c| self.held.contains(*c))
    }

    /// Was this action freshly pressed? (edge trigger, not consumed)
    pub fn was_pressed(&self, action: Action) -> bool {
        self.fresh_presses.contains(&action)
    }

    /// Take a fresh press; true at most once per physical press
    pub fn consume_pressed(&mut self, action: Action) -> bool {
        self.fresh_presses.remove(&action)
    }

    /// Release everything (e.g. when the page loses focus)
    pub fn reset(&mut self) {
        self.held.clear();
        self.fresh_presses.clear();
    }

    /// Snapshot for one simulation tick. Consumes the edge-triggered presses.
    pub fn to_tick_input(&mut self) -> TickInput {
        TickInput {
            left: self.is_held(Action::Left),
            right: self.is_held(Action::Right),
            jump: self.is_held(Action::Jump),
            jump_pressed: self.consume_pressed(Action::Jump),
            pause: self.consume_pressed(Action::Pause),
            theme: self.consume_pressed(Action::Theme),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(Action::from_key_code("KeyA"), Some(Action::Left));
        assert_eq!(Action::from_key_code("ArrowRight"), Some(Action::Right));
        assert_eq!(Action::from_key_code("ArrowUp"), Some(Action::Jump));
        assert_eq!(Action::from_key_code("Escape"), Some(Action::Pause));
        assert_eq!(Action::from_key_code("KeyT"), Some(Action::Theme));
        assert_eq!(Action::from_key_code("KeyQ"), None);
    }

    #[test]
    fn test_held_until_released() {
        let mut input = InputState::new();
        input.key_down("KeyD");
        assert!(input.is_held(Action::Right));
        assert!(input.to_tick_input().right);
        assert!(input.to_tick_input().right);
        input.key_up("KeyD");
        assert!(!input.is_held(Action::Right));
    }

    #[test]
    fn test_press_consumed_once() {
        let mut input = InputState::new();
        input.key_down("Space");
        let first = input.to_tick_input();
        assert!(first.jump && first.jump_pressed);
        let second = input.to_tick_input();
        assert!(second.jump && !second.jump_pressed);
    }

    #[test]
    fn test_auto_repeat_is_not_a_new_press() {
        let mut input = InputState::new();
        input.key_down("KeyP");
        assert!(input.consume_pressed(Action::Pause));
        input.key_down("KeyP");
        assert!(!input.was_pressed(Action::Pause));

        input.key_up("KeyP");
        input.key_down("KeyP");
        assert!(input.was_pressed(Action::Pause));
    }

    #[test]
    fn test_either_binding_holds_action() {
        let mut input = InputState::new();
        input.key_down("ArrowLeft");
        input.key_down("KeyA");
        input.key_up("ArrowLeft");
        assert!(input.is_held(Action::Left));
    }

    #[test]
    fn test_unbound_keys_ignored() {
        let mut input = InputState::new();
        assert!(!input.key_down("F5"));
        assert_eq!(format!("{:?}", input.to_tick_input()), format!("{:?}", TickInput::default()));
    }
}
