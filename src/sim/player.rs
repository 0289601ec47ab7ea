//! Jack: input-driven movement, gravity, and resolution against the lanes
//!
//! Each tick runs in this order:
//! 1. Stun timer (stunned Jack ignores horizontal input and cannot jump)
//! 2. Horizontal velocity from input, footsteps, jump
//! 3. Gravity and integration, horizontal wrap
//! 4. Lane resolution: landing when falling, head-bonk when rising
//! 5. Screen bounds: below the bottom loses a life, above the top clears the level

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::event::{GameEvent, Intent};
use super::floor::{Floor, floor_top};
use super::tick::TickInput;
use crate::consts::*;
use crate::tuning::Tuning;
use crate::wrap_x;

/// Control state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlayerState {
    Normal,
    /// Knocked by an enemy; seconds remaining
    Stunned { timer: f32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub grounded: bool,
    pub state: PlayerState,
    /// Absorbs one life loss
    pub shield: bool,
    /// Lane of the last resolved landing; `None` right after a respawn
    pub last_grounded_floor: Option<usize>,
    /// +1 facing right, -1 facing left
    pub facing: f32,
    step_timer: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    /// A fresh Jack standing at the spawn point
    pub fn new() -> Self {
        let mut player = Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            grounded: false,
            state: PlayerState::Normal,
            shield: false,
            last_grounded_floor: None,
            facing: 1.0,
            step_timer: 0.0,
        };
        player.reset_to_spawn_position();
        player
    }

    /// Center of the bottom lane, resting on its surface, all motion cleared
    pub fn reset_to_spawn_position(&mut self) {
        self.pos = Vec2::new(
            (SCREEN_WIDTH - self.size.x) / 2.0,
            floor_top(BOTTOM_FLOOR) - self.size.y,
        );
        self.vel = Vec2::ZERO;
        self.grounded = true;
        self.state = PlayerState::Normal;
        self.last_grounded_floor = None;
        self.step_timer = 0.0;
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.pos.x + self.size.x / 2.0
    }

    pub fn is_stunned(&self) -> bool {
        matches!(self.state, PlayerState::Stunned { .. })
    }

    /// Enter the stunned state. Re-entry while already stunned does nothing,
    /// so the timer can never be extended.
    pub fn stun(&mut self, tuning: &Tuning) -> bool {
        if self.is_stunned() {
            return false;
        }
        self.state = PlayerState::Stunned {
            timer: tuning.stun_duration,
        };
        self.vel = Vec2::new(0.0, tuning.stun_hop_velocity);
        log::debug!("Jack stunned at ({:.0}, {:.0})", self.pos.x, self.pos.y);
        true
    }

    /// Advance Jack by `dt` seconds
    pub fn tick(
        &mut self,
        dt: f32,
        input: &TickInput,
        floors: &[Floor],
        tuning: &Tuning,
        intents: &mut Vec<Intent>,
        events: &mut Vec<GameEvent>,
    ) {
        if let PlayerState::Stunned { timer } = &mut self.state {
            *timer -= dt;
            if *timer <= 0.0 {
                self.state = PlayerState::Normal;
            }
            self.vel.y += tuning.gravity * dt;
            self.pos.y += self.vel.y * dt;
            self.resolve_floors(floors, tuning, intents, events);
            self.check_fell_off(intents);
            return;
        }

        self.vel.x = if input.left {
            -tuning.run_speed
        } else if input.right {
            tuning.run_speed
        } else {
            0.0
        };
        if self.vel.x != 0.0 {
            self.facing = self.vel.x.signum();
        }

        if self.grounded && self.vel.x != 0.0 {
            self.step_timer += dt;
            if self.step_timer > tuning.step_interval {
                events.push(GameEvent::Step);
                self.step_timer = 0.0;
            }
        } else {
            // Ready to step as soon as Jack starts walking
            self.step_timer = tuning.step_interval;
        }

        if self.grounded && input.jump {
            self.vel.y = tuning.jump_velocity;
            self.grounded = false;
            events.push(GameEvent::Jumped {
                pos: Vec2::new(self.center_x(), self.pos.y + self.size.y),
            });
        }

        self.vel.y += tuning.gravity * dt;
        self.pos += self.vel * dt;
        self.pos.x = wrap_x(self.pos.x, SCREEN_WIDTH);

        self.resolve_floors(floors, tuning, intents, events);
        if self.check_fell_off(intents) {
            return;
        }

        if self.pos.y < 0.0 {
            intents.push(Intent::CompleteLevel);
        }
    }

    /// Land on or bonk against every lane Jack is touching
    fn resolve_floors(
        &mut self,
        floors: &[Floor],
        tuning: &Tuning,
        intents: &mut Vec<Intent>,
        events: &mut Vec<GameEvent>,
    ) {
        self.grounded = false;
        let center_x = self.center_x();

        for floor in floors {
            if floor.query_hole_at(center_x) {
                continue;
            }

            if self.vel.y >= 0.0 {
                let feet = self.pos.y + self.size.y;
                if feet > floor.y && feet < floor.bottom() + tuning.contact_tolerance {
                    self.land_on(floor, tuning, intents, events);
                }
            } else if self.pos.y < floor.bottom() && self.pos.y > floor.y - tuning.contact_tolerance
            {
                self.pos.y = floor.bottom();
                self.vel.y = 0.0;
            }
        }
    }

    fn land_on(
        &mut self,
        floor: &Floor,
        tuning: &Tuning,
        intents: &mut Vec<Intent>,
        events: &mut Vec<GameEvent>,
    ) {
        let impact = self.vel.y;
        self.pos.y = floor.y - self.size.y;
        self.vel.y = 0.0;
        self.grounded = true;

        if impact > tuning.hard_landing_speed {
            events.push(GameEvent::Landed {
                pos: Vec2::new(self.center_x(), floor.y),
                impact,
            });
        }

        // Lower index is higher up the screen
        if self
            .last_grounded_floor
            .is_some_and(|last| floor.index < last)
        {
            intents.push(Intent::RegisterClimb { floor: floor.index });
        }
        self.last_grounded_floor = Some(floor.index);
    }

    fn check_fell_off(&self, intents: &mut Vec<Intent>) -> bool {
        if self.pos.y > SCREEN_HEIGHT {
            intents.push(Intent::LoseLife);
            true
        } else {
            false
        }
    }
}
