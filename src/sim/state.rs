//! Session state and the rules that tie the entities together
//!
//! The session exclusively owns every lane, enemy, power-up and Jack himself.
//! Entities report what happened through [`Intent`]s; the session applies them
//! here, in queue order, once per tick.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::combo::ComboState;
use super::enemy::{Enemy, init_enemies};
use super::event::{GameEvent, Intent};
use super::floor::{Floor, init_floors};
use super::player::Player;
use super::powerup::{PowerUp, PowerUpKind};
use crate::highscores::{ScoreBoard, ScoreEntry};
use crate::tuning::Tuning;

/// Top-level game flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for jump
    Start,
    /// Active gameplay
    Playing,
    /// Frozen until pause is pressed again
    Paused,
    /// Level cleared, waiting for jump to continue
    Poem,
    /// Final level cleared
    Victory,
    /// Out of lives
    GameOver,
}

fn default_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

/// Complete session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    #[serde(skip, default = "default_rng")]
    rng: Pcg32,
    pub tuning: Tuning,
    /// 1-based
    pub level: u32,
    pub lives: u8,
    pub score: u64,
    pub phase: GamePhase,
    pub floors: Vec<Floor>,
    pub enemies: Vec<Enemy>,
    pub powerups: Vec<PowerUp>,
    pub player: Player,
    pub combo: ComboState,
    /// Multiplier applied to every tick's dt
    pub time_scale: f32,
    /// Real seconds of slow-mo left
    pub slow_timer: f32,
    /// Seconds since the last periodic hole
    pub hole_timer: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Latest leaderboard snapshot pushed by the score service
    pub top_scores: ScoreBoard,
    pub(crate) leaderboard_prompt_shown: bool,
}

impl GameState {
    /// Create a new session with default balance
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let floors = init_floors(&tuning, &mut rng);
        let enemies = init_enemies(1, &floors, &tuning, &mut rng);

        Self {
            seed,
            rng,
            level: 1,
            lives: tuning.start_lives,
            score: 0,
            phase: GamePhase::Start,
            floors,
            enemies,
            powerups: Vec::new(),
            player: Player::new(),
            combo: ComboState::new(),
            time_scale: 1.0,
            slow_timer: 0.0,
            hole_timer: 0.0,
            time_ticks: 0,
            top_scores: ScoreBoard::new(),
            leaderboard_prompt_shown: false,
            tuning,
        }
    }

    /// Replace the cached leaderboard (called from the score subscription)
    pub fn set_top_scores(&mut self, entries: Vec<ScoreEntry>) {
        self.top_scores.replace(entries);
    }

    /// Does the current score earn a leaderboard slot? (victory screen, ties count)
    pub fn qualifies_for_leaderboard(&self) -> bool {
        self.top_scores.qualifies(self.score)
    }

    /// Game-over check: a full board must be beaten outright
    pub fn outranks_leaderboard(&self) -> bool {
        self.top_scores.outranks_lowest(self.score)
    }

    /// Best score to show: the leaderboard's top or the live score, whichever is higher
    pub fn best_score(&self) -> u64 {
        self.top_scores.top_score().unwrap_or(0).max(self.score)
    }

    /// Back to level 1 with fresh lanes, enemies and lives
    pub fn restart(&mut self, events: &mut Vec<GameEvent>) {
        self.level = 1;
        self.lives = self.tuning.start_lives;
        self.score = 0;
        self.combo = ComboState::new();
        self.time_scale = 1.0;
        self.slow_timer = 0.0;
        self.leaderboard_prompt_shown = false;
        self.player = Player::new();
        self.build_level();
        self.phase = GamePhase::Playing;
        log::info!("Game restarted (seed {})", self.seed);
        events.push(GameEvent::Restarted);
    }

    /// Advance from the poem screen to the next level, or to victory
    pub fn next_level(&mut self, events: &mut Vec<GameEvent>) {
        if self.level >= self.tuning.final_level {
            self.phase = GamePhase::Victory;
            log::info!("Victory with score {}", self.score);
            events.push(GameEvent::Victory { score: self.score });
            return;
        }

        self.level += 1;
        let shield = self.player.shield;
        self.player = Player::new();
        self.player.shield = shield;
        self.build_level();
        self.phase = GamePhase::Playing;
        log::info!("Level {} started", self.level);
        events.push(GameEvent::LevelStarted { level: self.level });
    }

    /// Fresh lanes and enemies for the current level
    fn build_level(&mut self) {
        self.floors = init_floors(&self.tuning, &mut self.rng);
        self.enemies = init_enemies(self.level, &self.floors, &self.tuning, &mut self.rng);
        self.powerups.clear();
        self.hole_timer = 0.0;
    }

    /// Punch a hole in a random lane (capped per lane) and maybe drop a power-up
    pub fn spawn_hole(&mut self, events: &mut Vec<GameEvent>) {
        let index = self.rng.random_range(0..self.floors.len());
        if self.floors[index].add_hole(&mut self.rng) {
            log::debug!("Hole added to floor {index}");
            events.push(GameEvent::HoleSpawned { floor: index });
        }

        if self.rng.random::<f32>() < self.tuning.powerup_chance {
            let kind = PowerUpKind::roll(&self.tuning, &mut self.rng);
            self.spawn_powerup(kind, events);
        }
    }

    fn spawn_powerup(&mut self, kind: PowerUpKind, events: &mut Vec<GameEvent>) {
        let powerup = PowerUp::spawn_random(kind, &mut self.rng);
        log::debug!("Spawned {:?} at ({:.0}, {:.0})", kind, powerup.pos.x, powerup.pos.y);
        events.push(GameEvent::PowerUpSpawned {
            kind,
            pos: powerup.pos,
        });
        self.powerups.push(powerup);
    }

    /// Add points and grant one extra-life spawn per milestone crossed
    pub fn award_points(&mut self, points: u64, events: &mut Vec<GameEvent>) {
        let old = self.score;
        self.score += points;

        let step = self.tuning.milestone_points;
        let crossed = self.score / step - old / step;
        for _ in 0..crossed {
            events.push(GameEvent::MilestoneReached { score: self.score });
            self.spawn_powerup(PowerUpKind::ExtraLife, events);
        }
    }

    /// Apply the tick's intents in the order they were queued
    pub fn apply_intents(&mut self, intents: Vec<Intent>, events: &mut Vec<GameEvent>) {
        for intent in intents {
            match intent {
                Intent::StunPlayer => {
                    if self.player.stun(&self.tuning) {
                        events.push(GameEvent::Stunned {
                            pos: Vec2::new(self.player.center_x(), self.player.pos.y),
                        });
                    }
                }
                Intent::CollectPowerUp(kind) => self.collect(kind, events),
                Intent::RegisterClimb { floor } => self.register_climb(floor, events),
                Intent::LoseLife => self.lose_life(events),
                Intent::CompleteLevel => {
                    if self.phase == GamePhase::Playing {
                        self.phase = GamePhase::Poem;
                        log::info!("Level {} complete", self.level);
                        events.push(GameEvent::LevelComplete { level: self.level });
                    }
                }
            }
        }
    }

    fn register_climb(&mut self, floor: usize, events: &mut Vec<GameEvent>) {
        self.spawn_hole(events);

        let points = self.combo.register_climb(&self.tuning);
        let pos = Vec2::new(self.player.center_x(), self.player.pos.y);
        log::debug!("Climbed to floor {floor}, combo {}", self.combo.count);
        events.push(GameEvent::ComboIncreased {
            count: self.combo.count,
            pos,
        });
        events.push(GameEvent::PointsAwarded { points, pos });
        self.award_points(points, events);
    }

    /// Apply a collected power-up's effect
    pub fn collect(&mut self, kind: PowerUpKind, events: &mut Vec<GameEvent>) {
        match kind {
            PowerUpKind::Shield => {
                self.player.shield = true;
                events.push(GameEvent::ShieldGained);
            }
            PowerUpKind::Time => {
                self.time_scale = self.tuning.slow_time_scale;
                self.slow_timer = self.tuning.slow_duration;
                events.push(GameEvent::TimeSlowStarted);
            }
            PowerUpKind::ExtraLife => {
                if self.lives < self.tuning.max_lives {
                    self.lives += 1;
                    events.push(GameEvent::LifeGained { lives: self.lives });
                } else {
                    events.push(GameEvent::MaxLives);
                }
            }
        }
    }

    /// Jack fell out of the level. A shield absorbs it; otherwise a life goes.
    pub fn lose_life(&mut self, events: &mut Vec<GameEvent>) {
        if self.player.shield {
            self.player.shield = false;
            log::debug!("Shield absorbed a fall");
            events.push(GameEvent::ShieldBroken);
        } else {
            self.lives = self.lives.saturating_sub(1);
            if let Some(count) = self.combo.reset() {
                events.push(GameEvent::ComboLost { count });
            }
            log::info!("Life lost, {} left", self.lives);
            events.push(GameEvent::LifeLost { lives: self.lives });

            if self.lives == 0 {
                self.phase = GamePhase::GameOver;
                log::info!("Game over with score {}", self.score);
                events.push(GameEvent::GameOver { score: self.score });
                if self.outranks_leaderboard() {
                    events.push(GameEvent::LeaderboardQualifies { score: self.score });
                }
            }
        }

        self.player.reset_to_spawn_position();
        events.push(GameEvent::PlayerRespawned {
            pos: self.player.pos,
        });
    }

    /// Run the slow-mo window down by real time. `dt` is already scaled.
    pub fn decay_time_slow(&mut self, dt: f32, events: &mut Vec<GameEvent>) {
        if self.slow_timer <= 0.0 {
            return;
        }
        self.slow_timer -= dt / self.time_scale;
        if self.slow_timer <= 0.0 {
            self.time_scale = 1.0;
            self.slow_timer = 0.0;
            events.push(GameEvent::TimeSlowEnded);
        }
    }
}
