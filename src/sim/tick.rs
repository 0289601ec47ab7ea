//! Fixed timestep simulation tick
//!
//! Drives the phase machine and advances every entity in a fixed order:
//! lanes, Jack, enemies, power-ups, intent queue, hole timer, combo decay,
//! time-slow decay.

use super::event::{GameEvent, Intent};
use super::state::{GamePhase, GameState};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held
    pub left: bool,
    /// Held
    pub right: bool,
    /// Held
    pub jump: bool,
    /// Jump went down since the last frame; confirms menus
    pub jump_pressed: bool,
    /// Pause toggle (edge)
    pub pause: bool,
    /// Theme cycle (edge)
    pub theme: bool,
}

/// Advance the game state by one step of `real_dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, real_dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();

    match state.phase {
        GamePhase::Paused => {
            if input.pause {
                state.phase = GamePhase::Playing;
                events.push(GameEvent::Resumed);
            }
            return events;
        }
        GamePhase::Playing => {
            if input.pause {
                state.phase = GamePhase::Paused;
                events.push(GameEvent::Paused);
                return events;
            }
            if input.theme {
                events.push(GameEvent::ThemeCycleRequested);
            }
        }
        GamePhase::Start | GamePhase::Poem | GamePhase::GameOver | GamePhase::Victory => {
            if input.jump_pressed {
                confirm(state, &mut events);
                return events;
            }
        }
    }

    state.time_ticks += 1;
    let dt = real_dt * state.time_scale;

    // Lanes and enemies keep moving behind the menus
    for floor in &mut state.floors {
        floor.tick(dt);
    }

    if state.phase == GamePhase::Playing {
        let mut intents = Vec::new();

        state.player.tick(
            dt,
            input,
            &state.floors,
            &state.tuning,
            &mut intents,
            &mut events,
        );

        let player_box = state.player.bounds();
        for enemy in &mut state.enemies {
            enemy.tick(dt, &player_box, &mut intents);
        }

        state.powerups.retain_mut(|powerup| {
            powerup.tick(dt);
            if powerup.bounds().overlaps(&player_box) {
                intents.push(Intent::CollectPowerUp(powerup.kind));
                false
            } else {
                true
            }
        });

        state.apply_intents(intents, &mut events);

        if state.phase == GamePhase::Playing {
            state.hole_timer += dt;
            if state.hole_timer > state.tuning.hole_interval {
                state.spawn_hole(&mut events);
                state.hole_timer = 0.0;
            }
        }
    } else {
        for enemy in &mut state.enemies {
            enemy.patrol(dt);
        }
    }

    // A streak keeps expiring while the poem or game-over screen is up
    if let Some(count) = state.combo.tick(dt) {
        log::debug!("Combo of {count} expired");
        events.push(GameEvent::ComboLost { count });
    }

    state.decay_time_slow(dt, &mut events);

    events
}

/// Jump pressed on a menu screen
fn confirm(state: &mut GameState, events: &mut Vec<GameEvent>) {
    match state.phase {
        GamePhase::Start => {
            state.phase = GamePhase::Playing;
            log::info!("Game started (seed {})", state.seed);
            events.push(GameEvent::GameStarted);
        }
        GamePhase::Poem => state.next_level(events),
        GamePhase::GameOver => state.restart(events),
        GamePhase::Victory => {
            // First press offers the leaderboard, second press restarts
            if !state.leaderboard_prompt_shown && state.qualifies_for_leaderboard() {
                state.leaderboard_prompt_shown = true;
                events.push(GameEvent::LeaderboardQualifies { score: state.score });
            } else {
                state.restart(events);
            }
        }
        GamePhase::Playing | GamePhase::Paused => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::enemy::Enemy;
    use crate::sim::floor::Floor;
    use crate::sim::holes::Hole;
    use crate::sim::player::PlayerState;
    use crate::sim::powerup::{PowerUp, PowerUpKind};
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn press_jump() -> TickInput {
        TickInput {
            jump: true,
            jump_pressed: true,
            ..Default::default()
        }
    }

    fn started(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        tick(&mut state, &press_jump(), SIM_DT);
        state
    }

    /// Solid lanes so Jack stays put
    fn solid_floors(state: &mut GameState) {
        state.floors = (0..FLOOR_COUNT)
            .map(|i| Floor::with_holes(i, 0.0, Vec::new()))
            .collect();
    }

    #[test]
    fn test_start_waits_for_jump() {
        let mut state = GameState::new(1);
        let before = state.floors[0].geometry.holes()[0].start;
        for _ in 0..60 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert_eq!(state.phase, GamePhase::Start);
        // The backdrop still animates
        assert_ne!(state.floors[0].geometry.holes()[0].start, before);

        // Holding jump without a fresh press does nothing
        let held = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut state, &held, SIM_DT);
        assert_eq!(state.phase, GamePhase::Start);

        let events = tick(&mut state, &press_jump(), SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(events, vec![GameEvent::GameStarted]);
    }

    #[test]
    fn test_pause_freezes_everything() {
        let mut state = started(2);
        let events = tick(
            &mut state,
            &TickInput {
                pause: true,
                ..Default::default()
            },
            SIM_DT,
        );
        assert_eq!(events, vec![GameEvent::Paused]);
        assert_eq!(state.phase, GamePhase::Paused);

        let snapshot = serde_json::to_string(&state).unwrap();
        let ticks = state.time_ticks;
        for _ in 0..120 {
            tick(&mut state, &press_jump(), SIM_DT);
        }
        assert_eq!(state.time_ticks, ticks);
        assert_eq!(serde_json::to_string(&state).unwrap(), snapshot);

        let events = tick(
            &mut state,
            &TickInput {
                pause: true,
                ..Default::default()
            },
            SIM_DT,
        );
        assert_eq!(events, vec![GameEvent::Resumed]);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_theme_request_only_while_playing() {
        let theme = TickInput {
            theme: true,
            ..Default::default()
        };
        let mut state = GameState::new(3);
        assert!(!tick(&mut state, &theme, SIM_DT).contains(&GameEvent::ThemeCycleRequested));

        let mut state = started(3);
        assert!(tick(&mut state, &theme, SIM_DT).contains(&GameEvent::ThemeCycleRequested));
    }

    #[test]
    fn test_collect_powerup_on_overlap() {
        let mut state = started(4);
        solid_floors(&mut state);
        let pos = state.player.pos;
        state.powerups.push(PowerUp::new(PowerUpKind::Shield, pos));
        let events = tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.powerups.is_empty());
        assert!(state.player.shield);
        assert!(events.contains(&GameEvent::ShieldGained));
    }

    #[test]
    fn test_enemy_contact_stuns_once() {
        let mut state = started(5);
        solid_floors(&mut state);
        let mut rng = Pcg32::seed_from_u64(1);
        let mut enemy = Enemy::spawn(&state.floors[BOTTOM_FLOOR], &state.tuning, &mut rng);
        enemy.pos.x = state.player.pos.x;
        enemy.speed = 0.0;
        state.enemies = vec![enemy.clone(), enemy];

        let events = tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.player.is_stunned());
        let stuns = events
            .iter()
            .filter(|e| matches!(e, GameEvent::Stunned { .. }))
            .count();
        assert_eq!(stuns, 1);
    }

    #[test]
    fn test_periodic_hole_spawn() {
        let mut state = started(6);
        solid_floors(&mut state);
        let mut spawned = 0;
        // A little over 8 seconds of standing still
        for _ in 0..(8.1 / SIM_DT) as usize {
            let events = tick(&mut state, &TickInput::default(), SIM_DT);
            spawned += events
                .iter()
                .filter(|e| matches!(e, GameEvent::HoleSpawned { .. }))
                .count();
        }
        assert_eq!(spawned, 1);
        assert!(state.hole_timer < 1.0);
    }

    #[test]
    fn test_time_slow_scales_lanes() {
        let mut state = started(7);
        state.floors = vec![Floor::with_holes(0, 100.0, vec![Hole::new(200.0, HOLE_WIDTH)])];
        state.time_scale = 0.5;
        state.slow_timer = 5.0;
        state.phase = GamePhase::GameOver;
        tick(&mut state, &TickInput::default(), 0.1);
        assert!((state.floors[0].geometry.holes()[0].start - 205.0).abs() < 1e-3);
        assert!((state.slow_timer - 4.9).abs() < 1e-4);
    }

    #[test]
    fn test_combo_expires_on_poem_screen() {
        let mut state = GameState::new(11);
        state.phase = GamePhase::Poem;
        state.combo.count = 3;
        state.combo.decay_timer = 2.0;

        let mut lost = Vec::new();
        for _ in 0..(2.5 / SIM_DT) as usize {
            lost.extend(
                tick(&mut state, &TickInput::default(), SIM_DT)
                    .into_iter()
                    .filter(|e| matches!(e, GameEvent::ComboLost { .. })),
            );
        }
        assert_eq!(lost, vec![GameEvent::ComboLost { count: 3 }]);
        assert_eq!(state.combo.count, 0);

        tick(&mut state, &press_jump(), SIM_DT);
        assert_eq!(state.level, 2);
        assert_eq!(state.combo.multiplier(&state.tuning), 1.0);
    }

    #[test]
    fn test_time_slow_halves_combo_and_stun_timers() {
        let mut state = started(12);
        solid_floors(&mut state);
        state.combo.count = 3;
        state.combo.decay_timer = 2.0;
        assert!(state.player.stun(&state.tuning));
        state.time_scale = 0.5;
        state.slow_timer = 5.0;

        // One real second
        for _ in 0..120 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }

        assert_eq!(state.combo.count, 3);
        assert!((state.combo.decay_timer - 1.5).abs() < 1e-3);
        match state.player.state {
            PlayerState::Stunned { timer } => assert!((timer - 0.5).abs() < 1e-3),
            PlayerState::Normal => panic!("stun ended at full speed"),
        }
        assert!((state.slow_timer - 4.0).abs() < 1e-3);
        assert_eq!(state.time_scale, 0.5);
    }

    #[test]
    fn test_fall_to_game_over_then_restart() {
        let mut state = started(8);
        state.lives = 1;
        state.player.pos = Vec2::new(100.0, SCREEN_HEIGHT + 10.0);
        state.player.grounded = false;
        let events = tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(events.contains(&GameEvent::LifeLost { lives: 0 }));

        let events = tick(&mut state, &press_jump(), SIM_DT);
        assert_eq!(events, vec![GameEvent::Restarted]);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.lives, 3);
    }

    #[test]
    fn test_exit_top_goes_to_poem_then_next_level() {
        let mut state = started(9);
        state.floors.clear();
        state.player.pos = Vec2::new(100.0, -PLAYER_HEIGHT - 1.0);
        state.player.grounded = false;
        state.player.vel = Vec2::new(0.0, -900.0);
        let events = tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::Poem);
        assert!(events.contains(&GameEvent::LevelComplete { level: 1 }));

        let events = tick(&mut state, &press_jump(), SIM_DT);
        assert_eq!(events, vec![GameEvent::LevelStarted { level: 2 }]);
        assert_eq!(state.enemies.len(), 1);
    }

    #[test]
    fn test_victory_prompts_before_restart() {
        let mut state = GameState::new(10);
        state.phase = GamePhase::Victory;
        state.score = 900;

        let events = tick(&mut state, &press_jump(), SIM_DT);
        assert_eq!(events, vec![GameEvent::LeaderboardQualifies { score: 900 }]);
        assert_eq!(state.phase, GamePhase::Victory);

        let events = tick(&mut state, &press_jump(), SIM_DT);
        assert_eq!(events, vec![GameEvent::Restarted]);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_victory_without_qualifying_restarts_at_once() {
        let mut state = GameState::new(10);
        state.phase = GamePhase::Victory;
        state.score = 0;
        let events = tick(&mut state, &press_jump(), SIM_DT);
        assert_eq!(events, vec![GameEvent::Restarted]);
    }

    #[test]
    fn test_deterministic_replay() {
        let script = |i: usize| TickInput {
            left: i % 300 < 100,
            right: i % 300 >= 150,
            jump: i % 90 == 0,
            jump_pressed: i == 0 || i % 90 == 0,
            ..Default::default()
        };

        let run = || {
            let mut state = GameState::new(12345);
            let mut log = Vec::new();
            for i in 0..3_000 {
                log.extend(tick(&mut state, &script(i), SIM_DT));
            }
            (serde_json::to_string(&state).unwrap(), log)
        };

        let (a_state, a_events) = run();
        let (b_state, b_events) = run();
        assert_eq!(a_state, b_state);
        assert_eq!(a_events, b_events);
    }
}
