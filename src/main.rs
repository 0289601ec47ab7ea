//! Jumping Jack entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;

    use jumping_jack::consts::*;
    use jumping_jack::highscores::{LeaderboardService, LocalLeaderboard, ScoreEntry};
    use jumping_jack::sim::{GameEvent, GamePhase, GameState, tick};
    use jumping_jack::{InputState, Settings};

    type ScoresInbox = Rc<RefCell<Option<Vec<ScoreEntry>>>>;

    /// Game instance holding all state
    struct Game {
        state: GameState,
        input: InputState,
        settings: Settings,
        leaderboard: Rc<RefCell<LocalLeaderboard>>,
        /// Latest snapshot pushed by the leaderboard, applied before the next tick
        scores_inbox: ScoresInbox,
        accumulator: f32,
        last_time: f64,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let scores_inbox: ScoresInbox = Rc::new(RefCell::new(None));
            let mut leaderboard = LocalLeaderboard::load();
            let sink = Rc::clone(&scores_inbox);
            leaderboard.subscribe(Box::new(move |entries| {
                *sink.borrow_mut() = Some(entries.to_vec());
            }));

            Self {
                state: GameState::new(seed),
                input: InputState::new(),
                settings: Settings::load(),
                leaderboard: Rc::new(RefCell::new(leaderboard)),
                scores_inbox,
                accumulator: 0.0,
                last_time: 0.0,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            if let Some(entries) = self.scores_inbox.borrow_mut().take() {
                self.state.set_top_scores(entries);
            }

            self.accumulator += dt.min(MAX_FRAME_DT);
            if self.accumulator < SIM_DT {
                // Keep pending presses for the next frame that actually ticks
                return;
            }

            let mut input = self.input.to_tick_input();
            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let events = tick(&mut self.state, &input, SIM_DT);
                for event in events {
                    self.handle_event(event);
                }
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                input.jump_pressed = false;
                input.pause = false;
                input.theme = false;
            }
        }

        fn handle_event(&mut self, event: GameEvent) {
            if self.settings.sound_enabled {
                if let Some(sound) = event.sound() {
                    log::debug!("Sound: {:?}", sound);
                }
            }
            if let Some(shake) = event.shake() {
                log::debug!("Shake {:.1}s x{:.0}", shake.duration, shake.intensity);
            }

            match event {
                GameEvent::ThemeCycleRequested => {
                    let theme = self.settings.cycle_theme();
                    self.settings.save();
                    apply_theme(theme.as_str());
                    log::info!("Theme: {}", theme.as_str());
                }
                GameEvent::LeaderboardQualifies { score } => {
                    prompt_for_name(Rc::clone(&self.leaderboard), score);
                }
                _ => {}
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(el) = document.get_element_by_id("hud-level") {
                el.set_text_content(Some(&format!("LEVEL: {}", self.state.level)));
            }
            if let Some(el) = document.get_element_by_id("hud-lives") {
                el.set_text_content(Some(&format!("LIVES: {}", self.state.lives)));
            }
            if let Some(el) = document.get_element_by_id("hud-score") {
                el.set_text_content(Some(&format!("SCORE: {}", self.state.score)));
            }
            if let Some(el) = document.get_element_by_id("hud-best") {
                el.set_text_content(Some(&format!("BEST: {}", self.state.best_score())));
            }
            if let Some(el) = document.get_element_by_id("hud-combo") {
                let text = if self.state.combo.count > 1 {
                    format!(
                        "COMBO x{} ({:.1}x)",
                        self.state.combo.count,
                        self.state.combo.multiplier(&self.state.tuning)
                    )
                } else {
                    String::new()
                };
                el.set_text_content(Some(&text));
            }
            if let Some(el) = document.get_element_by_id("hud-status") {
                let text = match self.state.phase {
                    GamePhase::Start => "PRESS JUMP TO START",
                    GamePhase::Playing => "",
                    GamePhase::Paused => "PAUSED",
                    GamePhase::Poem => "LEVEL COMPLETE - PRESS JUMP",
                    GamePhase::Victory => "YOU WIN! - PRESS JUMP",
                    GamePhase::GameOver => "GAME OVER - PRESS JUMP",
                };
                el.set_text_content(Some(text));
            }
        }
    }

    fn apply_theme(name: &str) {
        if let Some(body) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.body())
        {
            let _ = body.set_attribute("data-theme", name);
        }
    }

    /// Ask for a name a second after the qualifying screen appears
    fn prompt_for_name(leaderboard: Rc<RefCell<LocalLeaderboard>>, score: u64) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let callback = Closure::once_into_js(move || {
            let Some(window) = web_sys::window() else {
                return;
            };
            let message = format!("NEW HIGH SCORE: {score}! Enter your name:");
            let name = match window.prompt_with_message(&message) {
                Ok(Some(name)) => name,
                Ok(None) => return,
                Err(e) => {
                    log::warn!("Name prompt failed: {:?}", e);
                    return;
                }
            };
            if let Err(e) = leaderboard.borrow_mut().submit(&name, score) {
                log::warn!("Score submission failed: {e}");
            }
        });
        if let Err(e) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.unchecked_ref(),
            1000,
        ) {
            log::warn!("Could not schedule name prompt: {:?}", e);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {e}").into());
        }

        log::info!("Jumping Jack starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };

        if let Some(loading) = window
            .document()
            .and_then(|d| d.get_element_by_id("loading"))
        {
            let _ = loading.set_attribute("class", "hidden");
        }

        let seed = js_sys::Date::now() as u64;
        log::info!("Seed: {}", seed);
        let game = Rc::new(RefCell::new(Game::new(seed)));
        apply_theme(game.borrow().settings.theme.as_str());

        setup_input_handlers(&window, game.clone());
        request_animation_frame(game);
    }

    fn setup_input_handlers(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if game.borrow_mut().input.key_down(&event.code()) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                game.borrow_mut().input.key_up(&event.code());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur: key-up events never arrive, so drop everything held
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().input.reset();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    //! Scripted run for exercising the simulation without a browser

    use std::cell::RefCell;
    use std::rc::Rc;

    use jumping_jack::consts::*;
    use jumping_jack::highscores::{LeaderboardService, LocalLeaderboard, ScoreEntry};
    use jumping_jack::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
    use jumping_jack::{Settings, Tuning};

    pub struct Options {
        pub seed: u64,
        pub seconds: f32,
        pub tuning: Tuning,
    }

    /// Walk back and forth holding jump; confirm menus once a second
    fn autopilot(state: &GameState, t: f32) -> TickInput {
        let frame = (t / SIM_DT).round() as u64;
        let once_a_second = frame % 120 == 0;
        match state.phase {
            GamePhase::Playing => TickInput {
                left: (t / 3.0) as u32 % 2 == 1,
                right: (t / 3.0) as u32 % 2 == 0,
                jump: true,
                jump_pressed: once_a_second,
                theme: frame == 600,
                ..Default::default()
            },
            _ => TickInput {
                jump: once_a_second,
                jump_pressed: once_a_second,
                ..Default::default()
            },
        }
    }

    pub fn run(options: Options) {
        let mut state = GameState::with_tuning(options.seed, options.tuning);
        let mut settings = Settings::load();

        let inbox: Rc<RefCell<Option<Vec<ScoreEntry>>>> = Rc::new(RefCell::new(None));
        let mut leaderboard = LocalLeaderboard::load();
        let sink = Rc::clone(&inbox);
        leaderboard.subscribe(Box::new(move |entries| {
            *sink.borrow_mut() = Some(entries.to_vec());
        }));

        let mut t = 0.0;
        let mut games = 0;
        while t < options.seconds {
            if let Some(entries) = inbox.borrow_mut().take() {
                state.set_top_scores(entries);
            }

            let input = autopilot(&state, t);
            for event in tick(&mut state, &input, SIM_DT) {
                match event {
                    GameEvent::ThemeCycleRequested => {
                        let theme = settings.cycle_theme();
                        settings.save();
                        log::info!("Theme: {}", theme.as_str());
                    }
                    GameEvent::LeaderboardQualifies { score } => {
                        if let Err(e) = leaderboard.submit("autopilot", score) {
                            log::warn!("Score submission failed: {e}");
                        }
                    }
                    GameEvent::GameOver { .. } | GameEvent::Victory { .. } => {
                        games += 1;
                        log::info!("{:?} at t={:.1}s", event, t);
                    }
                    GameEvent::LevelComplete { .. }
                    | GameEvent::LifeLost { .. }
                    | GameEvent::MilestoneReached { .. } => log::info!("{:?} at t={:.1}s", event, t),
                    other => log::debug!("{:?}", other),
                }
            }
            t += SIM_DT;
        }

        println!(
            "Simulated {:.0}s (seed {}): level {}, score {}, best {}, lives {}, {} finished game(s)",
            options.seconds,
            options.seed,
            state.level,
            state.score,
            state.best_score(),
            state.lives,
            games
        );
        for (rank, entry) in leaderboard.board().entries.iter().enumerate() {
            println!("{:>2}. {:<12} {}", rank + 1, entry.name, entry.score);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Jumping Jack (native) starting...");
    log::info!("Native mode runs a headless autopilot - run with `trunk serve` for the web version");

    let mut options = headless::Options {
        seed: 42,
        seconds: 120.0,
        tuning: jumping_jack::Tuning::default(),
    };

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        let value = args.next();
        match (arg.as_str(), value) {
            ("--seed", Some(v)) => match v.parse() {
                Ok(seed) => options.seed = seed,
                Err(e) => log::warn!("Ignoring --seed {v}: {e}"),
            },
            ("--seconds", Some(v)) => match v.parse() {
                Ok(seconds) => options.seconds = seconds,
                Err(e) => log::warn!("Ignoring --seconds {v}: {e}"),
            },
            ("--tuning", Some(path)) => {
                let loaded = std::fs::read_to_string(&path)
                    .map_err(|e| e.to_string())
                    .and_then(|json| {
                        jumping_jack::Tuning::from_json(&json).map_err(|e| e.to_string())
                    });
                match loaded {
                    Ok(tuning) => options.tuning = tuning,
                    Err(e) => {
                        log::error!("Failed to load tuning from {path}: {e}");
                        std::process::exit(1);
                    }
                }
            }
            (other, _) => {
                eprintln!("Usage: jumping-jack [--seed N] [--seconds S] [--tuning FILE]");
                log::error!("Unknown or incomplete argument: {other}");
                std::process::exit(2);
            }
        }
    }

    headless::run(options);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
