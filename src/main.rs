//! Future Ball native entry point
//!
//! Headless autoplay demo: an imperfect bot plays an Arcade run on a virtual
//! clock and logs the outcome. The web build is driven through
//! `future_ball::platform::web` instead.
//!
//! Environment:
//! - `FUTURE_BALL_SAVE`: JSON save file (in-memory when unset)
//! - `FUTURE_BALL_SEED`: RNG seed (wall clock when unset)
//! - `RUST_LOG`: log filter, e.g. `info`

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use future_ball::Game;
    use future_ball::Vector;
    use future_ball::persistence::{KeyValueStore, MemoryStore};
    use future_ball::platform::storage::FileStore;
    use future_ball::platform::{Clock, ManualClock, SystemClock};
    use future_ball::sim::autoplay::forecast;
    use future_ball::sim::{GameEvent, GameMode, GamePhase};

    const FRAME_MS: u64 = 16;
    /// Bot aim error, uniform in each axis (pixels)
    const AIM_ERROR: f64 = 30.0;
    /// Frames the bot watches before committing to a guess
    const THINK_FRAMES: u32 = 20;
    const MAX_FRAMES: u32 = 200_000;

    pub fn run() {
        let seed = std::env::var("FUTURE_BALL_SEED")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(|| SystemClock.now_ms());
        log::info!("Seed: {seed}");

        match std::env::var("FUTURE_BALL_SAVE") {
            Ok(path) => match FileStore::open(&path) {
                Ok(store) => {
                    log::info!("Saving to {path}");
                    play(store, seed);
                }
                Err(e) => {
                    log::warn!("Could not open {path}: {e}, playing without saves");
                    play(MemoryStore::new(), seed);
                }
            },
            Err(_) => play(MemoryStore::new(), seed),
        }
    }

    fn play<S: KeyValueStore>(store: S, seed: u64) {
        let clock = ManualClock::new(SystemClock.now_ms());
        let mut game = Game::new(store, clock.clone(), seed);
        let mut bot = Pcg32::seed_from_u64(seed ^ 0x5EED);

        game.resize(800.0, 600.0);
        game.start_game(GameMode::Arcade);

        let mut watched = 0;
        let mut t = 0.0;
        for _ in 0..MAX_FRAMES {
            match game.state().phase {
                GamePhase::Playing => {
                    watched += 1;
                    if watched >= THINK_FRAMES {
                        watched = 0;
                        if let Some(target) = forecast(game.state(), FRAME_MS as f64) {
                            let aim = Vector::new(
                                bot.random_range(-AIM_ERROR..=AIM_ERROR),
                                bot.random_range(-AIM_ERROR..=AIM_ERROR),
                            );
                            game.predict(target + aim);
                        }
                    }
                }
                GamePhase::Result if game.state().is_game_complete => break,
                GamePhase::Result => {
                    let state = game.state();
                    let hit = state.prediction.and_then(|p| p.is_correct) == Some(true);
                    log::info!(
                        "Level {}: {} (score {}, lives {})",
                        state.level,
                        if hit { "hit" } else { "miss" },
                        state.score,
                        state.arcade_lives
                    );
                    game.dispatch(if hit {
                        GameEvent::NextLevel
                    } else {
                        GameEvent::RestartLevel
                    });
                }
                GamePhase::GameOver => break,
                _ => {}
            }

            clock.advance(FRAME_MS);
            t += FRAME_MS as f64;
            game.frame(t);
        }

        let state = game.state();
        if state.is_game_complete {
            println!("All levels cleared! Final score: {}", state.score);
        } else {
            println!("Game over at level {} with score {}", state.level, state.score);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Future Ball (native) starting...");
    demo::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::init, this is just to satisfy the compiler
}
