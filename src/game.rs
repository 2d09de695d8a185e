//! Game session
//!
//! Owns the state machine together with its ports: storage, wall clock,
//! RNG, the story life system and one-shot timers. Shells (web, native demo)
//! only talk to `Game`.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::Vector;
use crate::lives::{LifeConfig, LifeSystem};
use crate::persistence::{self, KeyValueStore, keys};
use crate::platform::input;
use crate::platform::time::{Clock, FrameClock, TimerQueue};
use crate::settings::{Locale, Settings, SettingsPatch};
use crate::sim::{AppState, Effect, GameEvent, GameMode, GamePhase, transition};

/// A running game bound to a store and a clock
pub struct Game<S: KeyValueStore, C: Clock> {
    state: AppState,
    lives: LifeSystem,
    locale: Locale,
    store: S,
    clock: C,
    rng: Pcg32,
    timers: TimerQueue,
    frames: FrameClock,
}

impl<S: KeyValueStore, C: Clock> Game<S, C> {
    pub fn new(store: S, clock: C, seed: u64) -> Self {
        Self::with_config(store, clock, seed, LifeConfig::default())
    }

    /// Restore lives, settings and locale from `store`
    pub fn with_config(mut store: S, clock: C, seed: u64, config: LifeConfig) -> Self {
        let now = clock.now_ms();
        let lives = LifeSystem::load(&mut store, config, now);
        let settings = Settings::load(&store);
        let locale = Locale::load(&store);
        log::info!("Session ready: {} lives, locale {}", lives.lives(), locale.as_str());

        Self {
            state: AppState::new(settings),
            lives,
            locale,
            store,
            clock,
            rng: Pcg32::seed_from_u64(seed),
            timers: TimerQueue::new(),
            frames: FrameClock::new(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn lives(&self) -> &LifeSystem {
        &self.lives
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn set_locale(&mut self, locale: Locale) {
        self.locale = locale;
        locale.save(&mut self.store);
    }

    /// Story level to resume from
    pub fn saved_story_level(&self) -> u32 {
        persistence::load_or(&self.store, keys::STORY_LEVEL, 1)
    }

    pub fn time_to_next_life_secs(&self) -> u64 {
        self.lives.time_to_next_life_secs(self.clock.now_ms())
    }

    /// Feed one event through the state machine and carry out its effects
    ///
    /// A miss is charged before the game-over check runs, so the check sees
    /// the life count after the loss.
    pub fn dispatch(&mut self, event: GameEvent) {
        self.step(event);

        if self.state.just_lost_life {
            self.step(GameEvent::ClearJustLostLife);
        }
        if self.state.phase == GamePhase::Result {
            let story_lives = self.lives.lives();
            self.step(GameEvent::EvaluateGameOver { story_lives });
        }
    }

    fn step(&mut self, event: GameEvent) {
        let effects = transition(&mut self.state, event, &mut self.rng);
        for effect in effects {
            self.apply(effect);
        }
    }

    fn apply(&mut self, effect: Effect) {
        let now = self.clock.now_ms();
        match effect {
            Effect::PersistStoryLevel(level) => {
                persistence::save(&mut self.store, keys::STORY_LEVEL, level);
            }
            Effect::ConsumeStoryLife => {
                self.lives.catch_up(now);
                self.lives.use_life(now);
                self.lives.save(&mut self.store);
                log::info!("Story lives: {}", self.lives.lives());
            }
            Effect::RefillLives => {
                self.lives.refill_lives(now);
                self.lives.save(&mut self.store);
            }
            Effect::PersistSettings => self.state.settings.save(&mut self.store),
            Effect::Schedule(kind) => self.timers.schedule(kind, now),
        }
    }

    /// Start a run; Story resumes the saved level
    ///
    /// Returns false (and changes nothing) when Story has no lives left.
    pub fn start_game(&mut self, mode: GameMode) -> bool {
        let initial_level = match mode {
            GameMode::Story => {
                self.refresh_lives();
                if self.lives.lives() == 0 {
                    log::info!(
                        "No story lives left, {}s to the next",
                        self.time_to_next_life_secs()
                    );
                    return false;
                }
                self.saved_story_level()
            }
            GameMode::Arcade => 1,
        };
        self.frames.reset();
        self.dispatch(GameEvent::StartGame {
            mode,
            initial_level,
        });
        true
    }

    /// Catch up on regenerated lives, saving if anything changed
    pub fn refresh_lives(&mut self) {
        if self.lives.catch_up(self.clock.now_ms()) {
            self.lives.save(&mut self.store);
        }
    }

    /// Grant story lives (capped at the maximum) and save
    pub fn add_lives(&mut self, amount: u32) {
        let now = self.clock.now_ms();
        self.lives.catch_up(now);
        self.lives.add_life(amount, now);
        self.lives.save(&mut self.store);
        log::info!("Story lives: {}", self.lives.lives());
    }

    /// Fire every timer that has expired by now
    pub fn poll_timers(&mut self) {
        for kind in self.timers.take_due(self.clock.now_ms()) {
            self.dispatch(kind.event());
        }
    }

    /// Animation frame at `timestamp_ms`
    ///
    /// Ticks only while the ball is in play; otherwise the frame clock is
    /// reset so the next animated frame starts from a zero delta.
    pub fn frame(&mut self, timestamp_ms: f64) {
        self.poll_timers();
        self.refresh_lives();

        if !self.state.phase.is_animating() || self.state.arena.is_none() {
            self.frames.reset();
            return;
        }
        if let Some(delta_ms) = self.frames.frame(timestamp_ms) {
            self.dispatch(GameEvent::Tick { delta_ms });
        }
    }

    /// Report the arena size; the first call sets up geometry
    pub fn resize(&mut self, width: f64, height: f64) {
        match self.state.arena {
            None => self.dispatch(GameEvent::SetupGeometry { width, height }),
            Some(arena) if arena.width != width || arena.height != height => {
                self.dispatch(GameEvent::Resize { width, height });
            }
            Some(_) => {}
        }
    }

    pub fn predict(&mut self, position: Vector) {
        self.dispatch(GameEvent::MakePrediction { position });
    }

    /// Pointer click in page coordinates
    pub fn click(&mut self, client: Vector, arena_origin: Vector) {
        if let Some(event) = input::pointer_prediction(&self.state, client, arena_origin) {
            self.dispatch(event);
        }
    }

    /// Keyboard input; true if the key was handled
    pub fn key(&mut self, key: &str) -> bool {
        match input::key_event(&self.state, key) {
            Some(event) => {
                self.dispatch(event);
                true
            }
            None => false,
        }
    }

    pub fn update_settings(&mut self, patch: SettingsPatch) {
        self.dispatch(GameEvent::UpdateSettings { patch });
    }

    pub fn watch_ad(&mut self) {
        self.dispatch(GameEvent::SetAdWatching { watching: true });
    }

    pub fn cancel_ad(&mut self) {
        self.dispatch(GameEvent::SetAdWatching { watching: false });
    }

    pub fn complete_ad(&mut self) {
        self.dispatch(GameEvent::AdCompleted);
    }
}
