//! Game state machine
//!
//! `transition` is the only writer of `AppState`. It is total: events that
//! are out of phase, or that arrive before the arena size is known, leave
//! the state untouched. Anything that reaches outside the state (storage,
//! the life system, timers) is returned as an `Effect` for the session to
//! carry out.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::ball::spawn_ball;
use super::level::{is_defined, resolve_obstacles};
use super::prediction::Prediction;
use super::state::{AppState, ArenaSize, GameMode, GamePhase};
use super::tick::tick;
use crate::Vector;
use crate::consts::*;
use crate::settings::SettingsPatch;

/// Inputs to the state machine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum GameEvent {
    /// Leave the splash screen (or start over) in `mode`
    StartGame { mode: GameMode, initial_level: u32 },
    /// First measurement of the arena
    SetupGeometry { width: f64, height: f64 },
    /// Arena changed size after setup
    Resize { width: f64, height: f64 },
    PauseGame,
    ResumeGame,
    GoToMainMenu,
    /// Player clicked/tapped at `position` (arena pixels)
    MakePrediction { position: Vector },
    /// Frame clock delta
    Tick { delta_ms: f64 },
    NextLevel,
    RestartLevel,
    ToggleSettings,
    UpdateSettings { patch: SettingsPatch },
    SetAdWatching { watching: bool },
    /// Rewarded ad finished playing
    AdCompleted,
    /// Screen shake timer expired
    StopShake,
    /// Ad reward banner timer expired
    ClearAdReward,
    ClearJustLostLife,
    /// Game-over check after a result, with the current story life count
    EvaluateGameOver { story_lives: u32 },
}

/// Timed events the session schedules on its clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerKind {
    StopShake,
    ClearAdReward,
}

impl TimerKind {
    pub fn duration_ms(&self) -> u64 {
        match self {
            TimerKind::StopShake => SHAKE_DURATION_MS,
            TimerKind::ClearAdReward => AD_REWARD_MESSAGE_MS,
        }
    }

    /// Event fed back through `transition` when the timer fires
    pub fn event(&self) -> GameEvent {
        match self {
            TimerKind::StopShake => GameEvent::StopShake,
            TimerKind::ClearAdReward => GameEvent::ClearAdReward,
        }
    }
}

/// Side effects requested by a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// Remember the story level to resume from
    PersistStoryLevel(u32),
    /// Story prediction missed: spend a regenerating life
    ConsumeStoryLife,
    /// Rewarded ad: refill story lives
    RefillLives,
    PersistSettings,
    Schedule(TimerKind),
}

/// Apply one event to the state
///
/// `rng` is only drawn from when a ball spawns on level 3 or later.
pub fn transition<R: Rng + ?Sized>(
    state: &mut AppState,
    event: GameEvent,
    rng: &mut R,
) -> Vec<Effect> {
    let mut effects = Vec::new();

    match event {
        GameEvent::StartGame {
            mode,
            initial_level,
        } => {
            let level = match mode {
                GameMode::Story if is_defined(initial_level) => initial_level,
                GameMode::Story => {
                    log::warn!("Saved story level {initial_level} not in catalog, starting at 1");
                    1
                }
                GameMode::Arcade => 1,
            };
            let arcade_lives = match mode {
                GameMode::Arcade => ARCADE_LIVES,
                GameMode::Story => state.arcade_lives,
            };
            let arena = state.arena;

            *state = AppState {
                phase: GamePhase::Playing,
                mode: Some(mode),
                level,
                arcade_lives,
                arena,
                ..AppState::new(state.settings)
            };
            if let Some(arena) = arena {
                respawn(state, arena, rng);
            }
            log::info!("Started {mode:?} at level {level}");
        }

        GameEvent::SetupGeometry { width, height } => {
            if state.arena.is_some() {
                log::debug!("Geometry already set, ignoring setup");
            } else if let Some(arena) = ArenaSize::new(width, height) {
                log::debug!("Arena {width}x{height}");
                state.arena = Some(arena);
                respawn(state, arena, rng);
            }
        }

        GameEvent::Resize { width, height } => {
            if state.arena.is_none() {
                return effects;
            }
            let Some(arena) = ArenaSize::new(width, height) else {
                return effects;
            };
            log::debug!("Arena resized to {width}x{height}");
            state.arena = Some(arena);
            respawn(state, arena, rng);
            state.trail.clear();
            match state.phase {
                // Positions from the old frame are meaningless; drop the guess
                GamePhase::Predicting => {
                    state.clear_attempt();
                    state.phase = GamePhase::Playing;
                }
                // Outcome already decided; keep it on screen
                GamePhase::Result | GamePhase::GameOver => {}
                _ => state.clear_attempt(),
            }
        }

        GameEvent::PauseGame => {
            if state.phase == GamePhase::Playing {
                state.phase = GamePhase::Paused;
            }
        }

        GameEvent::ResumeGame => {
            if state.phase == GamePhase::Paused && !state.is_watching_ad {
                state.phase = GamePhase::Playing;
            }
        }

        GameEvent::GoToMainMenu => {
            let arena = state.arena;
            *state = AppState {
                arena,
                ..AppState::new(state.settings)
            };
        }

        GameEvent::MakePrediction { position } => {
            if state.phase == GamePhase::Playing && state.arena.is_some() && position.is_finite() {
                state.prediction = Some(Prediction::pending(position));
                state.prediction_timer = Some(PREDICTION_TIME_MS);
                state.phase = GamePhase::Predicting;
            }
        }

        GameEvent::Tick { delta_ms } => {
            effects = tick(state, delta_ms);
        }

        GameEvent::NextLevel => {
            let Some(arena) = state.arena else {
                return effects;
            };
            let won = state.prediction.and_then(|p| p.is_correct) == Some(true);
            if state.phase != GamePhase::Result || !won || state.is_game_complete {
                return effects;
            }

            let next = state.level + 1;
            if !is_defined(next) {
                log::info!("Final level cleared, score {}", state.score);
                state.is_game_complete = true;
                if state.mode == Some(GameMode::Story) {
                    effects.push(Effect::PersistStoryLevel(1));
                }
                return effects;
            }

            state.level = next;
            state.clear_attempt();
            respawn(state, arena, rng);
            state.phase = GamePhase::Playing;
            if state.mode == Some(GameMode::Story) {
                effects.push(Effect::PersistStoryLevel(next));
            }
            log::info!("Level {next}");
        }

        GameEvent::RestartLevel => {
            if let Some(arena) = state.arena {
                if state.mode.is_some() {
                    restart_level(state, arena, rng);
                }
            }
        }

        GameEvent::ToggleSettings => {
            if state.phase == GamePhase::Playing && !state.show_settings {
                state.phase = GamePhase::Paused;
            }
            state.show_settings = !state.show_settings;
        }

        GameEvent::UpdateSettings { patch } => {
            state.settings.apply(patch);
            if !state.settings.show_trail {
                state.trail.clear();
            }
            effects.push(Effect::PersistSettings);
        }

        GameEvent::SetAdWatching { watching } => {
            state.is_watching_ad = watching;
        }

        GameEvent::AdCompleted => {
            if !state.is_watching_ad {
                return effects;
            }
            state.is_watching_ad = false;
            state.show_ad_reward = true;
            effects.push(Effect::RefillLives);
            effects.push(Effect::Schedule(TimerKind::ClearAdReward));
            if let Some(arena) = state.arena {
                if state.mode.is_some() {
                    restart_level(state, arena, rng);
                }
            }
        }

        GameEvent::StopShake => state.is_shaking = false,
        GameEvent::ClearAdReward => state.show_ad_reward = false,
        GameEvent::ClearJustLostLife => state.just_lost_life = false,

        GameEvent::EvaluateGameOver { story_lives } => {
            if state.phase != GamePhase::Result || state.is_game_complete {
                return effects;
            }
            let lives = match state.mode {
                Some(GameMode::Story) => story_lives,
                Some(GameMode::Arcade) => state.arcade_lives,
                None => return effects,
            };
            if lives == 0 {
                log::info!("Game over at level {}, score {}", state.level, state.score);
                state.phase = GamePhase::GameOver;
            }
        }
    }

    effects
}

/// Fresh ball and obstacles for the current level
fn respawn<R: Rng + ?Sized>(state: &mut AppState, arena: ArenaSize, rng: &mut R) {
    state.ball = spawn_ball(state.level, arena, rng);
    state.obstacles = resolve_obstacles(state.level, arena.width, arena.height).unwrap_or_default();
}

fn restart_level<R: Rng + ?Sized>(state: &mut AppState, arena: ArenaSize, rng: &mut R) {
    state.clear_attempt();
    respawn(state, arena, rng);
    state.is_watching_ad = false;
    state.is_game_complete = false;
    state.phase = GamePhase::Playing;
}
