//! Game state and core simulation types
//!
//! `AppState` is owned by the state machine. Renderers and shells read it,
//! only `transition` writes it.

use serde::{Deserialize, Serialize};

use super::ball::{Ball, Trail};
use super::collision::Obstacle;
use super::prediction::Prediction;
use crate::Vector;
use crate::consts::ARCADE_LIVES;
use crate::settings::Settings;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, no mode chosen yet
    #[default]
    SplashScreen,
    /// Ball moving, waiting for a click
    Playing,
    /// Click recorded, countdown running
    Predicting,
    /// Prediction resolved, showing the outcome
    Result,
    /// Out of lives
    GameOver,
    /// Ball frozen
    Paused,
}

impl GamePhase {
    /// Phases in which the frame clock drives ticks
    pub fn is_animating(&self) -> bool {
        matches!(self, GamePhase::Playing | GamePhase::Predicting)
    }
}

/// Game mode, chosen on the splash screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    /// Persistent progression, lives regenerate over time
    Story,
    /// Session run from level 1 with three lives
    Arcade,
}

/// Arena dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArenaSize {
    pub width: f64,
    pub height: f64,
}

impl ArenaSize {
    /// `None` unless both dimensions are finite and positive
    pub fn new(width: f64, height: f64) -> Option<Self> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        (valid(width) && valid(height)).then_some(Self { width, height })
    }

    pub fn center(&self) -> Vector {
        Vector::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Complete game state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    pub phase: GamePhase,
    /// `None` only on the splash screen
    pub mode: Option<GameMode>,
    /// Current level (1-based)
    pub level: u32,
    pub score: u64,
    /// Arcade mode life counter
    pub arcade_lives: u32,
    pub ball: Ball,
    /// Resolved obstacles for the current level and arena
    pub obstacles: Vec<Obstacle>,
    /// Present in Predicting, Result and GameOver
    pub prediction: Option<Prediction>,
    /// Ball center when the prediction resolved
    pub future_ball_position: Option<Vector>,
    pub trail: Trail,
    /// Countdown in ms, present only while Predicting
    pub prediction_timer: Option<f64>,
    pub arena: Option<ArenaSize>,
    pub settings: Settings,

    // Transient UI flags
    pub is_shaking: bool,
    pub show_settings: bool,
    pub is_watching_ad: bool,
    pub show_ad_reward: bool,
    pub is_game_complete: bool,
    pub just_lost_life: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl AppState {
    /// Splash-screen state carrying the player's settings
    pub fn new(settings: Settings) -> Self {
        Self {
            phase: GamePhase::SplashScreen,
            mode: None,
            level: 1,
            score: 0,
            arcade_lives: ARCADE_LIVES,
            ball: Ball::default(),
            obstacles: Vec::new(),
            prediction: None,
            future_ball_position: None,
            trail: Trail::new(),
            prediction_timer: None,
            arena: None,
            settings,
            is_shaking: false,
            show_settings: false,
            is_watching_ad: false,
            show_ad_reward: false,
            is_game_complete: false,
            just_lost_life: false,
        }
    }

    /// Drop per-attempt prediction and trail data
    pub fn clear_attempt(&mut self) {
        self.prediction = None;
        self.future_ball_position = None;
        self.prediction_timer = None;
        self.trail.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = AppState::default();
        assert_eq!(state.phase, GamePhase::SplashScreen);
        assert!(state.mode.is_none());
        assert_eq!(state.level, 1);
        assert_eq!(state.arcade_lives, ARCADE_LIVES);
        assert!(state.arena.is_none());
        assert!(state.prediction.is_none());
        assert!(state.prediction_timer.is_none());
    }

    #[test]
    fn test_arena_size_rejects_degenerate() {
        assert!(ArenaSize::new(800.0, 600.0).is_some());
        assert!(ArenaSize::new(0.0, 600.0).is_none());
        assert!(ArenaSize::new(800.0, -1.0).is_none());
        assert!(ArenaSize::new(f64::NAN, 600.0).is_none());
    }

    #[test]
    fn test_snapshot_serializes() {
        let json = serde_json::to_string(&AppState::default()).unwrap();
        assert!(json.contains("\"phase\":\"SplashScreen\""));
        let back: AppState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, AppState::default());
    }
}
