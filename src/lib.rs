//! Future Ball - predict where the bouncing ball will be
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, collisions, levels, state machine)
//! - `lives`: Time-regenerating life counter for Story mode
//! - `game`: Session object wiring the simulation to persistence and timers
//! - `platform`: Clocks, timers, input transforms, storage backends, web shell
//! - `persistence`: Key-value store port with typed keys
//! - `settings`: Player preferences

pub mod game;
pub mod lives;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;

pub use game::Game;
pub use lives::{LifeConfig, LifeSystem};
pub use settings::{Locale, Settings, SettingsPatch};

use glam::DVec2;

/// 2D point or displacement in arena pixels
pub type Vector = DVec2;

/// Game configuration constants
pub mod consts {
    /// Ball radius (pixels)
    pub const BALL_RADIUS: f64 = 15.0;
    /// Radius of the marker drawn where the player clicked
    pub const PREDICTION_MARKER_RADIUS: f64 = 25.0;
    /// Ball and marker must touch for a hit
    pub const WIN_THRESHOLD: f64 = BALL_RADIUS + PREDICTION_MARKER_RADIUS;
    /// Countdown between click and resolution
    pub const PREDICTION_TIME_MS: f64 = 1000.0;
    /// Points awarded per hit, multiplied by the level number
    pub const SCORE_PER_LEVEL: u64 = 100;

    /// Positions retained by the trail buffer
    pub const BALL_TRAIL_LENGTH: usize = 15;

    /// Ball speed at level 1 (pixels/second)
    pub const BALL_BASE_SPEED: f64 = 150.0;
    /// Speed added per level after the first
    pub const BALL_SPEED_PER_LEVEL: f64 = 7.0;

    /// Story mode lives
    pub const MAX_LIVES: u32 = 5;
    pub const LIFE_REGEN_MINUTES: u64 = 10;
    pub const LIFE_REGEN_MS: u64 = LIFE_REGEN_MINUTES * 60 * 1000;

    /// Arcade mode lives (per run, never regenerate)
    pub const ARCADE_LIVES: u32 = 3;

    /// Screen shake duration after a miss
    pub const SHAKE_DURATION_MS: u64 = 500;
    /// How long the rewarded-ad banner stays up
    pub const AD_REWARD_MESSAGE_MS: u64 = 3000;

    /// Largest frame delta fed into a tick (stalled tabs, debugger pauses)
    pub const MAX_FRAME_DELTA_MS: f64 = 100.0;
}
