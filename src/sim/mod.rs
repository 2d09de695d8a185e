//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure:
//! - Time only enters through `Tick` deltas
//! - Randomness only through the RNG handed to `transition`
//! - Stable obstacle iteration order (catalog order)
//! - No rendering, storage, or platform dependencies

pub mod autoplay;
pub mod ball;
pub mod collision;
pub mod level;
pub mod prediction;
pub mod state;
pub mod tick;
pub mod transition;

pub use ball::{Ball, BallStep, Trail, spawn_ball, speed_for_level, step_ball};
pub use collision::{Obstacle, WallHit, overlaps, wall_flips};
pub use level::{LAST_LEVEL, resolve_obstacles};
pub use prediction::{Prediction, Resolution, is_hit, resolve};
pub use state::{AppState, ArenaSize, GameMode, GamePhase};
pub use tick::tick;
pub use transition::{Effect, GameEvent, TimerKind, transition};
