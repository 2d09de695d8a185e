//! Autoplay forecaster
//!
//! Replays the ball kinematics on a copy to find where the ball will be when
//! a prediction made now resolves. Used by the headless demo and the
//! scenario tests.

use super::ball::{Ball, step_ball};
use super::state::AppState;
use crate::Vector;
use crate::consts::PREDICTION_TIME_MS;

/// Ball after the countdown, assuming every frame lasts `frame_ms`
///
/// Mirrors the countdown in `tick`: step, then decrement, resolve at or
/// below zero. Returns `None` without an arena or with a non-positive cadence.
pub fn forecast_ball(state: &AppState, frame_ms: f64) -> Option<Ball> {
    let arena = state.arena?;
    if !frame_ms.is_finite() || frame_ms <= 0.0 {
        return None;
    }

    let mut ball = state.ball;
    let mut remaining = PREDICTION_TIME_MS;
    while remaining > 0.0 {
        ball = step_ball(&ball, &state.obstacles, arena, frame_ms / 1000.0).ball;
        remaining -= frame_ms;
    }
    Some(ball)
}

/// Position a perfect player would click
pub fn forecast(state: &AppState, frame_ms: f64) -> Option<Vector> {
    forecast_ball(state, frame_ms).map(|ball| ball.position)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::resolve_obstacles;
    use crate::sim::prediction::Prediction;
    use crate::sim::state::{ArenaSize, GameMode, GamePhase};
    use crate::sim::tick::tick;
    use proptest::prelude::*;

    fn arena_state(level: u32) -> AppState {
        let mut state = AppState::default();
        let arena = ArenaSize::new(800.0, 600.0).unwrap();
        state.phase = GamePhase::Playing;
        state.mode = Some(GameMode::Arcade);
        state.level = level;
        state.arena = Some(arena);
        state.obstacles = resolve_obstacles(level, arena.width, arena.height).unwrap();
        state.ball = Ball {
            position: Vector::new(160.0, 120.0),
            velocity: Vector::new(120.0, -90.0),
            ..Default::default()
        };
        state
    }

    #[test]
    fn test_forecast_straight_drop() {
        let mut state = arena_state(1);
        state.ball.position = Vector::new(400.0, 120.0);
        state.ball.velocity = Vector::new(0.0, 150.0);
        let target = forecast(&state, 100.0).unwrap();
        assert!((target.x - 400.0).abs() < 1e-9);
        assert!((target.y - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_forecast_needs_arena_and_cadence() {
        let mut state = arena_state(1);
        assert!(forecast(&state, 0.0).is_none());
        assert!(forecast(&state, f64::NAN).is_none());
        state.arena = None;
        assert!(forecast(&state, 16.0).is_none());
    }

    proptest! {
        #[test]
        fn prop_forecast_matches_countdown(level in 1u32..=30, frame_ms in 5.0f64..100.0) {
            let mut state = arena_state(level);
            let target = forecast(&state, frame_ms).unwrap();

            state.phase = GamePhase::Predicting;
            state.prediction = Some(Prediction::pending(target));
            state.prediction_timer = Some(PREDICTION_TIME_MS);
            while state.phase == GamePhase::Predicting {
                tick(&mut state, frame_ms);
            }
            prop_assert_eq!(state.prediction.unwrap().is_correct, Some(true));
            prop_assert_eq!(state.future_ball_position, Some(target));
        }
    }
}
