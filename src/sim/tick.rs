//! Frame update
//!
//! Advances the ball by one frame delta and runs the prediction countdown.

use super::ball::step_ball;
use super::prediction::resolve;
use super::state::{AppState, GameMode, GamePhase};
use super::transition::{Effect, TimerKind};

/// Advance the state by `delta_ms` of wall time
///
/// No-op unless the arena is known, the phase is animating and the delta is
/// a positive finite number.
pub fn tick(state: &mut AppState, delta_ms: f64) -> Vec<Effect> {
    let mut effects = Vec::new();

    let Some(arena) = state.arena else {
        return effects;
    };
    if !state.phase.is_animating() || !delta_ms.is_finite() || delta_ms <= 0.0 {
        return effects;
    }

    let step = step_ball(&state.ball, &state.obstacles, arena, delta_ms / 1000.0);
    state.ball = step.ball;
    if state.settings.show_trail {
        state.trail.record(state.ball.position);
    }

    if state.phase == GamePhase::Predicting {
        if let Some(timer) = state.prediction_timer {
            let remaining = timer - delta_ms;
            if remaining <= 0.0 {
                resolve_prediction(state, &mut effects);
            } else {
                state.prediction_timer = Some(remaining);
            }
        }
    }

    effects
}

/// Countdown elapsed: score the guess against the ball's current center
fn resolve_prediction(state: &mut AppState, effects: &mut Vec<Effect>) {
    let Some(prediction) = state.prediction.as_mut() else {
        return;
    };

    let outcome = resolve(prediction, state.ball.position, state.ball.radius, state.level);
    prediction.is_correct = Some(outcome.hit);
    state.future_ball_position = Some(outcome.ball_position);
    state.prediction_timer = None;
    state.phase = GamePhase::Result;
    state.score += outcome.points;

    if outcome.hit {
        log::info!("Level {} hit, score {}", state.level, state.score);
        return;
    }

    state.just_lost_life = true;
    match state.mode {
        Some(GameMode::Arcade) => {
            state.arcade_lives = state.arcade_lives.saturating_sub(1);
            log::info!("Level {} miss, {} arcade lives left", state.level, state.arcade_lives);
        }
        Some(GameMode::Story) => {
            log::info!("Level {} miss, spending a story life", state.level);
            effects.push(Effect::ConsumeStoryLife);
        }
        None => {}
    }
    if state.settings.screen_shake {
        state.is_shaking = true;
        effects.push(Effect::Schedule(TimerKind::StopShake));
    }
}
