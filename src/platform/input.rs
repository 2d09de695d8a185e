//! Input mapping
//!
//! Converts raw pointer and keyboard input into state machine events.
//! Predictions are only produced while the ball is in play.

use crate::Vector;
use crate::sim::{AppState, GameEvent, GamePhase};

/// Pointer position relative to the arena's top-left corner
pub fn pointer_to_arena(client: Vector, arena_origin: Vector) -> Vector {
    client - arena_origin
}

/// Click or tap inside the arena
pub fn pointer_prediction(
    state: &AppState,
    client: Vector,
    arena_origin: Vector,
) -> Option<GameEvent> {
    if state.phase != GamePhase::Playing || state.arena.is_none() {
        return None;
    }
    Some(GameEvent::MakePrediction {
        position: pointer_to_arena(client, arena_origin),
    })
}

/// Keyboard input, `key` as in `KeyboardEvent.key`
///
/// Enter and Space predict the arena center, Escape toggles pause.
pub fn key_event(state: &AppState, key: &str) -> Option<GameEvent> {
    match key {
        "Enter" | " " => {
            let arena = state.arena?;
            (state.phase == GamePhase::Playing).then(|| GameEvent::MakePrediction {
                position: arena.center(),
            })
        }
        "Escape" => match state.phase {
            GamePhase::Playing => Some(GameEvent::PauseGame),
            GamePhase::Paused => Some(GameEvent::ResumeGame),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ArenaSize;

    fn playing() -> AppState {
        let mut state = AppState::default();
        state.phase = GamePhase::Playing;
        state.arena = ArenaSize::new(800.0, 600.0);
        state
    }

    #[test]
    fn test_pointer_is_relative_to_arena() {
        let event = pointer_prediction(
            &playing(),
            Vector::new(130.0, 90.0),
            Vector::new(30.0, 40.0),
        );
        assert_eq!(
            event,
            Some(GameEvent::MakePrediction {
                position: Vector::new(100.0, 50.0)
            })
        );
    }

    #[test]
    fn test_keyboard_predicts_center() {
        let state = playing();
        let expected = Some(GameEvent::MakePrediction {
            position: Vector::new(400.0, 300.0),
        });
        assert_eq!(key_event(&state, "Enter"), expected);
        assert_eq!(key_event(&state, " "), expected);
        assert_eq!(key_event(&state, "a"), None);
    }

    #[test]
    fn test_no_prediction_outside_playing() {
        let mut state = playing();
        state.phase = GamePhase::Result;
        assert_eq!(key_event(&state, "Enter"), None);
        assert_eq!(pointer_prediction(&state, Vector::ZERO, Vector::ZERO), None);
    }

    #[test]
    fn test_escape_toggles_pause() {
        let mut state = playing();
        assert_eq!(key_event(&state, "Escape"), Some(GameEvent::PauseGame));
        state.phase = GamePhase::Paused;
        assert_eq!(key_event(&state, "Escape"), Some(GameEvent::ResumeGame));
    }
}
