//! Prediction resolution
//!
//! A click records where the player thinks the ball will be once the
//! countdown elapses. The guess is a hit when the prediction marker and the
//! ball touch or overlap.

use serde::{Deserialize, Serialize};

use crate::Vector;
use crate::consts::{PREDICTION_MARKER_RADIUS, SCORE_PER_LEVEL};

/// A player's guess
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Where the player clicked (never updated after the click)
    pub position: Vector,
    /// `None` while the countdown is running
    pub is_correct: Option<bool>,
}

impl Prediction {
    pub fn pending(position: Vector) -> Self {
        Self {
            position,
            is_correct: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.is_correct.is_none()
    }
}

/// Outcome of a resolved prediction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub hit: bool,
    /// Ball center at resolution time
    pub ball_position: Vector,
    /// Points to add (zero on a miss)
    pub points: u64,
}

/// Marker at `click` touches a ball of `ball_radius` centered at `ball_center`
#[inline]
pub fn is_hit(ball_center: Vector, ball_radius: f64, click: Vector) -> bool {
    ball_center.distance(click) <= ball_radius + PREDICTION_MARKER_RADIUS
}

/// Resolve a prediction against the ball's current center
pub fn resolve(
    prediction: &Prediction,
    ball_center: Vector,
    ball_radius: f64,
    level: u32,
) -> Resolution {
    let hit = is_hit(ball_center, ball_radius, prediction.position);
    Resolution {
        hit,
        ball_position: ball_center,
        points: if hit {
            SCORE_PER_LEVEL * u64::from(level)
        } else {
            0
        },
    }
}
