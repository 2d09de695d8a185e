//! Collision tests between the ball and axis-aligned rectangles
//!
//! The ball is tested with box semantics: its bounding square, not its
//! circle, is checked against walls and obstacles. Corner hits therefore
//! register slightly early. Level difficulty was tuned against this model.

use serde::{Deserialize, Serialize};

use super::state::ArenaSize;
use crate::Vector;

/// Axis-aligned obstacle in absolute arena pixels (top-left corner + size)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Obstacle {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// True if the ball's bounding square centered at `center` intersects `rect`
#[inline]
pub fn overlaps(center: Vector, radius: f64, rect: &Obstacle) -> bool {
    center.x + radius > rect.x
        && center.x - radius < rect.right()
        && center.y + radius > rect.y
        && center.y - radius < rect.bottom()
}

/// Which axes the arena walls reflect this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallHit {
    pub x: bool,
    pub y: bool,
}

/// Wall reflection for a ball headed to `next` with velocity `vel`
///
/// An axis only flips while the ball is still moving into the wall, so a
/// ball already heading back out is never turned around a second time.
pub fn wall_flips(next: Vector, vel: Vector, radius: f64, arena: ArenaSize) -> WallHit {
    WallHit {
        x: (next.x + radius >= arena.width && vel.x > 0.0)
            || (next.x - radius <= 0.0 && vel.x < 0.0),
        y: (next.y + radius >= arena.height && vel.y > 0.0)
            || (next.y - radius <= 0.0 && vel.y < 0.0),
    }
}

/// Ball crossed the left or right face of `rect` between `pos` and `next`
#[inline]
pub fn crosses_x(pos: Vector, next: Vector, radius: f64, rect: &Obstacle) -> bool {
    (pos.x + radius <= rect.x && next.x + radius > rect.x)
        || (pos.x - radius >= rect.right() && next.x - radius < rect.right())
}

/// Ball crossed the top or bottom face of `rect` between `pos` and `next`
#[inline]
pub fn crosses_y(pos: Vector, next: Vector, radius: f64, rect: &Obstacle) -> bool {
    (pos.y + radius <= rect.y && next.y + radius > rect.y)
        || (pos.y - radius >= rect.bottom() && next.y - radius < rect.bottom())
}
