//! Level catalog
//!
//! Obstacles are authored as normalized centers (fraction of arena width and
//! height) with sizes in pixels, then resolved to absolute rectangles for a
//! concrete arena. Levels are contiguous from 1; the first missing level ends
//! the game.

use super::collision::Obstacle;

/// Obstacle as authored: `x`, `y` are the rectangle center as a fraction of
/// the arena, `width` and `height` are pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedObstacle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl NormalizedObstacle {
    /// Absolute rectangle inside an arena of the given size
    pub fn resolve(&self, arena_width: f64, arena_height: f64) -> Obstacle {
        Obstacle {
            x: arena_width * self.x - self.width / 2.0,
            y: arena_height * self.y - self.height / 2.0,
            width: self.width,
            height: self.height,
        }
    }
}

const fn ob(x: f64, y: f64, width: f64, height: f64) -> NormalizedObstacle {
    NormalizedObstacle {
        x,
        y,
        width,
        height,
    }
}

/// Obstacle layouts, index 0 = level 1
const LEVELS: &[&[NormalizedObstacle]] = &[
    // --- The basics (1-5) ---
    // 1: vertical bounce only
    &[],
    // 2: horizontal bounce only
    &[],
    // 3: free movement
    &[],
    // 4: first horizontal bar
    &[ob(0.5, 0.5, 150.0, 20.0)],
    // 5: first vertical bar
    &[ob(0.5, 0.5, 20.0, 150.0)],
    // --- First combinations (6-10) ---
    &[ob(0.5, 0.3, 120.0, 20.0), ob(0.5, 0.7, 120.0, 20.0)],
    &[ob(0.3, 0.5, 20.0, 120.0), ob(0.7, 0.5, 20.0, 120.0)],
    &[ob(0.35, 0.65, 100.0, 20.0), ob(0.65, 0.35, 100.0, 20.0)],
    &[ob(0.25, 0.25, 20.0, 100.0), ob(0.75, 0.75, 20.0, 100.0)],
    &[ob(0.5, 0.5, 80.0, 80.0)],
    // --- Corridors and funnels (11-15) ---
    &[ob(0.5, 0.2, 250.0, 20.0), ob(0.5, 0.8, 250.0, 20.0)],
    &[ob(0.2, 0.5, 20.0, 250.0), ob(0.8, 0.5, 20.0, 250.0)],
    &[ob(0.3, 0.3, 150.0, 20.0), ob(0.7, 0.7, 150.0, 20.0)],
    // 14: central cross
    &[ob(0.5, 0.5, 200.0, 20.0), ob(0.5, 0.5, 20.0, 200.0)],
    &[ob(0.25, 0.5, 20.0, 200.0), ob(0.75, 0.5, 20.0, 200.0)],
    // --- Asymmetry (16-20) ---
    &[ob(0.25, 0.4, 100.0, 20.0), ob(0.75, 0.6, 100.0, 20.0)],
    &[ob(0.3, 0.5, 20.0, 120.0), ob(0.7, 0.3, 20.0, 80.0)],
    &[ob(0.7, 0.5, 200.0, 200.0)],
    &[ob(0.5, 0.25, 20.0, 100.0), ob(0.5, 0.75, 20.0, 100.0)],
    // 20: four corners
    &[
        ob(0.25, 0.25, 20.0, 20.0),
        ob(0.75, 0.25, 20.0, 20.0),
        ob(0.25, 0.75, 20.0, 20.0),
        ob(0.75, 0.75, 20.0, 20.0),
    ],
    // --- Precision and mazes (21-25) ---
    // 21: plus-sign maze
    &[
        ob(0.5, 0.2, 20.0, 80.0),
        ob(0.2, 0.5, 80.0, 20.0),
        ob(0.8, 0.5, 80.0, 20.0),
        ob(0.5, 0.8, 20.0, 80.0),
    ],
    // 22: the needle
    &[ob(0.15, 0.5, 20.0, 250.0), ob(0.85, 0.5, 20.0, 250.0)],
    // 23: U shape
    &[
        ob(0.3, 0.5, 20.0, 180.0),
        ob(0.7, 0.5, 20.0, 180.0),
        ob(0.5, 0.2, 180.0, 20.0),
    ],
    // 24: pillars
    &[
        ob(0.2, 0.3, 20.0, 150.0),
        ob(0.5, 0.6, 20.0, 150.0),
        ob(0.8, 0.3, 20.0, 150.0),
    ],
    // 25: bouncy box
    &[
        ob(0.2, 0.2, 100.0, 20.0),
        ob(0.8, 0.2, 100.0, 20.0),
        ob(0.2, 0.8, 100.0, 20.0),
        ob(0.8, 0.8, 100.0, 20.0),
    ],
    // --- The gauntlet (26-30) ---
    &[
        ob(0.5, 0.5, 20.0, 20.0),
        ob(0.2, 0.2, 20.0, 20.0),
        ob(0.8, 0.8, 20.0, 20.0),
        ob(0.2, 0.8, 20.0, 20.0),
        ob(0.8, 0.2, 20.0, 20.0),
    ],
    // 27: outer frame
    &[
        ob(0.5, 0.15, 150.0, 20.0),
        ob(0.5, 0.85, 150.0, 20.0),
        ob(0.15, 0.5, 20.0, 150.0),
        ob(0.85, 0.5, 20.0, 150.0),
    ],
    // 28: I shape
    &[
        ob(0.5, 0.5, 180.0, 20.0),
        ob(0.5, 0.2, 20.0, 100.0),
        ob(0.5, 0.8, 20.0, 100.0),
    ],
    &[
        ob(0.25, 0.75, 200.0, 20.0),
        ob(0.75, 0.25, 200.0, 20.0),
        ob(0.5, 0.5, 20.0, 200.0),
    ],
    // 30: final boss
    &[
        ob(0.5, 0.5, 100.0, 100.0),
        ob(0.1, 0.1, 50.0, 50.0),
        ob(0.9, 0.9, 50.0, 50.0),
        ob(0.1, 0.9, 50.0, 50.0),
        ob(0.9, 0.1, 50.0, 50.0),
    ],
];

/// Highest level in the catalog
pub const LAST_LEVEL: u32 = LEVELS.len() as u32;

/// Authored layout for a level, `None` past the end of the catalog
pub fn layout(level: u32) -> Option<&'static [NormalizedObstacle]> {
    let index = level.checked_sub(1)?;
    LEVELS.get(index as usize).copied()
}

/// Whether `level` exists in the catalog
pub fn is_defined(level: u32) -> bool {
    layout(level).is_some()
}

/// Resolve a level's obstacles for an arena, preserving catalog order
///
/// Returns `Some(vec![])` for an open level and `None` when the level is
/// past the end of the catalog (the game is complete).
pub fn resolve_obstacles(level: u32, arena_width: f64, arena_height: f64) -> Option<Vec<Obstacle>> {
    layout(level).map(|obstacles| {
        obstacles
            .iter()
            .map(|o| o.resolve(arena_width, arena_height))
            .collect()
    })
}
