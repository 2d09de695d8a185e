//! Ball kinematics
//!
//! One explicit Euler step per tick: walls and obstacles decide which axes
//! flip, then the displacement for the whole tick is taken along the
//! post-flip velocity from the pre-step position.

use std::collections::VecDeque;
use std::f64::consts::TAU;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{Obstacle, crosses_x, crosses_y, overlaps, wall_flips};
use super::state::ArenaSize;
use crate::Vector;
use crate::consts::*;

/// The ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub position: Vector,
    pub velocity: Vector,
    pub radius: f64,
}

impl Default for Ball {
    fn default() -> Self {
        Self {
            position: Vector::ZERO,
            velocity: Vector::ZERO,
            radius: BALL_RADIUS,
        }
    }
}

/// Result of one kinematics step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallStep {
    pub ball: Ball,
    pub x_flipped: bool,
    pub y_flipped: bool,
}

/// Ball speed for a level (pixels/second)
pub fn speed_for_level(level: u32) -> f64 {
    BALL_BASE_SPEED + f64::from(level.saturating_sub(1)) * BALL_SPEED_PER_LEVEL
}

/// Spawn the ball for a level
///
/// Levels 1 and 2 are fixed tutorials (straight down, straight right). From
/// level 3 the launch angle is drawn from `rng`.
pub fn spawn_ball<R: Rng + ?Sized>(level: u32, arena: ArenaSize, rng: &mut R) -> Ball {
    let speed = speed_for_level(level);
    let (position, velocity) = match level {
        0 | 1 => (
            Vector::new(arena.width / 2.0, arena.height * 0.2),
            Vector::new(0.0, speed),
        ),
        2 => (
            Vector::new(arena.width * 0.2, arena.height / 2.0),
            Vector::new(speed, 0.0),
        ),
        _ => {
            let angle = rng.random::<f64>() * TAU;
            (
                Vector::new(arena.width * 0.2, arena.height * 0.2),
                Vector::new(angle.cos() * speed, angle.sin() * speed),
            )
        }
    };

    Ball {
        position,
        velocity,
        radius: BALL_RADIUS,
    }
}

/// Advance the ball by `dt` seconds
///
/// Walls are resolved first. Obstacles are then visited in catalog order and
/// may only flip an axis nothing has flipped yet this tick. Every obstacle is
/// tested against the same pre-step position and velocity, so a ball can
/// tunnel through tightly packed geometry.
///
/// The wall bounds only hold in open space. An obstacle next to a wall can
/// flip an axis the wall test left alone, and the reflected step may carry
/// the center past that wall for one tick. The wall flips it back on the
/// next tick.
pub fn step_ball(ball: &Ball, obstacles: &[Obstacle], arena: ArenaSize, dt: f64) -> BallStep {
    let pos = ball.position;
    let r = ball.radius;
    let next = pos + ball.velocity * dt;

    let mut vel = ball.velocity;
    let walls = wall_flips(next, vel, r, arena);
    let mut x_flipped = walls.x;
    let mut y_flipped = walls.y;
    if x_flipped {
        vel.x = -vel.x;
    }
    if y_flipped {
        vel.y = -vel.y;
    }

    for obstacle in obstacles {
        if !overlaps(next, r, obstacle) {
            continue;
        }
        if !x_flipped && crosses_x(pos, next, r, obstacle) {
            vel.x = -ball.velocity.x;
            x_flipped = true;
        }
        if !y_flipped && crosses_y(pos, next, r, obstacle) {
            vel.y = -ball.velocity.y;
            y_flipped = true;
        }
    }

    BallStep {
        ball: Ball {
            position: pos + vel * dt,
            velocity: vel,
            radius: r,
        },
        x_flipped,
        y_flipped,
    }
}

/// Recent ball positions, oldest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trail {
    points: VecDeque<Vector>,
}

impl Trail {
    pub fn new() -> Self {
        Self {
            points: VecDeque::with_capacity(BALL_TRAIL_LENGTH + 1),
        }
    }

    /// Append a position, evicting the oldest past `BALL_TRAIL_LENGTH`
    pub fn record(&mut self, pos: Vector) {
        self.points.push_back(pos);
        while self.points.len() > BALL_TRAIL_LENGTH {
            self.points.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vector> {
        self.points.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const ARENA: ArenaSize = ArenaSize {
        width: 800.0,
        height: 600.0,
    };

    fn ball_at(x: f64, y: f64, vx: f64, vy: f64) -> Ball {
        Ball {
            position: Vector::new(x, y),
            velocity: Vector::new(vx, vy),
            radius: BALL_RADIUS,
        }
    }

    #[test]
    fn test_speed_ramp() {
        assert_eq!(speed_for_level(1), 150.0);
        assert_eq!(speed_for_level(2), 157.0);
        assert_eq!(speed_for_level(30), 150.0 + 7.0 * 29.0);
    }

    #[test]
    fn test_spawn_level_one() {
        let mut rng = Pcg32::seed_from_u64(1);
        let ball = spawn_ball(1, ARENA, &mut rng);
        assert_eq!(ball.position, Vector::new(400.0, 120.0));
        assert_eq!(ball.velocity, Vector::new(0.0, 150.0));
        assert_eq!(ball.radius, BALL_RADIUS);
    }

    #[test]
    fn test_spawn_level_two() {
        let mut rng = Pcg32::seed_from_u64(1);
        let ball = spawn_ball(2, ARENA, &mut rng);
        assert_eq!(ball.position, Vector::new(160.0, 300.0));
        assert_eq!(ball.velocity, Vector::new(157.0, 0.0));
    }

    #[test]
    fn test_spawn_random_angle_keeps_speed() {
        let mut rng = Pcg32::seed_from_u64(7);
        for level in 3..=30 {
            let ball = spawn_ball(level, ARENA, &mut rng);
            assert_eq!(ball.position, Vector::new(160.0, 120.0));
            assert!((ball.velocity.length() - speed_for_level(level)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_spawn_is_reproducible_with_same_seed() {
        let a = spawn_ball(5, ARENA, &mut Pcg32::seed_from_u64(42));
        let b = spawn_ball(5, ARENA, &mut Pcg32::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_free_flight() {
        let step = step_ball(&ball_at(400.0, 300.0, 100.0, -50.0), &[], ARENA, 0.1);
        assert_eq!(step.ball.position, Vector::new(410.0, 295.0));
        assert!(!step.x_flipped && !step.y_flipped);
    }

    #[test]
    fn test_wall_flip_applies_within_tick() {
        // Would reach x + r = 805; the flip sends it back from the pre-step spot.
        let step = step_ball(&ball_at(780.0, 300.0, 100.0, 0.0), &[], ARENA, 0.1);
        assert!(step.x_flipped);
        assert_eq!(step.ball.velocity, Vector::new(-100.0, 0.0));
        assert_eq!(step.ball.position, Vector::new(770.0, 300.0));
    }

    #[test]
    fn test_obstacle_flip_from_above() {
        let bar = Obstacle::new(300.0, 200.0, 200.0, 20.0);
        // Bottom edge at 184 + 15 = 199, next frame at 204 + 15 = 219 > 200
        let step = step_ball(&ball_at(400.0, 184.0, 0.0, 200.0), &[bar], ARENA, 0.1);
        assert!(step.y_flipped);
        assert!(!step.x_flipped);
        assert_eq!(step.ball.position, Vector::new(400.0, 164.0));
    }

    #[test]
    fn test_wall_flip_blocks_obstacle_flip_on_same_axis() {
        // Obstacle hugging the right wall: the wall flips x first, so the
        // obstacle must not flip it back.
        let post = Obstacle::new(790.0, 0.0, 10.0, 600.0);
        let step = step_ball(&ball_at(770.0, 300.0, 200.0, 0.0), &[post], ARENA, 0.1);
        assert!(step.x_flipped);
        assert_eq!(step.ball.velocity.x, -200.0);
    }

    #[test]
    fn test_first_obstacle_wins_axis() {
        // Two overlapping bars both crossed on y: only one flip happens.
        let a = Obstacle::new(300.0, 200.0, 200.0, 20.0);
        let b = Obstacle::new(350.0, 200.0, 100.0, 40.0);
        let step = step_ball(&ball_at(400.0, 184.0, 0.0, 200.0), &[a, b], ARENA, 0.1);
        assert!(step.y_flipped);
        assert_eq!(step.ball.velocity.y, -200.0);
    }

    #[test]
    fn test_corner_box_approximation() {
        // Diagonal approach to a corner: both faces crossed, both axes flip.
        let block = Obstacle::new(400.0, 400.0, 50.0, 50.0);
        let step = step_ball(&ball_at(380.0, 380.0, 100.0, 100.0), &[block], ARENA, 0.1);
        assert!(step.x_flipped && step.y_flipped);
        assert_eq!(step.ball.position, Vector::new(370.0, 370.0));
    }

    #[test]
    fn test_obstacle_by_wall_pushes_ball_out_for_one_tick() {
        // Gap of 40px between the left wall and the block's left face
        let block = Obstacle::new(55.0, 40.0, 50.0, 50.0);
        let step = step_ball(&ball_at(20.0, 60.0, 300.0, 0.0), &[block], ARENA, 0.1);
        assert!(step.x_flipped);
        assert_eq!(step.ball.velocity, Vector::new(-300.0, 0.0));
        assert_eq!(step.ball.position, Vector::new(-10.0, 60.0));
        assert!(step.ball.position.x < step.ball.radius);

        // Next tick the left wall reflects it back inside
        let back = step_ball(&step.ball, &[block], ARENA, 0.1);
        assert!(back.x_flipped);
        assert_eq!(back.ball.velocity, Vector::new(300.0, 0.0));
        assert_eq!(back.ball.position, Vector::new(20.0, 60.0));
    }

    #[test]
    fn test_trail_eviction() {
        let mut trail = Trail::new();
        for i in 0..20 {
            trail.record(Vector::new(i as f64, 0.0));
        }
        assert_eq!(trail.len(), BALL_TRAIL_LENGTH);
        let xs: Vec<f64> = trail.iter().map(|p| p.x).collect();
        let expected: Vec<f64> = (5..20).map(|i| i as f64).collect();
        assert_eq!(xs, expected);
    }

    proptest! {
        #[test]
        fn prop_ball_stays_inside_walls_without_obstacles(
            x in 15.0f64..785.0,
            y in 15.0f64..585.0,
            vx in -400.0f64..400.0,
            vy in -400.0f64..400.0,
            ticks in 1usize..300,
            dt in 0.001f64..0.05,
        ) {
            let mut ball = ball_at(x, y, vx, vy);
            for _ in 0..ticks {
                ball = step_ball(&ball, &[], ARENA, dt).ball;
                let (p, r) = (ball.position, ball.radius);
                prop_assert!(p.x >= r && p.x <= ARENA.width - r);
                prop_assert!(p.y >= r && p.y <= ARENA.height - r);
            }
        }

        #[test]
        fn prop_step_is_deterministic(
            x in 15.0f64..785.0,
            y in 15.0f64..585.0,
            vx in -400.0f64..400.0,
            vy in -400.0f64..400.0,
            level in 4u32..=30,
            dt in 0.001f64..0.1,
        ) {
            let obstacles =
                crate::sim::level::resolve_obstacles(level, ARENA.width, ARENA.height).unwrap();
            let ball = ball_at(x, y, vx, vy);
            let a = step_ball(&ball, &obstacles, ARENA, dt);
            let b = step_ball(&ball, &obstacles, ARENA, dt);
            prop_assert_eq!(a, b);
        }
    }
}
