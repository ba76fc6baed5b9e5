//! Four-way spring lattice for target balls
//!
//! A target ball is anchored by four springs (up, down, left, right) to
//! points half a unit away from where it sits. The springs let the field
//! jostle and settle back without pinning every ball rigidly. The springs
//! themselves are simulated by the host physics engine; this module only
//! owns their parameters.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use crate::consts::{LATTICE_OFFSET, SPRING_DAMPING_RATIO, SPRING_FREQUENCY};

/// Anchor directions, in spring slot order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// Anchor offset for this direction
    pub fn offset(&self) -> Vec2 {
        let unit = match self {
            Direction::Up => Vec2::Y,
            Direction::Down => Vec2::NEG_Y,
            Direction::Left => Vec2::NEG_X,
            Direction::Right => Vec2::X,
        };
        unit * LATTICE_OFFSET
    }
}

/// A single lattice spring
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spring {
    /// Offset from the ball to its anchor
    pub offset: Vec2,
    /// World-space anchor point
    pub anchor: Vec2,
    /// Natural length
    pub distance: f32,
    pub damping_ratio: f32,
    pub frequency: f32,
    /// Whether the spring currently applies force
    pub enabled: bool,
}

impl Spring {
    fn new(origin: Vec2, offset: Vec2) -> Self {
        let mut spring = Self {
            offset,
            anchor: origin,
            distance: 0.0,
            damping_ratio: 0.0,
            frequency: 0.0,
            enabled: true,
        };
        spring.configure(origin, offset);
        spring
    }

    /// Reset parameters and re-center the anchor on `origin`
    fn configure(&mut self, origin: Vec2, offset: Vec2) {
        self.offset = offset;
        self.distance = offset.length();
        self.damping_ratio = SPRING_DAMPING_RATIO;
        self.frequency = SPRING_FREQUENCY;
        self.anchor = origin + offset;
    }
}

/// Attach a ball to the lattice at its current position.
///
/// Creates four enabled springs the first time. A ball coming back from the
/// pool already has springs with stale anchors; those are re-parameterized in
/// place (keeping their enabled flag) rather than duplicated.
pub fn attach(ball: &mut Ball) {
    let origin = ball.pos;
    match ball.springs.as_mut() {
        Some(springs) => {
            for (spring, dir) in springs.iter_mut().zip(Direction::ALL) {
                spring.configure(origin, dir.offset());
            }
        }
        None => {
            ball.springs = Some(Direction::ALL.map(|dir| Spring::new(origin, dir.offset())));
        }
    }
}

/// Toggle whether the ball's springs apply force, without removing them
pub fn set_enabled(ball: &mut Ball, on: bool) {
    if let Some(springs) = ball.springs.as_mut() {
        for spring in springs.iter_mut() {
            spring.enabled = on;
        }
    }
}
