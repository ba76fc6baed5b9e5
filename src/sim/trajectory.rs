//! Physics-free shot trajectory prediction
//!
//! Explicit Euler at the host's fixed step with a hardcoded downward
//! acceleration, reflecting off the visible field edges. No ball-ball
//! contacts and no solver-exact restitution: the preview is cheap and
//! deterministic, and may drift from the real flight.

use glam::Vec2;

use crate::consts::{
    BOUNCE_ABSORPTION, FIELD_HALF_EXTENTS, FIXED_DT, FREE_FALL_ACCEL, MAX_PREVIEW_BOUNCES,
    MAX_PREVIEW_POINTS,
};

/// A predicted flight path
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trajectory {
    /// Sampled positions in simulation order (the start point is not included)
    pub points: Vec<Vec2>,
    /// Boundary reflections counted (both axes share the counter)
    pub bounces: u32,
    /// Remaining impulse after per-bounce damping
    pub final_force: Vec2,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<Vec2> {
        self.points.last().copied()
    }
}

/// Shot trajectory predictor
#[derive(Debug, Clone)]
pub struct TrajectoryPredictor {
    /// Integration step (the host fixed-update interval)
    pub step: f32,
    /// Visible field half extents
    pub half_extents: Vec2,
    /// Stop once this many bounces have been counted
    pub max_bounces: u32,
    /// Hard cap on sampled points
    pub max_points: usize,
    bounce_absorption: f32,
}

impl Default for TrajectoryPredictor {
    fn default() -> Self {
        Self {
            step: FIXED_DT,
            half_extents: FIELD_HALF_EXTENTS,
            max_bounces: MAX_PREVIEW_BOUNCES,
            max_points: MAX_PREVIEW_POINTS,
            bounce_absorption: BOUNCE_ABSORPTION,
        }
    }
}

impl TrajectoryPredictor {
    pub fn new(step: f32, half_extents: Vec2) -> Self {
        Self {
            step,
            half_extents,
            ..Default::default()
        }
    }

    pub fn bounce_absorption(&self) -> f32 {
        self.bounce_absorption
    }

    /// Set the fraction of velocity kept per bounce, clamped to [0, 1]
    pub fn set_bounce_absorption(&mut self, value: f32) {
        self.bounce_absorption = value.clamp(0.0, 1.0);
    }

    /// Predict the path of a ball launched with impulse `force` from `start`
    pub fn predict(&self, force: Vec2, start: Vec2) -> Trajectory {
        let dt = self.step;
        let k = self.bounce_absorption;

        // Impulse applied over one fixed step
        let mut force = force;
        let mut vel = force * dt;
        let mut pos = start;
        let mut bounces = 0u32;
        let mut points = Vec::with_capacity(self.max_points.min(256));

        for _ in 0..self.max_points {
            vel += FREE_FALL_ACCEL * dt;
            pos += vel * dt;

            // Each axis counts separately; a corner exit stops at the limit
            if pos.x.abs() > self.half_extents.x && bounces < self.max_bounces {
                vel.x *= -k;
                force.x *= -k;
                bounces += 1;
            }
            if pos.y.abs() > self.half_extents.y && bounces < self.max_bounces {
                vel.y *= -k;
                force.y *= -k;
                bounces += 1;
            }

            points.push(pos);
            if bounces >= self.max_bounces {
                break;
            }
        }

        Trajectory {
            points,
            bounces,
            final_force: force,
        }
    }
}
