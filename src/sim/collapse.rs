//! Collapse (shrink and despawn) sequence
//!
//! Each ball carries its own `CollapseState`, advanced once per host tick.
//! When a sequence finishes the caller hands the ball back to the pool.

use serde::{Deserialize, Serialize};

use super::ball::Ball;
use crate::consts::COLLAPSE_DURATION;

/// Per-ball collapse state
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum CollapseState {
    #[default]
    Idle,
    /// Shrinking; `base_scale` is restored once finished
    Collapsing { elapsed: f32, base_scale: f32 },
}

/// A point on a keyframed shrink curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub t: f32,
    pub value: f32,
}

/// Shrink curve: maps normalized time [0, 1] to a scale multiplier
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Easing {
    #[default]
    Linear,
    /// Slow start, fast finish
    EaseIn,
    /// Fast start, slow finish
    EaseOut,
    SmoothStep,
    /// Piecewise-linear through the given keys (sorted by `t`)
    Keyframes(Vec<Keyframe>),
}

impl Easing {
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => 1.0 - t,
            Easing::EaseIn => 1.0 - t * t,
            Easing::EaseOut => (1.0 - t) * (1.0 - t),
            Easing::SmoothStep => 1.0 - t * t * (3.0 - 2.0 * t),
            Easing::Keyframes(keys) => sample_keys(keys, t),
        }
    }
}

fn sample_keys(keys: &[Keyframe], t: f32) -> f32 {
    let (Some(first), Some(last)) = (keys.first(), keys.last()) else {
        return 1.0 - t;
    };
    if t <= first.t {
        return first.value;
    }
    if t >= last.t {
        return last.value;
    }
    for pair in keys.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.t {
            let span = b.t - a.t;
            if span <= f32::EPSILON {
                return b.value;
            }
            return a.value + (b.value - a.value) * (t - a.t) / span;
        }
    }
    last.value
}

/// Result of advancing one ball's collapse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollapseProgress {
    /// Not collapsing
    Idle,
    Running,
    /// Scale restored; the ball should be released to the pool now
    Finished,
}

/// Collapse timing and curve
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollapseAnimator {
    /// Seconds from start to release
    pub duration: f32,
    pub easing: Easing,
}

impl Default for CollapseAnimator {
    fn default() -> Self {
        Self {
            duration: COLLAPSE_DURATION,
            easing: Easing::Linear,
        }
    }
}

impl CollapseAnimator {
    pub fn new(duration: f32, easing: Easing) -> Self {
        Self {
            duration: duration.max(0.0),
            easing,
        }
    }

    /// Begin collapsing. Returns false for inactive or already collapsing balls.
    pub fn start(&self, ball: &mut Ball) -> bool {
        if !ball.is_active() || ball.is_collapsing() {
            return false;
        }
        let base_scale = ball.scale;
        ball.collapse = CollapseState::Collapsing {
            elapsed: 0.0,
            base_scale,
        };
        ball.scale = base_scale * self.easing.evaluate(0.0);
        true
    }

    /// Advance by one tick
    pub fn advance(&self, ball: &mut Ball, dt: f32) -> CollapseProgress {
        let CollapseState::Collapsing { elapsed, base_scale } = ball.collapse else {
            return CollapseProgress::Idle;
        };

        let elapsed = elapsed + dt;
        if elapsed >= self.duration {
            ball.scale = base_scale;
            ball.collapse = CollapseState::Idle;
            return CollapseProgress::Finished;
        }

        ball.scale = base_scale * self.easing.evaluate(elapsed / self.duration);
        ball.collapse = CollapseState::Collapsing { elapsed, base_scale };
        CollapseProgress::Running
    }
}
