//! Ball-to-ball contact resolution
//!
//! A single physical quantity picks the outcome: a hard hit shatters both
//! balls whatever their colors, a soft hit docks the projectile into the
//! field. Docking against the same color sets off a one-pass chain sweep.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ball::{Ball, BallColor, BallId, BallRole};
use super::pool::BallPool;
use crate::consts::{CHAIN_RADIUS, IMPACT_SPEED_THRESHOLD, SHATTER_SCORE};
use crate::within_radius;

/// Tunables for contact resolution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContactRules {
    /// Closing speed above which both balls shatter
    pub impact_speed: f32,
    /// Score for a shatter
    pub shatter_score: u64,
    /// Chain sweep radius (inclusive)
    pub chain_radius: f32,
}

impl Default for ContactRules {
    fn default() -> Self {
        Self {
            impact_speed: IMPACT_SPEED_THRESHOLD,
            shatter_score: SHATTER_SCORE,
            chain_radius: CHAIN_RADIUS,
        }
    }
}

/// What should happen for a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactDecision {
    /// Physics-only contact
    Ignore,
    /// Hard impact: collapse both, award score
    Shatter { projectile: BallId, target: BallId },
    /// Soft impact: promote the projectile; sweep if colors match
    Dock {
        projectile: BallId,
        target: BallId,
        chain: bool,
    },
}

/// Closing speed as used by the rules: magnitude of the velocity sum.
///
/// Not the relative speed. Head-on hits at equal speed score low here;
/// game balance is tuned around this.
#[inline]
pub fn closing_speed(a: &Ball, b: &Ball) -> f32 {
    (a.vel + b.vel).length()
}

/// Decide the outcome of `a` touching `b`. Symmetric in its arguments.
pub fn classify_contact(a: &Ball, b: &Ball, rules: &ContactRules) -> ContactDecision {
    if a.role == b.role {
        return ContactDecision::Ignore;
    }
    // Pooled balls take no part; collapsing ones still do, and a repeated
    // collapse is absorbed by the animator
    if !a.is_active() || !b.is_active() {
        return ContactDecision::Ignore;
    }

    let (projectile, target) = if a.role == BallRole::Projectile {
        (a, b)
    } else {
        (b, a)
    };

    if closing_speed(a, b) > rules.impact_speed {
        ContactDecision::Shatter {
            projectile: projectile.id,
            target: target.id,
        }
    } else {
        ContactDecision::Dock {
            projectile: projectile.id,
            target: target.id,
            chain: projectile.color() == target.color(),
        }
    }
}

/// Active targets of `color` within `radius` of `center`, in id order.
///
/// Single pass over the population; neighbors of swept balls are not
/// searched.
pub fn chain_sweep(pool: &BallPool, center: Vec2, color: BallColor, radius: f32) -> Vec<BallId> {
    pool.targets()
        .filter(|b| b.color() == color && within_radius(b.pos, center, radius))
        .map(|b| b.id)
        .collect()
}
