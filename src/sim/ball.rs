//! Ball entity and its closed enumerations
//!
//! Balls are never freed during play; they cycle through the pool. Only the
//! pool flips `active`, and `color` is fixed at construction.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collapse::CollapseState;
use super::lattice::Spring;

/// Stable ball identity, never reused within a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BallId(pub u32);

/// Ball colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum BallColor {
    #[default]
    Red,
    Green,
    Blue,
}

impl BallColor {
    /// Every color, in a fixed order (used for uniform random picks)
    pub const ALL: [BallColor; 3] = [BallColor::Red, BallColor::Green, BallColor::Blue];

    /// Decode a level cell code. Unknown codes fall back to Red.
    pub fn from_code(code: &str) -> Self {
        match code {
            "r" => BallColor::Red,
            "g" => BallColor::Green,
            "b" => BallColor::Blue,
            _ => BallColor::Red,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            BallColor::Red => "r",
            BallColor::Green => "g",
            BallColor::Blue => "b",
        }
    }
}

/// What part a ball plays in the field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallRole {
    /// Field-resident, held by the lattice
    Target,
    /// Player-fired, in free flight
    Projectile,
}

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: BallId,
    color: BallColor,
    pub role: BallRole,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Visual scale (1.0 baseline, driven by the collapse animation)
    pub scale: f32,
    /// Lattice springs: none, or exactly one per direction
    pub springs: Option<[Spring; 4]>,
    pub collapse: CollapseState,
    active: bool,
}

impl Ball {
    pub(crate) fn new(id: BallId, color: BallColor, pos: Vec2) -> Self {
        Self {
            id,
            color,
            role: BallRole::Target,
            pos,
            vel: Vec2::ZERO,
            scale: 1.0,
            springs: None,
            collapse: CollapseState::Idle,
            active: true,
        }
    }

    #[inline]
    pub fn color(&self) -> BallColor {
        self.color
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[inline]
    pub fn is_collapsing(&self) -> bool {
        matches!(self.collapse, CollapseState::Collapsing { .. })
    }

    /// Number of lattice links (0 or 4)
    pub fn link_count(&self) -> usize {
        self.springs.as_ref().map_or(0, |s| s.len())
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}
