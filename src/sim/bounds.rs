//! Visible field extents and the border fence around them

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::FIELD_HALF_EXTENTS;

/// Which edge a border collider guards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

/// Axis-aligned box collider for the host physics engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BorderCollider {
    pub edge: Edge,
    /// Center offset from the field origin
    pub offset: Vec2,
    /// Full width and height
    pub size: Vec2,
}

/// Visible field, centered on the origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldBounds {
    pub half_extents: Vec2,
}

impl Default for FieldBounds {
    fn default() -> Self {
        Self {
            half_extents: FIELD_HALF_EXTENTS,
        }
    }
}

impl FieldBounds {
    pub fn new(half_extents: Vec2) -> Self {
        Self {
            half_extents: half_extents.abs(),
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.half_extents.x * 2.0
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.half_extents.y * 2.0
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x.abs() <= self.half_extents.x && point.y.abs() <= self.half_extents.y
    }

    /// Four boxes of the given thickness sitting just outside each edge
    pub fn border_colliders(&self, thickness: f32) -> [BorderCollider; 4] {
        let (w, h) = (self.width(), self.height());
        let t = thickness;
        [
            BorderCollider {
                edge: Edge::Top,
                offset: Vec2::new(0.0, h * 0.5 + t * 0.5),
                size: Vec2::new(w, t),
            },
            BorderCollider {
                edge: Edge::Bottom,
                offset: Vec2::new(0.0, -h * 0.5 - t * 0.5),
                size: Vec2::new(w, t),
            },
            BorderCollider {
                edge: Edge::Left,
                offset: Vec2::new(-w * 0.5 - t * 0.5, 0.0),
                size: Vec2::new(t, h),
            },
            BorderCollider {
                edge: Edge::Right,
                offset: Vec2::new(w * 0.5 + t * 0.5, 0.0),
                size: Vec2::new(t, h),
            },
        ]
    }
}
