//! Drag-to-aim gesture
//!
//! Pointer capture stays with the host. This turns the drag positions it
//! reports into a clamped handle offset (for drawing the slingshot handle)
//! and the force of the shot.

use glam::Vec2;

use crate::config::FieldConfig;

/// Drags shorter than this do not move the handle
const MIN_DRAG: f32 = 1e-3;
/// Smallest allowed handle travel
const MIN_RANGE: f32 = 0.1;

/// One press-drag-release aiming gesture
#[derive(Debug, Clone, PartialEq)]
pub struct AimGesture {
    start: Vec2,
    current: Vec2,
    handle: Vec2,
    active: bool,
    range: f32,
    /// Scale from drag distance to shot force
    pub force_factor: f32,
}

impl Default for AimGesture {
    fn default() -> Self {
        Self::new(150.0, 1.0)
    }
}

impl AimGesture {
    pub fn new(range: f32, force_factor: f32) -> Self {
        Self {
            start: Vec2::ZERO,
            current: Vec2::ZERO,
            handle: Vec2::ZERO,
            active: false,
            range: range.max(MIN_RANGE),
            force_factor,
        }
    }

    pub fn from_config(config: &FieldConfig) -> Self {
        Self::new(config.aim_range, config.force_factor)
    }

    pub fn range(&self) -> f32 {
        self.range
    }

    pub fn set_range(&mut self, range: f32) {
        self.range = range.max(MIN_RANGE);
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Handle offset from its rest position
    pub fn handle(&self) -> Vec2 {
        self.handle
    }

    /// Current drag, unclamped
    pub fn drag(&self) -> Vec2 {
        self.current - self.start
    }

    /// Force a release right now would fire with
    pub fn shooting_force(&self) -> Vec2 {
        -self.force_factor * self.drag()
    }

    pub fn begin(&mut self, pos: Vec2) {
        self.start = pos;
        self.current = pos;
        self.handle = Vec2::ZERO;
        self.active = true;
    }

    /// Track the pointer. Returns the new handle offset, or None when the
    /// gesture is idle or the drag is too short to register.
    pub fn move_to(&mut self, pos: Vec2) -> Option<Vec2> {
        if !self.active {
            return None;
        }
        self.current = pos;

        let drag = self.drag();
        let length = drag.length();
        if length < MIN_DRAG {
            return None;
        }
        self.handle = drag * (length.min(self.range) / length);
        Some(self.handle)
    }

    /// Release: returns the shot force and snaps the handle back
    pub fn end(&mut self) -> Vec2 {
        if !self.active {
            return Vec2::ZERO;
        }
        let force = self.shooting_force();
        self.start = Vec2::ZERO;
        self.current = Vec2::ZERO;
        self.handle = Vec2::ZERO;
        self.active = false;
        force
    }
}
