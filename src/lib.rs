//! Bubble Shooter - simulation core for a color-matching bubble shooter
//!
//! Core modules:
//! - `sim`: Field simulation (ball pool, lattice, contacts, collapse, trajectory)
//! - `config`: Data-driven tunables
//! - `aim`: Drag gesture to shot force
//! - `preview`: Trajectory preview output
//! - `error`: Errors for the fallible boundary (level/config loading)

pub mod aim;
pub mod config;
pub mod error;
pub mod preview;
pub mod sim;

pub use config::FieldConfig;
pub use error::{FieldError, FieldResult};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Fixed simulation timestep (50 Hz, matches the host physics step)
    pub const FIXED_DT: f32 = 1.0 / 50.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Visible field half extents in world units (portrait)
    pub const FIELD_HALF_EXTENTS: Vec2 = Vec2::new(2.8, 5.0);

    /// Closing speed above which a contact shatters both balls
    pub const IMPACT_SPEED_THRESHOLD: f32 = 2.50;
    /// Score awarded for a shattering impact
    pub const SHATTER_SCORE: u64 = 2;
    /// Radius of the same-color chain reaction sweep
    pub const CHAIN_RADIUS: f32 = 0.50;
    /// Score awarded when a ball falls through the score zone
    pub const SCORE_ZONE_POINTS: u64 = 1;

    /// Lattice spring anchor distance (independent of ball scale)
    pub const LATTICE_OFFSET: f32 = 0.5;
    /// Lattice spring damping ratio
    pub const SPRING_DAMPING_RATIO: f32 = 0.125;
    /// Lattice spring frequency (Hz)
    pub const SPRING_FREQUENCY: f32 = 1.0;

    /// Downward acceleration used by the trajectory preview.
    /// Hardcoded so the preview is stable regardless of global gravity.
    pub const FREE_FALL_ACCEL: Vec2 = Vec2::new(0.0, -1.0);
    /// Default bounce absorption for the trajectory preview
    pub const BOUNCE_ABSORPTION: f32 = 0.9;
    /// Default bounce limit for the trajectory preview
    pub const MAX_PREVIEW_BOUNCES: u32 = 3;
    /// Default point limit for the trajectory preview
    pub const MAX_PREVIEW_POINTS: usize = 1000;

    /// Default collapse (shrink) duration in seconds
    pub const COLLAPSE_DURATION: f32 = 0.35;
    /// Delay between collapsing the field and reporting the verdict
    pub const GAME_OVER_DELAY: f32 = 1.0;
}

/// Straight-line distance check used by radius sweeps (inclusive)
#[inline]
pub fn within_radius(a: Vec2, b: Vec2, radius: f32) -> bool {
    a.distance(b) <= radius
}
