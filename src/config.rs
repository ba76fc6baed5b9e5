//! Field configuration
//!
//! Every tunable of the core in one serde record. Missing keys fall back to
//! the defaults in `consts`, so a config file only needs the values it
//! changes.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{FieldError, FieldResult};
use crate::sim::ball::BallColor;
use crate::sim::collapse::{CollapseAnimator, Easing};
use crate::sim::resolver::ContactRules;
use crate::sim::trajectory::TrajectoryPredictor;

/// Runtime-tunable field configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// RNG seed for projectile colors
    pub seed: u64,
    /// Host fixed-update interval (seconds)
    pub fixed_dt: f32,
    /// Visible field half extents (world units)
    pub half_extents: Vec2,

    // === Collapse ===
    pub collapse_duration: f32,
    pub collapse_easing: Easing,

    // === Contacts ===
    pub impact_speed: f32,
    pub shatter_score: u64,
    pub chain_radius: f32,

    // === Trajectory preview ===
    /// Fraction of velocity kept per bounce (0.0 - 1.0)
    pub bounce_absorption: f32,
    pub max_bounces: u32,
    pub max_points: usize,
    pub line_width: f32,

    // === Aiming ===
    pub force_factor: f32,
    /// Maximum handle travel for the aim gesture
    pub aim_range: f32,

    // === Session ===
    /// Seconds between collapsing the field and reporting the verdict
    pub game_over_delay: f32,

    /// Colors that have an asset; others are substituted with Red
    pub palette: Vec<BallColor>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            fixed_dt: FIXED_DT,
            half_extents: FIELD_HALF_EXTENTS,

            collapse_duration: COLLAPSE_DURATION,
            collapse_easing: Easing::Linear,

            impact_speed: IMPACT_SPEED_THRESHOLD,
            shatter_score: SHATTER_SCORE,
            chain_radius: CHAIN_RADIUS,

            bounce_absorption: BOUNCE_ABSORPTION,
            max_bounces: MAX_PREVIEW_BOUNCES,
            max_points: MAX_PREVIEW_POINTS,
            line_width: 0.1,

            force_factor: 1.0,
            aim_range: 150.0,

            game_over_delay: GAME_OVER_DELAY,

            palette: BallColor::ALL.to_vec(),
        }
    }
}

impl FieldConfig {
    /// Parse a config from JSON and clamp it into range
    pub fn from_json(json: &str) -> FieldResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(FieldError::ConfigParse)?;
        Ok(config.sanitized())
    }

    /// Load a config file, falling back to defaults when it is missing or bad
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let loaded = std::fs::read_to_string(path)
            .map_err(|source| FieldError::Io {
                path: path.to_path_buf(),
                source,
            })
            .and_then(|json| Self::from_json(&json));

        match loaded {
            Ok(config) => {
                log::info!("Loaded field config from {}", path.display());
                config
            }
            Err(err) => {
                log::warn!("Using default field config: {}", err);
                Self::default()
            }
        }
    }

    /// Copy with every value clamped into its valid range
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.fixed_dt.is_nan() || self.fixed_dt <= 0.0 {
            self.fixed_dt = defaults.fixed_dt;
        }
        self.half_extents = self.half_extents.abs();
        self.collapse_duration = self.collapse_duration.max(0.0);
        self.impact_speed = self.impact_speed.max(0.0);
        self.chain_radius = self.chain_radius.max(0.0);
        self.bounce_absorption = self.bounce_absorption.clamp(0.0, 1.0);
        self.line_width = self.line_width.max(0.01);
        self.aim_range = self.aim_range.max(0.1);
        self.game_over_delay = self.game_over_delay.max(0.0);
        self
    }

    pub fn contact_rules(&self) -> ContactRules {
        ContactRules {
            impact_speed: self.impact_speed,
            shatter_score: self.shatter_score,
            chain_radius: self.chain_radius,
        }
    }

    pub fn collapse_animator(&self) -> CollapseAnimator {
        CollapseAnimator::new(self.collapse_duration, self.collapse_easing.clone())
    }

    pub fn predictor(&self) -> TrajectoryPredictor {
        let mut predictor = TrajectoryPredictor::new(self.fixed_dt, self.half_extents);
        predictor.max_bounces = self.max_bounces;
        predictor.max_points = self.max_points;
        predictor.set_bounce_absorption(self.bounce_absorption);
        predictor
    }
}
