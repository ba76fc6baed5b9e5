//! Level layout: shot budget, grid size and per-cell colors
//!
//! Levels are JSON records. The field names of the older level files
//! (`levelBallsGridRes`, `levelBalls`) are still accepted.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ball::BallColor;
use super::bounds::FieldBounds;
use crate::error::{FieldError, FieldResult};

/// Fraction of the field the grid is allowed to span
const GRID_SPAN: f32 = 0.9;

/// Grid resolution in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GridSize {
    #[serde(alias = "columns")]
    pub x: u32,
    #[serde(alias = "rows")]
    pub y: u32,
}

/// A level as read from disk
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelLayout {
    /// Shots the player may take
    #[serde(rename = "playerBallsCount")]
    pub player_balls: u32,
    #[serde(rename = "gridResolution", alias = "levelBallsGridRes")]
    pub grid: GridSize,
    /// Row-major color codes, one per target ball
    #[serde(rename = "cellColors", alias = "levelBalls")]
    pub cells: Vec<String>,
}

impl LevelLayout {
    pub fn from_json(json: &str) -> FieldResult<Self> {
        serde_json::from_str(json).map_err(FieldError::LevelParse)
    }

    pub fn load(path: impl AsRef<Path>) -> FieldResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| FieldError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let layout = Self::from_json(&json)?;
        log::info!(
            "Loaded level {} ({}x{}, {} balls, {} shots)",
            path.display(),
            layout.grid.x,
            layout.grid.y,
            layout.cells.len(),
            layout.player_balls
        );
        Ok(layout)
    }

    /// Number of target balls the level starts with
    pub fn target_count(&self) -> usize {
        self.cells.len()
    }

    fn columns(&self) -> u32 {
        self.grid.x.max(1)
    }

    pub fn cell_color(&self, index: usize) -> BallColor {
        self.cells
            .get(index)
            .map_or(BallColor::default(), |code| BallColor::from_code(code))
    }

    /// Grid coordinates (column, row) of a cell
    pub fn grid_cell(&self, index: usize) -> (u32, u32) {
        let cols = self.columns() as usize;
        ((index % cols) as u32, (index / cols) as u32)
    }

    /// Distance between neighboring cells so the grid fits the field
    pub fn cell_spacing(&self, bounds: &FieldBounds) -> f32 {
        let horizontal = (self.grid.x > 1).then(|| bounds.width() * GRID_SPAN / (self.grid.x - 1) as f32);
        let vertical = (self.grid.y > 1).then(|| bounds.height() * GRID_SPAN / (self.grid.y - 1) as f32);
        match (horizontal, vertical) {
            (Some(h), Some(v)) => h.min(v),
            (Some(s), None) | (None, Some(s)) => s,
            (None, None) => 0.0,
        }
    }

    /// World position of a cell; the grid grows right and down from the
    /// upper-left corner of the spanned area
    pub fn cell_position(&self, index: usize, bounds: &FieldBounds) -> Vec2 {
        let delta = self.cell_spacing(bounds);
        let (col, row) = self.grid_cell(index);
        let left = -bounds.width() * GRID_SPAN * 0.5;
        let top = bounds.height() * GRID_SPAN * 0.5;
        Vec2::new(left + delta * col as f32, top - delta * row as f32)
    }

    /// Every cell's color and world position, in row-major order
    pub fn placements(&self, bounds: &FieldBounds) -> Vec<(BallColor, Vec2)> {
        (0..self.cells.len())
            .map(|i| (self.cell_color(i), self.cell_position(i, bounds)))
            .collect()
    }
}
