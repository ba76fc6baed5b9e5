//! Ball entity pool
//!
//! Every ball ever constructed stays in the registry. Inactive balls sit in a
//! per-color LIFO bucket and are handed out again before anything new is
//! built, so allocation is paid once per color high-watermark rather than
//! once per shot.

use std::collections::{BTreeMap, HashMap};

use glam::Vec2;
use rand::Rng;

use super::ball::{Ball, BallColor, BallId, BallRole};
use super::collapse::CollapseState;

/// Colors that have a visual asset backing them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<BallColor>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: BallColor::ALL.to_vec(),
        }
    }
}

impl Palette {
    pub fn new(colors: &[BallColor]) -> Self {
        Self {
            colors: colors.to_vec(),
        }
    }

    pub fn contains(&self, color: BallColor) -> bool {
        self.colors.contains(&color)
    }

    /// Substitute the default color when `color` has no asset
    pub fn resolve(&self, color: BallColor) -> BallColor {
        if self.contains(color) {
            color
        } else {
            log::debug!("No asset for {:?}, substituting {:?}", color, BallColor::default());
            BallColor::default()
        }
    }
}

/// Owns every ball entity and recycles them by color
#[derive(Debug, Clone, Default)]
pub struct BallPool {
    /// Registry of every constructed ball (stable id order)
    balls: BTreeMap<BallId, Ball>,
    /// Recycle buckets, most recently released last
    recycled: HashMap<BallColor, Vec<BallId>>,
    palette: Palette,
    next_id: u32,
}

impl BallPool {
    pub fn new(palette: Palette) -> Self {
        Self {
            balls: BTreeMap::new(),
            recycled: HashMap::new(),
            palette,
            next_id: 1,
        }
    }

    /// Dispense a ball of `color` at `pos`, reusing the most recently
    /// released one of that color if any
    pub fn acquire(&mut self, color: BallColor, pos: Vec2) -> BallId {
        let color = self.palette.resolve(color);

        if let Some(id) = self.recycled.get_mut(&color).and_then(|bucket| bucket.pop()) {
            if let Some(ball) = self.balls.get_mut(&id) {
                ball.pos = pos;
                ball.vel = Vec2::ZERO;
                ball.set_active(true);
                return id;
            }
        }

        let id = BallId(self.next_id.max(1));
        self.next_id = id.0 + 1;
        self.balls.insert(id, Ball::new(id, color, pos));
        log::debug!(
            "Constructed ball {:?} ({:?}), {} total",
            id,
            color,
            self.balls.len()
        );
        id
    }

    /// Dispense a ball of a uniformly random color
    pub fn acquire_random<R: Rng>(&mut self, rng: &mut R, pos: Vec2) -> BallId {
        let color = BallColor::ALL[rng.random_range(0..BallColor::ALL.len())];
        self.acquire(color, pos)
    }

    /// Deactivate a ball and push it onto its color bucket.
    ///
    /// Releasing an unknown or already inactive ball is a caller error; it is
    /// logged and ignored (returns false).
    pub fn release(&mut self, id: BallId) -> bool {
        let Some(ball) = self.balls.get_mut(&id) else {
            log::warn!("Release of unknown ball {:?}", id);
            return false;
        };
        if !ball.is_active() {
            log::warn!("Ball {:?} released twice", id);
            return false;
        }

        ball.set_active(false);
        ball.vel = Vec2::ZERO;
        ball.collapse = CollapseState::Idle;
        self.recycled.entry(ball.color()).or_default().push(id);
        true
    }

    pub fn get(&self, id: BallId) -> Option<&Ball> {
        self.balls.get(&id)
    }

    pub fn get_mut(&mut self, id: BallId) -> Option<&mut Ball> {
        self.balls.get_mut(&id)
    }

    /// Snapshot of every registered id, safe to iterate while mutating
    pub fn ids(&self) -> Vec<BallId> {
        self.balls.keys().copied().collect()
    }

    /// Snapshot of active ball ids
    pub fn active_ids(&self) -> Vec<BallId> {
        self.active().map(|b| b.id).collect()
    }

    /// Active balls in id order
    pub fn active(&self) -> impl Iterator<Item = &Ball> {
        self.balls.values().filter(|b| b.is_active())
    }

    /// Active target balls in id order
    pub fn targets(&self) -> impl Iterator<Item = &Ball> {
        self.active().filter(|b| b.role == BallRole::Target)
    }

    pub fn active_count(&self, color: BallColor) -> usize {
        self.active().filter(|b| b.color() == color).count()
    }

    pub fn pooled_count(&self, color: BallColor) -> usize {
        self.recycled.get(&color).map_or(0, |bucket| bucket.len())
    }

    pub fn constructed_count(&self, color: BallColor) -> usize {
        self.balls.values().filter(|b| b.color() == color).count()
    }

    /// Total balls ever constructed
    pub fn len(&self) -> usize {
        self.balls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balls.is_empty()
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }
}
