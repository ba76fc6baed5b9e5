//! Messages crossing the core's boundary
//!
//! Inbound: contact and trigger reports from the host physics engine.
//! Outbound: commands for that engine and notifications for the host.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ball::BallId;
use super::lattice::Spring;
use super::session::Verdict;

/// Kinematic snapshot of one body at contact time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyState {
    pub id: BallId,
    pub pos: Vec2,
    pub vel: Vec2,
}

/// Contact-begin report between two balls
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContactEvent {
    pub a: BodyState,
    pub b: BodyState,
}

impl ContactEvent {
    pub fn new(a: BodyState, b: BodyState) -> Self {
        Self { a, b }
    }

    /// The same contact reported from the other body's side
    pub fn swapped(&self) -> Self {
        Self {
            a: self.b,
            b: self.a,
        }
    }
}

/// Trigger volumes a ball can enter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerZone {
    /// Below the field: balls entering it collapse
    Despawner,
    /// Balls falling through it award a point
    ScoreZone,
}

/// Instruction for the host physics engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PhysicsCommand {
    /// Place the body at `pos` and start simulating it
    Spawn { id: BallId, pos: Vec2 },
    /// Stop simulating, zero velocity, hide
    Despawn { id: BallId },
    ApplyImpulse { id: BallId, force: Vec2 },
    /// Replace the body's lattice springs (parameters and enabled flags)
    ConfigureSprings { id: BallId, springs: [Spring; 4] },
    SetScale { id: BallId, scale: f32 },
}

/// Notification for the host (UI, audio, flow control)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldEvent {
    ScoreChanged(u64),
    BallsRemaining(u32),
    Shattered { projectile: BallId, target: BallId },
    Docked { id: BallId, chained: usize },
    SessionEnded { verdict: Verdict, score: u64 },
}
