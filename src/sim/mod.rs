//! Deterministic simulation core
//!
//! Everything here is pure game logic. The host physics engine integrates
//! bodies and reports contacts; this module decides what they mean:
//! - Seeded RNG only
//! - Stable iteration order (by ball ID)
//! - No rendering or platform dependencies

pub mod ball;
pub mod bounds;
pub mod collapse;
pub mod events;
pub mod field;
pub mod lattice;
pub mod level;
pub mod pool;
pub mod resolver;
pub mod session;
pub mod trajectory;

pub use ball::{Ball, BallColor, BallId, BallRole};
pub use bounds::{BorderCollider, Edge, FieldBounds};
pub use collapse::{CollapseAnimator, CollapseProgress, CollapseState, Easing, Keyframe};
pub use events::{BodyState, ContactEvent, FieldEvent, PhysicsCommand, TriggerZone};
pub use field::{ContactOutcome, Field};
pub use lattice::{Direction, Spring};
pub use level::{GridSize, LevelLayout};
pub use pool::{BallPool, Palette};
pub use resolver::{ContactDecision, ContactRules, chain_sweep, classify_contact, closing_speed};
pub use session::{FieldSession, ScoreCounter, ScoreSink, SessionPhase, Verdict};
pub use trajectory::{Trajectory, TrajectoryPredictor};
