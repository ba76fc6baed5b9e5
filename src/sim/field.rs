//! The field: one owned context for the whole simulation core
//!
//! Holds the ball pool, collapse animator, contact rules, session and score.
//! The host drives it with contact/trigger reports and a per-tick `tick`, and
//! drains the queued physics commands and events after each call.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::ball::{Ball, BallColor, BallId, BallRole};
use super::bounds::FieldBounds;
use super::collapse::{CollapseAnimator, CollapseProgress, CollapseState};
use super::events::{ContactEvent, FieldEvent, PhysicsCommand, TriggerZone};
use super::lattice;
use super::level::LevelLayout;
use super::pool::{BallPool, Palette};
use super::resolver::{ContactDecision, ContactRules, chain_sweep, classify_contact};
use super::session::{FieldSession, ScoreCounter, ScoreSink, SessionPhase, Verdict};
use super::trajectory::{Trajectory, TrajectoryPredictor};
use crate::config::FieldConfig;
use crate::consts::SCORE_ZONE_POINTS;

/// What a contact report led to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactOutcome {
    Ignored,
    Shattered {
        projectile: BallId,
        target: BallId,
    },
    /// Projectile promoted to target; `chained` lists the swept balls
    Docked {
        projectile: BallId,
        target: BallId,
        chained: Vec<BallId>,
    },
}

/// Complete simulation context for one play field
#[derive(Debug)]
pub struct Field {
    config: FieldConfig,
    bounds: FieldBounds,
    pool: BallPool,
    animator: CollapseAnimator,
    rules: ContactRules,
    predictor: TrajectoryPredictor,
    session: FieldSession,
    score: ScoreCounter,
    rng: Pcg32,
    commands: Vec<PhysicsCommand>,
    events: Vec<FieldEvent>,
}

impl Field {
    /// Build a field and spawn the level's target balls
    pub fn new(config: FieldConfig, layout: LevelLayout) -> Self {
        let config = config.sanitized();
        let mut field = Self {
            bounds: FieldBounds::new(config.half_extents),
            pool: BallPool::new(Palette::new(&config.palette)),
            animator: config.collapse_animator(),
            rules: config.contact_rules(),
            predictor: config.predictor(),
            session: FieldSession::new(layout),
            score: ScoreCounter::default(),
            rng: Pcg32::seed_from_u64(config.seed),
            commands: Vec::new(),
            events: Vec::new(),
            config,
        };
        field.spawn_level();
        field
    }

    fn spawn_level(&mut self) {
        let placements = self.session.layout.placements(&self.bounds);
        log::info!(
            "Spawning level: {} target balls, {} shots",
            placements.len(),
            self.session.balls_remaining()
        );
        for (color, pos) in placements {
            self.spawn_target(color, pos);
        }
    }

    /// Place a lattice-attached target ball
    pub fn spawn_target(&mut self, color: BallColor, pos: Vec2) -> BallId {
        let id = self.pool.acquire(color, pos);
        if let Some(ball) = self.pool.get_mut(id) {
            ball.role = BallRole::Target;
            lattice::attach(ball);
            lattice::set_enabled(ball, true);
        }
        self.commands.push(PhysicsCommand::Spawn { id, pos });
        self.sync_springs(id);
        id
    }

    /// Place a projectile without spending a shot (scripted setups)
    pub fn spawn_projectile(&mut self, color: BallColor, pos: Vec2) -> BallId {
        let id = self.pool.acquire(color, pos);
        self.ready_projectile(id, pos);
        id
    }

    fn ready_projectile(&mut self, id: BallId, pos: Vec2) {
        if let Some(ball) = self.pool.get_mut(id) {
            ball.role = BallRole::Projectile;
            // Recycled targets keep their springs; they stay inert until docking
            lattice::set_enabled(ball, false);
        }
        self.commands.push(PhysicsCommand::Spawn { id, pos });
        self.sync_springs(id);
    }

    /// Fire a random-colored projectile. None when no shot can be taken.
    pub fn shoot(&mut self, origin: Vec2, force: Vec2) -> Option<BallId> {
        if !self.session.is_playing() || !self.session.take_ball() {
            return None;
        }

        let id = self.pool.acquire_random(&mut self.rng, origin);
        self.ready_projectile(id, origin);
        self.commands.push(PhysicsCommand::ApplyImpulse { id, force });
        self.events
            .push(FieldEvent::BallsRemaining(self.session.balls_remaining()));
        log::debug!(
            "Shot {:?} with force {:?}, {} left",
            id,
            force,
            self.session.balls_remaining()
        );
        Some(id)
    }

    /// Whether a shot (and its preview) is currently possible
    pub fn can_shoot(&self) -> bool {
        self.session.is_playing() && self.session.balls_remaining() > 0
    }

    /// Predict where a shot with `force` from `origin` would go
    pub fn preview(&self, force: Vec2, origin: Vec2) -> Trajectory {
        self.predictor.predict(force, origin)
    }

    /// Mirror the host's kinematic state for a ball
    pub fn sync_body(&mut self, id: BallId, pos: Vec2, vel: Vec2) -> bool {
        match self.pool.get_mut(id) {
            Some(ball) if ball.is_active() => {
                ball.pos = pos;
                ball.vel = vel;
                true
            }
            _ => false,
        }
    }

    /// Resolve a contact-begin report between two balls
    pub fn on_contact(&mut self, contact: &ContactEvent) -> ContactOutcome {
        for body in [contact.a, contact.b] {
            self.sync_body(body.id, body.pos, body.vel);
        }

        let (Some(a), Some(b)) = (self.pool.get(contact.a.id), self.pool.get(contact.b.id)) else {
            log::debug!(
                "Contact with unknown ball: {:?} / {:?}",
                contact.a.id,
                contact.b.id
            );
            return ContactOutcome::Ignored;
        };

        match classify_contact(a, b, &self.rules) {
            ContactDecision::Ignore => ContactOutcome::Ignored,
            ContactDecision::Shatter { projectile, target } => {
                self.collapse(projectile);
                self.collapse(target);
                self.add_score(self.rules.shatter_score);
                self.events
                    .push(FieldEvent::Shattered { projectile, target });
                log::debug!("Shatter {:?} -> {:?}", projectile, target);
                ContactOutcome::Shattered { projectile, target }
            }
            ContactDecision::Dock {
                projectile,
                target,
                chain,
            } => {
                let chained = self.dock(projectile, chain);
                self.events.push(FieldEvent::Docked {
                    id: projectile,
                    chained: chained.len(),
                });
                log::debug!(
                    "Docked {:?} against {:?}, {} chained",
                    projectile,
                    target,
                    chained.len()
                );
                ContactOutcome::Docked {
                    projectile,
                    target,
                    chained,
                }
            }
        }
    }

    /// Promote a projectile into the lattice, sweeping same-colored
    /// neighbors when `chain` is set
    fn dock(&mut self, id: BallId, chain: bool) -> Vec<BallId> {
        let Some(ball) = self.pool.get_mut(id) else {
            return Vec::new();
        };
        ball.role = BallRole::Target;
        lattice::attach(ball);
        lattice::set_enabled(ball, true);
        let (center, color) = (ball.pos, ball.color());
        self.sync_springs(id);

        if !chain {
            return Vec::new();
        }

        // Balls already collapsing are not counted again
        chain_sweep(&self.pool, center, color, self.rules.chain_radius)
            .into_iter()
            .filter(|&swept_id| self.collapse(swept_id))
            .collect()
    }

    /// A ball entered a trigger volume
    pub fn on_trigger(&mut self, zone: TriggerZone, id: BallId) {
        match zone {
            TriggerZone::Despawner => {
                self.collapse(id);
            }
            TriggerZone::ScoreZone => {
                if self.pool.get(id).is_some_and(Ball::is_active) {
                    self.add_score(SCORE_ZONE_POINTS);
                }
            }
        }
    }

    /// Start collapsing a ball. False if it is inactive, unknown or already
    /// collapsing.
    pub fn collapse(&mut self, id: BallId) -> bool {
        let Some(ball) = self.pool.get_mut(id) else {
            return false;
        };
        if !self.animator.start(ball) {
            return false;
        }
        let scale = ball.scale;
        self.commands.push(PhysicsCommand::SetScale { id, scale });
        true
    }

    /// Collapse every live ball; returns how many started
    pub fn collapse_all(&mut self) -> usize {
        self.pool
            .active_ids()
            .into_iter()
            .filter(|&id| self.collapse(id))
            .count()
    }

    /// Advance collapse sequences and the session by one host tick
    pub fn tick(&mut self, dt: f32) {
        self.advance_collapses(dt);
        self.advance_session(dt);
    }

    fn advance_collapses(&mut self, dt: f32) {
        for id in self.pool.active_ids() {
            let Some(ball) = self.pool.get_mut(id) else {
                continue;
            };
            match self.animator.advance(ball, dt) {
                CollapseProgress::Idle => {}
                CollapseProgress::Running => {
                    let scale = ball.scale;
                    self.commands.push(PhysicsCommand::SetScale { id, scale });
                }
                CollapseProgress::Finished => {
                    let scale = ball.scale;
                    self.commands.push(PhysicsCommand::SetScale { id, scale });
                    if self.pool.release(id) {
                        self.commands.push(PhysicsCommand::Despawn { id });
                    }
                }
            }
        }
    }

    fn advance_session(&mut self, dt: f32) {
        match self.session.phase {
            SessionPhase::Playing => {
                if self.session.balls_remaining() == 0 {
                    let collapsed = self.collapse_all();
                    log::info!("Out of shots, collapsing {} balls", collapsed);
                    self.session.phase = SessionPhase::Ending { elapsed: 0.0 };
                }
            }
            SessionPhase::Ending { elapsed } => {
                let elapsed = elapsed + dt;
                if elapsed >= self.config.game_over_delay {
                    let score = self.score.score();
                    let verdict = Verdict::judge(score, self.session.layout.target_count());
                    self.session.phase = SessionPhase::Over(verdict);
                    self.events.push(FieldEvent::SessionEnded { verdict, score });
                    log::info!("{} THE SCORE IS: {}", verdict.as_str(), score);
                } else {
                    self.session.phase = SessionPhase::Ending { elapsed };
                }
            }
            SessionPhase::Over(_) => {}
        }
    }

    /// Clear the field and start the current level again
    pub fn restart(&mut self) {
        for id in self.pool.active_ids() {
            self.recycle(id);
        }
        self.score.reset();
        self.events.push(FieldEvent::ScoreChanged(0));
        self.session.reset();
        self.spawn_level();
        self.events
            .push(FieldEvent::BallsRemaining(self.session.balls_remaining()));
    }

    /// Switch to a different level and start it
    pub fn load_level(&mut self, layout: LevelLayout) {
        self.session.layout = layout;
        self.restart();
    }

    /// Return a live ball to the pool immediately, cutting any collapse short
    fn recycle(&mut self, id: BallId) {
        if let Some(ball) = self.pool.get_mut(id) {
            if let CollapseState::Collapsing { base_scale, .. } = ball.collapse {
                ball.scale = base_scale;
            }
        }
        if self.pool.release(id) {
            self.commands.push(PhysicsCommand::Despawn { id });
        }
    }

    fn add_score(&mut self, points: u64) {
        let score = self.score.add(points);
        self.events.push(FieldEvent::ScoreChanged(score));
    }

    fn sync_springs(&mut self, id: BallId) {
        if let Some(springs) = self.pool.get(id).and_then(|b| b.springs) {
            self.commands
                .push(PhysicsCommand::ConfigureSprings { id, springs });
        }
    }

    pub fn set_score_sink(&mut self, sink: Box<dyn ScoreSink>) {
        self.score.set_sink(sink);
    }

    /// Take the physics commands queued since the last drain
    pub fn drain_commands(&mut self) -> Vec<PhysicsCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Take the events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<FieldEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn ball(&self, id: BallId) -> Option<&Ball> {
        self.pool.get(id)
    }

    pub fn pool(&self) -> &BallPool {
        &self.pool
    }

    pub fn session(&self) -> &FieldSession {
        &self.session
    }

    pub fn score(&self) -> u64 {
        self.score.score()
    }

    pub fn balls_remaining(&self) -> u32 {
        self.session.balls_remaining()
    }

    pub fn bounds(&self) -> &FieldBounds {
        &self.bounds
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn predictor(&self) -> &TrajectoryPredictor {
        &self.predictor
    }

    pub fn predictor_mut(&mut self) -> &mut TrajectoryPredictor {
        &mut self.predictor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FIXED_DT;
    use crate::sim::events::BodyState;
    use crate::sim::level::GridSize;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn layout(shots: u32, cols: u32, cells: &[&str]) -> LevelLayout {
        let rows = (cells.len() as u32).div_ceil(cols.max(1));
        LevelLayout {
            player_balls: shots,
            grid: GridSize { x: cols, y: rows },
            cells: cells.iter().map(|c| c.to_string()).collect(),
        }
    }

    fn empty_field(shots: u32) -> Field {
        Field::new(FieldConfig::default(), layout(shots, 1, &[]))
    }

    fn contact(field: &Field, a: BallId, b: BallId) -> ContactEvent {
        let body = |id: BallId| {
            let ball = field.ball(id).unwrap();
            BodyState {
                id,
                pos: ball.pos,
                vel: ball.vel,
            }
        };
        ContactEvent::new(body(a), body(b))
    }

    fn run_for(field: &mut Field, seconds: f32) {
        let ticks = (seconds / FIXED_DT).ceil() as usize + 1;
        for _ in 0..ticks {
            field.tick(FIXED_DT);
        }
    }

    #[test]
    fn test_level_spawns_lattice_targets() {
        let mut field = Field::new(
            FieldConfig::default(),
            layout(5, 3, &["r", "g", "b", "g", "q", "b"]),
        );
        assert_eq!(field.pool().len(), 6);
        assert_eq!(field.pool().active_count(BallColor::Red), 2);
        for ball in field.pool().active() {
            assert_eq!(ball.role, BallRole::Target);
            assert_eq!(ball.link_count(), 4);
            assert!(ball.springs.unwrap().iter().all(|s| s.enabled));
        }

        let commands = field.drain_commands();
        let spawns = commands
            .iter()
            .filter(|c| matches!(c, PhysicsCommand::Spawn { .. }))
            .count();
        let springs = commands
            .iter()
            .filter(|c| matches!(c, PhysicsCommand::ConfigureSprings { .. }))
            .count();
        assert_eq!((spawns, springs), (6, 6));
        assert!(field.drain_commands().is_empty());
    }

    #[test]
    fn test_empty_level_is_valid() {
        let mut field = empty_field(3);
        assert!(field.pool().is_empty());
        field.tick(FIXED_DT);
        assert!(field.session().is_playing());
    }

    #[test]
    fn test_shoot_spends_a_shot_and_queues_impulse() {
        let mut field = empty_field(2);
        field.drain_commands();

        let origin = Vec2::new(0.0, -4.0);
        let force = Vec2::new(10.0, 200.0);
        let id = field.shoot(origin, force).unwrap();
        assert_eq!(field.balls_remaining(), 1);
        assert_eq!(field.ball(id).unwrap().role, BallRole::Projectile);

        let commands = field.drain_commands();
        assert_eq!(commands[0], PhysicsCommand::Spawn { id, pos: origin });
        assert_eq!(
            commands.last(),
            Some(&PhysicsCommand::ApplyImpulse { id, force })
        );
        assert!(field
            .drain_events()
            .contains(&FieldEvent::BallsRemaining(1)));

        assert!(field.shoot(origin, force).is_some());
        assert!(field.shoot(origin, force).is_none());
        assert_eq!(field.balls_remaining(), 0);
    }

    #[test]
    fn test_hard_impact_collapses_both_and_scores_two() {
        let mut field = empty_field(5);
        let target = field.spawn_target(BallColor::Red, Vec2::ZERO);
        let projectile = field.spawn_projectile(BallColor::Blue, Vec2::new(0.0, -0.4));
        field.sync_body(projectile, Vec2::new(0.0, -0.4), Vec2::new(0.0, 3.0));

        let event = contact(&field, projectile, target);
        let outcome = field.on_contact(&event);
        assert_eq!(outcome, ContactOutcome::Shattered { projectile, target });
        assert_eq!(field.score(), 2);
        assert!(field.ball(target).unwrap().is_collapsing());
        assert!(field.ball(projectile).unwrap().is_collapsing());

        let duration = field.config().collapse_duration;
        run_for(&mut field, duration);
        assert!(!field.ball(target).unwrap().is_active());
        assert!(!field.ball(projectile).unwrap().is_active());
        assert_eq!(field.pool().pooled_count(BallColor::Red), 1);
        assert_eq!(field.pool().pooled_count(BallColor::Blue), 1);
    }

    #[test]
    fn test_soft_dock_promotes_and_sweeps_same_color() {
        let mut field = empty_field(5);
        let dock_point = Vec2::new(0.0, -0.4);
        let touched = field.spawn_target(BallColor::Green, Vec2::ZERO);
        let edge = field.spawn_target(BallColor::Green, Vec2::new(0.5, -0.4));
        let beyond = field.spawn_target(BallColor::Green, Vec2::new(0.0, -0.91));
        let red = field.spawn_target(BallColor::Red, Vec2::new(0.1, -0.4));
        let projectile = field.spawn_projectile(BallColor::Green, dock_point);
        field.sync_body(projectile, dock_point, Vec2::new(0.0, 1.0));

        let event = contact(&field, touched, projectile);
        let outcome = field.on_contact(&event);
        let ContactOutcome::Docked { chained, .. } = outcome else {
            panic!("expected dock, got {:?}", outcome);
        };
        assert_eq!(chained, vec![touched, edge, projectile]);

        let docked = field.ball(projectile).unwrap();
        assert_eq!(docked.role, BallRole::Target);
        assert_eq!(docked.link_count(), 4);
        assert!(docked.springs.unwrap().iter().all(|s| s.enabled));

        assert!(field.ball(touched).unwrap().is_collapsing());
        assert!(field.ball(edge).unwrap().is_collapsing());
        assert!(!field.ball(beyond).unwrap().is_collapsing());
        assert!(!field.ball(red).unwrap().is_collapsing());
        assert_eq!(field.score(), 0);
    }

    #[test]
    fn test_hard_hit_on_collapsing_target_still_scores() {
        let mut field = empty_field(5);
        let target = field.spawn_target(BallColor::Red, Vec2::ZERO);
        assert!(field.collapse(target));
        let projectile = field.spawn_projectile(BallColor::Blue, Vec2::new(0.0, -0.4));
        field.sync_body(projectile, Vec2::new(0.0, -0.4), Vec2::new(0.0, 3.0));

        let event = contact(&field, projectile, target);
        let outcome = field.on_contact(&event);
        assert_eq!(outcome, ContactOutcome::Shattered { projectile, target });
        assert_eq!(field.score(), 2);
        assert!(field.ball(projectile).unwrap().is_collapsing());
        assert!(field.ball(target).unwrap().is_collapsing());
    }

    #[test]
    fn test_soft_dock_on_collapsing_target_promotes() {
        let mut field = empty_field(5);
        let target = field.spawn_target(BallColor::Red, Vec2::ZERO);
        assert!(field.collapse(target));
        let projectile = field.spawn_projectile(BallColor::Blue, Vec2::new(0.0, -0.4));
        field.sync_body(projectile, Vec2::new(0.0, -0.4), Vec2::new(0.0, 1.0));

        let event = contact(&field, target, projectile);
        let outcome = field.on_contact(&event);
        assert_eq!(
            outcome,
            ContactOutcome::Docked {
                projectile,
                target,
                chained: Vec::new()
            }
        );
        let docked = field.ball(projectile).unwrap();
        assert_eq!(docked.role, BallRole::Target);
        assert_eq!(docked.link_count(), 4);
        assert!(!docked.is_collapsing());
    }

    #[test]
    fn test_chain_counts_only_newly_collapsed_balls() {
        let mut field = empty_field(5);
        let dock_point = Vec2::new(0.0, -0.4);
        let touched = field.spawn_target(BallColor::Green, Vec2::ZERO);
        let shrinking = field.spawn_target(BallColor::Green, Vec2::new(0.3, -0.4));
        assert!(field.collapse(shrinking));
        let projectile = field.spawn_projectile(BallColor::Green, dock_point);
        field.sync_body(projectile, dock_point, Vec2::new(0.0, 1.0));
        field.drain_events();

        let event = contact(&field, touched, projectile);
        let outcome = field.on_contact(&event);
        let ContactOutcome::Docked { chained, .. } = outcome else {
            panic!("expected dock, got {:?}", outcome);
        };
        assert_eq!(chained, vec![touched, projectile]);
        assert!(field.drain_events().contains(&FieldEvent::Docked {
            id: projectile,
            chained: 2
        }));
    }

    #[test]
    fn test_soft_dock_mismatched_color_promotes_without_sweep() {
        let mut field = empty_field(5);
        let target = field.spawn_target(BallColor::Red, Vec2::ZERO);
        let projectile = field.spawn_projectile(BallColor::Blue, Vec2::new(0.0, -0.4));
        field.sync_body(projectile, Vec2::new(0.0, -0.4), Vec2::new(0.5, 0.5));

        let event = contact(&field, projectile, target);
        let outcome = field.on_contact(&event);
        assert_eq!(
            outcome,
            ContactOutcome::Docked {
                projectile,
                target,
                chained: Vec::new()
            }
        );
        assert_eq!(field.ball(projectile).unwrap().role, BallRole::Target);
        assert!(!field.ball(target).unwrap().is_collapsing());
    }

    /// Builds the same scene twice so contact order can be compared
    fn symmetric_scene(speed: f32) -> (Field, BallId, BallId) {
        let mut field = empty_field(5);
        let target = field.spawn_target(BallColor::Green, Vec2::ZERO);
        field.spawn_target(BallColor::Green, Vec2::new(0.3, 0.0));
        field.spawn_target(BallColor::Blue, Vec2::new(-0.3, 0.0));
        let projectile = field.spawn_projectile(BallColor::Green, Vec2::new(0.0, -0.4));
        field.sync_body(projectile, Vec2::new(0.0, -0.4), Vec2::new(0.0, speed));
        (field, target, projectile)
    }

    #[test]
    fn test_contact_order_does_not_matter() {
        for speed in [0.5, 2.5, 3.0] {
            let (mut forward, t1, p1) = symmetric_scene(speed);
            let (mut reverse, t2, p2) = symmetric_scene(speed);
            let event = contact(&forward, p1, t1);
            let out_a = forward.on_contact(&event);
            let reversed = contact(&reverse, t2, p2);
            let out_b = reverse.on_contact(&reversed);

            assert_eq!(out_a, out_b);
            assert_eq!(forward.score(), reverse.score());
            for (a, b) in forward.pool().active().zip(reverse.pool().active()) {
                assert_eq!(a.id, b.id);
                assert_eq!(a.role, b.role);
                assert_eq!(a.collapse, b.collapse);
                assert_eq!(a.link_count(), b.link_count());
            }
        }
    }

    #[test]
    fn test_unknown_and_same_role_contacts_are_ignored() {
        let mut field = empty_field(5);
        let a = field.spawn_target(BallColor::Red, Vec2::ZERO);
        let b = field.spawn_target(BallColor::Red, Vec2::X);
        let event = contact(&field, a, b);
        assert_eq!(field.on_contact(&event), ContactOutcome::Ignored);

        let ghost = BodyState {
            id: BallId(999),
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
        };
        let mut event = event;
        event.b = ghost;
        assert_eq!(field.on_contact(&event), ContactOutcome::Ignored);
        assert_eq!(field.on_contact(&event.swapped()), ContactOutcome::Ignored);
    }

    #[test]
    fn test_collapse_is_guarded_and_releases_to_pool() {
        let mut field = empty_field(5);
        let id = field.spawn_target(BallColor::Blue, Vec2::ZERO);
        field.drain_commands();

        assert!(field.collapse(id));
        assert!(!field.collapse(id));
        field.on_trigger(TriggerZone::Despawner, id);

        let duration = field.config().collapse_duration;
        run_for(&mut field, duration);
        let ball = field.ball(id).unwrap();
        assert!(!ball.is_active());
        assert_eq!(ball.scale, 1.0);
        assert_eq!(ball.collapse, CollapseState::Idle);
        assert!(!field.collapse(id));

        let commands = field.drain_commands();
        let despawns = commands
            .iter()
            .filter(|c| **c == PhysicsCommand::Despawn { id })
            .count();
        assert_eq!(despawns, 1);

        // Reused from the pool, not reconstructed
        let again = field.spawn_target(BallColor::Blue, Vec2::ONE);
        assert_eq!(again, id);
        assert_eq!(field.pool().constructed_count(BallColor::Blue), 1);
        assert_eq!(field.ball(again).unwrap().springs.unwrap()[0].anchor, Vec2::new(1.0, 1.5));
    }

    #[test]
    fn test_score_zone_awards_a_point() {
        let mut field = empty_field(5);
        let id = field.spawn_target(BallColor::Green, Vec2::ZERO);
        field.on_trigger(TriggerZone::ScoreZone, id);
        field.on_trigger(TriggerZone::ScoreZone, BallId(404));
        assert_eq!(field.score(), 1);
        assert!(field.drain_events().contains(&FieldEvent::ScoreChanged(1)));
    }

    #[test]
    fn test_session_ends_the_tick_after_the_last_shot() {
        let mut field = Field::new(FieldConfig::default(), layout(1, 2, &["r", "g"]));
        assert!(field.can_shoot());

        field.shoot(Vec2::new(0.0, -4.0), Vec2::new(0.0, 150.0)).unwrap();
        assert_eq!(field.balls_remaining(), 0);
        assert!(!field.can_shoot());
        assert!(field.session().is_playing());

        field.tick(FIXED_DT);
        assert!(matches!(field.session().phase, SessionPhase::Ending { .. }));
        assert!(field.pool().active().all(|b| b.is_collapsing()));

        let delay = field.config().game_over_delay;
        run_for(&mut field, delay);
        assert_eq!(field.session().verdict(), Some(Verdict::Lost));
        assert_eq!(field.pool().active().count(), 0);
        let ended = field
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, FieldEvent::SessionEnded { .. }))
            .count();
        assert_eq!(ended, 1);

        // Further ticks change nothing
        field.tick(FIXED_DT);
        assert!(field.drain_events().is_empty());
    }

    #[test]
    fn test_restart_resets_score_and_reuses_balls() {
        struct Recorder(Rc<RefCell<Vec<u64>>>);
        impl ScoreSink for Recorder {
            fn set_score(&mut self, score: u64) {
                self.0.borrow_mut().push(score);
            }
        }

        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut field = Field::new(FieldConfig::default(), layout(2, 2, &["r", "g", "b", "r"]));
        field.set_score_sink(Box::new(Recorder(seen.clone())));
        let ids: Vec<_> = field.pool().active_ids();
        field.on_trigger(TriggerZone::ScoreZone, ids[0]);
        field.collapse(ids[1]);

        field.restart();
        assert_eq!(field.score(), 0);
        assert_eq!(field.balls_remaining(), 2);
        assert_eq!(field.pool().len(), 4);
        assert_eq!(field.pool().active().count(), 4);
        assert!(field.pool().active().all(|b| !b.is_collapsing() && b.scale == 1.0));
        assert_eq!(*seen.borrow(), vec![0, 1, 0]);
    }

    #[test]
    fn test_preview_does_not_touch_the_pool() {
        let mut field = empty_field(1);
        field.drain_commands();
        let path = field.preview(Vec2::new(50.0, 300.0), Vec2::new(0.0, -4.0));
        assert!(!path.is_empty());
        assert!(path.len() <= field.config().max_points);
        assert!(field.pool().is_empty());
        assert!(field.drain_commands().is_empty());
    }
}
