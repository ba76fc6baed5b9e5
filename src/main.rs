//! Bubble Shooter headless entry point
//!
//! Plays one level against a minimal stand-in for the physics engine and
//! logs what happens. Usage: `bubble-shooter [level.json] [config.json]`

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::collections::{BTreeMap, BTreeSet};

    use bubble_shooter::aim::AimGesture;
    use bubble_shooter::consts::*;
    use bubble_shooter::preview::{PreviewSink, TrajectoryPreview};
    use bubble_shooter::sim::{
        BallId, BodyState, ContactEvent, Field, FieldEvent, LevelLayout, PhysicsCommand,
        TriggerZone,
    };
    use bubble_shooter::{FieldConfig, FieldResult};
    use glam::Vec2;

    const DEMO_LEVEL: &str = r#"{
        "playerBallsCount": 4,
        "gridResolution": { "x": 5, "y": 3 },
        "cellColors": ["r", "g", "b", "g", "r",
                       "g", "g", "b", "r", "r",
                       "b", "r", "g", "b", "g"]
    }"#;

    /// Ball radius at scale 1
    const BALL_RADIUS: f32 = 0.25;
    /// Give up on a shot after this long
    const SHOT_TIMEOUT: f32 = 8.0;

    /// Body as the stand-in engine sees it
    #[derive(Debug, Clone, Copy)]
    struct Body {
        pos: Vec2,
        vel: Vec2,
        scale: f32,
        /// Held in place by enabled springs
        anchored: bool,
    }

    /// Point-mass integrator with circle contacts. Anchored bodies do not move;
    /// a real engine would let them sway on their springs.
    #[derive(Default)]
    struct Host {
        bodies: BTreeMap<BallId, Body>,
        touching: BTreeSet<(BallId, BallId)>,
        fallen: BTreeSet<BallId>,
    }

    impl Host {
        fn apply(&mut self, commands: Vec<PhysicsCommand>) {
            for command in commands {
                match command {
                    PhysicsCommand::Spawn { id, pos } => {
                        self.bodies.insert(
                            id,
                            Body {
                                pos,
                                vel: Vec2::ZERO,
                                scale: 1.0,
                                anchored: false,
                            },
                        );
                    }
                    PhysicsCommand::Despawn { id } => {
                        self.bodies.remove(&id);
                        self.touching.retain(|&(a, b)| a != id && b != id);
                        self.fallen.remove(&id);
                    }
                    PhysicsCommand::ApplyImpulse { id, force } => {
                        if let Some(body) = self.bodies.get_mut(&id) {
                            body.vel += force * FIXED_DT;
                        }
                    }
                    PhysicsCommand::ConfigureSprings { id, springs } => {
                        if let Some(body) = self.bodies.get_mut(&id) {
                            body.anchored = springs.iter().all(|s| s.enabled);
                            if body.anchored {
                                body.vel = Vec2::ZERO;
                            }
                        }
                    }
                    PhysicsCommand::SetScale { id, scale } => {
                        if let Some(body) = self.bodies.get_mut(&id) {
                            body.scale = scale;
                        }
                    }
                }
            }
        }

        /// Advance one fixed step and report new contacts and trigger entries
        fn step(&mut self, field: &mut Field, dt: f32) {
            let half = field.bounds().half_extents;
            let mut fell = Vec::new();
            for (&id, body) in self.bodies.iter_mut().filter(|(_, b)| !b.anchored) {
                body.vel += FREE_FALL_ACCEL * dt;
                body.pos += body.vel * dt;
                if body.pos.x.abs() > half.x {
                    body.vel.x = -body.vel.x;
                    body.pos.x = body.pos.x.clamp(-half.x, half.x);
                }
                if body.pos.y > half.y {
                    body.vel.y = -body.vel.y;
                    body.pos.y = half.y;
                }
                if body.pos.y < -half.y && self.fallen.insert(id) {
                    fell.push(id);
                }
            }
            for id in fell {
                field.on_trigger(TriggerZone::ScoreZone, id);
                field.on_trigger(TriggerZone::Despawner, id);
            }

            let snapshot: Vec<(BallId, Body)> = self.bodies.iter().map(|(&id, &b)| (id, b)).collect();
            for (i, &(id_a, a)) in snapshot.iter().enumerate() {
                for &(id_b, b) in &snapshot[i + 1..] {
                    if a.anchored && b.anchored {
                        continue;
                    }
                    let reach = BALL_RADIUS * (a.scale + b.scale);
                    let pair = (id_a, id_b);
                    if a.pos.distance(b.pos) > reach {
                        self.touching.remove(&pair);
                        continue;
                    }
                    if !self.touching.insert(pair) {
                        continue;
                    }
                    let event = ContactEvent::new(
                        BodyState { id: id_a, pos: a.pos, vel: a.vel },
                        BodyState { id: id_b, pos: b.pos, vel: b.vel },
                    );
                    let outcome = field.on_contact(&event);
                    log::debug!("contact {:?} -> {:?}", pair, outcome);
                }
            }
        }

        fn moving(&self) -> usize {
            self.bodies.values().filter(|b| !b.anchored).count()
        }
    }

    /// Logs the preview instead of drawing it
    struct LogSink(&'static str);

    impl PreviewSink for LogSink {
        fn set_visible(&mut self, visible: bool) {
            log::debug!("{} preview visible: {}", self.0, visible);
        }

        fn draw(&mut self, points: &[Vec2], start_width: f32, end_width: f32) {
            log::debug!(
                "{} preview: {} points ending at {:?}, width {:.3} -> {:.3}",
                self.0,
                points.len(),
                points.last(),
                start_width,
                end_width
            );
        }
    }

    pub fn run() -> FieldResult<()> {
        let mut args = std::env::args().skip(1);
        let layout = match args.next() {
            Some(path) => LevelLayout::load(path)?,
            None => LevelLayout::from_json(DEMO_LEVEL)?,
        };
        let config = args.next().map_or_else(FieldConfig::default, FieldConfig::load);

        let mut aim = AimGesture::from_config(&config);
        let mut preview = TrajectoryPreview::new(config.line_width)
            .with_precise(Box::new(LogSink("precise")))
            .with_approximate(Box::new(LogSink("approximate")));
        let mut field = Field::new(config, layout);
        let mut host = Host::default();
        host.apply(field.drain_commands());

        let origin = Vec2::new(0.0, -field.bounds().half_extents.y * 0.8);
        let drags = [
            Vec2::new(0.0, -260.0),
            Vec2::new(40.0, -280.0),
            Vec2::new(-50.0, -250.0),
            Vec2::new(20.0, -300.0),
        ];

        let frame_dt = 1.0 / 60.0;
        let mut accumulator = 0.0;
        let mut shot = 0;
        let mut flight = 0.0;
        while field.session().verdict().is_none() {
            // Aim and fire once the previous shot has settled
            if field.can_shoot() && (host.moving() == 0 || flight > SHOT_TIMEOUT) {
                let drag = drags[shot % drags.len()];
                aim.begin(Vec2::ZERO);
                preview.show(true);
                aim.move_to(drag);
                preview.recalc(field.predictor(), aim.shooting_force(), origin);
                preview.show(false);
                let force = aim.end();
                if let Some(id) = field.shoot(origin, force) {
                    log::info!("Shot {} ({:?}) force {:?}", shot + 1, id, force);
                }
                shot += 1;
                flight = 0.0;
            }

            accumulator += frame_dt;
            let mut substeps = 0;
            while accumulator >= FIXED_DT && substeps < MAX_SUBSTEPS {
                host.apply(field.drain_commands());
                host.step(&mut field, FIXED_DT);
                field.tick(FIXED_DT);
                host.apply(field.drain_commands());
                accumulator -= FIXED_DT;
                flight += FIXED_DT;
                substeps += 1;
            }

            for event in field.drain_events() {
                match event {
                    FieldEvent::ScoreChanged(score) => log::info!("Score: {}", score),
                    FieldEvent::BallsRemaining(left) => log::info!("Balls left: {}", left),
                    FieldEvent::SessionEnded { verdict, score } => {
                        println!("{} THE SCORE IS: {}", verdict.as_str(), score);
                    }
                    other => log::debug!("{:?}", other),
                }
            }
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Bubble Shooter (headless) starting...");

    if let Err(err) = headless::run() {
        log::error!("{}", err);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The core is a library on the web; the host page drives it
}
