//! Session bookkeeping: shot budget, phase, score
//!
//! The session ends the tick after the last shot is taken. The field then
//! collapses every live ball, waits a short delay, and reports the verdict.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::level::LevelLayout;

/// End-of-session outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Won,
    Lost,
}

impl Verdict {
    /// Won when the score beats half the level's starting target count
    pub fn judge(score: u64, target_count: usize) -> Self {
        if score > (target_count / 2) as u64 {
            Verdict::Won
        } else {
            Verdict::Lost
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Won => "YOU WON!!!",
            Verdict::Lost => "YOU FAILED!!!",
        }
    }
}

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Shots may be taken
    Playing,
    /// Field is collapsing; verdict pending
    Ending { elapsed: f32 },
    /// Verdict reported
    Over(Verdict),
}

/// Shot budget and phase for the current level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSession {
    pub layout: LevelLayout,
    balls_remaining: u32,
    pub phase: SessionPhase,
}

impl FieldSession {
    pub fn new(layout: LevelLayout) -> Self {
        let balls_remaining = layout.player_balls;
        Self {
            layout,
            balls_remaining,
            phase: SessionPhase::Playing,
        }
    }

    pub fn balls_remaining(&self) -> u32 {
        self.balls_remaining
    }

    /// Spend one shot. False when none are left.
    pub fn take_ball(&mut self) -> bool {
        if self.balls_remaining == 0 {
            return false;
        }
        self.balls_remaining -= 1;
        true
    }

    /// Refill the shot budget and go back to playing
    pub fn reset(&mut self) {
        self.balls_remaining = self.layout.player_balls;
        self.phase = SessionPhase::Playing;
    }

    pub fn is_playing(&self) -> bool {
        self.phase == SessionPhase::Playing
    }

    pub fn verdict(&self) -> Option<Verdict> {
        match self.phase {
            SessionPhase::Over(verdict) => Some(verdict),
            _ => None,
        }
    }
}

/// Receives every score change (typically a UI label)
pub trait ScoreSink {
    fn set_score(&mut self, score: u64);
}

/// In-memory score for the current session
#[derive(Default)]
pub struct ScoreCounter {
    score: u64,
    sink: Option<Box<dyn ScoreSink>>,
}

impl fmt::Debug for ScoreCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScoreCounter")
            .field("score", &self.score)
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

impl ScoreCounter {
    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn set_sink(&mut self, mut sink: Box<dyn ScoreSink>) {
        sink.set_score(self.score);
        self.sink = Some(sink);
    }

    pub fn add(&mut self, points: u64) -> u64 {
        self.score = self.score.saturating_add(points);
        self.notify();
        self.score
    }

    pub fn reset(&mut self) {
        self.score = 0;
        self.notify();
    }

    fn notify(&mut self) {
        if let Some(sink) = self.sink.as_mut() {
            sink.set_score(self.score);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder(Rc<RefCell<Vec<u64>>>);

    impl ScoreSink for Recorder {
        fn set_score(&mut self, score: u64) {
            self.0.borrow_mut().push(score);
        }
    }

    #[test]
    fn test_take_ball_never_goes_negative() {
        let mut session = FieldSession::new(LevelLayout {
            player_balls: 2,
            ..Default::default()
        });
        assert!(session.take_ball());
        assert!(session.take_ball());
        assert!(!session.take_ball());
        assert_eq!(session.balls_remaining(), 0);

        session.reset();
        assert_eq!(session.balls_remaining(), 2);
        assert!(session.is_playing());
    }

    #[test]
    fn test_verdict_uses_half_target_count() {
        assert_eq!(Verdict::judge(3, 5), Verdict::Won);
        assert_eq!(Verdict::judge(2, 5), Verdict::Lost);
        assert_eq!(Verdict::judge(3, 6), Verdict::Lost);
        assert_eq!(Verdict::judge(4, 6), Verdict::Won);
        assert_eq!(Verdict::judge(0, 0), Verdict::Lost);
        assert_eq!(Verdict::judge(1, 0), Verdict::Won);
    }

    #[test]
    fn test_score_counter_notifies_sink() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut counter = ScoreCounter::default();
        counter.add(1);
        counter.set_sink(Box::new(Recorder(seen.clone())));
        counter.add(2);
        counter.reset();
        assert_eq!(*seen.borrow(), vec![1, 3, 0]);
        assert_eq!(counter.score(), 0);
    }
}
