//! Trajectory preview output
//!
//! Feeds predicted shot paths to up to two line sinks: a precise line of
//! constant width and an approximate one that fans out with shot strength.

use glam::Vec2;

use crate::sim::trajectory::{Trajectory, TrajectoryPredictor};

/// Smallest allowed line width
const MIN_LINE_WIDTH: f32 = 0.01;
/// End-width growth of the approximate line per unit of force
const SPREAD_PER_FORCE: f32 = 0.075;

/// Something that can draw a polyline (usually a line renderer)
pub trait PreviewSink {
    fn set_visible(&mut self, visible: bool);
    fn draw(&mut self, points: &[Vec2], start_width: f32, end_width: f32);
}

/// Preview lines for the shot being aimed
pub struct TrajectoryPreview {
    precise: Option<Box<dyn PreviewSink>>,
    approximate: Option<Box<dyn PreviewSink>>,
    line_width: f32,
}

impl std::fmt::Debug for TrajectoryPreview {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrajectoryPreview")
            .field("precise", &self.precise.is_some())
            .field("approximate", &self.approximate.is_some())
            .field("line_width", &self.line_width)
            .finish()
    }
}

impl Default for TrajectoryPreview {
    fn default() -> Self {
        Self::new(0.1)
    }
}

impl TrajectoryPreview {
    pub fn new(line_width: f32) -> Self {
        Self {
            precise: None,
            approximate: None,
            line_width: line_width.max(MIN_LINE_WIDTH),
        }
    }

    pub fn with_precise(mut self, sink: Box<dyn PreviewSink>) -> Self {
        self.precise = Some(sink);
        self
    }

    pub fn with_approximate(mut self, sink: Box<dyn PreviewSink>) -> Self {
        self.approximate = Some(sink);
        self
    }

    pub fn line_width(&self) -> f32 {
        self.line_width
    }

    pub fn set_line_width(&mut self, width: f32) {
        self.line_width = width.max(MIN_LINE_WIDTH);
    }

    fn has_sinks(&self) -> bool {
        self.precise.is_some() || self.approximate.is_some()
    }

    pub fn show(&mut self, visible: bool) {
        for sink in [self.precise.as_mut(), self.approximate.as_mut()]
            .into_iter()
            .flatten()
        {
            sink.set_visible(visible);
        }
    }

    /// Predict the shot and redraw both lines. None when there is nothing
    /// to draw into.
    pub fn recalc(
        &mut self,
        predictor: &TrajectoryPredictor,
        force: Vec2,
        origin: Vec2,
    ) -> Option<Trajectory> {
        if !self.has_sinks() {
            return None;
        }

        let path = predictor.predict(force, origin);
        let width = self.line_width;
        if let Some(sink) = self.precise.as_mut() {
            sink.draw(&path.points, width, width);
        }
        if let Some(sink) = self.approximate.as_mut() {
            sink.draw(&path.points, width, width * force.length() * SPREAD_PER_FORCE);
        }
        Some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Recorded {
        visible: Option<bool>,
        points: usize,
        widths: (f32, f32),
    }

    struct Recorder(Rc<RefCell<Recorded>>);

    impl PreviewSink for Recorder {
        fn set_visible(&mut self, visible: bool) {
            self.0.borrow_mut().visible = Some(visible);
        }

        fn draw(&mut self, points: &[Vec2], start_width: f32, end_width: f32) {
            let mut rec = self.0.borrow_mut();
            rec.points = points.len();
            rec.widths = (start_width, end_width);
        }
    }

    #[test]
    fn test_no_sinks_draws_nothing() {
        let mut preview = TrajectoryPreview::default();
        preview.show(true);
        let predictor = TrajectoryPredictor::default();
        assert!(preview.recalc(&predictor, Vec2::new(0.0, 100.0), Vec2::ZERO).is_none());
    }

    #[test]
    fn test_line_widths() {
        let precise = Rc::new(RefCell::new(Recorded::default()));
        let approx = Rc::new(RefCell::new(Recorded::default()));
        let mut preview = TrajectoryPreview::new(0.2)
            .with_precise(Box::new(Recorder(precise.clone())))
            .with_approximate(Box::new(Recorder(approx.clone())));

        let predictor = TrajectoryPredictor::default();
        let force = Vec2::new(30.0, 40.0);
        let path = preview.recalc(&predictor, force, Vec2::ZERO).unwrap();

        assert_eq!(precise.borrow().points, path.len());
        assert_eq!(precise.borrow().widths, (0.2, 0.2));
        let (start, end) = approx.borrow().widths;
        assert_eq!(start, 0.2);
        assert!((end - 0.2 * 50.0 * 0.075).abs() < 1e-5);
    }

    #[test]
    fn test_show_toggles_every_sink() {
        let approx = Rc::new(RefCell::new(Recorded::default()));
        let mut preview =
            TrajectoryPreview::default().with_approximate(Box::new(Recorder(approx.clone())));
        preview.show(true);
        assert_eq!(approx.borrow().visible, Some(true));
        preview.show(false);
        assert_eq!(approx.borrow().visible, Some(false));
    }

    #[test]
    fn test_line_width_floor() {
        let mut preview = TrajectoryPreview::new(0.0);
        assert_eq!(preview.line_width(), 0.01);
        preview.set_line_width(0.5);
        assert_eq!(preview.line_width(), 0.5);
        preview.set_line_width(-1.0);
        assert_eq!(preview.line_width(), 0.01);
    }
}
