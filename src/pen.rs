//! The pen the renderer draws with.

use serde::{Deserialize, Serialize};

use crate::clipping::LineSegment;
use crate::error::Result;
use crate::math::vec2::Point2;

/// Anything that can move to a point, inking along the way or not.
pub trait Pen {
    /// Current pen position in screen space.
    fn position(&self) -> Point2;

    /// Moves to `point`, drawing a line from the current position when
    /// `draw` is set.
    fn move_to(&mut self, point: Point2, draw: bool);
}

/// Draws `segment`, lifting the pen only when it is not already at `p1`.
pub fn commit_segment<P: Pen + ?Sized>(pen: &mut P, segment: &LineSegment) {
    if !pen.position().approx_eq(segment.p1) {
        pen.move_to(segment.p1, false);
    }
    pen.move_to(segment.p2, true);
}

impl<P: Pen + ?Sized> Pen for &mut P {
    fn position(&self) -> Point2 {
        (**self).position()
    }

    fn move_to(&mut self, point: Point2, draw: bool) {
        (**self).move_to(point, draw)
    }
}

/// Feeds two pens at once. Position is reported by the first.
impl<A: Pen, B: Pen> Pen for (A, B) {
    fn position(&self) -> Point2 {
        self.0.position()
    }

    fn move_to(&mut self, point: Point2, draw: bool) {
        self.0.move_to(point, draw);
        self.1.move_to(point, draw);
    }
}

/// Vector record of everything drawn, for plotters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrokeLog {
    strokes: Vec<LineSegment>,
    /// Pen-up moves that changed position.
    travels: usize,
    #[serde(skip)]
    position: Point2,
}

impl StrokeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strokes(&self) -> &[LineSegment] {
        &self.strokes
    }

    pub fn travels(&self) -> usize {
        self.travels
    }

    /// Total inked length in screen units.
    pub fn ink_length(&self) -> f32 {
        self.strokes
            .iter()
            .map(|s| s.p1.distance_squared(s.p2).sqrt())
            .sum()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save_json<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

impl Pen for StrokeLog {
    fn position(&self) -> Point2 {
        self.position
    }

    fn move_to(&mut self, point: Point2, draw: bool) {
        if draw {
            self.strokes.push(LineSegment::new(self.position, point));
        } else if !self.position.approx_eq(point) {
            self.travels += 1;
        }
        self.position = point;
    }
}
