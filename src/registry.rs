//! Run-long ledgers: what has been inked and what hides later geometry.

use std::collections::HashMap;

use crate::clipping::{ClipPath, LineSegment};
use crate::math::vec2::Point2;

/// Side of a hash cell in screen units. Tolerance-equal segments have
/// midpoints far closer than this, so a 3x3 neighbourhood always finds them.
const CELL_SIZE: f32 = 1.0;

type Cell = (i32, i32);

fn cell_of(p: Point2) -> Cell {
    ((p.x / CELL_SIZE).floor() as i32, (p.y / CELL_SIZE).floor() as i32)
}

/// Segments already committed to the pen, compared undirected and with the
/// point tolerance. Only suppresses duplicate ink.
#[derive(Debug, Default)]
pub struct SegmentRegistry {
    cells: HashMap<Cell, Vec<LineSegment>>,
    len: usize,
}

impl SegmentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, segment: &LineSegment) -> bool {
        let (cx, cy) = cell_of(segment.midpoint());
        (-1..=1).any(|dx| {
            (-1..=1).any(|dy| {
                self.cells
                    .get(&(cx + dx, cy + dy))
                    .is_some_and(|bucket| bucket.iter().any(|s| s.approx_eq(segment)))
            })
        })
    }

    /// Records `segment`. Returns `false` if an equal segment was already
    /// present, in which case nothing changes.
    pub fn insert(&mut self, segment: LineSegment) -> bool {
        if self.contains(&segment) {
            return false;
        }
        self.cells
            .entry(cell_of(segment.midpoint()))
            .or_default()
            .push(segment);
        self.len += 1;
        true
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Clip paths of everything processed so far, in processing order.
#[derive(Debug, Default)]
pub struct OccluderList {
    occluders: Vec<ClipPath>,
}

impl OccluderList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, occluder: ClipPath) {
        self.occluders.push(occluder);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ClipPath> {
        self.occluders.iter()
    }

    pub fn len(&self) -> usize {
        self.occluders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occluders.is_empty()
    }
}

impl<'a> IntoIterator for &'a OccluderList {
    type Item = &'a ClipPath;
    type IntoIter = std::slice::Iter<'a, ClipPath>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
