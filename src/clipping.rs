//! Screen-space polygon clipping for hidden-line removal.
//!
//! Every projected face carries two things:
//!
//! - a **clip path**: its closed outline, used only as a region when it
//!   hides (or confines) other geometry;
//! - a **draw path**: the loose set of segments still eligible for ink.
//!
//! [`ProjectedPolygon::boolean`] cuts a draw path against another clip path,
//! keeping the pieces outside it (`diff = true`, occlusion) or inside it
//! (`diff = false`, hatch containment). The draw path only ever shrinks.
//!
//! The approach is deliberately naive: every segment is tested against every
//! occluder edge, parallel edges never intersect, and inside/outside is a
//! parity count with the point tolerance from [`crate::math::vec2`].

use serde::{Deserialize, Serialize};

use crate::math::vec2::Point2;

/// Far end of the parity ray. Slightly off-vertical so the ray does not run
/// along the vertical building edges that dominate the scene.
pub const PARITY_RAY_TARGET: Point2 = Point2::new(0.1, 1000.0);

/// Intersection of segments `a1-a2` and `b1-b2`, endpoints included.
///
/// Parallel and collinear pairs have a zero determinant and report no
/// intersection.
pub fn segment_intersection(a1: Point2, a2: Point2, b1: Point2, b2: Point2) -> Option<Point2> {
    let da = a2 - a1;
    let db = b2 - b1;
    let d = db.y * da.x - db.x * da.y;
    if d == 0.0 {
        return None;
    }

    let offset = a1 - b1;
    let ua = (db.x * offset.y - db.y * offset.x) / d;
    let ub = (da.x * offset.y - da.y * offset.x) / d;
    if (0.0..=1.0).contains(&ua) && (0.0..=1.0).contains(&ub) {
        Some(a1 + da * ua)
    } else {
        None
    }
}

/// An undirected screen-space line segment.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub p1: Point2,
    pub p2: Point2,
}

impl LineSegment {
    pub const fn new(p1: Point2, p2: Point2) -> Self {
        Self { p1, p2 }
    }

    pub fn midpoint(&self) -> Point2 {
        self.p1.midpoint(self.p2)
    }

    pub fn reversed(&self) -> Self {
        Self::new(self.p2, self.p1)
    }

    /// Tolerance equality that ignores direction.
    pub fn approx_eq(&self, other: &Self) -> bool {
        (self.p1.approx_eq(other.p1) && self.p2.approx_eq(other.p2))
            || (self.p1.approx_eq(other.p2) && self.p2.approx_eq(other.p1))
    }

    pub fn intersection(&self, other: &Self) -> Option<Point2> {
        segment_intersection(self.p1, self.p2, other.p1, other.p2)
    }
}

/// Axis-aligned bounding box in screen space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: Point2,
    pub max: Point2,
}

impl Bounds {
    /// An inverted box that any point expands.
    pub const EMPTY: Self = Self {
        min: Point2::new(f32::INFINITY, f32::INFINITY),
        max: Point2::new(f32::NEG_INFINITY, f32::NEG_INFINITY),
    };

    pub fn from_points<I: IntoIterator<Item = Point2>>(points: I) -> Self {
        points.into_iter().fold(Self::EMPTY, |bounds, p| bounds.including(p))
    }

    pub fn including(self, p: Point2) -> Self {
        Self {
            min: Point2::new(self.min.x.min(p.x), self.min.y.min(p.y)),
            max: Point2::new(self.max.x.max(p.x), self.max.y.max(p.y)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Inclusive overlap test; touching boxes overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }
}

/// A closed screen-space outline used as a clipping region.
#[derive(Clone, Debug, PartialEq)]
pub struct ClipPath {
    points: Vec<Point2>,
    bounds: Bounds,
}

impl ClipPath {
    pub fn new(points: Vec<Point2>) -> Self {
        let bounds = Bounds::from_points(points.iter().copied());
        Self { points, bounds }
    }

    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Closed edge loop: `(p[i], p[(i + 1) % n])`.
    pub fn edges(&self) -> impl Iterator<Item = LineSegment> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| LineSegment::new(self.points[i], self.points[(i + 1) % n]))
    }

    /// Parity test: odd number of boundary crossings on the way to
    /// [`PARITY_RAY_TARGET`] means inside.
    pub fn contains(&self, point: Point2) -> bool {
        let crossings = self
            .edges()
            .filter(|edge| segment_intersection(point, PARITY_RAY_TARGET, edge.p1, edge.p2).is_some())
            .count();
        crossings % 2 == 1
    }
}

/// A face after projection: its outline plus whatever is still drawable.
#[derive(Clone, Debug)]
pub struct ProjectedPolygon {
    clip_path: ClipPath,
    draw_path: Vec<LineSegment>,
}

impl ProjectedPolygon {
    /// A polygon with an empty draw path.
    pub fn new(outline: Vec<Point2>) -> Self {
        Self {
            clip_path: ClipPath::new(outline),
            draw_path: Vec::new(),
        }
    }

    /// A polygon whose draw path is its full outline.
    pub fn outlined(outline: Vec<Point2>) -> Self {
        let mut polygon = Self::new(outline);
        polygon.add_outline();
        polygon
    }

    pub fn clip_path(&self) -> &ClipPath {
        &self.clip_path
    }

    pub fn draw_path(&self) -> &[LineSegment] {
        &self.draw_path
    }

    pub fn is_empty(&self) -> bool {
        self.draw_path.is_empty()
    }

    /// Adds edge `from -> to` of the clip path to the draw path.
    ///
    /// # Panics
    /// Panics if either index is outside the clip path.
    pub fn add_edge(&mut self, from: usize, to: usize) {
        let points = self.clip_path.points();
        self.draw_path.push(LineSegment::new(points[from], points[to]));
    }

    /// Adds every clip path edge to the draw path.
    pub fn add_outline(&mut self) {
        let edges: Vec<LineSegment> = self.clip_path.edges().collect();
        self.draw_path.extend(edges);
    }

    pub(crate) fn push_segment(&mut self, segment: LineSegment) {
        self.draw_path.push(segment);
    }

    pub(crate) fn extend_draw_path<I: IntoIterator<Item = LineSegment>>(&mut self, segments: I) {
        self.draw_path.extend(segments);
    }

    /// Splits the polygon into its occluder outline and drawable segments.
    pub fn into_parts(self) -> (ClipPath, Vec<LineSegment>) {
        (self.clip_path, self.draw_path)
    }

    fn draw_bounds(&self) -> Bounds {
        Bounds::from_points(self.draw_path.iter().flat_map(|s| [s.p1, s.p2]))
    }

    /// Clips the draw path against `other`.
    ///
    /// With `diff = true` the parts outside `other` survive (occlusion); with
    /// `diff = false` the parts inside it survive (containment). Returns
    /// whether anything is left to draw.
    pub fn boolean(&mut self, other: &ClipPath, diff: bool) -> bool {
        if self.draw_path.is_empty() {
            return false;
        }

        // Broad phase: disjoint boxes mean every segment is outside.
        if !self.draw_bounds().overlaps(&other.bounds()) {
            if !diff {
                self.draw_path.clear();
            }
            return !self.draw_path.is_empty();
        }

        let mut kept = Vec::with_capacity(self.draw_path.len());
        for segment in &self.draw_path {
            let mut cuts: Vec<Point2> = other
                .edges()
                .filter_map(|edge| segment.intersection(&edge))
                .collect();

            if cuts.is_empty() {
                if other.contains(segment.p1) != diff {
                    kept.push(*segment);
                }
                continue;
            }

            cuts.push(segment.p1);
            cuts.push(segment.p2);
            let direction = segment.p2 - segment.p1;
            let along = |p: &Point2| (*p - segment.p1).dot(direction);
            cuts.sort_by(|a, b| along(a).total_cmp(&along(b)));
            cuts.dedup_by(|b, a| a.approx_eq(*b));

            for pair in cuts.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                if other.contains(a.midpoint(b)) != diff {
                    kept.push(LineSegment::new(a, b));
                }
            }
        }

        self.draw_path = kept;
        !self.draw_path.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(min: f32, max: f32) -> Vec<Point2> {
        vec![
            Point2::new(min, min),
            Point2::new(max, min),
            Point2::new(max, max),
            Point2::new(min, max),
        ]
    }

    fn total_length(segments: &[LineSegment]) -> f32 {
        segments
            .iter()
            .map(|s| s.p1.distance_squared(s.p2).sqrt())
            .sum()
    }

    #[test]
    fn crossing_segments_meet_at_origin() {
        let p = segment_intersection(
            Point2::new(-1.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, -1.0),
            Point2::new(0.0, 1.0),
        )
        .unwrap();
        assert_relative_eq!(p.x, 0.0);
        assert_relative_eq!(p.y, 0.0);
    }

    #[test]
    fn parallel_segments_do_not_intersect() {
        let p = segment_intersection(
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(1.0, 1.0),
        );
        assert!(p.is_none());
    }

    #[test]
    fn collinear_segments_do_not_intersect() {
        let p = segment_intersection(
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(3.0, 0.0),
        );
        assert!(p.is_none());
    }

    #[test]
    fn touching_endpoints_intersect() {
        let p = segment_intersection(
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(2.0, 0.0),
        )
        .unwrap();
        assert!(p.approx_eq(Point2::new(1.0, 1.0)));
    }

    #[test]
    fn disjoint_segments_do_not_intersect() {
        let p = segment_intersection(
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, -1.0),
            Point2::new(2.0, 1.0),
        );
        assert!(p.is_none());
    }

    #[test]
    fn parity_test_on_unit_square() {
        let unit = ClipPath::new(square(0.0, 1.0));
        assert!(unit.contains(Point2::new(0.5, 0.5)));
        assert!(!unit.contains(Point2::new(2.0, 2.0)));
        assert!(!unit.contains(Point2::new(0.5, -3.0)));
    }

    #[test]
    fn parity_test_on_concave_outline() {
        // U shape opening upward on screen (y down)
        let u = ClipPath::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 2.0),
            Point2::new(2.0, 2.0),
            Point2::new(2.0, 0.0),
            Point2::new(3.0, 0.0),
            Point2::new(3.0, 3.0),
            Point2::new(0.0, 3.0),
        ]);
        assert!(u.contains(Point2::new(0.5, 1.0)));
        assert!(!u.contains(Point2::new(1.5, 1.0)));
        assert!(u.contains(Point2::new(1.5, 2.5)));
    }

    #[test]
    fn undirected_segment_equality() {
        let a = LineSegment::new(Point2::new(0.0, 0.0), Point2::new(3.0, 4.0));
        assert!(a.approx_eq(&a.reversed()));
        assert!(!a.approx_eq(&LineSegment::new(Point2::new(0.0, 0.0), Point2::new(3.0, 5.0))));
    }

    #[test]
    fn bounds_overlap_is_inclusive() {
        let a = Bounds::from_points(square(0.0, 1.0));
        let b = Bounds::from_points(square(1.0, 2.0));
        let c = Bounds::from_points(square(1.5, 2.0));
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert!(Bounds::EMPTY.is_empty());
    }

    #[test]
    fn diff_removes_covered_middle() {
        let mut line = ProjectedPolygon::new(square(-10.0, 10.0));
        line.push_segment(LineSegment::new(Point2::new(-5.0, 0.5), Point2::new(5.0, 0.5)));
        let occluder = ClipPath::new(square(-1.0, 1.0));

        assert!(line.boolean(&occluder, true));
        let kept = line.draw_path();
        assert_eq!(kept.len(), 2);
        assert_relative_eq!(total_length(kept), 8.0, epsilon = 1e-4);
        for segment in kept {
            assert!(!occluder.contains(segment.midpoint()));
        }
    }

    #[test]
    fn intersect_keeps_only_covered_middle() {
        let mut line = ProjectedPolygon::new(square(-10.0, 10.0));
        line.push_segment(LineSegment::new(Point2::new(-5.0, 0.5), Point2::new(5.0, 0.5)));
        let region = ClipPath::new(square(-1.0, 1.0));

        assert!(line.boolean(&region, false));
        assert_eq!(line.draw_path().len(), 1);
        assert_relative_eq!(total_length(line.draw_path()), 2.0, epsilon = 1e-4);
    }

    #[test]
    fn diff_against_disjoint_occluder_is_identity() {
        let mut polygon = ProjectedPolygon::outlined(square(0.0, 1.0));
        let before = polygon.draw_path().to_vec();
        let far = ClipPath::new(square(5.0, 6.0));

        assert!(polygon.boolean(&far, true));
        assert_eq!(polygon.draw_path(), before.as_slice());
        // clipping again changes nothing either
        assert!(polygon.boolean(&far, true));
        assert_eq!(polygon.draw_path(), before.as_slice());
    }

    #[test]
    fn diff_against_nearby_occluder_without_crossings_is_identity() {
        // Draw path box surrounds the occluder, no segment touches it.
        let mut polygon = ProjectedPolygon::new(square(0.0, 10.0));
        polygon.push_segment(LineSegment::new(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0)));
        polygon.push_segment(LineSegment::new(Point2::new(0.0, 10.0), Point2::new(0.0, 9.0)));
        let before = polygon.draw_path().to_vec();
        let occluder = ClipPath::new(square(4.0, 6.0));

        assert!(polygon.boolean(&occluder, true));
        assert_eq!(polygon.draw_path(), before.as_slice());
    }

    #[test]
    fn intersect_against_disjoint_region_empties() {
        let mut polygon = ProjectedPolygon::outlined(square(0.0, 1.0));
        assert!(!polygon.boolean(&ClipPath::new(square(5.0, 6.0)), false));
        assert!(polygon.is_empty());
    }

    #[test]
    fn fully_covered_polygon_vanishes() {
        let a = ClipPath::new(square(-2.0, 2.0));
        let mut b = ProjectedPolygon::outlined(square(-1.0, 1.0));
        assert!(!b.boolean(&a, true));
        assert!(b.is_empty());
        // and stays empty
        assert!(!b.boolean(&a, true));
    }

    #[test]
    fn identical_polygon_keeps_only_boundary_pieces() {
        // Edges lying on the occluder boundary are classified by the parity ray.
        let a = ClipPath::new(square(-1.0, 1.0));
        let mut b = ProjectedPolygon::outlined(square(-1.0, 1.0));
        b.boolean(&a, true);
        // No stretch of b may survive strictly inside a.
        for segment in b.draw_path() {
            let m = segment.midpoint();
            assert!(m.x.abs() >= 1.0 - 1e-4 || m.y.abs() >= 1.0 - 1e-4);
        }
    }

    #[test]
    fn partial_overlap_keeps_outside_part() {
        let occluder = ClipPath::new(square(0.0, 2.0));
        let mut polygon = ProjectedPolygon::outlined(square(1.0, 3.0));
        assert!(polygon.boolean(&occluder, true));
        for segment in polygon.draw_path() {
            assert!(!occluder.contains(segment.midpoint()));
        }
        // 8 units of outline, 2 of them inside the occluder
        assert_relative_eq!(total_length(polygon.draw_path()), 6.0, epsilon = 1e-3);
    }
}
