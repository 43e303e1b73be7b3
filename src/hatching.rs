//! Parallel-line shading confined to a polygon's footprint.

use crate::clipping::{LineSegment, ProjectedPolygon};
use crate::math::vec2::Point2;

/// Half extent of the rotated hatch square. Comfortably covers the
/// `[-100, 100]` viewport at any angle.
const HATCH_HALF_EXTENT: f32 = 200.0;

/// Hatch pattern: lines at `angle` radians, `spacing` screen units apart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hatching {
    angle: f32,
    spacing: f32,
}

impl Hatching {
    /// `spacing` must be positive; [`crate::config::SceneConfig::validate`]
    /// enforces this for configured runs.
    pub fn new(angle: f32, spacing: f32) -> Self {
        Self { angle, spacing }
    }

    pub fn from_degrees(angle_degrees: f32, spacing: f32) -> Self {
        Self::new(angle_degrees.to_radians(), spacing)
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    /// A large square rotated to the hatch angle, its draw path tiled with
    /// lines parallel to one of its sides.
    pub fn pattern(&self) -> ProjectedPolygon {
        let along = Point2::new(self.angle.cos(), self.angle.sin());
        let across = Point2::new(-along.y, along.x);
        let h = HATCH_HALF_EXTENT;

        let corners = vec![
            (-along - across) * h,
            (along - across) * h,
            (along + across) * h,
            (-along + across) * h,
        ];
        let mut pattern = ProjectedPolygon::new(corners);

        let count = (HATCH_HALF_EXTENT / self.spacing).ceil() as usize;
        for i in 0..count {
            let offset = (i as f32 + 0.5) * self.spacing;
            for side in [offset, -offset] {
                let centre = across * side;
                pattern.push_segment(LineSegment::new(centre - along * h, centre + along * h));
            }
        }
        pattern
    }

    /// Appends the hatch lines that fall inside `polygon`'s clip path to its
    /// draw path.
    pub fn apply(&self, polygon: &mut ProjectedPolygon) {
        let mut pattern = self.pattern();
        if pattern.boolean(polygon.clip_path(), false) {
            let (_, lines) = pattern.into_parts();
            polygon.extend_draw_path(lines);
        }
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

    #[test]
    fn pattern_lines_are_parallel_and_spaced() {
        let hatching = Hatching::from_degrees(30.0, 2.0);
        let pattern = hatching.pattern();
        let lines = pattern.draw_path();
        assert_eq!(lines.len(), 200);

        let direction = lines[0].p2 - lines[0].p1;
        for line in lines {
            let d = line.p2 - line.p1;
            assert_relative_eq!(d.perp_dot(direction), 0.0, epsilon = 1e-1);
        }
    }

    #[test]
    fn horizontal_hatching_fills_square() {
        let mut polygon = ProjectedPolygon::new(square(-10.0, 10.0));
        Hatching::new(0.0, 1.0).apply(&mut polygon);

        // 20 lines at y = ±0.5, ±1.5, ... ±9.5, each clipped to width 20
        assert_eq!(polygon.draw_path().len(), 20);
        for line in polygon.draw_path() {
            assert_relative_eq!(line.p1.y, line.p2.y, epsilon = 1e-3);
            let length = line.p1.distance_squared(line.p2).sqrt();
            assert_relative_eq!(length, 20.0, epsilon = 1e-2);
        }
    }

    #[test]
    fn hatching_stays_inside_polygon() {
        let mut polygon = ProjectedPolygon::outlined(vec![
            Point2::new(0.0, 0.0),
            Point2::new(30.0, 5.0),
            Point2::new(10.0, 25.0),
        ]);
        let outline = polygon.draw_path().len();
        Hatching::from_degrees(45.0, 1.5).apply(&mut polygon);

        assert!(polygon.draw_path().len() > outline);
        for line in &polygon.draw_path()[outline..] {
            assert!(polygon.clip_path().contains(line.midpoint()));
        }
    }

    #[test]
    fn polygon_off_the_pattern_gets_nothing() {
        let mut polygon = ProjectedPolygon::new(square(500.0, 510.0));
        Hatching::new(0.0, 1.0).apply(&mut polygon);
        assert!(polygon.is_empty());
    }
}
