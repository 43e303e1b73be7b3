//! 2D vector, doubling as the screen-space point type.
//!
//! Screen points compare with a tolerance: two points are the same when their
//! squared distance is below [`POINT_EPSILON_SQ`].

use std::ops::{Add, Div, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// Squared distance under which two screen points are considered equal.
pub const POINT_EPSILON_SQ: f32 = 0.001;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

/// A point in screen space.
pub type Point2 = Vec2;

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };
    pub const ONE: Self = Self { x: 1.0, y: 1.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn dot(&self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Z component of the 3D cross product; the 2x2 determinant `|self other|`.
    pub fn perp_dot(&self, other: Self) -> f32 {
        self.x * other.y - self.y * other.x
    }

    pub fn length_squared(&self) -> f32 {
        self.dot(*self)
    }

    pub fn distance_squared(&self, other: Self) -> f32 {
        (*self - other).length_squared()
    }

    pub fn midpoint(&self, other: Self) -> Self {
        Self::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }

    /// Tolerance equality used everywhere screen points are compared.
    pub fn approx_eq(&self, other: Self) -> bool {
        self.distance_squared(other) < POINT_EPSILON_SQ
    }
}

impl Add<Vec2> for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub<Vec2> for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f32> for Vec2 {
    type Output = Vec2;

    fn div(self, rhs: f32) -> Self::Output {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;

    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_equals_itself() {
        for p in [Vec2::ZERO, Vec2::new(-99.5, 42.25), Vec2::new(1e4, -1e4)] {
            assert!(p.approx_eq(p));
        }
    }

    #[test]
    fn points_at_tolerance_are_distinct() {
        let p = Vec2::new(10.0, 10.0);
        // squared distance 0.0016 >= 0.001
        assert!(!p.approx_eq(Vec2::new(10.04, 10.0)));
        // squared distance 0.0004 < 0.001
        assert!(p.approx_eq(Vec2::new(10.02, 10.0)));
    }

    #[test]
    fn perp_dot_sign_follows_orientation() {
        assert!(Vec2::new(1.0, 0.0).perp_dot(Vec2::new(0.0, 1.0)) > 0.0);
        assert!(Vec2::new(0.0, 1.0).perp_dot(Vec2::new(1.0, 0.0)) < 0.0);
    }
}
