//! Projection parameters and the clip-to-screen mapping.
//!
//! The [`Projection`] struct is the single source of truth for the projection
//! matrix (FOV, aspect ratio, near/far planes) and for how homogeneous clip
//! coordinates are turned into turtle-canvas coordinates.

use serde::{Deserialize, Serialize};

use crate::math::mat4::Mat4;
use crate::math::vec2::Point2;
use crate::math::vec4::Vec4;

/// Default screen scale applied to undivided clip coordinates.
pub const DEFAULT_ORTHOGRAPHIC_SCALE: f32 = 0.6;
/// Default screen scale applied to perspective-divided coordinates.
pub const DEFAULT_PERSPECTIVE_SCALE: f32 = 50.0;

/// How clip coordinates become screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionMode {
    /// Skip the perspective divide: `(x * K, -y * K)`.
    Orthographic,
    /// Divide by w: `(x / w * K, -y / w * K)`.
    Perspective,
}

impl std::fmt::Display for ProjectionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectionMode::Orthographic => write!(f, "orthographic"),
            ProjectionMode::Perspective => write!(f, "perspective"),
        }
    }
}

/// Projection parameters.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    mode: ProjectionMode,
    /// Vertical field of view in radians.
    fov_y: f32,
    /// Aspect ratio (width / height).
    aspect_ratio: f32,
    /// Near clipping plane distance.
    z_near: f32,
    /// Far clipping plane distance.
    z_far: f32,
    orthographic_scale: f32,
    perspective_scale: f32,
}

impl Projection {
    /// Creates a projection with the default screen scales.
    ///
    /// # Arguments
    /// * `mode` - Orthographic or perspective screen mapping
    /// * `fov_y` - Vertical field of view in radians
    /// * `aspect_ratio` - Width divided by height
    pub fn new(mode: ProjectionMode, fov_y: f32, aspect_ratio: f32) -> Self {
        Self {
            mode,
            fov_y,
            aspect_ratio,
            z_near: 0.1,
            z_far: 1000.0,
            orthographic_scale: DEFAULT_ORTHOGRAPHIC_SCALE,
            perspective_scale: DEFAULT_PERSPECTIVE_SCALE,
        }
    }

    /// Creates a projection from degrees instead of radians.
    pub fn from_degrees(mode: ProjectionMode, fov_y_degrees: f32, aspect_ratio: f32) -> Self {
        Self::new(mode, fov_y_degrees.to_radians(), aspect_ratio)
    }

    /// Overrides the screen scale constants.
    pub fn with_scales(mut self, orthographic: f32, perspective: f32) -> Self {
        self.orthographic_scale = orthographic;
        self.perspective_scale = perspective;
        self
    }

    pub fn mode(&self) -> ProjectionMode {
        self.mode
    }

    /// Returns the vertical field of view in radians.
    pub fn fov_y(&self) -> f32 {
        self.fov_y
    }

    /// Returns the aspect ratio (width / height).
    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn z_near(&self) -> f32 {
        self.z_near
    }

    pub fn z_far(&self) -> f32 {
        self.z_far
    }

    /// Generates the right-handed perspective matrix.
    ///
    /// Both modes share it; orthographic mode just never divides by `w`.
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect_ratio, self.z_near, self.z_far)
    }

    /// Maps a clip-space position to screen space (y down).
    ///
    /// Returns `None` in perspective mode when the point is not in front of
    /// the eye (`w <= 0`).
    pub fn to_screen(&self, clip: Vec4) -> Option<Point2> {
        match self.mode {
            ProjectionMode::Orthographic => Some(Point2::new(
                clip.x * self.orthographic_scale,
                -clip.y * self.orthographic_scale,
            )),
            ProjectionMode::Perspective => {
                if !clip.is_in_front() {
                    return None;
                }
                Some(Point2::new(
                    clip.x / clip.w * self.perspective_scale,
                    -clip.y / clip.w * self.perspective_scale,
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_4;

    #[test]
    fn from_degrees_converts_correctly() {
        let proj = Projection::from_degrees(ProjectionMode::Perspective, 45.0, 1.0);
        assert_relative_eq!(proj.fov_y(), FRAC_PI_4, epsilon = 1e-6);
    }

    #[test]
    fn orthographic_skips_divide_and_flips_y() {
        let proj = Projection::new(ProjectionMode::Orthographic, 0.5, 1.0).with_scales(2.5, 50.0);
        let p = proj.to_screen(Vec4::new(2.0, 4.0, 0.0, 8.0)).unwrap();
        assert_relative_eq!(p.x, 5.0);
        assert_relative_eq!(p.y, -10.0);
    }

    #[test]
    fn perspective_divides_and_flips_y() {
        let proj = Projection::new(ProjectionMode::Perspective, 0.5, 1.0);
        let p = proj.to_screen(Vec4::new(1.0, 2.0, 0.0, 4.0)).unwrap();
        assert_relative_eq!(p.x, 12.5);
        assert_relative_eq!(p.y, -25.0);
    }

    #[test]
    fn perspective_rejects_points_behind_eye() {
        let proj = Projection::new(ProjectionMode::Perspective, 0.5, 1.0);
        assert!(proj.to_screen(Vec4::new(1.0, 1.0, 0.0, -1.0)).is_none());
        assert!(proj.to_screen(Vec4::new(1.0, 1.0, 0.0, 0.0)).is_none());
    }

    #[test]
    fn mode_names_agree_between_cli_config_and_display() {
        use clap::ValueEnum;
        for mode in [ProjectionMode::Orthographic, ProjectionMode::Perspective] {
            let name = mode.to_string();
            assert_eq!(ProjectionMode::from_str(&name, false), Ok(mode));
            assert_eq!(serde_json::to_string(&mode).unwrap(), format!("\"{name}\""));
        }
    }
}
