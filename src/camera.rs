//! Fixed look-at camera.
//!
//! # Coordinate System
//!
//! Uses a **right-handed** world:
//! - X: positive right
//! - Y: positive up
//! - Z: positive toward the viewer of the default scene
//!
//! The camera is configured once per run. `configure` validates the basis and
//! caches `view_projection = projection * look_at(eye, target, up)`, so a bad
//! configuration fails up front instead of leaking NaNs into the drawing.

use crate::error::{Result, SkylineError};
use crate::math::mat4::Mat4;
use crate::math::vec2::Point2;
use crate::math::vec3::Vec3;
use crate::math::vec4::Vec4;
use crate::projection::{Projection, ProjectionMode};

#[derive(Debug, Clone)]
pub struct Camera {
    eye: Vec3,
    target: Vec3,
    up: Vec3,
    projection: Projection,
    view_projection: Mat4,
}

impl Camera {
    /// Builds and caches the view-projection matrix.
    ///
    /// # Errors
    /// [`SkylineError::DegenerateCamera`] when `eye == target`, and
    /// [`SkylineError::DegenerateUp`] when `up` is parallel to the view
    /// direction.
    pub fn configure(eye: Vec3, target: Vec3, up: Vec3, projection: Projection) -> Result<Self> {
        let back = (eye - target)
            .try_normalize()
            .ok_or(SkylineError::DegenerateCamera { eye })?;
        if up.cross(back).try_normalize().is_none() {
            return Err(SkylineError::DegenerateUp { up });
        }

        let view = Mat4::look_at_rh(eye, target, up);
        let view_projection = projection.matrix() * view;
        log::debug!(
            "camera configured: eye {:?} target {:?} mode {}",
            eye,
            target,
            projection.mode()
        );

        Ok(Self {
            eye,
            target,
            up,
            projection,
            view_projection,
        })
    }

    /// Applies the cached view-projection matrix.
    #[inline]
    pub fn project(&self, point: Vec3) -> Vec4 {
        self.view_projection.transform_point(point)
    }

    /// Projects a world point all the way to screen space.
    ///
    /// `None` means the point has no screen position (behind the eye in
    /// perspective mode).
    pub fn screen_point(&self, point: Vec3) -> Option<Point2> {
        self.projection.to_screen(self.project(point))
    }

    /// Direction used for back-face culling of a face whose first and third
    /// vertices are `v0` and `v2`.
    ///
    /// Orthographic rays are parallel (`target - eye`); perspective rays run
    /// from the eye to the face.
    pub fn view_direction(&self, v0: Vec3, v2: Vec3) -> Vec3 {
        match self.projection.mode() {
            ProjectionMode::Orthographic => self.target - self.eye,
            ProjectionMode::Perspective => v0.midpoint(v2) - self.eye,
        }
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn mode(&self) -> ProjectionMode {
        self.projection.mode()
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn view_projection(&self) -> Mat4 {
        self.view_projection
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn front_camera(mode: ProjectionMode) -> Camera {
        Camera::configure(
            Vec3::new(0.0, 0.0, 10.0),
            Vec3::ZERO,
            Vec3::UP,
            Projection::new(mode, std::f32::consts::FRAC_PI_2, 1.0),
        )
        .unwrap()
    }

    #[test]
    fn eye_equal_target_is_rejected() {
        let eye = Vec3::new(1.0, 2.0, 3.0);
        let err = Camera::configure(
            eye,
            eye,
            Vec3::UP,
            Projection::new(ProjectionMode::Perspective, 0.5, 1.0),
        )
        .unwrap_err();
        assert!(matches!(err, SkylineError::DegenerateCamera { .. }));
    }

    #[test]
    fn up_parallel_to_view_is_rejected() {
        let err = Camera::configure(
            Vec3::new(0.0, 10.0, 0.0),
            Vec3::ZERO,
            Vec3::UP,
            Projection::new(ProjectionMode::Orthographic, 0.5, 1.0),
        )
        .unwrap_err();
        assert!(matches!(err, SkylineError::DegenerateUp { .. }));
    }

    #[test]
    fn target_projects_to_screen_centre() {
        for mode in [ProjectionMode::Orthographic, ProjectionMode::Perspective] {
            let p = front_camera(mode).screen_point(Vec3::ZERO).unwrap();
            assert_relative_eq!(p.x, 0.0, epsilon = 1e-4);
            assert_relative_eq!(p.y, 0.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn world_up_is_screen_up() {
        let camera = front_camera(ProjectionMode::Perspective);
        let p = camera.screen_point(Vec3::new(1.0, 1.0, 0.0)).unwrap();
        assert!(p.x > 0.0);
        assert!(p.y < 0.0);
        // f = 1 at 90 degrees, depth 10, scale 50
        assert_relative_eq!(p.x, 5.0, epsilon = 1e-3);
    }

    #[test]
    fn perspective_shrinks_with_distance() {
        let camera = front_camera(ProjectionMode::Perspective);
        let near = camera.screen_point(Vec3::new(1.0, 0.0, 0.0)).unwrap();
        let far = camera.screen_point(Vec3::new(1.0, 0.0, -10.0)).unwrap();
        assert!(far.x < near.x);
    }

    #[test]
    fn points_behind_eye_have_no_screen_position() {
        let camera = front_camera(ProjectionMode::Perspective);
        assert!(camera.screen_point(Vec3::new(0.0, 0.0, 20.0)).is_none());
        let ortho = front_camera(ProjectionMode::Orthographic);
        assert!(ortho.screen_point(Vec3::new(0.0, 0.0, 20.0)).is_some());
    }

    #[test]
    fn view_direction_depends_on_mode() {
        let v0 = Vec3::new(4.0, 0.0, 0.0);
        let v2 = Vec3::new(4.0, 2.0, 0.0);
        let ortho = front_camera(ProjectionMode::Orthographic).view_direction(v0, v2);
        assert_eq!(ortho, Vec3::new(0.0, 0.0, -10.0));
        let persp = front_camera(ProjectionMode::Perspective).view_direction(v0, v2);
        assert_eq!(persp, Vec3::new(4.0, 1.0, -10.0));
    }
}
