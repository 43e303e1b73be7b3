//! Step-driven hidden-line renderer for procedural skylines.
//!
//! Each call to [`Scene::walk`] generates one row of buildings, projects
//! their faces, clips every face against what was drawn before it and hands
//! the surviving line segments to a [`Pen`].
//!
//! # Quick Start
//!
//! ```ignore
//! use skyline::prelude::*;
//!
//! let scene = Scene::new(SceneConfig::default(), Canvas::default())?;
//! let mut runner = Runner::new(scene);
//! runner.run();
//! runner.into_walker().into_pen().save_png("skyline.png")?;
//! ```

// Public API - exposed to library consumers
pub mod building;
pub mod camera;
pub mod clipping;
pub mod config;
pub mod error;
pub mod face;
pub mod hatching;
pub mod math;
pub mod pen;
pub mod projection;
pub mod registry;
pub mod render;
pub mod runner;
pub mod scene;
#[cfg(feature = "preview")]
pub mod window;

// Re-export commonly needed types at crate root for convenience
pub use config::SceneConfig;
pub use error::{Result, SkylineError};
pub use pen::Pen;
pub use runner::{Runner, Walk};
pub use scene::Scene;

/// Prelude module for convenient imports.
///
/// # Example
/// ```ignore
/// use skyline::prelude::*;
/// ```
pub mod prelude {
    // Configuration
    pub use crate::config::{BuildingParams, CameraConfig, HatchConfig, SceneConfig};

    // Scene
    pub use crate::building::{Building, Footprint, RoofShape};
    pub use crate::face::{Face, FaceRole};
    pub use crate::scene::{FaceOutcome, Scene, SceneStats};

    // Camera & Projection
    pub use crate::camera::Camera;
    pub use crate::projection::{Projection, ProjectionMode};

    // Clipping
    pub use crate::clipping::{ClipPath, LineSegment, ProjectedPolygon};
    pub use crate::hatching::Hatching;

    // Math
    pub use crate::math::mat4::Mat4;
    pub use crate::math::vec2::{Point2, Vec2};
    pub use crate::math::vec3::Vec3;
    pub use crate::math::vec4::Vec4;

    // Output
    pub use crate::pen::{Pen, StrokeLog};
    pub use crate::render::Canvas;
    pub use crate::runner::{RunState, Runner, Walk};

    pub use crate::error::{Result, SkylineError};
}
