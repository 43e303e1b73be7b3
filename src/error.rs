//! Error types for skyline.

use thiserror::Error;

use crate::face::FaceRole;
use crate::math::vec3::Vec3;

/// The main error type for skyline operations.
#[derive(Error, Debug)]
pub enum SkylineError {
    /// Camera eye and look-at target are the same point.
    #[error("camera eye and target coincide at {eye:?}")]
    DegenerateCamera { eye: Vec3 },

    /// Camera up vector has no component perpendicular to the view direction.
    #[error("camera up vector {up:?} is parallel to the view direction")]
    DegenerateUp { up: Vec3 },

    /// A face has a vertex count its role does not allow.
    #[error("{role:?} face cannot have {count} vertices")]
    DegenerateFace { role: FaceRole, count: usize },

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A user supplied step function gave up.
    #[error("step {step} failed: {reason}")]
    StepFailed { step: usize, reason: String },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Image encoding error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Preview window error (SDL2 reports plain strings).
    #[error("window error: {0}")]
    Window(String),
}

/// A specialized Result type for skyline operations.
pub type Result<T> = std::result::Result<T, SkylineError>;
