//! Run configuration.
//!
//! Everything here is fixed when a run starts. Missing JSON fields fall back
//! to the defaults, so a config file only needs the values it changes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SkylineError};
use crate::hatching::Hatching;
use crate::math::vec3::Vec3;
use crate::projection::{
    Projection, ProjectionMode, DEFAULT_ORTHOGRAPHIC_SCALE, DEFAULT_PERSPECTIVE_SCALE,
};

/// Top-level configuration for one skyline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Seed for every random choice of the run.
    pub seed: u64,

    /// Lots per row.
    pub row_width: usize,

    /// Number of rows; `walk(i)` returns `false` from `i == depth` on.
    pub depth: usize,

    /// Side of a square lot in world units.
    pub lot_size: f32,

    /// Hard cap on steps enforced by the runner.
    pub max_steps: usize,

    pub camera: CameraConfig,

    pub building: BuildingParams,

    pub hatching: HatchConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            row_width: 7,
            depth: 24,
            lot_size: 12.0,
            max_steps: 1_000_000,
            camera: CameraConfig::default(),
            building: BuildingParams::default(),
            hatching: HatchConfig::default(),
        }
    }
}

/// Camera placement and projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,

    /// `None` picks a mode with the run's random source at step 0.
    pub projection: Option<ProjectionMode>,

    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,

    pub orthographic_scale: f32,
    pub perspective_scale: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 14.0, 30.0),
            target: Vec3::new(0.0, 6.0, -60.0),
            up: Vec3::UP,
            projection: None,
            fov_y_degrees: 60.0,
            orthographic_scale: DEFAULT_ORTHOGRAPHIC_SCALE,
            perspective_scale: DEFAULT_PERSPECTIVE_SCALE,
        }
    }
}

impl CameraConfig {
    /// Projection for `mode` on the square canvas.
    pub fn projection(&self, mode: ProjectionMode) -> Projection {
        Projection::from_degrees(mode, self.fov_y_degrees, 1.0)
            .with_scales(self.orthographic_scale, self.perspective_scale)
    }
}

/// Shape of the generated buildings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildingParams {
    /// Probability of stacking another, narrower block on top.
    pub towerness: f32,

    pub flat_roof_probability: f32,

    /// Per window slot, floors below the top only.
    pub door_probability: f32,

    pub window_probability: f32,

    /// Upper bound on floors over all stacked blocks.
    pub max_floors: u32,

    /// Floors per block, inclusive range.
    pub min_block_floors: u32,
    pub max_block_floors: u32,

    pub floor_height: f32,

    /// Footprint side range in world units.
    pub min_footprint: f32,
    pub max_footprint: f32,

    /// Each stacked block keeps this fraction of the footprint below it.
    pub setback: f32,

    /// Ridge height above the eaves of a hipped roof.
    pub roof_height: f32,
}

impl Default for BuildingParams {
    fn default() -> Self {
        Self {
            towerness: 0.4,
            flat_roof_probability: 0.5,
            door_probability: 0.2,
            window_probability: 0.5,
            max_floors: 12,
            min_block_floors: 1,
            max_block_floors: 4,
            floor_height: 3.0,
            min_footprint: 5.0,
            max_footprint: 10.0,
            setback: 0.7,
            roof_height: 3.0,
        }
    }
}

/// Optional parallel-line shading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HatchConfig {
    pub enabled: bool,
    pub angle_degrees: f32,
    pub spacing: f32,
}

impl Default for HatchConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            angle_degrees: 45.0,
            spacing: 1.5,
        }
    }
}

impl HatchConfig {
    /// The hatch pattern, or `None` when shading is off.
    pub fn hatching(&self) -> Option<Hatching> {
        self.enabled
            .then(|| Hatching::from_degrees(self.angle_degrees, self.spacing))
    }
}

fn check(ok: bool, message: impl FnOnce() -> String) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(SkylineError::InvalidConfig(message()))
    }
}

fn check_probability(name: &str, value: f32) -> Result<()> {
    check((0.0..=1.0).contains(&value), || {
        format!("{name} must be within [0, 1], got {value}")
    })
}

impl SceneConfig {
    /// Parses and validates a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        log::info!("loading config from {}", path.as_ref().display());
        Self::from_json_str(&json)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Rejects values the generator or the camera cannot work with.
    ///
    /// # Errors
    /// [`SkylineError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        check(self.row_width > 0, || "row_width must be at least 1".into())?;
        check(self.max_steps > 0, || "max_steps must be at least 1".into())?;
        check(self.lot_size > 0.0, || {
            format!("lot_size must be positive, got {}", self.lot_size)
        })?;

        let camera = &self.camera;
        check(camera.eye != camera.target, || {
            "camera.eye and camera.target must differ".into()
        })?;
        check(camera.fov_y_degrees > 0.0 && camera.fov_y_degrees < 180.0, || {
            format!("camera.fov_y_degrees must be within (0, 180), got {}", camera.fov_y_degrees)
        })?;
        check(
            camera.orthographic_scale > 0.0 && camera.perspective_scale > 0.0,
            || "camera scales must be positive".into(),
        )?;

        let b = &self.building;
        check_probability("building.towerness", b.towerness)?;
        check_probability("building.flat_roof_probability", b.flat_roof_probability)?;
        check_probability("building.door_probability", b.door_probability)?;
        check_probability("building.window_probability", b.window_probability)?;
        check(b.min_block_floors >= 1 && b.min_block_floors <= b.max_block_floors, || {
            format!(
                "building floors per block must satisfy 1 <= min <= max, got {}..={}",
                b.min_block_floors, b.max_block_floors
            )
        })?;
        check(b.max_floors >= b.min_block_floors, || {
            "building.max_floors must fit at least one block".into()
        })?;
        check(b.floor_height > 0.0 && b.roof_height > 0.0, || {
            "building heights must be positive".into()
        })?;
        check(
            b.min_footprint > 0.0 && b.min_footprint <= b.max_footprint && b.max_footprint <= self.lot_size,
            || {
                format!(
                    "building footprint must satisfy 0 < min <= max <= lot_size, got {}..={}",
                    b.min_footprint, b.max_footprint
                )
            },
        )?;
        check(b.setback > 0.0 && b.setback <= 1.0, || {
            format!("building.setback must be within (0, 1], got {}", b.setback)
        })?;

        check(self.hatching.spacing > 0.0, || {
            format!("hatching.spacing must be positive, got {}", self.hatching.spacing)
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        SceneConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = SceneConfig::from_json_str(
            r#"{ "seed": 7, "camera": { "projection": "orthographic" }, "hatching": { "enabled": true } }"#,
        )
        .unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.camera.projection, Some(ProjectionMode::Orthographic));
        assert_eq!(config.camera.fov_y_degrees, 60.0);
        assert!(config.hatching.hatching().is_some());
        assert_eq!(config.building, BuildingParams::default());
    }

    #[test]
    fn out_of_range_probability_is_rejected() {
        let err = SceneConfig::from_json_str(r#"{ "building": { "towerness": 1.5 } }"#).unwrap_err();
        match err {
            SkylineError::InvalidConfig(message) => assert!(message.contains("towerness")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn zero_hatch_spacing_is_rejected() {
        let mut config = SceneConfig::default();
        config.hatching.spacing = 0.0;
        assert!(matches!(config.validate(), Err(SkylineError::InvalidConfig(_))));
    }

    #[test]
    fn footprint_larger_than_lot_is_rejected() {
        let mut config = SceneConfig::default();
        config.building.max_footprint = config.lot_size + 1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        assert!(matches!(
            SceneConfig::from_json_str("{ seed: "),
            Err(SkylineError::Json(_))
        ));
    }

    #[test]
    fn load_reads_a_file() {
        let path = std::env::temp_dir().join(format!("skyline-config-{}.json", std::process::id()));
        let mut config = SceneConfig::default();
        config.depth = 3;
        std::fs::write(&path, config.to_json().unwrap()).unwrap();
        let loaded = SceneConfig::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
