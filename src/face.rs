//! Planar world-space faces and their trip to screen space.
//!
//! A [`Face`] becomes a [`ProjectedPolygon`] in three stages: back-face cull,
//! viewport cull, then silhouette-edge selection by [`FaceRole`].

use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::clipping::ProjectedPolygon;
use crate::error::{Result, SkylineError};
use crate::math::vec2::Point2;
use crate::math::vec3::Vec3;

/// Half extent of the visible screen square.
pub const VIEWPORT_HALF_EXTENT: f32 = 100.0;

/// What a face is; decides which of its edges may be inked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaceRole {
    /// `[bottom-A, top-A, top-B, bottom-B]`; only the vertical sides are drawn.
    Wall,
    /// `[base, base, apex]`; the base sits on a wall and is not drawn.
    RoofTriangle,
    /// Full outline.
    RoofQuad,
    /// Door or window cutout; full outline.
    Decoration,
}

impl FaceRole {
    /// Whether a face of this role may have `count` vertices.
    pub fn accepts(self, count: usize) -> bool {
        match self {
            FaceRole::Wall | FaceRole::RoofQuad => count == 4,
            FaceRole::RoofTriangle => count == 3,
            FaceRole::Decoration => (3..=4).contains(&count),
        }
    }

    /// Edges `(from, to)` eligible for the initial draw path of a face with
    /// `count` vertices.
    pub fn silhouette_edges(self, count: usize) -> Vec<(usize, usize)> {
        match self {
            FaceRole::Wall => vec![(0, 1), (2, 3)],
            FaceRole::RoofTriangle => vec![(1, 2), (2, 0)],
            FaceRole::RoofQuad | FaceRole::Decoration => {
                (0..count).map(|i| (i, (i + 1) % count)).collect()
            }
        }
    }
}

/// Outcome of projecting a face.
#[derive(Debug, Clone)]
pub enum Visibility {
    Visible(ProjectedPolygon),
    BackFacing,
    OffScreen,
}

impl Visibility {
    pub fn into_polygon(self) -> Option<ProjectedPolygon> {
        match self {
            Visibility::Visible(polygon) => Some(polygon),
            Visibility::BackFacing | Visibility::OffScreen => None,
        }
    }

    pub fn is_back_facing(&self) -> bool {
        matches!(self, Visibility::BackFacing)
    }

    pub fn is_off_screen(&self) -> bool {
        matches!(self, Visibility::OffScreen)
    }
}

/// A planar polygon in world space.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    role: FaceRole,
    vertices: Vec<Vec3>,
    /// Ridge of the sloped roof standing on this wall, if any.
    ridge: Option<Vec3>,
}

impl Face {
    pub fn new(role: FaceRole, vertices: Vec<Vec3>) -> Self {
        Self {
            role,
            vertices,
            ridge: None,
        }
    }

    /// Marks a wall as carrying a sloped roof whose ridge passes through
    /// `ridge`. Such a wall inks only its side edge nearer the ridge, or
    /// both when they are equally near.
    pub fn under_ridge(mut self, ridge: Vec3) -> Self {
        self.ridge = Some(ridge);
        self
    }

    pub fn ridge(&self) -> Option<Vec3> {
        self.ridge
    }

    /// Builds a face whose normal points toward `interior`.
    ///
    /// Flipping keeps the vertex layout the role relies on: triangles swap
    /// their two base vertices, everything else is reversed.
    pub fn facing_inward(role: FaceRole, vertices: Vec<Vec3>, interior: Vec3) -> Self {
        let mut face = Self::new(role, vertices);
        if let Ok(normal) = face.normal() {
            if normal.dot(interior - face.vertices[0]) < 0.0 {
                match role {
                    FaceRole::RoofTriangle => face.vertices.swap(0, 1),
                    _ => face.vertices.reverse(),
                }
            }
        }
        face
    }

    pub fn role(&self) -> FaceRole {
        self.role
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn is_wall(&self) -> bool {
        self.role == FaceRole::Wall
    }

    fn ensure_shape(&self) -> Result<()> {
        if !self.role.accepts(self.vertices.len()) {
            return Err(SkylineError::DegenerateFace {
                role: self.role,
                count: self.vertices.len(),
            });
        }
        Ok(())
    }

    /// Unnormalized `cross(v1 - v0, v2 - v0)`.
    pub fn normal(&self) -> Result<Vec3> {
        self.ensure_shape()?;
        let [v0, v1, v2] = [self.vertices[0], self.vertices[1], self.vertices[2]];
        Ok((v1 - v0).cross(v2 - v0))
    }

    /// True when the face turns away from the camera.
    ///
    /// Paired with the generator's winding: a face is kept when its normal
    /// points along the view direction.
    pub fn is_back_facing(&self, camera: &Camera) -> Result<bool> {
        let normal = self.normal()?;
        let view = camera.view_direction(self.vertices[0], self.vertices[2]);
        Ok(normal.dot(view) < 0.0)
    }

    /// Runs both culls and selects the silhouette edges.
    ///
    /// The viewport test is vertex-only: a polygon survives when at least one
    /// projected vertex lies strictly inside the viewport. A face with a
    /// vertex behind the eye is off screen.
    ///
    /// # Errors
    /// [`SkylineError::DegenerateFace`] when the vertex count does not fit
    /// the role: walls and roof quads have four, roof triangles three.
    pub fn project(&self, camera: &Camera) -> Result<Visibility> {
        if self.is_back_facing(camera)? {
            return Ok(Visibility::BackFacing);
        }

        let Some(outline) = self
            .vertices
            .iter()
            .map(|&v| camera.screen_point(v))
            .collect::<Option<Vec<Point2>>>()
        else {
            return Ok(Visibility::OffScreen);
        };

        if !outline.iter().any(|p| in_viewport(*p)) {
            return Ok(Visibility::OffScreen);
        }

        let mut polygon = ProjectedPolygon::new(outline);
        for (from, to) in self.silhouette_edges() {
            polygon.add_edge(from, to);
        }
        Ok(Visibility::Visible(polygon))
    }

    /// Edges that start out in the draw path.
    ///
    /// Walls under a ridge keep the vertical side whose foot is nearer the
    /// ridge in plan view; every other face follows its role.
    pub fn silhouette_edges(&self) -> Vec<(usize, usize)> {
        let edges = self.role.silhouette_edges(self.vertices.len());
        let Some(ridge) = self.ridge.filter(|_| self.is_wall() && self.vertices.len() == 4) else {
            return edges;
        };

        let plan_distance = |v: Vec3| (v.x - ridge.x).powi(2) + (v.z - ridge.z).powi(2);
        let start = plan_distance(self.vertices[0]);
        let end = plan_distance(self.vertices[3]);
        if (start - end).abs() <= RIDGE_TIE_TOLERANCE * start.max(end) {
            edges
        } else if start < end {
            vec![(0, 1)]
        } else {
            vec![(2, 3)]
        }
    }
}

/// Relative difference under which both wall sides count as equally near
/// the ridge.
const RIDGE_TIE_TOLERANCE: f32 = 1e-4;

/// Strict `|x| < 100 && |y| < 100`.
pub fn in_viewport(p: Point2) -> bool {
    p.x.abs() < VIEWPORT_HALF_EXTENT && p.y.abs() < VIEWPORT_HALF_EXTENT
}
