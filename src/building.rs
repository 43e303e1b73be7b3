//! Procedural buildings.
//!
//! A building is a stack of rectangular blocks. Each block is four walls with
//! door and window cutouts; the generator either stacks a narrower block on
//! top or closes the stack with a roof. Walls under a hipped roof remember
//! where its ridge is, so they can ink only the side nearer to it. Every
//! face is wound so that
//! `cross(v1 - v0, v2 - v0)` points into the building, which is what the
//! back-face cull in [`crate::face`] expects.

use rand::Rng;

use crate::config::BuildingParams;
use crate::face::{Face, FaceRole};
use crate::math::vec3::Vec3;

/// Approximate width of one door/window slot along a wall.
const SLOT_WIDTH: f32 = 3.0;

/// Distance of a hipped ridge from the eave it leans toward, as a fraction
/// of the footprint depth.
const RIDGE_OFFSET: f32 = 1.0 / 3.0;

/// Inset of each ridge end from the hip walls, as a fraction of the width.
const HIP_INSET: f32 = 0.25;

/// How a stack is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoofShape {
    /// One horizontal lid.
    Flat,
    /// Two trapezoid slopes and two triangular hips. The ridge runs along
    /// `x`, shifted toward the front eave, or toward the back one when
    /// `flipped`.
    Hipped { flipped: bool },
}

/// Axis-aligned rectangle on the ground plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub x0: f32,
    pub x1: f32,
    pub z0: f32,
    pub z1: f32,
}

impl Footprint {
    pub fn centred(centre_x: f32, centre_z: f32, width: f32, depth: f32) -> Self {
        Self {
            x0: centre_x - width * 0.5,
            x1: centre_x + width * 0.5,
            z0: centre_z - depth * 0.5,
            z1: centre_z + depth * 0.5,
        }
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn depth(&self) -> f32 {
        self.z1 - self.z0
    }

    pub fn centre_x(&self) -> f32 {
        (self.x0 + self.x1) * 0.5
    }

    pub fn centre_z(&self) -> f32 {
        (self.z0 + self.z1) * 0.5
    }

    /// Same centre, both sides scaled by `factor`.
    pub fn shrunk(&self, factor: f32) -> Self {
        Self::centred(
            self.centre_x(),
            self.centre_z(),
            self.width() * factor,
            self.depth() * factor,
        )
    }

    /// Ground corners at height `y`, counter-clockwise seen from above
    /// starting front-left: `(x0, z1), (x1, z1), (x1, z0), (x0, z0)`.
    fn corners(&self, y: f32) -> [Vec3; 4] {
        [
            Vec3::new(self.x0, y, self.z1),
            Vec3::new(self.x1, y, self.z1),
            Vec3::new(self.x1, y, self.z0),
            Vec3::new(self.x0, y, self.z0),
        ]
    }
}

/// Faces of one block, grouped the way the scene consumes them.
#[derive(Debug, Clone, Default)]
pub struct Block {
    pub walls: Vec<Face>,
    pub decorations: Vec<Face>,
}

/// A generated building.
///
/// Blocks are ordered bottom to top. `roof` holds the closing roof of the top
/// block followed by the ledge lids of the blocks below, top to bottom.
#[derive(Debug, Clone, Default)]
pub struct Building {
    pub blocks: Vec<Block>,
    pub roof: Vec<Face>,
}

impl Building {
    /// Generates a building standing on `footprint` at ground level.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, footprint: Footprint, params: &BuildingParams) -> Self {
        let mut building = Building::default();
        building.grow(rng, footprint, 0.0, params.max_floors, params);
        building
    }

    fn grow<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        footprint: Footprint,
        base: f32,
        floors_left: u32,
        params: &BuildingParams,
    ) {
        let floors = rng
            .gen_range(params.min_block_floors..=params.max_block_floors)
            .min(floors_left)
            .max(1);
        let top = base + floors as f32 * params.floor_height;
        self.blocks
            .push(block(rng, &footprint, base, floors, params));

        let remaining = floors_left.saturating_sub(floors);
        let stack = remaining >= params.min_block_floors && rng.gen_bool(params.towerness as f64);
        if stack {
            self.grow(rng, footprint.shrunk(params.setback), top, remaining, params);
            self.roof.push(flat_roof(&footprint, top, params));
        } else {
            let shape = if rng.gen_bool(params.flat_roof_probability as f64) {
                RoofShape::Flat
            } else {
                RoofShape::Hipped {
                    flipped: rng.gen_bool(0.5),
                }
            };
            if let (RoofShape::Hipped { flipped }, Some(block)) = (shape, self.blocks.last_mut()) {
                let ridge = ridge_centre(&footprint, flipped, top, params);
                block.walls = std::mem::take(&mut block.walls)
                    .into_iter()
                    .map(|wall| wall.under_ridge(ridge))
                    .collect();
            }
            self.roof.extend(roof(shape, &footprint, top, params));
        }
    }

    /// Every face in processing order: per block walls then decorations,
    /// then the roof faces.
    pub fn faces(&self) -> impl Iterator<Item = &Face> {
        self.blocks
            .iter()
            .flat_map(|b| b.walls.iter().chain(b.decorations.iter()))
            .chain(self.roof.iter())
    }

    pub fn face_count(&self) -> usize {
        self.faces().count()
    }

    pub fn height(&self) -> f32 {
        self.faces()
            .flat_map(|f| f.vertices().iter().map(|v| v.y))
            .fold(0.0, f32::max)
    }
}

fn block<R: Rng + ?Sized>(
    rng: &mut R,
    footprint: &Footprint,
    base: f32,
    floors: u32,
    params: &BuildingParams,
) -> Block {
    let height = floors as f32 * params.floor_height;
    let top = base + height;
    let interior = Vec3::new(footprint.centre_x(), base + height * 0.5, footprint.centre_z());
    let bottom = footprint.corners(base);
    let upper = footprint.corners(top);

    let mut block = Block::default();
    for i in 0..4 {
        let j = (i + 1) % 4;
        block.walls.push(Face::facing_inward(
            FaceRole::Wall,
            vec![bottom[i], upper[i], upper[j], bottom[j]],
            interior,
        ));
        decorate(rng, &mut block.decorations, bottom[i], bottom[j], floors, interior, params);
    }
    block
}

/// Door and window cutouts on the wall running from `a` to `b` (ground
/// corners of the block).
fn decorate<R: Rng + ?Sized>(
    rng: &mut R,
    out: &mut Vec<Face>,
    a: Vec3,
    b: Vec3,
    floors: u32,
    interior: Vec3,
    params: &BuildingParams,
) {
    let run = b - a;
    let length = run.magnitude();
    let slots = ((length / SLOT_WIDTH).floor() as u32).max(1);
    let fh = params.floor_height;

    for floor in 0..floors {
        let floor_base = a.y + floor as f32 * fh;
        let below_top = floor + 1 < floors;
        for slot in 0..slots {
            let u0 = slot as f32 / slots as f32;
            let u1 = (slot + 1) as f32 / slots as f32;
            let du = u1 - u0;

            let (u, v) = if below_top && rng.gen_bool(params.door_probability as f64) {
                ((u0 + 0.3 * du, u1 - 0.3 * du), (floor_base, floor_base + 0.7 * fh))
            } else if rng.gen_bool(params.window_probability as f64) {
                (
                    (u0 + 0.25 * du, u1 - 0.25 * du),
                    (floor_base + 0.35 * fh, floor_base + 0.75 * fh),
                )
            } else {
                continue;
            };

            let at = |u: f32, y: f32| {
                let p = a + run * u;
                Vec3::new(p.x, y, p.z)
            };
            out.push(Face::facing_inward(
                FaceRole::Decoration,
                vec![at(u.0, v.0), at(u.0, v.1), at(u.1, v.1), at(u.1, v.0)],
                interior,
            ));
        }
    }
}

fn flat_roof(footprint: &Footprint, top: f32, params: &BuildingParams) -> Face {
    let interior = Vec3::new(footprint.centre_x(), top - params.floor_height * 0.5, footprint.centre_z());
    Face::facing_inward(FaceRole::RoofQuad, footprint.corners(top).to_vec(), interior)
}

/// Middle of the ridge of a hipped roof over `footprint`.
pub fn ridge_centre(footprint: &Footprint, flipped: bool, top: f32, params: &BuildingParams) -> Vec3 {
    let z = if flipped {
        footprint.z0 + footprint.depth() * RIDGE_OFFSET
    } else {
        footprint.z1 - footprint.depth() * RIDGE_OFFSET
    };
    Vec3::new(footprint.centre_x(), top + params.roof_height, z)
}

/// Roof faces closing a block whose walls end at `top`.
pub fn roof(shape: RoofShape, footprint: &Footprint, top: f32, params: &BuildingParams) -> Vec<Face> {
    let flipped = match shape {
        RoofShape::Flat => return vec![flat_roof(footprint, top, params)],
        RoofShape::Hipped { flipped } => flipped,
    };

    let Footprint { x0, x1, z0, z1 } = *footprint;
    let ridge = ridge_centre(footprint, flipped, top, params);
    let inset = footprint.width() * HIP_INSET;
    let (rx0, rx1, rz) = (x0 + inset, x1 - inset, ridge.z);
    // Below the ridge, so inside the convex roof body.
    let interior = Vec3::new(ridge.x, top + params.roof_height * 0.25, rz);
    let eave = |x: f32, z: f32| Vec3::new(x, top, z);
    let peak = |x: f32| Vec3::new(x, ridge.y, rz);

    let slopes = [
        [eave(x0, z1), eave(x1, z1), peak(rx1), peak(rx0)],
        [eave(x0, z0), eave(x1, z0), peak(rx1), peak(rx0)],
    ];
    let hips = [
        [eave(x0, z0), eave(x0, z1), peak(rx0)],
        [eave(x1, z0), eave(x1, z1), peak(rx1)],
    ];

    slopes
        .into_iter()
        .map(|v| Face::facing_inward(FaceRole::RoofQuad, v.to_vec(), interior))
        .chain(
            hips.into_iter()
                .map(|v| Face::facing_inward(FaceRole::RoofTriangle, v.to_vec(), interior)),
        )
        .collect()
}
