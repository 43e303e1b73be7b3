//! The step-driven scene: generation, culling, clipping and commit.
//!
//! # Pipeline
//!
//! Every face of every generated building goes through:
//!
//! 1. Back-face cull and viewport cull ([`Face::project`])
//! 2. Silhouette-edge selection, plus hatching when enabled
//! 3. Occlusion: `boolean(occluder, diff = true)` against each entry of the
//!    [`OccluderList`], in order, stopping once nothing is left
//! 4. Commit of the remaining segments, skipping ones already inked
//!
//! Walls join the occluder list once their block's decorations are done,
//! whether or not anything of them was drawn. Other faces join only when
//! they drew something.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::building::{Building, Footprint};
use crate::camera::Camera;
use crate::clipping::{ClipPath, LineSegment};
use crate::config::SceneConfig;
use crate::error::{Result, SkylineError};
use crate::face::{Face, Visibility};
use crate::hatching::Hatching;
use crate::pen::{commit_segment, Pen};
use crate::projection::ProjectionMode;
use crate::registry::{OccluderList, SegmentRegistry};

/// What happened to one face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceOutcome {
    BackFacing,
    OffScreen,
    /// Survived culling but earlier occluders hid all of it.
    Occluded,
    /// Something reached the pen. `duplicates` counts segments skipped
    /// because they had been inked before.
    Drawn { segments: usize, duplicates: usize },
}

/// Running totals over the whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SceneStats {
    pub steps: usize,
    pub buildings: usize,
    pub faces: usize,
    pub back_facing: usize,
    pub off_screen: usize,
    pub occluded: usize,
    pub drawn: usize,
    pub degenerate: usize,
    pub segments: usize,
    pub duplicates: usize,
}

impl SceneStats {
    fn record(&mut self, outcome: FaceOutcome) {
        self.faces += 1;
        match outcome {
            FaceOutcome::BackFacing => self.back_facing += 1,
            FaceOutcome::OffScreen => self.off_screen += 1,
            FaceOutcome::Occluded => self.occluded += 1,
            FaceOutcome::Drawn { segments, duplicates } => {
                self.drawn += 1;
                self.segments += segments;
                self.duplicates += duplicates;
            }
        }
    }
}

/// Mutable state shared by every step of one run.
pub struct SceneContext {
    /// Set at step 0.
    pub camera: Option<Camera>,
    pub occluders: OccluderList,
    pub registry: SegmentRegistry,
    pub rng: StdRng,
}

impl SceneContext {
    pub fn new(seed: u64) -> Self {
        Self {
            camera: None,
            occluders: OccluderList::new(),
            registry: SegmentRegistry::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Projects, hatches, occludes and commits one face.
    ///
    /// Returns the outcome and, for faces that passed culling, their clip
    /// path so the caller can decide whether it becomes an occluder.
    fn draw<P: Pen>(
        &mut self,
        face: &Face,
        hatching: Option<&Hatching>,
        pen: &mut P,
    ) -> Result<(FaceOutcome, Option<ClipPath>)> {
        let camera = self
            .camera
            .as_ref()
            .ok_or_else(|| SkylineError::InvalidConfig("camera used before it was configured".into()))?;

        let mut polygon = match face.project(camera)? {
            Visibility::Visible(polygon) => polygon,
            Visibility::BackFacing => return Ok((FaceOutcome::BackFacing, None)),
            Visibility::OffScreen => return Ok((FaceOutcome::OffScreen, None)),
        };

        if let Some(hatching) = hatching {
            if face.normal()?.z < 0.0 {
                hatching.apply(&mut polygon);
            }
        }

        let mut visible = !polygon.is_empty();
        for occluder in &self.occluders {
            if !visible {
                break;
            }
            visible = polygon.boolean(occluder, true);
        }

        let (clip_path, draw_path) = polygon.into_parts();
        if !visible {
            return Ok((FaceOutcome::Occluded, Some(clip_path)));
        }

        let (segments, duplicates) = commit(&mut self.registry, pen, &draw_path);
        Ok((FaceOutcome::Drawn { segments, duplicates }, Some(clip_path)))
    }
}

/// Inks every segment the registry has not seen yet.
fn commit<P: Pen>(registry: &mut SegmentRegistry, pen: &mut P, draw_path: &[LineSegment]) -> (usize, usize) {
    let mut segments = 0;
    let mut duplicates = 0;
    for segment in draw_path {
        if registry.insert(*segment) {
            commit_segment(pen, segment);
            segments += 1;
        } else {
            duplicates += 1;
        }
    }
    (segments, duplicates)
}

/// A skyline being drawn onto `P`, one row per step.
pub struct Scene<P: Pen> {
    config: SceneConfig,
    hatching: Option<Hatching>,
    context: SceneContext,
    pen: P,
    stats: SceneStats,
    finished: bool,
}

impl<P: Pen> Scene<P> {
    /// Validates `config` and seeds the run.
    pub fn new(config: SceneConfig, pen: P) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            hatching: config.hatching.hatching(),
            context: SceneContext::new(config.seed),
            config,
            pen,
            stats: SceneStats::default(),
            finished: false,
        })
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn context(&self) -> &SceneContext {
        &self.context
    }

    pub fn camera(&self) -> Option<&Camera> {
        self.context.camera.as_ref()
    }

    pub fn stats(&self) -> SceneStats {
        self.stats
    }

    pub fn pen(&self) -> &P {
        &self.pen
    }

    pub fn pen_mut(&mut self) -> &mut P {
        &mut self.pen
    }

    pub fn into_pen(self) -> P {
        self.pen
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Configures the camera unless that already happened.
    fn ensure_camera(&mut self) -> Result<()> {
        if self.context.camera.is_some() {
            return Ok(());
        }
        let settings = &self.config.camera;
        let mode = match settings.projection {
            Some(mode) => mode,
            None if self.context.rng.gen_bool(0.5) => ProjectionMode::Orthographic,
            None => ProjectionMode::Perspective,
        };
        let camera = Camera::configure(
            settings.eye,
            settings.target,
            settings.up,
            settings.projection(mode),
        )?;
        log::info!("projection: {mode}");
        self.context.camera = Some(camera);
        Ok(())
    }

    /// Generates and draws row `step`. Returns `false` once the sweep is
    /// over; after that no step does any work.
    ///
    /// # Errors
    /// Camera configuration errors at step 0. Degenerate faces are logged
    /// and skipped instead.
    pub fn walk(&mut self, step: usize) -> Result<bool> {
        if self.finished {
            return Ok(false);
        }
        if step == 0 {
            self.ensure_camera()?;
        }
        if step >= self.config.depth {
            self.finished = true;
            log::info!("sweep finished after {} rows", self.stats.steps);
            return Ok(false);
        }
        self.ensure_camera()?;

        let before = self.stats;
        for x in self.row_positions() {
            let footprint = self.lot_footprint(x, step);
            let building = Building::generate(&mut self.context.rng, footprint, &self.config.building);
            self.render_building(&building)?;
        }
        self.stats.steps += 1;

        log::debug!(
            "step {step}: {} faces, {} drawn, {} occluded, {} segments ({} duplicate), {} occluders",
            self.stats.faces - before.faces,
            self.stats.drawn - before.drawn,
            self.stats.occluded - before.occluded,
            self.stats.segments - before.segments,
            self.stats.duplicates - before.duplicates,
            self.context.occluders.len(),
        );
        Ok(true)
    }

    /// Lot centres of a row, nearest to the axis first, ties negative first.
    pub fn row_positions(&self) -> Vec<f32> {
        let w = self.config.row_width;
        let half = (w as f32 - 1.0) * 0.5;
        let mut xs: Vec<f32> = (0..w)
            .map(|j| (j as f32 - half) * self.config.lot_size)
            .collect();
        xs.sort_by(|a, b| a.abs().total_cmp(&b.abs()).then(a.total_cmp(b)));
        xs
    }

    fn lot_footprint(&mut self, x: f32, step: usize) -> Footprint {
        let params = &self.config.building;
        let rng = &mut self.context.rng;
        let width = rng.gen_range(params.min_footprint..=params.max_footprint);
        let depth = rng.gen_range(params.min_footprint..=params.max_footprint);
        let z = -(step as f32) * self.config.lot_size;
        Footprint::centred(x, z, width, depth)
    }

    /// Draws a building block by block, then its roof.
    pub fn render_building(&mut self, building: &Building) -> Result<()> {
        self.ensure_camera()?;
        self.stats.buildings += 1;

        for block in &building.blocks {
            let mut walls = Vec::with_capacity(block.walls.len());
            for wall in &block.walls {
                if let Some((_, Some(clip_path))) = self.process(wall)? {
                    walls.push(clip_path);
                }
            }
            for decoration in &block.decorations {
                self.process_and_keep(decoration)?;
            }
            for clip_path in walls {
                self.context.occluders.push(clip_path);
            }
        }

        for face in &building.roof {
            self.process_and_keep(face)?;
        }
        Ok(())
    }

    /// Draws a single face and updates the occluder list right away: walls
    /// whenever they passed culling, other faces when they drew something.
    pub fn render_face(&mut self, face: &Face) -> Result<Option<FaceOutcome>> {
        self.ensure_camera()?;
        if face.is_wall() {
            let Some((outcome, clip_path)) = self.process(face)? else {
                return Ok(None);
            };
            if let Some(clip_path) = clip_path {
                self.context.occluders.push(clip_path);
            }
            Ok(Some(outcome))
        } else {
            self.process_and_keep(face)
        }
    }

    fn process_and_keep(&mut self, face: &Face) -> Result<Option<FaceOutcome>> {
        let Some((outcome, clip_path)) = self.process(face)? else {
            return Ok(None);
        };
        if let (FaceOutcome::Drawn { .. }, Some(clip_path)) = (outcome, clip_path) {
            self.context.occluders.push(clip_path);
        }
        Ok(Some(outcome))
    }

    /// Runs one face through the pipeline. `None` means the face was
    /// degenerate and skipped.
    fn process(&mut self, face: &Face) -> Result<Option<(FaceOutcome, Option<ClipPath>)>> {
        match self.context.draw(face, self.hatching.as_ref(), &mut self.pen) {
            Ok((outcome, clip_path)) => {
                log::trace!("{:?} face: {:?}", face.role(), outcome);
                self.stats.record(outcome);
                Ok(Some((outcome, clip_path)))
            }
            Err(err @ SkylineError::DegenerateFace { .. }) => {
                log::warn!("skipping face: {err}");
                self.stats.degenerate += 1;
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}
