//! Scene driver: owns every layer and advances them from one clock.
//!
//! The scene has two motion states. While [`MotionState::Active`] the clock
//! advances on every tick and each layer recomputes its per-frame buffers.
//! While [`MotionState::Frozen`] nothing is touched, so every layer keeps the
//! pose it had when the freeze began. The state follows the reduced-motion
//! flag passed to [`Scene::tick`]; there are no intermediate states.

use glam::{Quat, Vec3};

use crate::backend::SkyBackend;
use crate::constellation::{ConstellationField, LayoutParams, LineVertex, ZODIAC, layout};
use crate::galactic_band::{BandVertex, GalacticBand, GalacticBandParams};
use crate::motes::{MoteField, MoteParams};
use crate::shooting_star::{ShootingStarDirector, ShootingStarParams};
use crate::starfield::{SpriteInstance, StarField, StarfieldGenerator, StarfieldParams};

/// Angular rate of the depth drift, radians per second.
const DRIFT_RATE: f32 = 0.05;
/// Peak group yaw, radians.
const YAW_SWAY: f32 = 0.05;
const YAW_RATE: f32 = 0.01;

const CONSTELLATION_STAR_SIZE: f32 = 0.45;
const CONSTELLATION_STAR_COLOR: Vec3 = Vec3::new(1.0, 0.95, 0.85);
const CONSTELLATION_STAR_ALPHA: f32 = 0.95;
const CONSTELLATION_LINE_COLOR: [f32; 4] = [0.6, 0.7, 1.0, 0.35];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotionState {
    Active,
    Frozen,
}

/// Surface size in physical pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height, or `None` for a zero-area viewport.
    pub fn aspect(&self) -> Option<f32> {
        (self.width > 0 && self.height > 0).then(|| self.width as f32 / self.height as f32)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneConfig {
    pub star_count: u32,
    pub starfield: StarfieldParams,
    pub layout: LayoutParams,
    pub shooting_stars: ShootingStarParams,
    pub motes: MoteParams,
    /// Peak depth offset of the camera drift, world units.
    pub drift_amplitude: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            star_count: 5000,
            starfield: StarfieldParams::default(),
            layout: LayoutParams::default(),
            shooting_stars: ShootingStarParams::default(),
            motes: MoteParams::default(),
            drift_amplitude: 2.0,
        }
    }
}

impl SceneConfig {
    /// Apply a viewport aspect ratio to every visible-volume estimate.
    pub fn with_aspect(mut self, aspect: f32) -> Self {
        self.layout.volume = self.layout.volume.with_aspect(aspect);
        self.shooting_stars.volume = self.shooting_stars.volume.with_aspect(aspect);
        self.motes.volume = self.motes.volume.with_aspect(aspect);
        self
    }
}

/// Camera pose for one frame. The camera looks down -Z.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    /// Yaw of the star group, applied as the opposite camera yaw.
    pub yaw: f32,
    pub fov_y: f32,
    pub aspect: f32,
}

impl CameraPose {
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(-self.yaw)
    }
}

/// Data that only changes on init or reset.
#[derive(Clone, Copy, Debug)]
pub struct StaticView<'a> {
    pub star_instances: &'a [SpriteInstance],
    pub constellation_instances: &'a [SpriteInstance],
    pub constellation_alphas: &'a [f32],
    pub line_vertices: &'a [LineVertex],
    pub band_quad: &'a [BandVertex],
}

/// Per-frame data handed to a backend.
#[derive(Clone, Copy, Debug)]
pub struct FrameView<'a> {
    pub clock: f32,
    pub state: MotionState,
    pub camera: CameraPose,
    pub star_alphas: &'a [f32],
    pub mote_instances: &'a [SpriteInstance],
    pub mote_alphas: &'a [f32],
    pub shooting_instances: &'a [SpriteInstance],
    pub shooting_alphas: &'a [f32],
    pub band: GalacticBandParams,
}

pub struct Scene {
    seed: u64,
    config: SceneConfig,
    clock: f32,
    state: MotionState,
    camera: CameraPose,
    stars: StarField,
    constellations: ConstellationField,
    constellation_instances: Vec<SpriteInstance>,
    constellation_alphas: Vec<f32>,
    line_vertices: Vec<LineVertex>,
    shooting_stars: ShootingStarDirector,
    motes: MoteField,
    band: GalacticBand,
    band_quad: [BandVertex; 6],
}

impl Scene {
    /// Generate every layer for `seed` and pose them at clock zero.
    pub fn init(seed: u64, config: SceneConfig) -> Self {
        let stars = StarfieldGenerator::with_params(seed, config.star_count, config.starfield.clone())
            .generate();
        let stars = StarField::new(stars, config.starfield.twinkle);
        let constellations = layout(&ZODIAC, &config.layout, seed);
        let volume = config.layout.volume;

        let mut scene = Self {
            seed,
            clock: 0.0,
            state: MotionState::Active,
            camera: CameraPose {
                position: Vec3::ZERO,
                yaw: 0.0,
                fov_y: volume.fov_y,
                aspect: volume.aspect,
            },
            stars,
            constellation_instances: constellations
                .sprite_instances(CONSTELLATION_STAR_SIZE, CONSTELLATION_STAR_COLOR),
            constellation_alphas: vec![CONSTELLATION_STAR_ALPHA; constellations.stars.len()],
            line_vertices: constellations.line_vertices(CONSTELLATION_LINE_COLOR),
            constellations,
            shooting_stars: ShootingStarDirector::new(seed, &config.shooting_stars),
            motes: MoteField::new(seed, &config.motes),
            band: GalacticBand::new(),
            band_quad: GalacticBand::quad(&volume),
            config,
        };
        scene.update_layers();
        log::debug!(
            "Scene initialised: seed={seed}, stars={}, constellation stars={}, segments={}, motes={}",
            scene.stars.len(),
            scene.constellations.stars.len(),
            scene.constellations.segments.len(),
            scene.motes.len()
        );
        scene
    }

    /// Advance by `dt` seconds unless `reduced_motion` freezes the scene.
    ///
    /// Negative or non-finite `dt` counts as zero.
    pub fn tick(&mut self, dt: f32, reduced_motion: bool) -> MotionState {
        let next = if reduced_motion {
            MotionState::Frozen
        } else {
            MotionState::Active
        };
        if next != self.state {
            log::info!("Motion state {:?} -> {:?} at clock {:.2}s", self.state, next, self.clock);
            self.state = next;
        }
        if self.state == MotionState::Active {
            let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
            self.clock += dt;
            self.update_layers();
        }
        self.state
    }

    /// Rebuild the viewport-dependent layers for a new surface size.
    ///
    /// The clock and motion state carry over. A zero-area viewport is ignored.
    pub fn reset(&mut self, viewport: Viewport) {
        let Some(aspect) = viewport.aspect() else {
            log::debug!("Ignoring reset to zero-area viewport {viewport:?}");
            return;
        };
        self.config = self.config.clone().with_aspect(aspect);
        let volume = self.config.layout.volume;

        self.constellations = layout(&ZODIAC, &self.config.layout, self.seed);
        self.constellation_instances = self
            .constellations
            .sprite_instances(CONSTELLATION_STAR_SIZE, CONSTELLATION_STAR_COLOR);
        self.constellation_alphas = vec![CONSTELLATION_STAR_ALPHA; self.constellations.stars.len()];
        self.line_vertices = self.constellations.line_vertices(CONSTELLATION_LINE_COLOR);
        self.shooting_stars = ShootingStarDirector::new(self.seed, &self.config.shooting_stars);
        self.motes = MoteField::new(self.seed, &self.config.motes);
        self.band_quad = GalacticBand::quad(&volume);
        self.camera.fov_y = volume.fov_y;
        self.camera.aspect = aspect;
        self.update_layers();
        log::debug!("Scene reset for {}x{} (aspect {aspect:.3})", viewport.width, viewport.height);
    }

    fn update_layers(&mut self) {
        let clock = self.clock;
        self.stars.update(clock);
        self.shooting_stars.update(clock);
        self.motes.update(clock);
        self.band.update(clock);
        self.camera.position = Vec3::new(0.0, 0.0, self.config.drift_amplitude * (clock * DRIFT_RATE).sin());
        self.camera.yaw = YAW_SWAY * (clock * YAW_RATE).sin();
    }

    pub fn static_view(&self) -> StaticView<'_> {
        StaticView {
            star_instances: self.stars.instances(),
            constellation_instances: &self.constellation_instances,
            constellation_alphas: &self.constellation_alphas,
            line_vertices: &self.line_vertices,
            band_quad: &self.band_quad,
        }
    }

    pub fn frame(&self) -> FrameView<'_> {
        FrameView {
            clock: self.clock,
            state: self.state,
            camera: self.camera,
            star_alphas: self.stars.alphas(),
            mote_instances: self.motes.instances(),
            mote_alphas: self.motes.alphas(),
            shooting_instances: self.shooting_stars.sprites(),
            shooting_alphas: self.shooting_stars.alphas(),
            band: self.band.params(),
        }
    }

    /// Hand the current frame to `backend`.
    pub fn submit<B: SkyBackend>(&self, backend: &mut B) -> Result<(), B::Error> {
        backend.submit(&self.frame())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn clock(&self) -> f32 {
        self.clock
    }

    pub fn state(&self) -> MotionState {
        self.state
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn stars(&self) -> &StarField {
        &self.stars
    }

    pub fn constellations(&self) -> &ConstellationField {
        &self.constellations
    }

    pub fn shooting_stars(&self) -> &ShootingStarDirector {
        &self.shooting_stars
    }

    pub fn motes(&self) -> &MoteField {
        &self.motes
    }
}
