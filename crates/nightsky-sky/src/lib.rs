//! Procedural night sky: twinkling star field, zodiac constellations placed
//! without overlap, looping shooting stars, floating motes, and a noise-shaped
//! galactic band.
//!
//! Everything here is backend-agnostic and deterministic for a given seed.
//! A [`Scene`] owns the layers and advances them from one clock; a
//! [`SkyBackend`] turns its [`StaticView`] and [`FrameView`] into draw calls.

pub mod backend;
pub mod constellation;
pub mod easing;
pub mod galactic_band;
pub mod motes;
pub mod noise2d;
pub mod scene;
pub mod seed;
pub mod shaders;
pub mod shooting_star;
pub mod starfield;

pub use backend::SkyBackend;
pub use constellation::{
    ConstellationBounds, ConstellationField, ConstellationTemplate, LayoutParams, LineVertex,
    PlacedConstellation, PlacementKind, VisibleVolume, ZODIAC, layout,
};
pub use galactic_band::{BandVertex, GalacticBand, GalacticBandParams};
pub use motes::{Mote, MoteField, MoteParams};
pub use noise2d::{GradientNoise, fbm, fbm_with, gradient_noise_2d};
pub use scene::{CameraPose, FrameView, MotionState, Scene, SceneConfig, StaticView, Viewport};
pub use seed::{derive_seed, stream_rng};
pub use shooting_star::{
    ShootingStar, ShootingStarDirector, ShootingStarParams, StreakPose, StreakVariant, derive_path,
    opacity_envelope,
};
pub use starfield::{
    BackgroundStar, ColorCategory, SpriteInstance, StarField, StarfieldGenerator, StarfieldParams,
    TwinkleRange,
};
