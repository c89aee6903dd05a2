//! Procedural background starfield: deterministic star placement in a cubic
//! volume with weighted colour tints and per-star twinkle oscillators.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use rand::Rng;

use crate::seed::{STREAM_STARS, stream_rng};

/// Colour family a star is tinted with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorCategory {
    /// White to blue-white with random brightness.
    Neutral,
    Amber,
    Rose,
    Ice,
    Violet,
    Gold,
}

impl ColorCategory {
    /// All categories with their draw weights. Weights sum to 1.
    pub const WEIGHTED: [(ColorCategory, f32); 6] = [
        (ColorCategory::Neutral, 0.75),
        (ColorCategory::Amber, 0.05),
        (ColorCategory::Rose, 0.05),
        (ColorCategory::Ice, 0.05),
        (ColorCategory::Violet, 0.05),
        (ColorCategory::Gold, 0.05),
    ];

    /// Pick a category from a uniform roll in `[0, 1)`.
    pub fn pick(roll: f32) -> Self {
        let mut cumulative = 0.0;
        for (category, weight) in Self::WEIGHTED {
            cumulative += weight;
            if roll < cumulative {
                return category;
            }
        }
        ColorCategory::Neutral
    }

    /// Base RGB for the planet-like tints. Neutral stars are shaded per star.
    fn tint(self) -> Vec3 {
        match self {
            ColorCategory::Neutral => Vec3::ONE,
            ColorCategory::Amber => Vec3::new(1.0, 0.75, 0.45),
            ColorCategory::Rose => Vec3::new(1.0, 0.6, 0.62),
            ColorCategory::Ice => Vec3::new(0.65, 0.85, 1.0),
            ColorCategory::Violet => Vec3::new(0.78, 0.62, 1.0),
            ColorCategory::Gold => Vec3::new(1.0, 0.88, 0.55),
        }
    }
}

/// A single background star.
#[derive(Clone, Debug, PartialEq)]
pub struct BackgroundStar {
    pub position: Vec3,
    /// Linear RGB in `[0, 1]`.
    pub color: Vec3,
    pub category: ColorCategory,
    pub size: f32,
    /// Oscillator phase in `[0, 2π)`.
    pub twinkle_phase: f32,
    /// Oscillator angular rate, radians per second.
    pub twinkle_frequency: f32,
}

/// Alpha band a twinkling star oscillates within.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TwinkleRange {
    pub min_alpha: f32,
    pub max_alpha: f32,
}

impl Default for TwinkleRange {
    fn default() -> Self {
        Self {
            min_alpha: 0.30,
            max_alpha: 1.00,
        }
    }
}

impl TwinkleRange {
    /// Alpha of an oscillator at `time`, always inside `[min_alpha, max_alpha]`.
    #[inline]
    pub fn alpha(&self, phase: f32, frequency: f32, time: f32) -> f32 {
        let midpoint = 0.5 * (self.min_alpha + self.max_alpha);
        let swing = 0.5 * (self.max_alpha - self.min_alpha);
        (midpoint + swing * (time * frequency + phase).sin()).clamp(self.min_alpha, self.max_alpha)
    }
}

/// Tunable ranges for star generation.
#[derive(Clone, Debug, PartialEq)]
pub struct StarfieldParams {
    /// Side length of the cube stars are scattered in, centred on the origin.
    pub volume_side: f32,
    pub size_range: (f32, f32),
    /// Twinkle angular rate range, radians per second.
    pub frequency_range: (f32, f32),
    pub twinkle: TwinkleRange,
}

impl Default for StarfieldParams {
    fn default() -> Self {
        Self {
            volume_side: 100.0,
            size_range: (0.08, 0.35),
            frequency_range: (0.3, 0.9),
            twinkle: TwinkleRange::default(),
        }
    }
}

/// GPU-ready per-instance record for camera-facing point sprites.
///
/// Alpha lives in a separate per-instance stream so per-frame updates only
/// touch one float per sprite.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct SpriteInstance {
    pub position: [f32; 3],
    pub size: f32,
    pub color: [f32; 3],
}

impl SpriteInstance {
    pub fn new(position: Vec3, size: f32, color: Vec3) -> Self {
        Self {
            position: position.to_array(),
            size,
            color: color.to_array(),
        }
    }
}

/// Generates a deterministic star catalog from a seed.
pub struct StarfieldGenerator {
    seed: u64,
    star_count: u32,
    params: StarfieldParams,
}

impl StarfieldGenerator {
    /// Create a new generator with the given seed and star count.
    pub fn new(seed: u64, star_count: u32) -> Self {
        Self::with_params(seed, star_count, StarfieldParams::default())
    }

    pub fn with_params(seed: u64, star_count: u32, params: StarfieldParams) -> Self {
        Self {
            seed,
            star_count,
            params,
        }
    }

    /// Generate the star catalog. Deterministic for a given seed; star `i`
    /// depends only on `(seed, i)`.
    pub fn generate(&self) -> Vec<BackgroundStar> {
        (0..self.star_count)
            .map(|i| self.star_at(i as u64))
            .collect()
    }

    fn star_at(&self, index: u64) -> BackgroundStar {
        let mut rng = stream_rng(self.seed, STREAM_STARS, index);
        let p = &self.params;
        let half = p.volume_side * 0.5;

        let position = Vec3::new(
            rng.random_range(-half..half),
            rng.random_range(-half..half),
            rng.random_range(-half..half),
        );

        let category = ColorCategory::pick(rng.random());
        let color = match category {
            ColorCategory::Neutral => {
                let blue_shift: f32 = rng.random();
                let brightness: f32 = rng.random_range(0.6..1.0);
                Vec3::ONE.lerp(Vec3::new(0.8, 0.88, 1.0), blue_shift) * brightness
            }
            tinted => tinted.tint(),
        };

        BackgroundStar {
            position,
            color,
            category,
            size: rng.random_range(p.size_range.0..p.size_range.1),
            twinkle_phase: rng.random_range(0.0..std::f32::consts::TAU),
            twinkle_frequency: rng.random_range(p.frequency_range.0..p.frequency_range.1),
        }
    }
}

/// Static star buffer plus the per-frame alpha channel derived from it.
pub struct StarField {
    stars: Vec<BackgroundStar>,
    instances: Vec<SpriteInstance>,
    alphas: Vec<f32>,
    twinkle: TwinkleRange,
}

impl StarField {
    /// Wrap a generated catalog; alphas start at their `time = 0` values.
    pub fn new(stars: Vec<BackgroundStar>, twinkle: TwinkleRange) -> Self {
        let instances = stars
            .iter()
            .map(|s| SpriteInstance::new(s.position, s.size, s.color))
            .collect();
        let alphas = vec![0.0; stars.len()];
        let mut field = Self {
            stars,
            instances,
            alphas,
            twinkle,
        };
        field.update(0.0);
        field
    }

    /// Recompute every star's twinkle alpha in place.
    pub fn update(&mut self, time: f32) {
        let twinkle = self.twinkle;
        for (alpha, star) in self.alphas.iter_mut().zip(&self.stars) {
            *alpha = twinkle.alpha(star.twinkle_phase, star.twinkle_frequency, time);
        }
    }

    pub fn stars(&self) -> &[BackgroundStar] {
        &self.stars
    }

    pub fn instances(&self) -> &[SpriteInstance] {
        &self.instances
    }

    pub fn alphas(&self) -> &[f32] {
        &self.alphas
    }

    pub fn twinkle(&self) -> TwinkleRange {
        self.twinkle
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }
}
