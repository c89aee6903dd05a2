//! Floating motes: a sparse layer of soft purple dust drifting in front of the
//! constellations.
//!
//! Every mote loops with its own period after an initial delay. Its opacity
//! follows a five-key envelope and its offset from the anchor is driven by
//! two Perlin channels, windowed so the mote returns to its anchor at the end
//! of every loop.

use std::f32::consts::PI;

use glam::{Vec2, Vec3};
use noise::{NoiseFn, Perlin};
use rand::Rng;

use crate::constellation::VisibleVolume;
use crate::easing::smoothstep;
use crate::seed::{STREAM_MOTES, derive_seed, stream_rng};
use crate::starfield::SpriteInstance;

pub const PALETTE: [Vec3; 5] = [
    Vec3::new(0.659, 0.333, 0.969),
    Vec3::new(0.576, 0.200, 0.918),
    Vec3::new(0.851, 0.275, 0.937),
    Vec3::new(0.753, 0.149, 0.827),
    Vec3::new(0.769, 0.710, 0.992),
];

/// Opacity keys at quarter steps of the loop, as fractions of the base opacity.
const OPACITY_KEYS: [f32; 5] = [0.0, 1.0, 0.7, 1.0, 0.0];
/// Perlin sampling rate along the clock.
const WANDER_RATE: f64 = 0.08;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoteParams {
    pub count: u32,
    pub size_range: (f32, f32),
    pub opacity_range: (f32, f32),
    /// Loop period range in seconds.
    pub period_range: (f32, f32),
    pub max_delay: f32,
    /// Maximum offset from the anchor on each axis.
    pub wander: f32,
    pub depth_range: (f32, f32),
    pub volume: VisibleVolume,
}

impl Default for MoteParams {
    fn default() -> Self {
        Self {
            count: 25,
            size_range: (0.15, 0.6),
            opacity_range: (0.2, 0.6),
            period_range: (15.0, 35.0),
            max_delay: 5.0,
            wander: 1.5,
            depth_range: (12.0, 25.0),
            volume: VisibleVolume::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Mote {
    pub anchor: Vec3,
    pub color: Vec3,
    pub size: f32,
    pub base_opacity: f32,
    pub period: f32,
    pub delay: f32,
    /// Perlin row for each axis.
    channels: [f64; 2],
}

impl Mote {
    fn generate(seed: u64, index: u32, params: &MoteParams) -> Self {
        let mut rng = stream_rng(seed, STREAM_MOTES, index as u64);
        let depth = rng.random_range(params.depth_range.0..params.depth_range.1);
        let half = params.volume.half_extents_at(depth);
        let x = rng.random_range(-half.x..=half.x);
        let y = rng.random_range(-half.y..=half.y);
        Self {
            anchor: Vec3::new(x, y, -depth),
            color: PALETTE[rng.random_range(0..PALETTE.len())],
            size: rng.random_range(params.size_range.0..params.size_range.1),
            base_opacity: rng.random_range(params.opacity_range.0..params.opacity_range.1),
            period: rng.random_range(params.period_range.0..params.period_range.1),
            delay: rng.random_range(0.0..params.max_delay),
            channels: [index as f64 * 17.31, index as f64 * 17.31 + 7.77],
        }
    }

    /// Loop progress in `[0, 1)`, or `None` while the mote waits out its delay.
    pub fn progress(&self, clock: f32) -> Option<f32> {
        if clock < self.delay {
            return None;
        }
        Some((clock - self.delay).rem_euclid(self.period) / self.period)
    }

    pub fn opacity(&self, clock: f32) -> f32 {
        let Some(u) = self.progress(clock) else {
            return 0.0;
        };
        let scaled = (u * 4.0).min(3.999);
        let key = scaled as usize;
        let blend = smoothstep(0.0, 1.0, scaled - key as f32);
        let factor = OPACITY_KEYS[key] + (OPACITY_KEYS[key + 1] - OPACITY_KEYS[key]) * blend;
        self.base_opacity * factor
    }

    /// Offset from the anchor, bounded by `wander` on each axis.
    pub fn offset(&self, perlin: &Perlin, wander: f32, clock: f32) -> Vec2 {
        let Some(u) = self.progress(clock) else {
            return Vec2::ZERO;
        };
        let window = (u * PI).sin();
        let s = clock as f64 * WANDER_RATE;
        let dx = perlin.get([self.channels[0], s]) as f32;
        let dy = perlin.get([self.channels[1], s]) as f32;
        Vec2::new(dx, dy).clamp(Vec2::NEG_ONE, Vec2::ONE) * wander * window
    }

    pub fn position(&self, perlin: &Perlin, wander: f32, clock: f32) -> Vec3 {
        self.anchor + self.offset(perlin, wander, clock).extend(0.0)
    }
}

/// All motes plus their per-frame sprite buffers.
pub struct MoteField {
    motes: Vec<Mote>,
    perlin: Perlin,
    wander: f32,
    instances: Vec<SpriteInstance>,
    alphas: Vec<f32>,
}

impl MoteField {
    pub fn new(seed: u64, params: &MoteParams) -> Self {
        let motes: Vec<Mote> = (0..params.count)
            .map(|i| Mote::generate(seed, i, params))
            .collect();
        // Perlin seeds are 32-bit.
        let perlin = Perlin::new(derive_seed(seed, STREAM_MOTES, u64::MAX) as u32);
        let mut field = Self {
            instances: motes
                .iter()
                .map(|m| SpriteInstance::new(m.anchor, m.size, m.color))
                .collect(),
            alphas: vec![0.0; motes.len()],
            motes,
            perlin,
            wander: params.wander,
        };
        field.update(0.0);
        field
    }

    /// Move every mote to its pose at `clock`. Writes in place.
    pub fn update(&mut self, clock: f32) {
        for ((mote, instance), alpha) in self
            .motes
            .iter()
            .zip(self.instances.iter_mut())
            .zip(self.alphas.iter_mut())
        {
            instance.position = mote.position(&self.perlin, self.wander, clock).to_array();
            *alpha = mote.opacity(clock);
        }
    }

    pub fn motes(&self) -> &[Mote] {
        &self.motes
    }

    pub fn instances(&self) -> &[SpriteInstance] {
        &self.instances
    }

    pub fn alphas(&self) -> &[f32] {
        &self.alphas
    }

    pub fn len(&self) -> usize {
        self.motes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.motes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(seed: u64) -> MoteField {
        MoteField::new(seed, &MoteParams::default())
    }

    #[test]
    fn test_generates_requested_count_from_palette() {
        let f = field(42);
        assert_eq!(f.len(), 25);
        for m in f.motes() {
            assert!(PALETTE.contains(&m.color));
            assert!((0.15..0.6).contains(&m.size));
            assert!((0.2..0.6).contains(&m.base_opacity));
            assert!((15.0..35.0).contains(&m.period));
            assert!((0.0..5.0).contains(&m.delay));
        }
    }

    #[test]
    fn test_hidden_until_delay_elapses() {
        let f = field(7);
        for m in f.motes() {
            assert_eq!(m.opacity(m.delay * 0.5), 0.0);
            assert!(m.progress(m.delay * 0.99).is_none());
        }
    }

    #[test]
    fn test_opacity_bounded_by_base() {
        let f = field(3);
        for m in f.motes() {
            for step in 0..400 {
                let clock = step as f32 * 0.37;
                let a = m.opacity(clock);
                assert!(a >= 0.0 && a <= m.base_opacity + 1e-6, "alpha {a}");
            }
        }
    }

    #[test]
    fn test_opacity_peaks_at_first_quarter() {
        let f = field(11);
        let m = &f.motes()[0];
        let clock = m.delay + 0.25 * m.period;
        assert!((m.opacity(clock) - m.base_opacity).abs() < 1e-3);
    }

    #[test]
    fn test_wander_stays_within_bounds() {
        let params = MoteParams::default();
        let f = field(5);
        for m in f.motes() {
            for step in 0..300 {
                let clock = step as f32 * 0.5;
                let off = m.offset(&f.perlin, params.wander, clock);
                assert!(off.x.abs() <= params.wander && off.y.abs() <= params.wander);
            }
        }
    }

    #[test]
    fn test_returns_to_anchor_at_loop_start() {
        let f = field(9);
        for m in f.motes() {
            let clock = m.delay + 2.0 * m.period;
            let pos = m.position(&f.perlin, 1.5, clock);
            assert!(pos.distance(m.anchor) < 0.05);
        }
    }

    #[test]
    fn test_update_is_pure_function_of_clock() {
        let mut a = field(21);
        let mut b = field(21);
        a.update(12.0);
        a.update(40.0);
        b.update(40.0);
        assert_eq!(a.instances(), b.instances());
        assert_eq!(a.alphas(), b.alphas());
    }

    #[test]
    fn test_zero_motes_is_valid() {
        let params = MoteParams {
            count: 0,
            ..MoteParams::default()
        };
        let mut f = MoteField::new(1, &params);
        f.update(10.0);
        assert!(f.is_empty());
        assert!(f.instances().is_empty());
    }
}
