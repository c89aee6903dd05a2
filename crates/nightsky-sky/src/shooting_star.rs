//! Shooting stars: a small fixed pool of streaks whose paths are derived once
//! from the seed and whose pose is a closed-form function of the clock.
//!
//! Each slot loops forever with period `duration + gap`. Outside the first
//! `duration` seconds of a loop the slot is invisible and emits no sprites.

use std::f32::consts::TAU;

use glam::{Quat, Vec3};
use rand::Rng;

use crate::constellation::VisibleVolume;
use crate::easing::{ease_in_cubic, ease_out_cubic};
use crate::seed::{STREAM_SHOOTING_STARS, stream_rng};
use crate::starfield::SpriteInstance;

/// Normalised time at which the fade-in completes.
pub const FADE_IN_END: f32 = 0.2;
/// Normalised time at which the fade-out begins.
pub const FADE_OUT_START: f32 = 0.8;
/// Trail sprites emitted behind each visible head.
pub const TRAIL_SPRITES: usize = 12;
/// Fraction of the path the trail covers.
const TRAIL_FRACTION: f32 = 0.12;
const HEAD_SIZE: f32 = 0.6;
const HEAD_COLOR: Vec3 = Vec3::new(1.0, 0.97, 0.9);
const TRAIL_COLOR: Vec3 = Vec3::new(0.75, 0.85, 1.0);

/// Duration band of a pool slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreakVariant {
    Swift,
    Steady,
    Lingering,
}

impl StreakVariant {
    pub fn for_slot(index: usize) -> Self {
        match index % 3 {
            0 => StreakVariant::Swift,
            1 => StreakVariant::Steady,
            _ => StreakVariant::Lingering,
        }
    }

    /// Duration range in seconds.
    pub fn duration_range(self) -> (f32, f32) {
        match self {
            StreakVariant::Swift => (2.0, 3.0),
            StreakVariant::Steady => (3.0, 4.0),
            StreakVariant::Lingering => (4.0, 5.0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShootingStarParams {
    pub pool_size: usize,
    /// Pause between two loops of the same slot.
    pub gap_seconds: f32,
    /// Maximum angle between the path and the horizontal, radians.
    pub max_deflection: f32,
    pub volume: VisibleVolume,
}

impl Default for ShootingStarParams {
    fn default() -> Self {
        Self {
            pool_size: 3,
            gap_seconds: 2.0,
            max_deflection: 15f32.to_radians(),
            volume: VisibleVolume::default(),
        }
    }
}

/// Immutable path data for one pool slot.
#[derive(Clone, Debug, PartialEq)]
pub struct ShootingStar {
    pub start: Vec3,
    pub end: Vec3,
    pub duration: f32,
    pub start_time_offset: f32,
    /// Twinkle rate in Hz.
    pub twinkle_frequency: f32,
    pub gap_seconds: f32,
    pub variant: StreakVariant,
}

/// Per-frame pose of a visible streak.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StreakPose {
    /// Normalised loop time in `[0, 1]`.
    pub t: f32,
    pub position: Vec3,
    /// Rotates +X onto the direction of travel.
    pub rotation: Quat,
    pub opacity: f32,
    pub scale: f32,
}

/// Derive the path for pool slot `index`.
///
/// The streak crosses the frustum from one side edge to the other at a fixed
/// depth, deflected at most `max_deflection` from horizontal.
pub fn derive_path(index: usize, seed: u64, params: &ShootingStarParams) -> ShootingStar {
    let mut rng = stream_rng(seed, STREAM_SHOOTING_STARS, index as u64);
    let variant = StreakVariant::for_slot(index);
    let (lo, hi) = variant.duration_range();
    let duration = rng.random_range(lo..hi);

    let volume = &params.volume;
    let depth = rng.random_range(volume.near_depth..=volume.far_depth);
    let half = volume.half_extents_at(depth) / volume.margin;
    let heading = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
    // The vertical rise over the full width may not exceed the half height.
    let max_angle = params.max_deflection.min((half.y / (2.0 * half.x)).atan());
    let angle = rng.random_range(-max_angle..=max_angle);
    let rise = 2.0 * half.x * angle.tan();
    let mid_reach = 0.6 * (half.y - 0.5 * rise.abs());
    let mid_y = rng.random_range(-mid_reach..=mid_reach);
    let start_y = mid_y - 0.5 * rise;
    let end_y = mid_y + 0.5 * rise;

    let cycle = duration + params.gap_seconds;
    let stagger = index as f32 * 1.5;

    ShootingStar {
        start: Vec3::new(-heading * half.x, start_y, -depth),
        end: Vec3::new(heading * half.x, end_y, -depth),
        duration,
        start_time_offset: stagger + rng.random_range(0.0..cycle),
        twinkle_frequency: rng.random_range(1.5..3.0),
        gap_seconds: params.gap_seconds,
        variant,
    }
}

/// Opacity envelope over normalised time: cubic ease-out rise until
/// [`FADE_IN_END`], full until [`FADE_OUT_START`], cubic ease-in fall to zero.
pub fn opacity_envelope(t: f32) -> f32 {
    if t < FADE_IN_END {
        ease_out_cubic(t / FADE_IN_END)
    } else if t <= FADE_OUT_START {
        1.0
    } else {
        1.0 - ease_in_cubic((t - FADE_OUT_START) / (1.0 - FADE_OUT_START))
    }
}

impl ShootingStar {
    pub fn cycle_seconds(&self) -> f32 {
        self.duration + self.gap_seconds
    }

    /// Seconds since the current loop began.
    pub fn loop_elapsed(&self, clock: f32) -> f32 {
        (clock - self.start_time_offset).rem_euclid(self.cycle_seconds())
    }

    /// Loop time normalised by the duration; values above 1 fall in the gap.
    pub fn normalized_time(&self, clock: f32) -> f32 {
        self.loop_elapsed(clock) / self.duration
    }

    pub fn direction(&self) -> Vec3 {
        (self.end - self.start).normalize_or_zero()
    }

    /// Pose at `clock`, or `None` while the slot is between loops.
    pub fn update_pose(&self, clock: f32) -> Option<StreakPose> {
        let elapsed = self.loop_elapsed(clock);
        let t = elapsed / self.duration;
        if t > 1.0 {
            return None;
        }
        let envelope = opacity_envelope(t);
        let twinkle = 0.85 + 0.15 * (elapsed * self.twinkle_frequency * TAU).sin();
        Some(StreakPose {
            t,
            position: self.start.lerp(self.end, t),
            rotation: Quat::from_rotation_arc(Vec3::X, self.direction()),
            opacity: envelope * twinkle,
            scale: 0.5 + 0.5 * envelope,
        })
    }

    /// Append the head and trail sprites for `pose`.
    ///
    /// Trail sprites never extend behind the path start.
    pub fn emit_sprites(
        &self,
        pose: &StreakPose,
        sprites: &mut Vec<SpriteInstance>,
        alphas: &mut Vec<f32>,
    ) {
        let head_size = HEAD_SIZE * pose.scale;
        sprites.push(SpriteInstance::new(pose.position, head_size, HEAD_COLOR));
        alphas.push(pose.opacity);

        let step = TRAIL_FRACTION / TRAIL_SPRITES as f32;
        for k in 1..=TRAIL_SPRITES {
            let s = pose.t - k as f32 * step;
            if s < 0.0 {
                break;
            }
            let falloff = 1.0 - k as f32 / (TRAIL_SPRITES + 1) as f32;
            sprites.push(SpriteInstance::new(
                self.start.lerp(self.end, s),
                head_size * falloff,
                TRAIL_COLOR,
            ));
            alphas.push(pose.opacity * falloff * falloff);
        }
    }
}

/// Owns the pool and the per-frame sprite buffers for visible streaks.
pub struct ShootingStarDirector {
    pool: Vec<ShootingStar>,
    poses: Vec<Option<StreakPose>>,
    sprites: Vec<SpriteInstance>,
    alphas: Vec<f32>,
}

impl ShootingStarDirector {
    pub fn new(seed: u64, params: &ShootingStarParams) -> Self {
        let pool: Vec<ShootingStar> = (0..params.pool_size)
            .map(|i| derive_path(i, seed, params))
            .collect();
        let capacity = pool.len() * (TRAIL_SPRITES + 1);
        let mut director = Self {
            poses: vec![None; pool.len()],
            pool,
            sprites: Vec::with_capacity(capacity),
            alphas: Vec::with_capacity(capacity),
        };
        director.update(0.0);
        director
    }

    /// Recompute every slot's pose and rebuild the sprite buffers in place.
    pub fn update(&mut self, clock: f32) {
        self.sprites.clear();
        self.alphas.clear();
        for (star, pose) in self.pool.iter().zip(self.poses.iter_mut()) {
            *pose = star.update_pose(clock);
            if let Some(p) = pose {
                star.emit_sprites(p, &mut self.sprites, &mut self.alphas);
            }
        }
    }

    pub fn pool(&self) -> &[ShootingStar] {
        &self.pool
    }

    pub fn poses(&self) -> &[Option<StreakPose>] {
        &self.poses
    }

    pub fn visible_count(&self) -> usize {
        self.poses.iter().filter(|p| p.is_some()).count()
    }

    pub fn sprites(&self) -> &[SpriteInstance] {
        &self.sprites
    }

    pub fn alphas(&self) -> &[f32] {
        &self.alphas
    }
}
