//! 2D gradient noise and fractal Brownian motion.
//!
//! These are the CPU twins of [`NOISE_WGSL`](crate::shaders::NOISE_WGSL). Both
//! hash lattice cells with the same wrapping u32 arithmetic and build the
//! gradient angle from the top 24 hash bits, so a CPU preview and the GPU agree
//! up to float rounding.

use std::f32::consts::{SQRT_2, TAU};

use noise::NoiseFn;

/// Octave count used by the galactic band.
pub const DEFAULT_OCTAVES: u32 = 6;
/// Frequency multiplier per octave.
pub const LACUNARITY: f32 = 2.0;
/// Amplitude multiplier per octave.
pub const GAIN: f32 = 0.5;

/// Integer hash of a lattice cell.
#[inline]
pub fn hash_cell(ix: i32, iy: i32) -> u32 {
    let mut h = (ix as u32).wrapping_mul(0x8da6_b343) ^ (iy as u32).wrapping_mul(0xd816_3841);
    h ^= h >> 16;
    h = h.wrapping_mul(0x7feb_352d);
    h ^= h >> 15;
    h = h.wrapping_mul(0x846c_a68b);
    h ^= h >> 16;
    h
}

#[inline]
fn gradient(ix: i32, iy: i32) -> (f32, f32) {
    // 24 bits survive the u32 -> f32 conversion exactly on both CPU and GPU.
    let angle = (hash_cell(ix, iy) >> 8) as f32 * (TAU / 16_777_216.0);
    (angle.cos(), angle.sin())
}

/// Quintic fade curve `6t^5 - 15t^4 + 10t^3`.
#[inline]
fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn corner(ix: i32, iy: i32, dx: f32, dy: f32) -> f32 {
    let (gx, gy) = gradient(ix, iy);
    gx * dx + gy * dy
}

/// Gradient noise at `(x, y)`, in `[-1, 1]`.
///
/// Pure and continuously differentiable; zero at every integer lattice point.
pub fn gradient_noise_2d(x: f32, y: f32) -> f32 {
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let ix = x0 as i32;
    let iy = y0 as i32;
    let ix1 = ix.wrapping_add(1);
    let iy1 = iy.wrapping_add(1);

    let n00 = corner(ix, iy, fx, fy);
    let n10 = corner(ix1, iy, fx - 1.0, fy);
    let n01 = corner(ix, iy1, fx, fy - 1.0);
    let n11 = corner(ix1, iy1, fx - 1.0, fy - 1.0);

    let u = fade(fx);
    let v = fade(fy);
    let bottom = n00 + (n10 - n00) * u;
    let top = n01 + (n11 - n01) * u;
    ((bottom + (top - bottom) * v) * SQRT_2).clamp(-1.0, 1.0)
}

/// Fractal sum of `octaves` gradient-noise samples.
///
/// Starts at amplitude 0.5 and frequency 1, then applies [`LACUNARITY`] and
/// [`GAIN`] per octave. The result is not renormalised.
pub fn fbm(x: f32, y: f32, octaves: u32) -> f32 {
    let mut total = 0.0;
    let mut amplitude = 0.5;
    let mut frequency = 1.0;
    for _ in 0..octaves {
        total += amplitude * gradient_noise_2d(x * frequency, y * frequency);
        frequency *= LACUNARITY;
        amplitude *= GAIN;
    }
    total
}

/// Fractal sum over any 2D [`NoiseFn`], with the same octave schedule as [`fbm`].
pub fn fbm_with<N: NoiseFn<f64, 2>>(source: &N, x: f64, y: f64, octaves: u32) -> f64 {
    let mut total = 0.0;
    let mut amplitude = 0.5;
    let mut frequency = 1.0;
    for _ in 0..octaves {
        total += amplitude * source.get([x * frequency, y * frequency]);
        frequency *= LACUNARITY as f64;
        amplitude *= GAIN as f64;
    }
    total
}

/// [`gradient_noise_2d`] exposed as a `noise` crate source.
#[derive(Clone, Copy, Debug, Default)]
pub struct GradientNoise;

impl NoiseFn<f64, 2> for GradientNoise {
    fn get(&self, point: [f64; 2]) -> f64 {
        gradient_noise_2d(point[0] as f32, point[1] as f32) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noise_in_range() {
        for i in 0..200 {
            for j in 0..200 {
                let x = i as f32 * 0.137 - 13.0;
                let y = j as f32 * 0.091 - 9.0;
                let n = gradient_noise_2d(x, y);
                assert!((-1.0..=1.0).contains(&n), "noise({x}, {y}) = {n}");
            }
        }
    }

    #[test]
    fn test_noise_is_deterministic() {
        for i in 0..100 {
            let x = i as f32 * 0.71;
            let y = i as f32 * -0.33;
            assert_eq!(
                gradient_noise_2d(x, y).to_bits(),
                gradient_noise_2d(x, y).to_bits()
            );
        }
    }

    #[test]
    fn test_noise_zero_on_lattice() {
        for ix in -5..5 {
            for iy in -5..5 {
                let n = gradient_noise_2d(ix as f32, iy as f32);
                assert!(n.abs() < 1e-6, "lattice point ({ix}, {iy}) = {n}");
            }
        }
    }

    #[test]
    fn test_noise_is_continuous_across_cells() {
        // Bounded slope: neighbouring samples never jump.
        let eps = 1e-3;
        for i in 0..2000 {
            let x = i as f32 * 0.0123 - 7.0;
            let y = 3.3 + (i as f32 * 0.007).sin();
            let a = gradient_noise_2d(x, y);
            let b = gradient_noise_2d(x + eps, y);
            let c = gradient_noise_2d(x, y + eps);
            assert!((a - b).abs() < 0.01, "x-jump at ({x}, {y})");
            assert!((a - c).abs() < 0.01, "y-jump at ({x}, {y})");
        }
    }

    #[test]
    fn test_noise_has_variation() {
        let samples: Vec<f32> = (0..500)
            .map(|i| gradient_noise_2d(i as f32 * 0.31 + 0.5, i as f32 * 0.17 + 0.5))
            .collect();
        let min = samples.iter().cloned().fold(f32::MAX, f32::min);
        let max = samples.iter().cloned().fold(f32::MIN, f32::max);
        assert!(max - min > 0.5, "noise too flat: [{min}, {max}]");
    }

    #[test]
    fn test_fbm_zero_octaves_is_zero() {
        assert_eq!(fbm(1.3, 2.7, 0), 0.0);
    }

    #[test]
    fn test_fbm_roughly_bounded() {
        for i in 0..1000 {
            let v = fbm(i as f32 * 0.05, i as f32 * 0.03, DEFAULT_OCTAVES);
            assert!(v.abs() <= 1.0, "fbm out of rough range: {v}");
        }
    }

    #[test]
    fn test_fbm_first_octave_matches_half_noise() {
        let x = 0.37;
        let y = 1.91;
        assert!((fbm(x, y, 1) - 0.5 * gradient_noise_2d(x, y)).abs() < 1e-7);
    }

    #[test]
    fn test_fbm_with_gradient_source_matches_fbm() {
        for i in 0..50 {
            let x = i as f32 * 0.21;
            let y = i as f32 * 0.13 + 0.4;
            let direct = fbm(x, y, 4);
            let generic = fbm_with(&GradientNoise, x as f64, y as f64, 4) as f32;
            assert!((direct - generic).abs() < 1e-4, "{direct} vs {generic}");
        }
    }

    #[test]
    fn test_fbm_with_perlin_is_finite() {
        let perlin = noise::Perlin::new(7);
        for i in 0..100 {
            let v = fbm_with(&perlin, i as f64 * 0.1, i as f64 * 0.2, DEFAULT_OCTAVES);
            assert!(v.is_finite());
        }
    }
}
