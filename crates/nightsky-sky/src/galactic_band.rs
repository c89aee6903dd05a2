//! Galactic band: a diagonal, noise-shaped glow evaluated per fragment.
//!
//! The GPU program lives in [`crate::shaders`]. [`GalacticBand::shade`] is its
//! CPU reference, kept term-for-term identical so tests and offline previews
//! see what the GPU draws. The only per-frame CPU work is
//! [`GalacticBand::update`], which writes the elapsed time into the uniform.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

use crate::constellation::VisibleVolume;
use crate::easing::smoothstep;
use crate::noise2d::{DEFAULT_OCTAVES, fbm};

/// Band rotation around the plane centre, radians.
pub const BAND_ANGLE: f32 = -std::f32::consts::FRAC_PI_6;
/// Half-width of the band before noise modulation, in uv units.
pub const BAND_HALF_WIDTH: f32 = 0.18;
pub const CORE_POINT: Vec2 = Vec2::new(0.62, 0.42);
pub const CORE_RADIUS: f32 = 0.35;
pub const ALPHA_CEILING: f32 = 0.5;
/// Width of the fade towards the uv boundary.
pub const EDGE_FADE: f32 = 0.15;
/// Distance of the band quad behind the camera origin.
pub const BAND_DEPTH: f32 = 80.0;

const YELLOW: Vec3 = Vec3::new(1.0, 0.88, 0.55);
const ORANGE: Vec3 = Vec3::new(1.0, 0.62, 0.35);
const PINK: Vec3 = Vec3::new(0.95, 0.45, 0.62);
const MAGENTA: Vec3 = Vec3::new(0.78, 0.32, 0.78);
const BLUE: Vec3 = Vec3::new(0.32, 0.42, 0.9);
const PURPLE: Vec3 = Vec3::new(0.52, 0.36, 0.86);
const WHITE: Vec3 = Vec3::new(0.92, 0.92, 1.0);

/// Uniform block consumed by the band shader.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct GalacticBandParams {
    pub elapsed_time: f32,
    pub _pad: [f32; 3],
}

/// Vertex of the band quad.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct BandVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

/// CPU side of the galactic band.
#[derive(Clone, Debug, Default)]
pub struct GalacticBand {
    params: GalacticBandParams,
}

fn rotate(p: Vec2, angle: f32) -> Vec2 {
    let (s, c) = angle.sin_cos();
    Vec2::new(p.x * c - p.y * s, p.x * s + p.y * c)
}

impl GalacticBand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, elapsed_time: f32) {
        self.params.elapsed_time = elapsed_time;
    }

    pub fn params(&self) -> GalacticBandParams {
        self.params
    }

    /// Shade one sample at the current elapsed time.
    pub fn sample(&self, uv: Vec2) -> [f32; 4] {
        Self::shade(uv, self.params.elapsed_time)
    }

    /// Straight-alpha colour of the band at `uv` in `[0, 1]^2` and `time`.
    pub fn shade(uv: Vec2, time: f32) -> [f32; 4] {
        let rot = rotate(uv - Vec2::splat(0.5), BAND_ANGLE);
        let dist_from_band = rot.y.abs();
        let dist_from_core = uv.distance(CORE_POINT);

        let n1 = fbm(rot.x * 3.0 + time * 0.02, rot.y * 3.0, DEFAULT_OCTAVES);
        let n2 = fbm(
            rot.x * 6.0 - time * 0.015,
            rot.y * 6.0 + time * 0.01,
            DEFAULT_OCTAVES,
        );
        let n3 = fbm(rot.x * 12.0, rot.y * 12.0, DEFAULT_OCTAVES);

        let width = BAND_HALF_WIDTH * (1.0 + 0.5 * n1);
        let band_shape = 1.0 - smoothstep(0.0, width, dist_from_band);
        let core_brightness = 1.0 - smoothstep(0.0, CORE_RADIUS, dist_from_core);
        let dust = smoothstep(0.0, 0.3, n2 * 0.6 + n3 * 0.4) * 0.6;
        let density =
            ((band_shape * (0.6 + 0.4 * n1) + core_brightness * 0.5) * (1.0 - dust)).clamp(0.0, 1.0);

        let w = n1 * 0.5 + 0.5;
        let warm = YELLOW.lerp(ORANGE, w).lerp(PINK.lerp(MAGENTA, w), w);
        let c = n3 * 0.5 + 0.5;
        let cool = BLUE.lerp(PURPLE, c).lerp(WHITE, c * c);
        let color = cool.lerp(warm, core_brightness);

        let edge = smoothstep(0.0, EDGE_FADE, uv.x)
            * smoothstep(0.0, EDGE_FADE, 1.0 - uv.x)
            * smoothstep(0.0, EDGE_FADE, uv.y)
            * smoothstep(0.0, EDGE_FADE, 1.0 - uv.y);

        let rgb = (color * density * edge).clamp(Vec3::ZERO, Vec3::ONE);
        let alpha = (density * edge * (0.35 + 0.3 * core_brightness)).clamp(0.0, ALPHA_CEILING);
        [rgb.x, rgb.y, rgb.z, alpha]
    }

    /// Quad at [`BAND_DEPTH`] covering the frustum with headroom for drift.
    ///
    /// Two triangles, counter-clockwise, uv origin at the bottom left.
    pub fn quad(volume: &VisibleVolume) -> [BandVertex; 6] {
        let half = volume.half_extents_at(BAND_DEPTH) / volume.margin * 1.25;
        let z = -BAND_DEPTH;
        let corner = |sx: f32, sy: f32| BandVertex {
            position: [sx * half.x, sy * half.y, z],
            uv: [(sx + 1.0) * 0.5, (sy + 1.0) * 0.5],
        };
        let bl = corner(-1.0, -1.0);
        let br = corner(1.0, -1.0);
        let tr = corner(1.0, 1.0);
        let tl = corner(-1.0, 1.0);
        [bl, br, tr, bl, tr, tl]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> impl Iterator<Item = Vec2> {
        (0..=24).flat_map(|i| (0..=24).map(move |j| Vec2::new(i as f32 / 24.0, j as f32 / 24.0)))
    }

    #[test]
    fn test_params_layout() {
        assert_eq!(std::mem::size_of::<GalacticBandParams>(), 16);
        assert_eq!(std::mem::size_of::<BandVertex>(), 20);
    }

    #[test]
    fn test_alpha_never_exceeds_ceiling() {
        for time in [0.0, 17.5, 300.0, 4000.0] {
            for uv in grid() {
                let [r, g, b, a] = GalacticBand::shade(uv, time);
                assert!((0.0..=ALPHA_CEILING).contains(&a), "alpha {a} at {uv}");
                for ch in [r, g, b] {
                    assert!((0.0..=1.0).contains(&ch));
                }
            }
        }
    }

    #[test]
    fn test_fades_out_at_uv_boundary() {
        for i in 0..=20 {
            let s = i as f32 / 20.0;
            for uv in [
                Vec2::new(0.0, s),
                Vec2::new(1.0, s),
                Vec2::new(s, 0.0),
                Vec2::new(s, 1.0),
            ] {
                assert_eq!(GalacticBand::shade(uv, 3.0)[3], 0.0);
            }
        }
    }

    #[test]
    fn test_core_glows_and_far_field_is_empty() {
        // Perpendicular to the band and outside the core radius.
        let off_band = Vec2::new(0.35, 0.76);
        for step in 0..50 {
            let time = step as f32 * 7.3;
            assert!(GalacticBand::shade(CORE_POINT, time)[3] > 0.05);
            assert_eq!(GalacticBand::shade(off_band, time)[3], 0.0);
        }
    }

    #[test]
    fn test_shading_is_deterministic() {
        for uv in grid().step_by(7) {
            assert_eq!(GalacticBand::shade(uv, 12.0), GalacticBand::shade(uv, 12.0));
        }
    }

    #[test]
    fn test_band_animates_over_time() {
        let changed = grid().any(|uv| GalacticBand::shade(uv, 0.0) != GalacticBand::shade(uv, 60.0));
        assert!(changed);
    }

    #[test]
    fn test_update_only_touches_time() {
        let mut band = GalacticBand::new();
        band.update(42.5);
        assert_eq!(band.params().elapsed_time, 42.5);
        assert_eq!(band.params()._pad, [0.0; 3]);
        assert_eq!(band.sample(CORE_POINT), GalacticBand::shade(CORE_POINT, 42.5));
    }

    #[test]
    fn test_quad_covers_frustum() {
        let volume = VisibleVolume::default();
        let quad = GalacticBand::quad(&volume);
        let visible = volume.half_extents_at(BAND_DEPTH) / volume.margin;
        let max_x = quad.iter().map(|v| v.position[0]).fold(f32::MIN, f32::max);
        let max_y = quad.iter().map(|v| v.position[1]).fold(f32::MIN, f32::max);
        assert!(max_x > visible.x && max_y > visible.y);
        assert!(quad.iter().all(|v| v.position[2] == -BAND_DEPTH));
        assert_eq!(quad[0].uv, [0.0, 0.0]);
        assert_eq!(quad[2].uv, [1.0, 1.0]);
    }
}
