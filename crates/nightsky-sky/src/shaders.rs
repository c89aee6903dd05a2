//! WGSL sources for every sky layer.
//!
//! All GPU programs live here so a backend can swap the rendering API without
//! touching the layout or animation code. Bindings shared by every program:
//!
//! - `@group(0) @binding(0)`: camera block (`view_proj`, `camera_right`, `camera_up`).
//! - `@group(1) @binding(0)`: band parameters (band program only).

/// Gradient noise and fBm, mirroring [`crate::noise2d`].
pub const NOISE_WGSL: &str = r#"
fn hash_cell(ix: i32, iy: i32) -> u32 {
    var h = (u32(ix) * 0x8da6b343u) ^ (u32(iy) * 0xd8163841u);
    h = h ^ (h >> 16u);
    h = h * 0x7feb352du;
    h = h ^ (h >> 15u);
    h = h * 0x846ca68bu;
    h = h ^ (h >> 16u);
    return h;
}

fn noise_corner(ix: i32, iy: i32, d: vec2<f32>) -> f32 {
    let angle = f32(hash_cell(ix, iy) >> 8u) * (6.2831855 / 16777216.0);
    return dot(vec2<f32>(cos(angle), sin(angle)), d);
}

fn noise_fade(t: vec2<f32>) -> vec2<f32> {
    return t * t * t * (t * (t * 6.0 - 15.0) + 10.0);
}

fn gradient_noise_2d(p: vec2<f32>) -> f32 {
    let cell = floor(p);
    let f = p - cell;
    let ix = i32(cell.x);
    let iy = i32(cell.y);

    let n00 = noise_corner(ix, iy, f);
    let n10 = noise_corner(ix + 1, iy, f - vec2<f32>(1.0, 0.0));
    let n01 = noise_corner(ix, iy + 1, f - vec2<f32>(0.0, 1.0));
    let n11 = noise_corner(ix + 1, iy + 1, f - vec2<f32>(1.0, 1.0));

    let u = noise_fade(f);
    let bottom = n00 + (n10 - n00) * u.x;
    let top = n01 + (n11 - n01) * u.x;
    return clamp((bottom + (top - bottom) * u.y) * 1.4142135, -1.0, 1.0);
}

fn fbm(p: vec2<f32>, octaves: i32) -> f32 {
    var total = 0.0;
    var amplitude = 0.5;
    var frequency = 1.0;
    for (var i = 0; i < octaves; i = i + 1) {
        total = total + amplitude * gradient_noise_2d(p * frequency);
        frequency = frequency * 2.0;
        amplitude = amplitude * 0.5;
    }
    return total;
}
"#;

/// Band vertex and fragment program; prepend [`NOISE_WGSL`] before compiling.
pub const BAND_WGSL: &str = r#"
struct Camera {
    view_proj: mat4x4<f32>,
    camera_right: vec4<f32>,
    camera_up: vec4<f32>,
};

struct BandParams {
    elapsed_time: f32,
    _pad0: f32,
    _pad1: f32,
    _pad2: f32,
};

@group(0) @binding(0)
var<uniform> camera: Camera;

@group(1) @binding(0)
var<uniform> band: BandParams;

const BAND_ANGLE: f32 = -0.5235988;
const BAND_HALF_WIDTH: f32 = 0.18;
const CORE_POINT: vec2<f32> = vec2<f32>(0.62, 0.42);
const CORE_RADIUS: f32 = 0.35;
const ALPHA_CEILING: f32 = 0.5;
const EDGE_FADE: f32 = 0.15;
const OCTAVES: i32 = 6;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_band(@location(0) position: vec3<f32>, @location(1) uv: vec2<f32>) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = camera.view_proj * vec4<f32>(position, 1.0);
    out.uv = uv;
    return out;
}

fn rotate(p: vec2<f32>, angle: f32) -> vec2<f32> {
    let s = sin(angle);
    let c = cos(angle);
    return vec2<f32>(p.x * c - p.y * s, p.x * s + p.y * c);
}

@fragment
fn fs_band(in: VertexOutput) -> @location(0) vec4<f32> {
    let uv = in.uv;
    let time = band.elapsed_time;
    let rot = rotate(uv - vec2<f32>(0.5), BAND_ANGLE);
    let dist_from_band = abs(rot.y);
    let dist_from_core = distance(uv, CORE_POINT);

    let n1 = fbm(vec2<f32>(rot.x * 3.0 + time * 0.02, rot.y * 3.0), OCTAVES);
    let n2 = fbm(vec2<f32>(rot.x * 6.0 - time * 0.015, rot.y * 6.0 + time * 0.01), OCTAVES);
    let n3 = fbm(rot * 12.0, OCTAVES);

    let width = BAND_HALF_WIDTH * (1.0 + 0.5 * n1);
    let band_shape = 1.0 - smoothstep(0.0, width, dist_from_band);
    let core_brightness = 1.0 - smoothstep(0.0, CORE_RADIUS, dist_from_core);
    let dust = smoothstep(0.0, 0.3, n2 * 0.6 + n3 * 0.4) * 0.6;
    let density = clamp((band_shape * (0.6 + 0.4 * n1) + core_brightness * 0.5) * (1.0 - dust), 0.0, 1.0);

    let w = n1 * 0.5 + 0.5;
    let warm = mix(
        mix(vec3<f32>(1.0, 0.88, 0.55), vec3<f32>(1.0, 0.62, 0.35), w),
        mix(vec3<f32>(0.95, 0.45, 0.62), vec3<f32>(0.78, 0.32, 0.78), w),
        w,
    );
    let c = n3 * 0.5 + 0.5;
    let cool = mix(
        mix(vec3<f32>(0.32, 0.42, 0.9), vec3<f32>(0.52, 0.36, 0.86), c),
        vec3<f32>(0.92, 0.92, 1.0),
        c * c,
    );
    let color = mix(cool, warm, core_brightness);

    let edge = smoothstep(0.0, EDGE_FADE, uv.x)
        * smoothstep(0.0, EDGE_FADE, 1.0 - uv.x)
        * smoothstep(0.0, EDGE_FADE, uv.y)
        * smoothstep(0.0, EDGE_FADE, 1.0 - uv.y);

    let rgb = clamp(color * density * edge, vec3<f32>(0.0), vec3<f32>(1.0));
    let alpha = clamp(density * edge * (0.35 + 0.3 * core_brightness), 0.0, ALPHA_CEILING);
    return vec4<f32>(rgb, alpha);
}
"#;

/// Instanced camera-facing sprites for stars, motes and shooting stars.
///
/// Slot 0 carries [`SpriteInstance`](crate::SpriteInstance) records, slot 1
/// a parallel per-instance alpha stream.
pub const SPRITE_WGSL: &str = r#"
struct Camera {
    view_proj: mat4x4<f32>,
    camera_right: vec4<f32>,
    camera_up: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> camera: Camera;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) corner: vec2<f32>,
    @location(1) color: vec3<f32>,
    @location(2) alpha: f32,
};

@vertex
fn vs_sprite(
    @builtin(vertex_index) idx: u32,
    @location(0) center: vec3<f32>,
    @location(1) size: f32,
    @location(2) color: vec3<f32>,
    @location(3) alpha: f32,
) -> VertexOutput {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(-1.0, 1.0),
    );
    let corner = corners[idx];
    let world = center
        + camera.camera_right.xyz * corner.x * size
        + camera.camera_up.xyz * corner.y * size;

    var out: VertexOutput;
    out.clip_position = camera.view_proj * vec4<f32>(world, 1.0);
    out.corner = corner;
    out.color = color;
    out.alpha = alpha;
    return out;
}

@fragment
fn fs_sprite(in: VertexOutput) -> @location(0) vec4<f32> {
    let d = length(in.corner);
    let falloff = 1.0 - smoothstep(0.25, 1.0, d);
    return vec4<f32>(in.color, in.alpha * falloff);
}
"#;

/// Constellation line segments with per-vertex colour.
pub const LINE_WGSL: &str = r#"
struct Camera {
    view_proj: mat4x4<f32>,
    camera_right: vec4<f32>,
    camera_up: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> camera: Camera;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_line(@location(0) position: vec3<f32>, @location(1) color: vec4<f32>) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = camera.view_proj * vec4<f32>(position, 1.0);
    out.color = color;
    return out;
}

@fragment
fn fs_line(in: VertexOutput) -> @location(0) vec4<f32> {
    return in.color;
}
"#;

/// Complete band program: noise library followed by the band entry points.
pub fn band_shader_source() -> String {
    let mut source = String::with_capacity(NOISE_WGSL.len() + BAND_WGSL.len());
    source.push_str(NOISE_WGSL);
    source.push_str(BAND_WGSL);
    source
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_source_contains_noise_and_entry_points() {
        let src = band_shader_source();
        assert!(src.contains("fn fbm("));
        assert!(src.contains("fn vs_band("));
        assert!(src.contains("fn fs_band("));
        assert!(src.find("fn fbm(") < src.find("fn fs_band("));
    }

    #[test]
    fn test_noise_constants_match_cpu_hash() {
        // The hex multipliers must agree with `noise2d::hash_cell`.
        for constant in ["0x8da6b343u", "0xd8163841u", "0x7feb352du", "0x846ca68bu"] {
            assert!(NOISE_WGSL.contains(constant), "missing {constant}");
        }
        assert!(NOISE_WGSL.contains("16777216.0"));
    }

    #[test]
    fn test_band_constants_match_cpu_reference() {
        use crate::galactic_band::{ALPHA_CEILING, BAND_HALF_WIDTH, CORE_RADIUS, EDGE_FADE};
        assert!(BAND_WGSL.contains(&format!("BAND_HALF_WIDTH: f32 = {BAND_HALF_WIDTH};")));
        assert!(BAND_WGSL.contains(&format!("CORE_RADIUS: f32 = {CORE_RADIUS};")));
        assert!(BAND_WGSL.contains(&format!("ALPHA_CEILING: f32 = {ALPHA_CEILING};")));
        assert!(BAND_WGSL.contains(&format!("EDGE_FADE: f32 = {EDGE_FADE};")));
    }

    #[test]
    fn test_every_program_declares_camera_block() {
        for src in [BAND_WGSL, SPRITE_WGSL, LINE_WGSL] {
            assert!(src.contains("@group(0) @binding(0)"));
            assert!(src.contains("camera_right: vec4<f32>"));
        }
        assert!(SPRITE_WGSL.contains("fn vs_sprite("));
        assert!(SPRITE_WGSL.contains("fn fs_sprite("));
        assert!(LINE_WGSL.contains("fn vs_line("));
        assert!(LINE_WGSL.contains("fn fs_line("));
    }
}
