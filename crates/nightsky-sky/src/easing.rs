//! Easing and shaping curves shared by the animated layers.

/// Cubic ease-out: `1 - (1 - x)^3`, input clamped to `[0, 1]`.
#[inline]
pub fn ease_out_cubic(x: f32) -> f32 {
    let inv = 1.0 - x.clamp(0.0, 1.0);
    1.0 - inv * inv * inv
}

/// Cubic ease-in: `x^3`, input clamped to `[0, 1]`.
#[inline]
pub fn ease_in_cubic(x: f32) -> f32 {
    let x = x.clamp(0.0, 1.0);
    x * x * x
}

/// Hermite smoothstep between `edge0` and `edge1`, same definition as WGSL.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curves_hit_endpoints() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert_eq!(ease_in_cubic(0.0), 0.0);
        assert_eq!(ease_in_cubic(1.0), 1.0);
        assert_eq!(smoothstep(0.2, 0.4, 0.1), 0.0);
        assert_eq!(smoothstep(0.2, 0.4, 0.5), 1.0);
    }

    #[test]
    fn test_ease_out_front_loads_motion() {
        assert!(ease_out_cubic(0.5) > 0.5);
        assert!(ease_in_cubic(0.5) < 0.5);
    }

    #[test]
    fn test_inputs_outside_unit_range_are_clamped() {
        assert_eq!(ease_out_cubic(-3.0), 0.0);
        assert_eq!(ease_in_cubic(7.0), 1.0);
    }
}
