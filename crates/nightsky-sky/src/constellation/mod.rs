//! Constellation catalog, bounds, and non-overlapping placement.
//!
//! Templates are placed once at scene init. Each template tries random
//! candidate offsets inside the visible volume and falls back to a
//! deterministic grid cell when the attempt budget runs out.

mod catalog;
mod layout;

use std::borrow::Cow;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

pub use catalog::{ZODIAC, find};
pub use layout::{
    ConstellationField, LayoutParams, PlacedConstellation, PlacementKind, VisibleVolume, layout,
};

/// A named star pattern in local coordinates plus the edges connecting it.
#[derive(Clone, Debug, PartialEq)]
pub struct ConstellationTemplate {
    pub name: Cow<'static, str>,
    pub stars: Cow<'static, [Vec3]>,
    pub edges: Cow<'static, [(u16, u16)]>,
}

impl ConstellationTemplate {
    /// Borrow compiled-in catalog data.
    pub const fn from_static(
        name: &'static str,
        stars: &'static [Vec3],
        edges: &'static [(u16, u16)],
    ) -> Self {
        Self {
            name: Cow::Borrowed(name),
            stars: Cow::Borrowed(stars),
            edges: Cow::Borrowed(edges),
        }
    }

    /// Build an owned template, e.g. for procedurally generated patterns.
    pub fn new(name: impl Into<String>, stars: Vec<Vec3>, edges: Vec<(u16, u16)>) -> Self {
        Self {
            name: Cow::Owned(name.into()),
            stars: Cow::Owned(stars),
            edges: Cow::Owned(edges),
        }
    }

    pub fn bounds(&self) -> ConstellationBounds {
        ConstellationBounds::from_points(&self.stars)
    }
}

/// Axis-aligned bounds of a template's local stars.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstellationBounds {
    pub min: Vec3,
    pub max: Vec3,
    pub center: Vec3,
    /// Largest footprint side in the placement (XY) plane.
    pub extent: f32,
}

impl ConstellationBounds {
    /// Bounds of a point set; an empty set yields zero-sized bounds at the origin.
    pub fn from_points(points: &[Vec3]) -> Self {
        if points.is_empty() {
            return Self {
                min: Vec3::ZERO,
                max: Vec3::ZERO,
                center: Vec3::ZERO,
                extent: 0.0,
            };
        }
        let (min, max) = points
            .iter()
            .fold((Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)), |(lo, hi), p| {
                (lo.min(*p), hi.max(*p))
            });
        let size = max - min;
        Self {
            min,
            max,
            center: (min + max) * 0.5,
            extent: size.x.max(size.y),
        }
    }
}

/// One endpoint of a constellation segment, ready for a line-list vertex buffer.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_of_simple_points() {
        let b = ConstellationBounds::from_points(&[
            Vec3::new(-1.0, 0.0, 0.5),
            Vec3::new(3.0, 2.0, -0.5),
        ]);
        assert_eq!(b.min, Vec3::new(-1.0, 0.0, -0.5));
        assert_eq!(b.max, Vec3::new(3.0, 2.0, 0.5));
        assert_eq!(b.center, Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(b.extent, 4.0);
    }

    #[test]
    fn test_bounds_of_empty_template() {
        let t = ConstellationTemplate::new("Void", vec![], vec![]);
        assert_eq!(t.bounds().extent, 0.0);
    }

    #[test]
    fn test_owned_and_static_templates_compare_equal() {
        const STARS: &[Vec3] = &[Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)];
        let a = ConstellationTemplate::from_static("Pair", STARS, &[(0, 1)]);
        let b = ConstellationTemplate::new("Pair", STARS.to_vec(), vec![(0, 1)]);
        assert_eq!(a, b);
    }
}
