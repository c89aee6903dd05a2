//! Randomised retry-with-fallback packing of constellation templates.

use std::ops::Range;

use glam::{Vec2, Vec3};
use rand::Rng;

use super::{ConstellationBounds, ConstellationTemplate, LineVertex};
use crate::seed::{STREAM_CONSTELLATIONS, stream_rng};
use crate::starfield::SpriteInstance;

/// Camera frustum slab constellations must stay inside.
///
/// The camera sits at the origin looking down -Z; depths are positive
/// distances in front of it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisibleVolume {
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Width / height.
    pub aspect: f32,
    pub near_depth: f32,
    pub far_depth: f32,
    /// Fraction of the frustum cross-section used for placement.
    pub margin: f32,
}

impl Default for VisibleVolume {
    fn default() -> Self {
        Self {
            fov_y: 60f32.to_radians(),
            aspect: 16.0 / 9.0,
            near_depth: 30.0,
            far_depth: 45.0,
            margin: 0.85,
        }
    }
}

impl VisibleVolume {
    /// Half width and half height of the usable rectangle at `depth`.
    pub fn half_extents_at(&self, depth: f32) -> Vec2 {
        let half_height = depth * (self.fov_y * 0.5).tan() * self.margin;
        Vec2::new(half_height * self.aspect, half_height)
    }

    pub fn mid_depth(&self) -> f32 {
        0.5 * (self.near_depth + self.far_depth)
    }

    /// Copy with a new aspect ratio, e.g. after a viewport resize.
    pub fn with_aspect(self, aspect: f32) -> Self {
        Self { aspect, ..self }
    }
}

/// Tuning for [`layout`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutParams {
    pub min_spacing: f32,
    pub max_attempts: u32,
    pub volume: VisibleVolume,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            min_spacing: 2.5,
            max_attempts: 100,
            volume: VisibleVolume::default(),
        }
    }
}

/// How a template's offset was chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlacementKind {
    /// Accepted random candidate, 1-based attempt number.
    Random { attempts: u32 },
    /// Attempt budget exhausted; spacing is not re-checked.
    Grid,
}

/// World placement chosen for one template.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedConstellation {
    pub name: String,
    pub world_offset: Vec3,
    pub extent: f32,
    pub kind: PlacementKind,
    /// Indices of this constellation's stars in the merged star buffer.
    pub stars: Range<u32>,
    /// Indices of this constellation's segments in the merged segment buffer.
    pub segments: Range<u32>,
}

/// Merged world-space output of [`layout`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConstellationField {
    pub stars: Vec<Vec3>,
    pub segments: Vec<[u32; 2]>,
    pub placements: Vec<PlacedConstellation>,
}

impl ConstellationField {
    /// Minimum planar centre distance required between two placements.
    pub fn required_separation(
        min_spacing: f32,
        a: &PlacedConstellation,
        b: &PlacedConstellation,
    ) -> f32 {
        min_spacing + 0.5 * (a.extent + b.extent)
    }

    pub fn used_fallback(&self) -> bool {
        self.placements.iter().any(|p| p.kind == PlacementKind::Grid)
    }

    /// Point sprites for the constellation stars.
    pub fn sprite_instances(&self, size: f32, color: Vec3) -> Vec<SpriteInstance> {
        self.stars
            .iter()
            .map(|p| SpriteInstance::new(*p, size, color))
            .collect()
    }

    /// Two vertices per segment, for a line-list draw.
    pub fn line_vertices(&self, color: [f32; 4]) -> Vec<LineVertex> {
        self.segments
            .iter()
            .flat_map(|[a, b]| [self.stars[*a as usize], self.stars[*b as usize]])
            .map(|p| LineVertex {
                position: p.to_array(),
                color,
            })
            .collect()
    }
}

/// Place every template without overlap and merge their stars and edges.
///
/// Templates are processed in slice order with one RNG stream, so the result
/// is reproducible for a fixed `seed`. Never fails: a template that finds no
/// free spot within `max_attempts` takes its grid cell instead.
pub fn layout(
    templates: &[ConstellationTemplate],
    params: &LayoutParams,
    seed: u64,
) -> ConstellationField {
    let mut rng = stream_rng(seed, STREAM_CONSTELLATIONS, 0);
    let bounds: Vec<ConstellationBounds> = templates.iter().map(|t| t.bounds()).collect();
    let mut field = ConstellationField::default();

    for (index, (template, bounds)) in templates.iter().zip(&bounds).enumerate() {
        let (world_offset, kind) = match find_free_spot(&mut rng, bounds.extent, &field, params) {
            Some((offset, attempts)) => (offset, PlacementKind::Random { attempts }),
            None => {
                log::debug!(
                    "{} found no free spot in {} attempts, using grid cell {index}",
                    template.name,
                    params.max_attempts
                );
                (grid_cell(index, templates.len(), &params.volume), PlacementKind::Grid)
            }
        };

        let star_base = field.stars.len() as u32;
        let segment_base = field.segments.len() as u32;
        let translation = world_offset - bounds.center;
        field
            .stars
            .extend(template.stars.iter().map(|local| *local + translation));

        let star_count = template.stars.len();
        for &(a, b) in template.edges.iter() {
            if a as usize >= star_count || b as usize >= star_count {
                log::warn!("{} edge ({a}, {b}) references a missing star", template.name);
                continue;
            }
            field
                .segments
                .push([star_base + a as u32, star_base + b as u32]);
        }

        field.placements.push(PlacedConstellation {
            name: template.name.to_string(),
            world_offset,
            extent: bounds.extent,
            kind,
            stars: star_base..field.stars.len() as u32,
            segments: segment_base..field.segments.len() as u32,
        });
    }

    log::debug!(
        "Placed {} constellations: {} stars, {} segments",
        field.placements.len(),
        field.stars.len(),
        field.segments.len()
    );
    field
}

fn find_free_spot(
    rng: &mut impl Rng,
    extent: f32,
    field: &ConstellationField,
    params: &LayoutParams,
) -> Option<(Vec3, u32)> {
    let volume = &params.volume;
    for attempt in 1..=params.max_attempts {
        let depth = rng.random_range(volume.near_depth..=volume.far_depth);
        let half = (volume.half_extents_at(depth) - Vec2::splat(extent * 0.5)).max(Vec2::ZERO);
        let candidate = Vec3::new(
            rng.random_range(-half.x..=half.x),
            rng.random_range(-half.y..=half.y),
            -depth,
        );

        let clear = field.placements.iter().all(|other| {
            let needed = params.min_spacing + 0.5 * (extent + other.extent);
            candidate.truncate().distance(other.world_offset.truncate()) > needed
        });
        if clear {
            return Some((candidate, attempt));
        }
    }
    None
}

/// Deterministic fallback: row-major cell of a `ceil(sqrt(n))`-column grid
/// spanning the usable rectangle at mid depth.
fn grid_cell(index: usize, count: usize, volume: &VisibleVolume) -> Vec3 {
    let cols = (count as f32).sqrt().ceil().max(1.0) as usize;
    let rows = count.div_ceil(cols).max(1);
    let depth = volume.mid_depth();
    let half = volume.half_extents_at(depth);
    let cell = Vec2::new(2.0 * half.x / cols as f32, 2.0 * half.y / rows as f32);
    let col = index % cols;
    let row = index / cols;
    Vec3::new(
        -half.x + (col as f32 + 0.5) * cell.x,
        half.y - (row as f32 + 0.5) * cell.y,
        -depth,
    )
}
