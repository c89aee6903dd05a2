//! Compiled-in zodiac catalog. Coordinates are local units; the layout engine
//! recentres each pattern before placing it.

use glam::Vec3;

use super::ConstellationTemplate;

const fn v(x: f32, y: f32, z: f32) -> Vec3 {
    Vec3::new(x, y, z)
}

const ARIES: &[Vec3] = &[v(-1.6, 0.2, 0.0), v(0.3, 0.7, 0.1), v(1.2, 0.4, -0.1)];
const ARIES_EDGES: &[(u16, u16)] = &[(0, 1), (1, 2)];

const TAURUS: &[Vec3] = &[
    v(-2.0, 1.6, 0.0),
    v(-0.6, 0.3, 0.2),
    v(0.0, 0.0, 0.0),
    v(0.7, 0.4, -0.2),
    v(2.0, 1.8, 0.1),
];
const TAURUS_EDGES: &[(u16, u16)] = &[(0, 1), (1, 2), (2, 3), (3, 4)];

const GEMINI: &[Vec3] = &[
    v(-0.8, 2.0, 0.0),
    v(-0.6, -1.5, 0.1),
    v(0.6, 2.2, -0.1),
    v(0.8, -1.3, 0.0),
];
const GEMINI_EDGES: &[(u16, u16)] = &[(0, 1), (0, 2), (2, 3)];

const CANCER: &[Vec3] = &[
    v(0.0, 0.0, 0.0),
    v(0.1, 1.6, 0.1),
    v(-1.3, -1.4, 0.0),
    v(1.2, -1.3, -0.1),
    v(0.3, -0.5, 0.2),
];
const CANCER_EDGES: &[(u16, u16)] = &[(1, 0), (0, 2), (0, 4), (4, 3)];

const LEO: &[Vec3] = &[
    v(-2.6, -0.4, 0.0),
    v(-1.2, -0.2, 0.1),
    v(-0.9, 0.9, 0.0),
    v(-1.4, 1.8, -0.1),
    v(-0.6, 2.4, 0.0),
    v(1.6, 0.8, 0.2),
    v(2.7, -0.6, 0.0),
    v(0.9, -0.5, 0.1),
];
const LEO_EDGES: &[(u16, u16)] = &[
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 4),
    (1, 7),
    (2, 5),
    (5, 6),
    (6, 7),
];

const VIRGO: &[Vec3] = &[
    v(-2.5, 1.2, 0.0),
    v(-1.4, 0.6, 0.1),
    v(-0.3, 0.9, 0.0),
    v(0.4, -0.2, -0.1),
    v(1.6, 0.3, 0.0),
    v(2.4, 1.4, 0.1),
    v(0.2, -1.8, 0.0),
];
const VIRGO_EDGES: &[(u16, u16)] = &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (3, 6)];

const LIBRA: &[Vec3] = &[
    v(0.0, 1.6, 0.0),
    v(-1.3, 0.2, 0.1),
    v(1.2, 0.4, -0.1),
    v(-0.4, -1.5, 0.0),
];
const LIBRA_EDGES: &[(u16, u16)] = &[(0, 1), (0, 2), (1, 2), (1, 3)];

const SCORPIUS: &[Vec3] = &[
    v(-2.4, 2.0, 0.0),
    v(-2.0, 1.0, 0.1),
    v(-1.2, 0.3, 0.0),
    v(-0.5, -0.6, 0.1),
    v(0.3, -1.4, 0.0),
    v(1.3, -1.7, -0.1),
    v(2.2, -1.1, 0.0),
    v(2.0, -0.2, 0.1),
];
const SCORPIUS_EDGES: &[(u16, u16)] = &[
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 4),
    (4, 5),
    (5, 6),
    (6, 7),
];

const SAGITTARIUS: &[Vec3] = &[
    v(-1.8, -1.0, 0.0),
    v(-0.4, -1.2, 0.1),
    v(0.9, -0.9, 0.0),
    v(1.4, 0.4, -0.1),
    v(0.4, 0.6, 0.0),
    v(-0.8, 0.3, 0.1),
    v(-0.1, 1.7, 0.0),
    v(2.3, 1.1, 0.0),
];
const SAGITTARIUS_EDGES: &[(u16, u16)] = &[
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 4),
    (4, 5),
    (5, 0),
    (4, 6),
    (3, 7),
    (1, 5),
];

const CAPRICORNUS: &[Vec3] = &[
    v(-2.3, 1.3, 0.0),
    v(-1.6, -0.2, 0.1),
    v(-0.2, -1.2, 0.0),
    v(1.2, -0.8, -0.1),
    v(2.4, 0.9, 0.0),
    v(0.2, 0.8, 0.1),
];
const CAPRICORNUS_EDGES: &[(u16, u16)] = &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 0)];

const AQUARIUS: &[Vec3] = &[
    v(-2.2, 1.9, 0.0),
    v(-1.0, 1.1, 0.1),
    v(0.1, 1.5, 0.0),
    v(0.6, 0.1, -0.1),
    v(-0.2, -1.3, 0.0),
    v(1.5, -2.0, 0.1),
];
const AQUARIUS_EDGES: &[(u16, u16)] = &[(0, 1), (1, 2), (2, 3), (3, 4), (3, 5)];

const PISCES: &[Vec3] = &[
    v(-2.8, 1.8, 0.0),
    v(-2.1, 0.8, 0.1),
    v(-1.2, -0.4, 0.0),
    v(0.0, -1.6, -0.1),
    v(1.3, -0.9, 0.0),
    v(2.4, -0.4, 0.1),
    v(2.7, -1.5, 0.0),
];
const PISCES_EDGES: &[(u16, u16)] = &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 6), (6, 4)];

/// The twelve zodiac constellations in catalog (placement) order.
pub static ZODIAC: [ConstellationTemplate; 12] = [
    ConstellationTemplate::from_static("Aries", ARIES, ARIES_EDGES),
    ConstellationTemplate::from_static("Taurus", TAURUS, TAURUS_EDGES),
    ConstellationTemplate::from_static("Gemini", GEMINI, GEMINI_EDGES),
    ConstellationTemplate::from_static("Cancer", CANCER, CANCER_EDGES),
    ConstellationTemplate::from_static("Leo", LEO, LEO_EDGES),
    ConstellationTemplate::from_static("Virgo", VIRGO, VIRGO_EDGES),
    ConstellationTemplate::from_static("Libra", LIBRA, LIBRA_EDGES),
    ConstellationTemplate::from_static("Scorpius", SCORPIUS, SCORPIUS_EDGES),
    ConstellationTemplate::from_static("Sagittarius", SAGITTARIUS, SAGITTARIUS_EDGES),
    ConstellationTemplate::from_static("Capricornus", CAPRICORNUS, CAPRICORNUS_EDGES),
    ConstellationTemplate::from_static("Aquarius", AQUARIUS, AQUARIUS_EDGES),
    ConstellationTemplate::from_static("Pisces", PISCES, PISCES_EDGES),
];

/// Look up a catalog entry by name (case-insensitive).
pub fn find(name: &str) -> Option<&'static ConstellationTemplate> {
    ZODIAC.iter().find(|t| t.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_edge_references_a_star() {
        for t in &ZODIAC {
            for &(a, b) in t.edges.iter() {
                assert!(
                    (a as usize) < t.stars.len() && (b as usize) < t.stars.len(),
                    "{} has dangling edge ({a}, {b})",
                    t.name
                );
                assert_ne!(a, b, "{} has a degenerate edge", t.name);
            }
        }
    }

    #[test]
    fn test_extents_are_small() {
        for t in &ZODIAC {
            let extent = t.bounds().extent;
            assert!(extent > 0.5 && extent <= 6.0, "{} extent {extent}", t.name);
        }
    }

    #[test]
    fn test_reference_edge_counts() {
        assert_eq!(find("Aries").map(|t| t.edges.len()), Some(2));
        assert_eq!(find("taurus").map(|t| t.edges.len()), Some(4));
        assert_eq!(find("GEMINI").map(|t| t.edges.len()), Some(3));
        assert!(find("Ophiuchus").is_none());
    }

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<&str> = ZODIAC.iter().map(|t| t.name.as_ref()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), ZODIAC.len());
    }
}
