//! Deterministic seeded generation utilities.
//!
//! Every random draw in the sky is keyed by `(global seed, stream name, index)`
//! so that regenerating a scene with the same seed reproduces it exactly.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Stream name for background stars.
pub const STREAM_STARS: &str = "stars";
/// Stream name for constellation placement.
pub const STREAM_CONSTELLATIONS: &str = "constellations";
/// Stream name for shooting star paths.
pub const STREAM_SHOOTING_STARS: &str = "shooting-stars";
/// Stream name for floating motes.
pub const STREAM_MOTES: &str = "motes";

/// Derive a u64 seed for one element of one generator stream.
///
/// Uses SipHash (via std's `DefaultHasher`) to combine the global seed with
/// the stream name and element index into a well-distributed u64.
pub fn derive_seed(global_seed: u64, stream: &str, index: u64) -> u64 {
    let mut hasher = DefaultHasher::new();
    global_seed.hash(&mut hasher);
    stream.hash(&mut hasher);
    index.hash(&mut hasher);
    hasher.finish()
}

/// Derive a deterministic RNG for a specific stream element.
///
/// The returned RNG produces an identical sequence for the same
/// `(global_seed, stream, index)` triple on every run.
pub fn stream_rng(global_seed: u64, stream: &str, index: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(derive_seed(global_seed, stream, index))
}
