//! Seedable random number generation.
//!
//! Every stochastic operation in the crate takes `&mut R: Rng`; runs own a
//! single generator built here so a fixed seed reproduces a run exactly.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Deterministic generator for a seed.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Generator for an optional seed, falling back to a fresh random seed.
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    create_rng(seed.unwrap_or_else(rand::random))
}
