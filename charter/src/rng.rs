//! Random streams for chart generation.
//!
//! Every generation call takes its random source explicitly. Seeded runs use
//! PCG32 so the same seed always yields the same chart; unseeded runs draw a
//! fresh PCG32 from OS entropy. Multi-job runs separate songs by PCG stream.

use rand::SeedableRng;
use rand_pcg::Pcg32;

pub fn create_rng(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

pub fn entropy_rng() -> Pcg32 {
    Pcg32::from_entropy()
}

/// Stream for the `index`-th job of a seeded run. Jobs share the base seed
/// but each gets its own PCG stream, so no two jobs draw the same sequence.
pub fn job_rng(base_seed: u64, index: usize) -> Pcg32 {
    Pcg32::new(base_seed, index as u64)
}
