//! Uniformly random candidate generation.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

/// Draws `num_candidates` random strings of length `n` over '0'..'3'.
///
/// The work is split across `thread_num` workers, the remainder going to the
/// first ones. Every worker owns its own generator, seeded from a fresh
/// entropy draw plus the worker index; there is no shared RNG. Duplicates
/// are possible by design.
pub fn generate(n: usize, num_candidates: usize, thread_num: usize) -> Vec<String> {
    let workers = thread_num.max(1);
    let per_worker = num_candidates / workers;
    let remainder = num_candidates % workers;
    let base_seed: u64 = rand::random();

    let shards: Vec<Vec<String>> = (0..workers)
        .into_par_iter()
        .map(|t| {
            let count = per_worker + usize::from(t < remainder);
            let mut rng = StdRng::seed_from_u64(base_seed.wrapping_add(t as u64));
            (0..count).map(|_| random_strand(n, &mut rng)).collect()
        })
        .collect();

    shards.into_iter().flatten().collect()
}

/// One random strand of length `n`.
fn random_strand(n: usize, rng: &mut StdRng) -> String {
    (0..n).map(|_| (b'0' + rng.gen_range(0..4u8)) as char).collect()
}
