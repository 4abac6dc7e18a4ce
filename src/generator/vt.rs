//! Varshamov-Tenengolts and differential VT candidate generation.
//!
//! Both families are found by exhaustive enumeration of the 4^n length-`n`
//! words, split into contiguous index ranges across worker threads. Each
//! worker counts in base 4 from its range start, so the concatenated result
//! is in ascending numeric order regardless of the thread count.

use anyhow::{bail, Result};
use rayon::prelude::*;

use crate::gf4;

/// Below this universe size the enumeration runs single-threaded.
const PARALLEL_THRESHOLD: u64 = 10_000;

/// Words `x` with `sum_{i=2..n} (i-1)*[x_i >= x_{i-1}] == a (mod n)` and
/// `sum x_j == b (mod 4)`.
pub fn generate_vt(n: usize, a: i64, b: i64, thread_num: usize) -> Result<Vec<String>> {
    if n == 0 {
        return Ok(Vec::new());
    }
    enumerate_matching(n, thread_num, |word| is_vt_member(word, a, b))
}

/// Words whose differential syndrome `sum_{i=1..n} i*y_i` is `s (mod 4n)`,
/// where `y_i = (x_i - x_{i+1}) mod 4` for `i < n` and `y_n = x_n`.
pub fn generate_differential_vt(n: usize, s: i64, thread_num: usize) -> Result<Vec<String>> {
    if n == 0 {
        return Ok(Vec::new());
    }
    enumerate_matching(n, thread_num, |word| is_differential_member(word, s))
}

/// True iff `word` satisfies both VT congruences.
pub fn is_vt_member(word: &[u8], a: i64, b: i64) -> bool {
    let n = word.len() as i64;
    let mut alpha_sum: i64 = 0;
    for i in 2..=word.len() {
        if word[i - 1] >= word[i - 2] {
            alpha_sum += (i - 1) as i64;
        }
    }
    if alpha_sum.rem_euclid(n) != a.rem_euclid(n) {
        return false;
    }
    let element_sum: i64 = word.iter().map(|&d| d as i64).sum();
    element_sum.rem_euclid(4) == b.rem_euclid(4)
}

/// True iff `word` satisfies the differential VT congruence.
pub fn is_differential_member(word: &[u8], s: i64) -> bool {
    let n = word.len();
    let modulus = 4 * n as i64;
    let mut syndrome: i64 = 0;
    for i in 0..n {
        let y = if i + 1 < n {
            (word[i] as i64 - word[i + 1] as i64).rem_euclid(4)
        } else {
            word[i] as i64
        };
        syndrome += (i + 1) as i64 * y;
    }
    syndrome.rem_euclid(modulus) == s.rem_euclid(modulus)
}

/// Enumerates all 4^n words across `thread_num` contiguous ranges and keeps
/// those matching `pred`.
fn enumerate_matching<F>(n: usize, thread_num: usize, pred: F) -> Result<Vec<String>>
where
    F: Fn(&[u8]) -> bool + Sync,
{
    let mut total: u64 = 1;
    for _ in 0..n {
        total = match total.checked_mul(4) {
            Some(t) => t,
            None => bail!(
                "enumeration space 4^{} is too large for a 64-bit index",
                n
            ),
        };
    }

    let workers = if total < PARALLEL_THRESHOLD {
        1
    } else {
        thread_num.max(1)
    };
    let per_worker = total / workers as u64;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()?;
    let shards: Vec<Vec<String>> = pool.install(|| {
        (0..workers)
            .into_par_iter()
            .map(|t| {
                let start = t as u64 * per_worker;
                let count = if t == workers - 1 {
                    total - start
                } else {
                    per_worker
                };
                let mut word = gf4::index_to_word(start, n);
                let mut matches = Vec::new();
                for i in 0..count {
                    if pred(&word) {
                        matches.push(gf4::digits_to_string(&word));
                    }
                    if i + 1 < count {
                        gf4::advance_base4(&mut word);
                    }
                }
                matches
            })
            .collect()
    });

    Ok(shards.into_iter().flatten().collect())
}
