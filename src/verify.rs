//! Parallel re-check of the codebook distance invariant.

use crossbeam_channel::unbounded;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::distance::{banded_at_least, PatternHandle};

/// Checks that every pair of `words` is at edit distance >= `min_ed`.
///
/// Vertices are partitioned over `thread_num` workers by modular stride;
/// the first failure flips a shared flag and the other workers stop at the
/// next outer index. Pure re-verification: the codebook has already been
/// written when this runs.
pub fn verify_min_distance(words: &[String], min_ed: usize, thread_num: usize) -> bool {
    let thread_num = thread_num.max(1);
    let success = AtomicBool::new(true);
    let threshold = min_ed as i32;

    let pool = match rayon::ThreadPoolBuilder::new().num_threads(thread_num).build() {
        Ok(pool) => pool,
        Err(err) => {
            eprintln!("Warning: verification pool unavailable: {}", err);
            return verify_stride(words, threshold, 0, 1, &success);
        }
    };

    let (tx, rx) = unbounded();
    pool.scope(|scope| {
        for t in 0..thread_num {
            let tx = tx.clone();
            let success = &success;
            scope.spawn(move |_| {
                let ok = verify_stride(words, threshold, t, thread_num, success);
                let _ = tx.send(ok);
            });
        }
    });
    drop(tx);

    let all_ok = rx.iter().all(|ok| ok);
    all_ok && success.load(Ordering::Relaxed)
}

/// Verifies the outer indices `start, start + stride, ...`.
fn verify_stride(
    words: &[String],
    threshold: i32,
    start: usize,
    stride: usize,
    success: &AtomicBool,
) -> bool {
    let mut i = start;
    while i < words.len() {
        if !success.load(Ordering::Relaxed) {
            return false;
        }
        let handle = PatternHandle::new(&words[i]);
        for j in (i + 1)..words.len() {
            if !banded_at_least(&words[j], &handle, threshold) {
                success.store(false, Ordering::Relaxed);
                return false;
            }
        }
        i += stride;
    }
    true
}
