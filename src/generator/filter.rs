//! Biological constraints on candidate strings.
//!
//! Two predicates are supported: a GC-content window and a bound on the
//! longest homopolymer run. Only predicates whose parameters are active are
//! evaluated; filtering preserves the generator's output order.

use crate::config::Params;

/// Fraction of symbols that are '1' (C) or '2' (G).
pub fn gc_content(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }
    let gc = s.bytes().filter(|&b| b == b'1' || b == b'2').count();
    gc as f64 / s.len() as f64
}

/// True iff the GC-content lies inside `[min_gc, max_gc]`.
pub fn gc_in_window(s: &str, min_gc: f64, max_gc: f64) -> bool {
    let gc = gc_content(s);
    gc >= min_gc && gc <= max_gc
}

/// Length of the longest run of identical consecutive symbols.
pub fn max_run(s: &str) -> usize {
    let bytes = s.as_bytes();
    if bytes.is_empty() {
        return 0;
    }
    let mut longest = 1;
    let mut current = 1;
    for w in bytes.windows(2) {
        if w[0] == w[1] {
            current += 1;
            if current > longest {
                longest = current;
            }
        } else {
            current = 1;
        }
    }
    longest
}

/// True iff `s` passes every active filter in `params`.
pub fn passes(s: &str, params: &Params) -> bool {
    if params.max_run > 0 && max_run(s) > params.max_run {
        return false;
    }
    let gc_active = params.min_gc > 0.0 || params.max_gc > 0.0;
    if gc_active && !gc_in_window(s, params.min_gc, params.max_gc) {
        return false;
    }
    true
}

/// Applies the active filters as a conjunction, preserving order.
pub fn apply_filters(strings: Vec<String>, params: &Params) -> Vec<String> {
    let max_run_active = params.max_run > 0;
    let gc_active = params.min_gc > 0.0 || params.max_gc > 0.0;
    if !max_run_active && !gc_active {
        return strings;
    }
    strings.into_iter().filter(|s| passes(s, params)).collect()
}
