//! Linear block codes over GF(4) with guaranteed minimum Hamming distance.
//!
//! Candidates come from shortened codes: for a target length `n` the leading
//! `base_len - n` rows and columns of a fixed base generator matrix are
//! deleted. All base matrices are in systematic form `[I_k | P]`, which keeps
//! shortening valid (the removed message positions only touch the removed
//! rows). Data vectors of length `k = n - (2d - 3)` are enumerated by
//! counting in base 4 and encoded by a vector-matrix product.
//!
//! Base codes: `[n, n-1, 2]` is the plain parity code; `[21, 18, 3]` is the
//! GF(4) Hamming code with three redundancy symbols; `[41, 36, 4]` has the
//! 41-cap of PG(4,4) as its parity-check columns; `[43, 36, 5]` is the
//! cyclic code generated by a degree-7 divisor of x^43 - 1, systematized.

use anyhow::{bail, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::config::{BiasSpec, CodeTransform, PermSpec};
use crate::gf4;

/// Generator matrix of the [21, 18, 3] base code.
const GEN_21_18_3: [[u8; 21]; 18] = [
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 0],
    [0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2, 1, 0],
    [0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 3, 1, 0],
    [0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 1],
    [0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2, 0, 1],
    [0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 3, 0, 1],
    [0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1],
    [0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1],
    [0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2, 1, 1],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 3, 1, 1],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 2, 1],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 1, 2, 1],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 2, 2, 1],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 3, 2, 1],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 3, 1],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 1, 3, 1],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 2, 3, 1],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 3, 3, 1],
];

/// Generator matrix of the [41, 36, 4] base code.
const GEN_41_36_4: [[u8; 41]; 36] = [
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 3, 2, 3],
    [0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2, 2, 2, 2, 3],
    [0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2, 2, 0, 2, 0],
    [0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 3, 0, 3],
    [0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2, 3, 2, 1, 2],
    [0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 3, 3, 3, 2, 2],
    [0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 3, 0, 1, 2, 3],
    [0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1],
    [0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 3, 2, 0, 1, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 2, 0, 1, 2],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 3, 3, 1, 2, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 1, 2, 1],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 2, 2, 3],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 2, 1],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 3, 1, 0, 3],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 3, 1, 2, 1, 1],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 3, 1, 3, 2],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2, 1, 0, 1, 2],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 3, 2, 2, 2, 2],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 3, 0, 2],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2, 3, 1, 0, 1],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2, 2, 1, 2, 1],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2, 0, 0, 2, 2],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 3, 1, 2, 2],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2, 0, 3, 3, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 3, 3, 0, 0, 1],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2, 0, 0, 1, 3],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 3, 2, 3, 3, 2],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 1, 3, 3, 1, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 3, 3, 3, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 2, 1, 1, 0, 2],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 2, 3, 3, 0, 2],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 2, 2, 1, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 3, 2, 1, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 2, 1, 1, 2],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 2, 1, 3, 0, 1],
];

/// Generator matrix of the [43, 36, 5] base code.
const GEN_43_36_5: [[u8; 43]; 36] = [
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 3, 0, 0, 2, 1],
    [0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 2, 3, 0, 2, 3],
    [0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 3, 2, 2, 2, 3, 1, 1],
    [0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 2, 1, 2, 2, 1, 0],
    [0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 2, 1, 2, 2, 1],
    [0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 2, 2, 1, 0, 3],
    [0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 3, 2, 3, 2, 2, 0, 3],
    [0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 3, 0, 0, 3, 2, 3, 3],
    [0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 3, 0, 2, 0, 3, 3, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 3, 0, 2, 0, 3, 3],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 3, 3, 1, 0, 2, 1, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 3, 3, 1, 0, 2, 1],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 0, 3, 1, 2, 3],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 3, 2, 3, 0, 3, 0, 1],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 2, 1, 3, 0, 1, 1],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 1, 1, 3, 2, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 1, 1, 3, 2],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2, 2, 0, 0, 1, 2, 1],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 3, 1, 0, 0, 3, 3],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 3, 2, 1, 1, 0, 1, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 3, 2, 1, 1, 0, 1],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 0, 2, 1, 3, 1],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 2, 0, 2, 3, 2],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2, 3, 1, 2, 0, 1, 1],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 3, 0, 1, 2, 2, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 3, 0, 1, 2, 2],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2, 2, 0, 3, 0, 2, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2, 2, 0, 3, 0, 2],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 2, 2, 3, 2, 0, 0, 2],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 2, 0, 3, 3, 2, 3, 2],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 2, 0, 1, 3, 3, 1, 1],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1, 3, 3, 1, 3, 1, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1, 3, 3, 1, 3, 1],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 1, 1, 2, 3, 3, 3, 2],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 2, 3, 0, 2, 3, 0, 1],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 3, 0, 0, 2, 1, 1],
];

/// Deletes the first `del_num` rows and columns of a generator matrix,
/// yielding the generator of the shortened code.
fn shorten(mat: Vec<Vec<u8>>, del_num: usize) -> Vec<Vec<u8>> {
    assert!(del_num < mat.len());
    assert!(del_num < mat[0].len());
    mat.into_iter()
        .skip(del_num)
        .map(|row| row[del_num..].to_vec())
        .collect()
}

/// Generator matrix for the parity code [n, n-1, 2]: an identity block plus
/// a final column of ones.
fn gen_mat_2(n: usize) -> Vec<Vec<u8>> {
    let mut mat = vec![vec![0u8; n]; n - 1];
    for (i, row) in mat.iter_mut().enumerate() {
        row[i] = 1;
        row[n - 1] = 1;
    }
    mat
}

fn base_rows(min_hd: usize) -> Vec<Vec<u8>> {
    match min_hd {
        3 => GEN_21_18_3.iter().map(|r| r.to_vec()).collect(),
        4 => GEN_41_36_4.iter().map(|r| r.to_vec()).collect(),
        5 => GEN_43_36_5.iter().map(|r| r.to_vec()).collect(),
        _ => unreachable!(),
    }
}

/// Generator matrix for length `n` and minimum Hamming distance `min_hd`.
fn generator_matrix(n: usize, min_hd: usize) -> Result<Vec<Vec<u8>>> {
    match min_hd {
        2 => {
            if n < 2 {
                bail!("LinearCode with minHD=2 requires code length >= 2, got {}", n);
            }
            Ok(gen_mat_2(n))
        }
        3 => {
            if !(4..=21).contains(&n) {
                bail!("LinearCode with minHD=3 requires code length in 4..=21, got {}", n);
            }
            Ok(shorten(base_rows(3), 21 - n))
        }
        4 => {
            if !(6..=41).contains(&n) {
                bail!("LinearCode with minHD=4 requires code length in 6..=41, got {}", n);
            }
            Ok(shorten(base_rows(4), 41 - n))
        }
        5 => {
            if !(8..=43).contains(&n) {
                bail!("LinearCode with minHD=5 requires code length in 8..=43, got {}", n);
            }
            Ok(shorten(base_rows(5), 43 - n))
        }
        other => bail!("unsupported LinearCode minimum Hamming distance {}", other),
    }
}

/// Parity-check matrix of the shortened [n, n-(2d-3), d] code, stored
/// transposed (n rows of n-k checks each) so that a syndrome is simply
/// `word x H`. With `G = [I | P]` this is `P` stacked on an identity block.
pub fn parity_check_matrix(n: usize, min_hd: usize) -> Result<Vec<Vec<u8>>> {
    let g = generator_matrix(n, min_hd)?;
    let k = g.len();
    let r = n - k;
    let mut h = Vec::with_capacity(n);
    for row in &g {
        h.push(row[k..].to_vec());
    }
    for i in 0..r {
        let mut unit = vec![0u8; r];
        unit[i] = 1;
        h.push(unit);
    }
    Ok(h)
}

/// Resolves the bias vector; random draws come from `rng`.
fn resolve_bias(spec: &BiasSpec, n: usize, rng: &mut StdRng) -> Result<Option<Vec<u8>>> {
    match spec {
        BiasSpec::Zero => Ok(None),
        BiasSpec::Random => Ok(Some((0..n).map(|_| rng.gen_range(0..4u8)).collect())),
        BiasSpec::Manual(v) => {
            if v.len() != n {
                bail!("bias vector has length {}, expected the code length {}", v.len(), n);
            }
            if v.iter().any(|&x| x > 3) {
                bail!("bias vector entries must be GF(4) values 0-3");
            }
            Ok(Some(v.clone()))
        }
    }
}

/// Resolves a permutation of `0..size`; `result[j]` is the source index for
/// output position `j`.
fn resolve_perm(
    spec: &PermSpec,
    size: usize,
    rng: &mut StdRng,
    what: &str,
) -> Result<Option<Vec<usize>>> {
    match spec {
        PermSpec::Identity => Ok(None),
        PermSpec::Random => {
            let mut perm: Vec<usize> = (0..size).collect();
            perm.shuffle(rng);
            Ok(Some(perm))
        }
        PermSpec::Manual(v) => {
            if v.len() != size {
                bail!("{} permutation has length {}, expected {}", what, v.len(), size);
            }
            let mut seen = vec![false; size];
            for &idx in v {
                if idx >= size || seen[idx] {
                    bail!("{} permutation is not a permutation of 0..{}", what, size);
                }
                seen[idx] = true;
            }
            Ok(Some(v.clone()))
        }
    }
}

/// Every codeword of the shortened [n, n-(2d-3), d] code, as strings over
/// '0'..'3' in ascending data-vector order, after applying the configured
/// affine transform.
///
/// The bias and the column permutation act on whole codewords (neither
/// changes pairwise Hamming distances); the row permutation reorders the
/// message enumeration. Random choices are drawn from `transform.seed` in
/// the fixed order bias, rows, columns.
pub fn coded_strings(n: usize, min_hd: usize, transform: &CodeTransform) -> Result<Vec<String>> {
    let mut mat = generator_matrix(n, min_hd)?;
    let k = mat.len();

    let mut rng = StdRng::seed_from_u64(transform.seed);
    let bias = resolve_bias(&transform.bias, n, &mut rng)?;
    let row_perm = resolve_perm(&transform.row_perm, k, &mut rng, "row")?;
    let col_perm = resolve_perm(&transform.col_perm, n, &mut rng, "column")?;

    if let Some(perm) = &row_perm {
        mat = perm.iter().map(|&i| mat[i].clone()).collect();
    }

    let mut result = Vec::with_capacity(4usize.saturating_pow(k.min(13) as u32));
    let mut data = vec![0u8; k];
    loop {
        let mut coded = gf4::vec_mat_mul(&data, &mat);
        if let Some(perm) = &col_perm {
            coded = perm.iter().map(|&j| coded[j]).collect();
        }
        if let Some(bias) = &bias {
            for (c, b) in coded.iter_mut().zip(bias) {
                *c = gf4::add(*c, *b);
            }
        }
        result.push(gf4::digits_to_string(&coded));
        if !gf4::advance_base4(&mut data) {
            break;
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::hamming;
    use std::collections::HashSet;

    fn plain(n: usize, min_hd: usize) -> Result<Vec<String>> {
        coded_strings(n, min_hd, &CodeTransform::default())
    }

    fn assert_min_pairwise_hamming(words: &[String], d: usize) {
        for i in 0..words.len() {
            for j in (i + 1)..words.len() {
                assert!(
                    hamming(&words[i], &words[j]) >= d,
                    "{} vs {} below distance {}",
                    words[i],
                    words[j],
                    d
                );
            }
        }
    }

    #[test]
    fn test_parity_code_distance_two() {
        let words = plain(4, 2).unwrap();
        assert_eq!(words.len(), 64); // 4^(n-1)
        assert_min_pairwise_hamming(&words, 2);
    }

    #[test]
    fn test_hamming_code_distance_three() {
        let words = plain(5, 3).unwrap();
        assert_eq!(words.len(), 16); // 4^(n-3)
        assert_min_pairwise_hamming(&words, 3);
        assert!(words.iter().all(|w| w.len() == 5));
    }

    #[test]
    fn test_distance_four_code() {
        let words = plain(8, 4).unwrap();
        assert_eq!(words.len(), 64); // 4^(n-5)
        assert_min_pairwise_hamming(&words, 4);
    }

    #[test]
    fn test_distance_five_code() {
        let words = plain(10, 5).unwrap();
        assert_eq!(words.len(), 64); // 4^(n-7)
        assert_min_pairwise_hamming(&words, 5);
    }

    #[test]
    fn test_full_length_codes_have_expected_dimensions() {
        let m3 = generator_matrix(21, 3).unwrap();
        assert_eq!((m3.len(), m3[0].len()), (18, 21));
        let m4 = generator_matrix(41, 4).unwrap();
        assert_eq!((m4.len(), m4[0].len()), (36, 41));
        let m5 = generator_matrix(43, 5).unwrap();
        assert_eq!((m5.len(), m5[0].len()), (36, 43));
    }

    #[test]
    fn test_length_out_of_range_is_rejected() {
        assert!(plain(3, 3).is_err());
        assert!(plain(22, 3).is_err());
        assert!(plain(5, 4).is_err());
        assert!(plain(42, 4).is_err());
        assert!(plain(7, 5).is_err());
        assert!(plain(44, 5).is_err());
        assert!(plain(1, 2).is_err());
    }

    #[test]
    fn test_unsupported_distance_is_rejected() {
        assert!(plain(10, 1).is_err());
        assert!(plain(10, 6).is_err());
    }

    #[test]
    fn test_minimal_lengths() {
        // smallest legal n for each distance leaves a one-symbol data vector
        assert_eq!(plain(4, 3).unwrap().len(), 4);
        assert_eq!(plain(6, 4).unwrap().len(), 4);
        assert_eq!(plain(8, 5).unwrap().len(), 4);
        assert_min_pairwise_hamming(&plain(4, 3).unwrap(), 3);
        assert_min_pairwise_hamming(&plain(6, 4).unwrap(), 4);
        assert_min_pairwise_hamming(&plain(8, 5).unwrap(), 5);
    }

    #[test]
    fn test_bias_shifts_the_code_and_keeps_distances() {
        let transform = CodeTransform {
            bias: BiasSpec::Manual(vec![1, 2, 3, 0, 1]),
            ..Default::default()
        };
        let plain_words: HashSet<String> = plain(5, 3).unwrap().into_iter().collect();
        let biased = coded_strings(5, 3, &transform).unwrap();
        assert_eq!(biased.len(), 16);
        assert_min_pairwise_hamming(&biased, 3);
        // the shifted coset no longer contains the all-zero word
        assert!(!biased.contains(&"00000".to_string()));
        assert!(biased.iter().any(|w| !plain_words.contains(w)));
    }

    #[test]
    fn test_column_permutation_keeps_distances() {
        let transform = CodeTransform {
            col_perm: PermSpec::Manual(vec![4, 3, 2, 1, 0]),
            ..Default::default()
        };
        let permuted = coded_strings(5, 3, &transform).unwrap();
        let original = plain(5, 3).unwrap();
        assert_min_pairwise_hamming(&permuted, 3);
        // reversal of every codeword
        for (p, o) in permuted.iter().zip(&original) {
            let reversed: String = o.chars().rev().collect();
            assert_eq!(*p, reversed);
        }
    }

    #[test]
    fn test_row_permutation_reorders_but_keeps_the_set() {
        let transform = CodeTransform {
            row_perm: PermSpec::Manual(vec![1, 0]),
            ..Default::default()
        };
        let reordered = coded_strings(5, 3, &transform).unwrap();
        let original = plain(5, 3).unwrap();
        assert_ne!(reordered, original);
        let a: HashSet<String> = reordered.into_iter().collect();
        let b: HashSet<String> = original.into_iter().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_random_transform_is_reproducible() {
        let transform = CodeTransform {
            bias: BiasSpec::Random,
            row_perm: PermSpec::Random,
            col_perm: PermSpec::Random,
            seed: 1234,
        };
        let once = coded_strings(8, 4, &transform).unwrap();
        let again = coded_strings(8, 4, &transform).unwrap();
        assert_eq!(once, again);
        assert_min_pairwise_hamming(&once, 4);

        let mut other = transform.clone();
        other.seed = 1235;
        assert_ne!(coded_strings(8, 4, &other).unwrap(), once);
    }

    #[test]
    fn test_invalid_manual_vectors_are_rejected() {
        let bad_bias = CodeTransform {
            bias: BiasSpec::Manual(vec![0, 1]),
            ..Default::default()
        };
        assert!(coded_strings(5, 3, &bad_bias).is_err());

        let bad_symbol = CodeTransform {
            bias: BiasSpec::Manual(vec![0, 1, 2, 3, 4]),
            ..Default::default()
        };
        assert!(coded_strings(5, 3, &bad_symbol).is_err());

        let bad_perm = CodeTransform {
            col_perm: PermSpec::Manual(vec![0, 0, 1, 2, 3]),
            ..Default::default()
        };
        assert!(coded_strings(5, 3, &bad_perm).is_err());

        let short_perm = CodeTransform {
            row_perm: PermSpec::Manual(vec![0]),
            ..Default::default()
        };
        assert!(coded_strings(5, 3, &short_perm).is_err());
    }
}
