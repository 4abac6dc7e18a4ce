//! Candidate generation strategies.
//!
//! Each [`Method`](crate::config::Method) variant produces an unfiltered set
//! of length-`code_len` strings over the {0,1,2,3} alphabet;
//! [`candidates`] runs the configured generator and applies the biological
//! filters on top. Candidates are immutable once emitted: their position in
//! the returned vector is the vertex identifier used by every downstream
//! stage.

pub mod file;
pub mod filter;
pub mod linear;
pub mod random;
pub mod util;
pub mod vt;

use anyhow::Result;
use std::fmt::Write;

use crate::config::{Method, Params};
use crate::gf4;

pub use filter::apply_filters;

/// Generates the unfiltered candidate set for the configured method.
pub fn generate(params: &Params) -> Result<Vec<String>> {
    match &params.method {
        Method::LinearCode { min_hd, transform } => {
            linear::coded_strings(params.code_len, *min_hd, transform)
        }
        Method::AllStrings => Ok(all_strings(params.code_len)),
        Method::Random { num_candidates } => Ok(random::generate(
            params.code_len,
            *num_candidates,
            params.thread_num,
        )),
        Method::VtCode { a, b } => {
            vt::generate_vt(params.code_len, *a, *b, params.thread_num)
        }
        Method::DifferentialVtCode { syndrome } => {
            vt::generate_differential_vt(params.code_len, *syndrome, params.thread_num)
        }
        Method::FileRead { path } => file::read_candidates(path, params.code_len),
    }
}

/// Generates candidates and applies the active biological filters,
/// preserving generation order.
pub fn candidates(params: &Params) -> Result<Vec<String>> {
    let unfiltered = generate(params)?;
    Ok(filter::apply_filters(unfiltered, params))
}

/// Human-readable description of the generation method, used on stderr and
/// in the final codebook header.
pub fn method_info(params: &Params) -> String {
    let mut out = String::new();
    writeln!(out, "--- Generation Method ---").unwrap();
    writeln!(out, "Method:\t\t\t\t{}", params.method.name()).unwrap();
    match &params.method {
        Method::LinearCode { min_hd, transform } => {
            writeln!(out, "Min Hamming Distance:\t\t{}", min_hd).unwrap();
            if !transform.is_identity() {
                writeln!(out, "Bias Mode:\t\t\t{}", transform.bias.mode_name()).unwrap();
                writeln!(out, "Row Perm Mode:\t\t\t{}", transform.row_perm.mode_name()).unwrap();
                writeln!(out, "Col Perm Mode:\t\t\t{}", transform.col_perm.mode_name()).unwrap();
                writeln!(out, "Random Seed:\t\t\t{}", transform.seed).unwrap();
            }
        }
        Method::AllStrings => {}
        Method::Random { num_candidates } => {
            writeln!(out, "Number of Candidates:\t\t{}", num_candidates).unwrap();
        }
        Method::VtCode { a, b } => {
            writeln!(out, "Remainder a:\t\t\t{}", a).unwrap();
            writeln!(out, "Remainder b:\t\t\t{}", b).unwrap();
        }
        Method::DifferentialVtCode { syndrome } => {
            writeln!(out, "Syndrome:\t\t\t{}", syndrome).unwrap();
        }
        Method::FileRead { path } => {
            writeln!(out, "Input File:\t\t\t{}", path.display()).unwrap();
        }
    }
    out
}

/// Enumerates all 4^n strings of length `n` in ascending base-4 order.
pub fn all_strings(n: usize) -> Vec<String> {
    let mut result = Vec::new();
    let mut digits = vec![0u8; n];
    loop {
        result.push(gf4::digits_to_string(&digits));
        if !gf4::advance_base4(&mut digits) {
            break;
        }
    }
    result
}
