//! Final codebook file formatting.
//!
//! Each run produces one file named after its key parameters, holding a
//! human-readable summary block terminated by a `===` rule, then the
//! codewords one per line. The header shape doubles as the optional metadata
//! header the FileRead generator skips, so finished codebooks can be fed
//! back in as candidate sets.

use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use crate::config::Params;
use crate::generator;
use crate::progress::Workspace;

/// Wall-clock figures collected by the pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunStats {
    pub candidate_num: usize,
    pub matrix_ones: i64,
    pub candidates_secs: f64,
    pub fill_adj_secs: f64,
    pub solve_secs: f64,
    pub overall_secs: f64,
}

/// `CodeSize-<size>_CodeLen-<n>_MinED-<d>.txt` with zero-padded fields.
pub fn file_name(code_len: usize, code_size: usize, min_ed: usize) -> String {
    format!(
        "CodeSize-{:07}_CodeLen-{:02}_MinED-{}.txt",
        code_size, code_len, min_ed
    )
}

/// Renders the summary header, without the closing rule.
fn header(params: &Params, code_size: usize, stats: &RunStats) -> String {
    let mut out = String::new();
    writeln!(out, "--- Global Parameters ---").unwrap();
    writeln!(out, "Code Length:\t\t\t{}", params.code_len).unwrap();
    writeln!(out, "Min Codebook Edit Distance:\t{}", params.code_min_ed).unwrap();
    writeln!(out).unwrap();
    writeln!(out, "Max Run:\t\t\t{}", params.max_run).unwrap();
    writeln!(out, "Min GC Content:\t\t\t{}", params.min_gc).unwrap();
    writeln!(out, "Max GC Content:\t\t\t{}", params.max_gc).unwrap();
    writeln!(out).unwrap();
    out.push_str(&generator::method_info(params));
    writeln!(out).unwrap();
    writeln!(out, "--- Results Summary ---").unwrap();
    writeln!(out, "Number of Candidates:\t\t{}", stats.candidate_num).unwrap();
    writeln!(out, "Number of Ones in Matrix:\t{}", stats.matrix_ones).unwrap();
    writeln!(out, "Number of Code Words:\t\t{}", code_size).unwrap();
    writeln!(out).unwrap();
    writeln!(out, "--- Performance Metrics ---").unwrap();
    writeln!(out, "Number of Threads:\t\t{}", params.thread_num).unwrap();
    writeln!(
        out,
        "Candidate Generation Time:\t{:.2}\tseconds",
        stats.candidates_secs
    )
    .unwrap();
    writeln!(
        out,
        "Fill Adjacency List Time:\t{:.2}\tseconds",
        stats.fill_adj_secs
    )
    .unwrap();
    writeln!(out, "Process Matrix Time:\t\t{:.2}\tseconds", stats.solve_secs).unwrap();
    writeln!(
        out,
        "Overall Execution Time:\t\t{:.2}\tseconds",
        stats.overall_secs
    )
    .unwrap();
    out
}

/// Writes the final codebook file and returns its path.
pub fn write_codebook(
    ws: &Workspace,
    codebook: &[String],
    params: &Params,
    stats: &RunStats,
) -> Result<PathBuf> {
    let name = file_name(params.code_len, codebook.len(), params.code_min_ed);
    let path = ws.output_file(&name);

    let mut text = header(params, codebook.len(), stats);
    text.push_str("===========================================\n");
    for word in codebook {
        text.push_str(word);
        text.push('\n');
    }

    fs::write(&path, text)
        .with_context(|| format!("failed to write codebook file {}", path.display()))?;
    Ok(path)
}
