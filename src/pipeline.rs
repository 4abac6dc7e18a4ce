//! End-to-end codebook generation: candidates -> conflict graph -> solver ->
//! output file, with stage tracking for resumable runs.

use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::time::Instant;

use crate::config::Params;
use crate::generator;
use crate::graph::{self, AdjList};
use crate::output::{self, RunStats};
use crate::progress::{self, Workspace, STAGE_ADJACENCY, STAGE_SOLVER};
use crate::solver::{self, Policy};
use crate::verify;

/// Knobs that are not part of the serialized `Params` record.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub policy: Policy,
    pub verify: bool,
}

/// Figures reported after a completed run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub candidate_num: usize,
    pub code_size: usize,
    pub matrix_ones: i64,
    pub output_file: PathBuf,
}

/// Runs the whole pipeline for `params` inside `ws`.
pub fn run(params: &Params, ws: &Workspace, opts: &RunOptions) -> Result<RunSummary> {
    let overall_start = Instant::now();

    params
        .save(&ws.params_file())
        .context("could not record run parameters")?;
    log_params(params);

    let candidates_start = Instant::now();
    let candidates = generator::candidates(params)?;
    progress::lines_to_file(&ws.candidates_file(), candidates.iter())
        .context("could not record candidate set")?;
    let candidates_secs = candidates_start.elapsed().as_secs_f64();
    eprintln!(
        "Candidates: {} ({:.2} seconds)",
        candidates.len(),
        candidates_secs
    );

    progress::num_to_file(&ws.stage_file(), STAGE_ADJACENCY)?;
    let fill_start = Instant::now();
    let (mut adj, matrix_ones) = graph::fill_adj_list(
        &candidates,
        params.code_min_ed,
        params.thread_num,
        params.save_interval,
        false,
        ws,
    )?;
    let fill_adj_secs = fill_start.elapsed().as_secs_f64();
    eprintln!("Fill adjacency list: {:.2} seconds", fill_adj_secs);

    progress::num_to_file(&ws.stage_file(), STAGE_SOLVER)?;
    progress::num_to_file(&ws.matrix_ones_file(), matrix_ones)?;

    let solve_start = Instant::now();
    let codebook = solver::codebook(
        &mut adj,
        &candidates,
        opts.policy,
        params.save_interval,
        false,
        ws,
    )?;
    let solve_secs = solve_start.elapsed().as_secs_f64();
    eprintln!("Process matrix: {:.2} seconds", solve_secs);

    progress::remove_quiet(&ws.stage_file());
    progress::remove_quiet(&ws.matrix_ones_file());

    let stats = RunStats {
        candidate_num: candidates.len(),
        matrix_ones,
        candidates_secs,
        fill_adj_secs,
        solve_secs,
        overall_secs: overall_start.elapsed().as_secs_f64(),
    };
    let summary = finish(ws, params, &codebook, &stats, opts)?;

    progress::remove_quiet(&ws.params_file());
    progress::remove_quiet(&ws.candidates_file());
    Ok(summary)
}

/// Resumes an interrupted run from the progress files in `ws`.
pub fn resume(ws: &Workspace, opts: &RunOptions) -> Result<RunSummary> {
    let params = Params::load(&ws.params_file())
        .context("read/write progress files error, resume aborted")?;
    eprintln!("Resuming codebook generation from saved progress");
    log_params(&params);

    let candidates = progress::str_vec_from_file(&ws.candidates_file())
        .context("read/write progress files error, resume aborted")?;
    let stage: u32 = progress::num_from_file(&ws.stage_file())
        .context("read/write progress files error, resume aborted")?;

    let (codebook, matrix_ones) = match stage {
        STAGE_ADJACENCY => {
            eprintln!("Resuming adjacency list computation");
            let (mut adj, matrix_ones) = graph::fill_adj_list(
                &candidates,
                params.code_min_ed,
                params.thread_num,
                params.save_interval,
                true,
                ws,
            )?;
            progress::num_to_file(&ws.stage_file(), STAGE_SOLVER)?;
            progress::num_to_file(&ws.matrix_ones_file(), matrix_ones)?;
            let codebook = solver::codebook(
                &mut adj,
                &candidates,
                opts.policy,
                params.save_interval,
                false,
                ws,
            )?;
            (codebook, matrix_ones)
        }
        STAGE_SOLVER => {
            eprintln!("Resuming codebook computation");
            let matrix_ones: i64 = progress::num_from_file(&ws.matrix_ones_file())
                .context("read/write progress files error, resume aborted")?;
            let mut adj = AdjList::new();
            let codebook = solver::codebook(
                &mut adj,
                &candidates,
                opts.policy,
                params.save_interval,
                true,
                ws,
            )?;
            (codebook, matrix_ones)
        }
        other => bail!("unknown progress stage {} in {}", other, ws.stage_file().display()),
    };

    progress::remove_quiet(&ws.stage_file());
    progress::remove_quiet(&ws.matrix_ones_file());

    let stats = RunStats {
        candidate_num: candidates.len(),
        matrix_ones,
        ..Default::default()
    };
    let summary = finish(ws, &params, &codebook, &stats, opts)?;

    progress::remove_quiet(&ws.params_file());
    progress::remove_quiet(&ws.candidates_file());
    Ok(summary)
}

/// Writes the final file, reports the result and optionally re-verifies.
fn finish(
    ws: &Workspace,
    params: &Params,
    codebook: &[String],
    stats: &RunStats,
    opts: &RunOptions,
) -> Result<RunSummary> {
    eprintln!("Number of candidate words:\t{}", stats.candidate_num);
    eprintln!("Number of ones in matrix:\t{}", stats.matrix_ones);
    eprintln!("Number of code words:\t\t{}", codebook.len());

    let output_file = output::write_codebook(ws, codebook, params, stats)?;
    eprintln!("Codebook written to {}", output_file.display());

    if opts.verify {
        if verify::verify_min_distance(codebook, params.code_min_ed, params.thread_num) {
            eprintln!("Vector distance SUCCESS");
        } else {
            eprintln!("Vector distance FAILURE");
        }
    }

    Ok(RunSummary {
        candidate_num: stats.candidate_num,
        code_size: codebook.len(),
        matrix_ones: stats.matrix_ones,
        output_file,
    })
}

fn log_params(params: &Params) {
    eprintln!("--- Common Parameters ---");
    eprintln!("Code Length:\t\t\t{}", params.code_len);
    eprintln!("Min Codebook Edit Distance:\t{}", params.code_min_ed);
    eprintln!("Max Homopolymer Run:\t\t{}", params.max_run);
    eprintln!("Min GC Content:\t\t\t{}", params.min_gc);
    eprintln!("Max GC Content:\t\t\t{}", params.max_gc);
    eprint!("{}", generator::method_info(params));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Method;
    use tempfile::TempDir;

    fn all_strings_params() -> Params {
        Params {
            code_len: 4,
            code_min_ed: 2,
            max_run: 3,
            min_gc: 0.25,
            max_gc: 0.75,
            thread_num: 2,
            save_interval: 0,
            method: Method::AllStrings,
        }
    }

    #[test]
    fn test_run_produces_output_and_cleans_progress_files() {
        let dir = TempDir::new().unwrap();
        let ws = Workspace::new(dir.path());
        let params = all_strings_params();
        let opts = RunOptions {
            policy: Policy::MaxSumRow,
            verify: true,
        };
        let summary = run(&params, &ws, &opts).unwrap();
        assert!(summary.output_file.exists());
        assert!(summary.candidate_num > 0);
        assert!(!ws.params_file().exists());
        assert!(!ws.candidates_file().exists());
        assert!(!ws.stage_file().exists());
        assert!(!ws.matrix_ones_file().exists());
    }

    #[test]
    fn test_empty_candidate_set_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let ws = Workspace::new(dir.path());
        let mut params = all_strings_params();
        // a GC window nothing satisfies
        params.min_gc = 0.9;
        params.max_gc = 0.95;
        params.code_len = 3;
        let summary = run(&params, &ws, &RunOptions::default()).unwrap();
        assert_eq!(summary.code_size, 0);
        assert!(summary.output_file.exists());
    }

    #[test]
    fn test_resume_without_progress_files_is_an_error() {
        let dir = TempDir::new().unwrap();
        let ws = Workspace::new(dir.path());
        assert!(resume(&ws, &RunOptions::default()).is_err());
    }
}
