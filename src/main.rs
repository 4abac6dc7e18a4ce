//! CLI entry point for indexgen.
//!
//! Resolves every parameter with the priority: explicit command-line flag,
//! then JSON config value, then built-in default. Sets up (or re-opens) the
//! working directory and drives one pipeline run per codeword length in the
//! configured range.

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use indexgen::config::{
    parse_csv_vector, BiasSpec, CodeTransform, FileConfig, Method, Params, PermSpec,
};
use indexgen::pipeline::{self, RunOptions};
use indexgen::progress::Workspace;
use indexgen::solver::Policy;

/// A flexible DNA codebook generator.
///
/// Builds sets of fixed-length strands over {A,C,G,T} (written 0-3) whose
/// pairwise edit distance never drops below the configured minimum, under
/// GC-content and homopolymer constraints.
#[derive(Parser, Debug)]
#[command(name = "indexgen")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Output/resume directory name (default: a timestamp)
    #[arg(short = 'd', long = "dir")]
    dir: Option<String>,

    /// Resume generation from the save files in the specified --dir
    #[arg(short = 'r', long = "resume")]
    resume: bool,

    /// Starting codeword length
    #[arg(short = 's', long = "len-start")]
    len_start: Option<usize>,

    /// Ending codeword length (inclusive)
    #[arg(short = 'e', long = "len-end")]
    len_end: Option<usize>,

    /// Minimum edit distance for the codebook
    #[arg(short = 'D', long = "edit-dist")]
    edit_dist: Option<usize>,

    /// Longest allowed homopolymer run (0 disables)
    #[arg(long = "max-run")]
    max_run: Option<usize>,

    /// Minimum GC-content (0.0 to 1.0)
    #[arg(long = "min-gc")]
    min_gc: Option<f64>,

    /// Maximum GC-content (0.0 to 1.0)
    #[arg(long = "max-gc")]
    max_gc: Option<f64>,

    /// Number of threads to use (0 = auto-detect)
    #[arg(short = 't', long = "threads")]
    threads: Option<usize>,

    /// Interval in seconds between progress saves (0 disables)
    #[arg(long = "save-interval")]
    save_interval: Option<u64>,

    /// Verify the codebook distance after generation
    #[arg(long = "verify")]
    verify: bool,

    /// JSON configuration file
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Generation method: LinearCode, VTCode, Random, Diff_VTCode,
    /// AllStrings, FileRead
    #[arg(short = 'm', long = "method")]
    method: Option<String>,

    /// Input file for the FileRead method
    #[arg(long = "input-file")]
    input_file: Option<PathBuf>,

    /// Minimum Hamming distance for the LinearCode method (2-5)
    #[arg(long = "min-hd")]
    min_hd: Option<usize>,

    /// Bias vector mode for LinearCode: default, random, manual
    #[arg(long = "lc-bias-mode")]
    lc_bias_mode: Option<String>,

    /// Row permutation mode for LinearCode: identity, random, manual
    #[arg(long = "lc-row-perm-mode")]
    lc_row_perm_mode: Option<String>,

    /// Column permutation mode for LinearCode: identity, random, manual
    #[arg(long = "lc-col-perm-mode")]
    lc_col_perm_mode: Option<String>,

    /// Manual bias vector (CSV, GF(4) values 0-3)
    #[arg(long = "lc-bias")]
    lc_bias: Option<String>,

    /// Manual row permutation (CSV, 0-indexed)
    #[arg(long = "lc-row-perm")]
    lc_row_perm: Option<String>,

    /// Manual column permutation (CSV, 0-indexed)
    #[arg(long = "lc-col-perm")]
    lc_col_perm: Option<String>,

    /// Seed for the random LinearCode bias/permutation draws
    #[arg(long = "lc-random-seed")]
    lc_random_seed: Option<u64>,

    /// Parameter 'a' for the VTCode method
    #[arg(long = "vt-a")]
    vt_a: Option<i64>,

    /// Parameter 'b' for the VTCode method
    #[arg(long = "vt-b")]
    vt_b: Option<i64>,

    /// Number of candidates for the Random method
    #[arg(long = "rand-candidates")]
    rand_candidates: Option<usize>,

    /// Syndrome for the Diff_VTCode method
    #[arg(long = "vt-synd")]
    vt_synd: Option<i64>,

    /// Solver policy: max-sum-row or min-sum-row
    #[arg(long = "policy")]
    policy: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let cfg = match &args.config {
        Some(path) => {
            let cfg = FileConfig::load(path)?;
            eprintln!("Loaded configuration from: {}", path.display());
            cfg
        }
        None => FileConfig::default(),
    };

    let policy: Policy = args
        .policy
        .as_deref()
        .or(cfg.policy.as_deref())
        .map(str::parse)
        .transpose()?
        .unwrap_or_default();
    let opts = RunOptions {
        policy,
        verify: args.verify || cfg.verify.unwrap_or(false),
    };

    // --- resume path ---
    if args.resume {
        let Some(dir) = args.dir.clone().or_else(|| cfg.dir.clone()) else {
            bail!("when resuming, the directory with save files must be given via --dir or the config");
        };
        let dir = PathBuf::from(dir);
        if !dir.is_dir() {
            bail!("directory '{}' not found", dir.display());
        }
        eprintln!("Resuming generation in directory: {}", dir.display());
        let ws = Workspace::new(dir);
        pipeline::resume(&ws, &opts)?;
        return Ok(());
    }

    // --- fresh run ---
    let mut params = resolve_params(&args, &cfg)?;
    let len_start = args
        .len_start
        .or(cfg.core.len_start)
        .unwrap_or(DEFAULT_LEN_START);
    let len_end = args.len_end.or(cfg.core.len_end).unwrap_or(len_start);
    if len_start < 1 {
        bail!("codeword length must be at least 1");
    }
    if len_end < len_start {
        bail!("--len-end must not be smaller than --len-start");
    }

    let dir = args
        .dir
        .clone()
        .or_else(|| cfg.dir.clone())
        .filter(|d| !d.is_empty())
        .unwrap_or_else(timestamp);
    let dir = PathBuf::from(dir);
    if dir.exists() {
        eprintln!(
            "Warning: directory '{}' already exists, files may be overwritten",
            dir.display()
        );
    } else {
        fs::create_dir_all(&dir)
            .with_context(|| format!("could not create directory '{}'", dir.display()))?;
    }
    eprintln!("Output will be saved in directory: {}", dir.display());
    let ws = Workspace::new(dir);

    let total_start = Instant::now();
    for len in len_start..=len_end {
        eprintln!(
            "\n--- Starting generation for codeword length {} ({}) ---",
            len,
            Local::now().format("%Y-%m-%d %H:%M:%S")
        );
        params.code_len = len;
        pipeline::run(&params, &ws, &opts)?;
        eprintln!(
            "--- Finished generation for codeword length {} ({}) ---",
            len,
            Local::now().format("%Y-%m-%d %H:%M:%S")
        );
    }
    eprintln!(
        "\nTotal execution time: {:.2} seconds",
        total_start.elapsed().as_secs_f64()
    );
    Ok(())
}

const DEFAULT_LEN_START: usize = 10;
const DEFAULT_EDIT_DIST: usize = 4;
const DEFAULT_MAX_RUN: usize = 3;
const DEFAULT_MIN_GC: f64 = 0.3;
const DEFAULT_MAX_GC: f64 = 0.7;
const DEFAULT_SAVE_INTERVAL: u64 = 80_000;
const DEFAULT_MIN_HD: usize = 3;
const DEFAULT_RAND_CANDIDATES: usize = 50_000;

/// Applies the CLI > JSON > default priority to every `Params` field.
fn resolve_params(args: &Args, cfg: &FileConfig) -> Result<Params> {
    let code_min_ed = args
        .edit_dist
        .or(cfg.core.edit_dist)
        .unwrap_or(DEFAULT_EDIT_DIST);
    if code_min_ed < 1 {
        bail!("the minimum edit distance must be at least 1");
    }

    let min_gc = args.min_gc.or(cfg.constraints.min_gc).unwrap_or(DEFAULT_MIN_GC);
    let max_gc = args.max_gc.or(cfg.constraints.max_gc).unwrap_or(DEFAULT_MAX_GC);
    for (name, value) in [("min-gc", min_gc), ("max-gc", max_gc)] {
        if !(0.0..=1.0).contains(&value) {
            bail!("--{} must lie between 0.0 and 1.0", name);
        }
    }

    let threads = args.threads.or(cfg.performance.threads).unwrap_or(0);
    let thread_num = if threads == 0 { num_cpus::get() } else { threads };

    Ok(Params {
        code_len: 0, // set per sweep iteration
        code_min_ed,
        max_run: args
            .max_run
            .or(cfg.constraints.max_run)
            .unwrap_or(DEFAULT_MAX_RUN),
        min_gc,
        max_gc,
        thread_num,
        save_interval: args
            .save_interval
            .or(cfg.performance.save_interval)
            .unwrap_or(DEFAULT_SAVE_INTERVAL),
        method: resolve_method(args, cfg)?,
    })
}

/// Builds the method variant from the selector and its parameters.
fn resolve_method(args: &Args, cfg: &FileConfig) -> Result<Method> {
    let name = args
        .method
        .as_deref()
        .or(cfg.method.name.as_deref())
        .unwrap_or("LinearCode");

    Ok(match name {
        "LinearCode" => Method::LinearCode {
            min_hd: args
                .min_hd
                .or(cfg.method.linear_code.min_hd)
                .unwrap_or(DEFAULT_MIN_HD),
            transform: resolve_code_transform(args, cfg)?,
        },
        "AllStrings" => Method::AllStrings,
        "Random" => Method::Random {
            num_candidates: args
                .rand_candidates
                .or(cfg.method.random.candidates)
                .unwrap_or(DEFAULT_RAND_CANDIDATES),
        },
        "VTCode" => Method::VtCode {
            a: args.vt_a.or(cfg.method.vt_code.a).unwrap_or(0),
            b: args.vt_b.or(cfg.method.vt_code.b).unwrap_or(0),
        },
        "Diff_VTCode" => Method::DifferentialVtCode {
            syndrome: args.vt_synd.or(cfg.method.diff_vt_code.syndrome).unwrap_or(0),
        },
        "FileRead" => {
            let path = args
                .input_file
                .clone()
                .or_else(|| cfg.method.file_read.input_file.clone().map(PathBuf::from));
            let Some(path) = path else {
                bail!("--input-file (or method.fileRead.input_file) is required when method=FileRead");
            };
            Method::FileRead { path }
        }
        other => bail!("unknown generation method '{}'", other),
    })
}

/// Resolves the linear-code bias and permutation options.
fn resolve_code_transform(args: &Args, cfg: &FileConfig) -> Result<CodeTransform> {
    let lc = &cfg.method.linear_code;

    let bias_mode = args
        .lc_bias_mode
        .as_deref()
        .or(lc.bias_mode.as_deref())
        .unwrap_or("default");
    let bias = match bias_mode {
        "default" => BiasSpec::Zero,
        "random" => BiasSpec::Random,
        "manual" => {
            let vec = match &args.lc_bias {
                Some(csv) => parse_csv_vector(csv, "bias")?,
                None => lc.bias.clone().ok_or_else(|| {
                    anyhow::anyhow!(
                        "manual bias vector required via --lc-bias or method.linearCode.bias"
                    )
                })?,
            };
            BiasSpec::Manual(vec)
        }
        other => bail!("unknown bias mode '{}': expected default, random or manual", other),
    };

    let resolve_perm = |mode: Option<&str>,
                        csv: &Option<String>,
                        json: &Option<Vec<usize>>,
                        what: &str|
     -> Result<PermSpec> {
        Ok(match mode.unwrap_or("identity") {
            "identity" => PermSpec::Identity,
            "random" => PermSpec::Random,
            "manual" => {
                let vec = match csv {
                    Some(text) => parse_csv_vector(text, what)?,
                    None => json.clone().ok_or_else(|| {
                        anyhow::anyhow!("manual {} permutation required", what)
                    })?,
                };
                PermSpec::Manual(vec)
            }
            other => bail!(
                "unknown {} permutation mode '{}': expected identity, random or manual",
                what,
                other
            ),
        })
    };

    let row_perm = resolve_perm(
        args.lc_row_perm_mode.as_deref().or(lc.row_perm_mode.as_deref()),
        &args.lc_row_perm,
        &lc.row_perm,
        "row",
    )?;
    let col_perm = resolve_perm(
        args.lc_col_perm_mode.as_deref().or(lc.col_perm_mode.as_deref()),
        &args.lc_col_perm,
        &lc.col_perm,
        "column",
    )?;

    Ok(CodeTransform {
        bias,
        row_perm,
        col_perm,
        seed: args.lc_random_seed.or(lc.random_seed).unwrap_or(0),
    })
}

/// Default directory name: "YYYY-MM-DD_HH-MM".
fn timestamp() -> String {
    Local::now().format("%Y-%m-%d_%H-%M").to_string()
}
