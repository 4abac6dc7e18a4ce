//! Working-directory layout and checkpoint file I/O.
//!
//! Every run owns one directory holding the progress files and the final
//! codebook. All file names are centralized here so the builder, the solver
//! and the pipeline agree on them without any module-level state.

use ahash::AHashSet;
use anyhow::{Context, Result};
use std::fmt::Display;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Stage marker: the parallel adjacency-list construction is running.
pub const STAGE_ADJACENCY: u32 = 1;
/// Stage marker: the greedy solver is running.
pub const STAGE_SOLVER: u32 = 2;

/// Handle to the run's working directory.
#[derive(Debug, Clone)]
pub struct Workspace {
    dir: PathBuf,
}

impl Workspace {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Workspace { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `progress_params.txt`: the serialized `Params` record.
    pub fn params_file(&self) -> PathBuf {
        self.dir.join("progress_params.txt")
    }

    /// `progress_cand.txt`: the filtered candidate set, one per line.
    pub fn candidates_file(&self) -> PathBuf {
        self.dir.join("progress_cand.txt")
    }

    /// `progress_stage.txt`: which stage an interrupted run was in.
    pub fn stage_file(&self) -> PathBuf {
        self.dir.join("progress_stage.txt")
    }

    /// `matrix_ones_num.txt`: `2 * |E|`, kept between the stages.
    pub fn matrix_ones_file(&self) -> PathBuf {
        self.dir.join("matrix_ones_num.txt")
    }

    /// Stage-1 per-worker edge buffer.
    pub fn worker_pairs_file(&self, worker: usize) -> PathBuf {
        self.dir
            .join(format!("progress_adj_list_comp_{}.txt", worker))
    }

    /// Stage-1 per-worker last completed outer index.
    pub fn worker_index_file(&self, worker: usize) -> PathBuf {
        self.dir
            .join(format!("progress_adj_list_comp_i_{}.txt", worker))
    }

    /// Stage-2 adjacency snapshot.
    pub fn adj_list_file(&self) -> PathBuf {
        self.dir.join("progress_adj_list.txt")
    }

    /// Stage-2 remaining-vertices snapshot.
    pub fn remaining_file(&self) -> PathBuf {
        self.dir.join("progress_remaining.txt")
    }

    /// Stage-2 accepted-codewords snapshot.
    pub fn codebook_file(&self) -> PathBuf {
        self.dir.join("progress_codebook.txt")
    }

    /// Path of the final output file.
    pub fn output_file(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }
}

/// Writes one displayable value per line.
pub fn lines_to_file<T: Display>(path: &Path, values: impl IntoIterator<Item = T>) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    for v in values {
        writeln!(out, "{}", v).with_context(|| format!("failed to write {}", path.display()))?;
    }
    out.flush()
        .with_context(|| format!("failed to flush {}", path.display()))
}

/// Reads all whitespace-trimmed non-empty lines.
pub fn str_vec_from_file(path: &Path) -> Result<Vec<String>> {
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut out = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.with_context(|| format!("failed to read {}", path.display()))?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            out.push(trimmed.to_string());
        }
    }
    Ok(out)
}

/// Writes a single number.
pub fn num_to_file<T: Display>(path: &Path, value: T) -> Result<()> {
    fs::write(path, format!("{}\n", value))
        .with_context(|| format!("failed to write {}", path.display()))
}

/// Reads back a single number.
pub fn num_from_file<T: FromStr>(path: &Path) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    text.trim()
        .parse::<T>()
        .with_context(|| format!("invalid number in {}", path.display()))
}

/// Writes `i\tj` pairs, one per line.
pub fn pairs_to_file(path: &Path, pairs: &[(u32, u32)]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    for (i, j) in pairs {
        writeln!(out, "{}\t{}", i, j)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    out.flush()
        .with_context(|| format!("failed to flush {}", path.display()))
}

/// Reads `i\tj` pairs written by [`pairs_to_file`].
pub fn pairs_from_file(path: &Path) -> Result<Vec<(u32, u32)>> {
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut out = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.with_context(|| format!("failed to read {}", path.display()))?;
        let mut fields = line.split_whitespace();
        let (Some(a), Some(b)) = (fields.next(), fields.next()) else {
            continue;
        };
        let i = a
            .parse::<u32>()
            .with_context(|| format!("invalid pair in {}", path.display()))?;
        let j = b
            .parse::<u32>()
            .with_context(|| format!("invalid pair in {}", path.display()))?;
        out.push((i, j));
    }
    Ok(out)
}

/// Writes a vertex set, one id per line.
pub fn set_to_file(path: &Path, set: &AHashSet<u32>) -> Result<()> {
    lines_to_file(path, set.iter())
}

/// Reads a vertex set written by [`set_to_file`].
pub fn set_from_file(path: &Path) -> Result<AHashSet<u32>> {
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut out = AHashSet::new();
    for line in BufReader::new(file).lines() {
        let line = line.with_context(|| format!("failed to read {}", path.display()))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        out.insert(
            trimmed
                .parse::<u32>()
                .with_context(|| format!("invalid vertex id in {}", path.display()))?,
        );
    }
    Ok(out)
}

/// Removes a file, ignoring a missing one.
pub fn remove_quiet(path: &Path) {
    if let Err(err) = fs::remove_file(path) {
        if err.kind() != std::io::ErrorKind::NotFound {
            eprintln!("Warning: could not remove {}: {}", path.display(), err);
        }
    }
}
