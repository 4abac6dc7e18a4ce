//! Greedy reduction of the conflict graph to a codebook.
//!
//! Two elimination policies are supported. The default discards the
//! highest-degree vertex each step without accepting it, so only vertices
//! that never had a conflict survive. The alternative accepts the
//! lowest-degree vertex and deletes its whole radius-1 ball, which usually
//! yields larger codebooks. Either way the invariant holds: no two emitted
//! codewords are closer than the configured minimum edit distance.

use ahash::AHashSet;
use anyhow::{bail, Context, Result};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use crate::graph::AdjList;
use crate::progress::{self, Workspace};

/// Vertex elimination discipline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Discard the highest-degree vertex; survivors are the never-adjacent
    /// vertices. The default.
    MaxSumRow,
    /// Accept the lowest-degree vertex and delete its radius-1 ball.
    MinSumRow,
}

impl Policy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Policy::MaxSumRow => "max-sum-row",
            Policy::MinSumRow => "min-sum-row",
        }
    }
}

impl Default for Policy {
    fn default() -> Self {
        Policy::MaxSumRow
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Policy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "max-sum-row" => Ok(Policy::MaxSumRow),
            "min-sum-row" => Ok(Policy::MinSumRow),
            other => bail!(
                "unknown solver policy '{}': expected max-sum-row or min-sum-row",
                other
            ),
        }
    }
}

/// Reduces `adj` to an independent set and returns the codebook.
///
/// Accepted codewords come first in selection order, followed by the
/// untouched survivors in ascending vertex order, so the result is
/// deterministic for a given edge set. With `resume` set the previous
/// `{remaining, accepted, adjacency}` snapshot is reloaded and `adj` is
/// replaced by the stored graph.
pub fn codebook(
    adj: &mut AdjList,
    candidates: &[String],
    policy: Policy,
    save_interval: u64,
    resume: bool,
    ws: &Workspace,
) -> Result<Vec<String>> {
    let mut accepted: Vec<String>;
    let mut remaining: AHashSet<u32>;

    if resume {
        remaining = progress::set_from_file(&ws.remaining_file())
            .context("cannot resume solver: remaining set unreadable")?;
        accepted = progress::str_vec_from_file(&ws.codebook_file())
            .context("cannot resume solver: accepted codebook unreadable")?;
        *adj = AdjList::from_file(&ws.adj_list_file())
            .context("cannot resume solver: adjacency snapshot unreadable")?;
    } else {
        remaining = (0..candidates.len() as u32).collect();
        accepted = Vec::new();
        save_snapshot(ws, &remaining, &accepted, adj);
    }

    let mut last_save = Instant::now();

    while !adj.is_empty() {
        match policy {
            Policy::MaxSumRow => {
                let v = adj.max_sum_row().expect("non-empty graph has a max row");
                adj.del_row_col(v);
                remaining.remove(&v);
            }
            Policy::MinSumRow => {
                let v = adj.min_sum_row().expect("non-empty graph has a min row");
                accepted.push(candidates[v as usize].clone());
                adj.del_ball(v, &mut remaining);
            }
        }

        if save_interval > 0 && last_save.elapsed().as_secs() > save_interval {
            save_snapshot(ws, &remaining, &accepted, adj);
            last_save = Instant::now();
            eprintln!("Codebook progress: {} rows remaining", adj.row_num());
        }
    }

    // no edges left: everything still remaining is mutually compatible
    let mut survivors: Vec<u32> = remaining.into_iter().collect();
    survivors.sort_unstable();
    accepted.extend(survivors.into_iter().map(|v| candidates[v as usize].clone()));

    progress::remove_quiet(&ws.remaining_file());
    progress::remove_quiet(&ws.codebook_file());
    progress::remove_quiet(&ws.adj_list_file());

    Ok(accepted)
}

/// Best-effort snapshot of the solver state.
fn save_snapshot(ws: &Workspace, remaining: &AHashSet<u32>, accepted: &[String], adj: &AdjList) {
    let result = progress::set_to_file(&ws.remaining_file(), remaining)
        .and_then(|_| progress::lines_to_file(&ws.codebook_file(), accepted.iter()))
        .and_then(|_| adj.to_file(&ws.adj_list_file()));
    if let Err(err) = result {
        eprintln!("Warning: solver checkpoint failed: {:#}", err);
    }
}
