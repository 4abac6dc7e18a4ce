//! Sparse conflict graph over the candidate set.
//!
//! Vertices are candidate indices; an edge joins two candidates whose edit
//! distance is below the codebook minimum. The graph is built by worker
//! threads that each own an interleaved slice of the outer loop and buffer
//! edges locally; a single thread merges the buffers after the join. The
//! degree-bucket index mirrors the adjacency rows so the solver can pick the
//! lowest- or highest-degree vertex in O(1).

use ahash::{AHashMap, AHashSet};
use anyhow::{Context, Result};
use crossbeam_channel::unbounded;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::time::Instant;

use crate::distance::{banded_at_least, PatternHandle};
use crate::progress::{self, Workspace};

/// Undirected adjacency list with a degree-bucket index.
#[derive(Debug, Default)]
pub struct AdjList {
    /// vertex -> set of neighbors; symmetric. A row is created only for
    /// vertices with at least one edge, but once the solver starts deleting
    /// it keeps zero-degree rows alive until they are picked.
    adj: AHashMap<u32, AHashSet<u32>>,
    /// degree -> vertices currently at that degree; an entry exists only
    /// while its set is non-empty.
    buckets: BTreeMap<usize, BTreeSet<u32>>,
}

impl AdjList {
    pub fn new() -> Self {
        AdjList::default()
    }

    /// Inserts the directed entry `row -> col`.
    pub fn set(&mut self, row: u32, col: u32) {
        self.adj.entry(row).or_default().insert(col);
    }

    /// Rebuilds the degree buckets from the current adjacency rows.
    pub fn rebuild_buckets(&mut self) {
        self.buckets.clear();
        for (&v, neighbors) in &self.adj {
            self.buckets.entry(neighbors.len()).or_default().insert(v);
        }
    }

    /// True once every row has been deleted.
    pub fn is_empty(&self) -> bool {
        self.adj.is_empty()
    }

    /// Number of live rows.
    pub fn row_num(&self) -> usize {
        self.adj.len()
    }

    /// Degree of `v`, or `None` if it has no row.
    pub fn degree(&self, v: u32) -> Option<usize> {
        self.adj.get(&v).map(|s| s.len())
    }

    /// Lowest-degree vertex, smallest id on ties.
    pub fn min_sum_row(&self) -> Option<u32> {
        self.buckets
            .first_key_value()
            .and_then(|(_, set)| set.first().copied())
    }

    /// Highest-degree vertex, smallest id on ties.
    pub fn max_sum_row(&self) -> Option<u32> {
        self.buckets
            .last_key_value()
            .and_then(|(_, set)| set.first().copied())
    }

    fn remove_from_bucket(&mut self, degree: usize, v: u32) {
        let bucket = self
            .buckets
            .get_mut(&degree)
            .expect("vertex bucket out of sync");
        let removed = bucket.remove(&v);
        debug_assert!(removed, "vertex missing from its degree bucket");
        if bucket.is_empty() {
            self.buckets.remove(&degree);
        }
    }

    fn decrease_degree(&mut self, degree: usize, v: u32) {
        debug_assert!(degree > 0);
        self.remove_from_bucket(degree, v);
        self.buckets.entry(degree - 1).or_default().insert(v);
    }

    /// Deletes vertex `v`: its row, its occurrences in neighbor rows, and
    /// its bucket entry. Neighbor rows stay alive even at degree zero.
    pub fn del_row_col(&mut self, v: u32) {
        let neighbors = self.adj.remove(&v).expect("deleting an absent vertex");
        let degree = neighbors.len();
        let mut ordered: Vec<u32> = neighbors.into_iter().collect();
        ordered.sort_unstable();
        for j in ordered {
            let row = self.adj.get_mut(&j).expect("asymmetric adjacency");
            let old_degree = row.len();
            let removed = row.remove(&v);
            debug_assert!(removed);
            self.decrease_degree(old_degree, j);
        }
        self.remove_from_bucket(degree, v);
    }

    /// Deletes `v` and all its neighbors (the radius-1 ball), removing each
    /// from `remaining` as well.
    pub fn del_ball(&mut self, v: u32, remaining: &mut AHashSet<u32>) {
        let mut ball: Vec<u32> = self
            .adj
            .get(&v)
            .expect("deleting ball of an absent vertex")
            .iter()
            .copied()
            .collect();
        ball.sort_unstable();
        ball.push(v);
        for u in ball {
            self.del_row_col(u);
            remaining.remove(&u);
        }
    }

    /// All undirected edges `(i, j)` with `i < j`, sorted.
    pub fn edges(&self) -> Vec<(u32, u32)> {
        let mut out = Vec::new();
        for (&i, neighbors) in &self.adj {
            for &j in neighbors {
                if i < j {
                    out.push((i, j));
                }
            }
        }
        out.sort_unstable();
        out
    }

    /// Writes the rows in ascending order: `i\tj` per directed entry, and a
    /// bare `i` line for a row that has dropped to degree zero (the solver
    /// keeps such rows alive, so the snapshot must too).
    pub fn to_file(&self, path: &Path) -> Result<()> {
        use std::io::Write;
        let file = std::fs::File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        let mut out = std::io::BufWriter::new(file);
        let mut rows: Vec<(&u32, &AHashSet<u32>)> = self.adj.iter().collect();
        rows.sort_unstable_by_key(|(i, _)| **i);
        for (&i, neighbors) in rows {
            if neighbors.is_empty() {
                writeln!(out, "{}", i)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                continue;
            }
            let mut cols: Vec<u32> = neighbors.iter().copied().collect();
            cols.sort_unstable();
            for j in cols {
                writeln!(out, "{}\t{}", i, j)
                    .with_context(|| format!("failed to write {}", path.display()))?;
            }
        }
        out.flush()
            .with_context(|| format!("failed to flush {}", path.display()))
    }

    /// Reloads a snapshot written by [`AdjList::to_file`] and rebuilds the
    /// degree buckets.
    pub fn from_file(path: &Path) -> Result<AdjList> {
        use std::io::BufRead;
        let file = std::fs::File::open(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        let mut list = AdjList::new();
        for line in std::io::BufReader::new(file).lines() {
            let line = line.with_context(|| format!("failed to read {}", path.display()))?;
            let mut fields = line.split_whitespace();
            let Some(first) = fields.next() else { continue };
            let i = first
                .parse::<u32>()
                .with_context(|| format!("invalid vertex id in {}", path.display()))?;
            match fields.next() {
                Some(second) => {
                    let j = second
                        .parse::<u32>()
                        .with_context(|| format!("invalid vertex id in {}", path.display()))?;
                    list.set(i, j);
                }
                None => {
                    // isolated row awaiting deletion
                    list.adj.entry(i).or_default();
                }
            }
        }
        list.rebuild_buckets();
        Ok(list)
    }
}

/// Builds the conflict graph over `candidates` in parallel.
///
/// Returns the adjacency list plus `matrix_ones = 2 * |E|`. With `resume`
/// set, each worker reloads its `(last outer index, edge buffer)` checkpoint
/// and continues after that index.
pub fn fill_adj_list(
    candidates: &[String],
    min_ed: usize,
    thread_num: usize,
    save_interval: u64,
    resume: bool,
    ws: &Workspace,
) -> Result<(AdjList, i64)> {
    let thread_num = thread_num.max(1);

    let mut starts = vec![0usize; thread_num];
    let mut buffers: Vec<Vec<(u32, u32)>> = vec![Vec::new(); thread_num];
    if resume {
        for t in 0..thread_num {
            buffers[t] = progress::pairs_from_file(&ws.worker_pairs_file(t))
                .with_context(|| format!("cannot resume worker {} edge buffer", t))?;
            let last: usize = progress::num_from_file(&ws.worker_index_file(t))
                .with_context(|| format!("cannot resume worker {} outer index", t))?;
            starts[t] = last + thread_num;
        }
    } else {
        for (t, start) in starts.iter_mut().enumerate() {
            *start = t;
        }
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(thread_num)
        .build()
        .context("failed to create thread pool")?;

    let (tx, rx) = unbounded();
    pool.scope(|scope| {
        for (t, (start, buffer)) in starts.iter().zip(buffers.drain(..)).enumerate() {
            let tx = tx.clone();
            let start = *start;
            scope.spawn(move |_| {
                let pairs =
                    fill_worker(candidates, min_ed, buffer, start, t, thread_num, save_interval, ws);
                // receiver outlives the scope
                let _ = tx.send((t, pairs));
            });
        }
    });
    drop(tx);

    let mut shards: Vec<Vec<(u32, u32)>> = (0..thread_num).map(|_| Vec::new()).collect();
    for (t, pairs) in rx {
        shards[t] = pairs;
    }

    let mut adj = AdjList::new();
    let mut matrix_ones: i64 = 0;
    for shard in &shards {
        matrix_ones += 2 * shard.len() as i64;
        for &(i, j) in shard {
            adj.set(i, j);
            adj.set(j, i);
        }
    }
    for t in 0..thread_num {
        progress::remove_quiet(&ws.worker_pairs_file(t));
        progress::remove_quiet(&ws.worker_index_file(t));
    }
    adj.rebuild_buckets();
    Ok((adj, matrix_ones))
}

/// One builder worker: outer indices `start, start + T, ...`, local edge
/// buffer, best-effort periodic checkpointing.
#[allow(clippy::too_many_arguments)]
fn fill_worker(
    candidates: &[String],
    min_ed: usize,
    mut pairs: Vec<(u32, u32)>,
    start: usize,
    worker: usize,
    thread_num: usize,
    save_interval: u64,
    ws: &Workspace,
) -> Vec<(u32, u32)> {
    let total = candidates.len();
    let threshold = min_ed as i32;
    let mut last_save = Instant::now();

    let mut i = start;
    while i < total {
        let handle = PatternHandle::new(&candidates[i]);
        for j in (i + 1)..total {
            if !banded_at_least(&candidates[j], &handle, threshold) {
                pairs.push((i as u32, j as u32));
            }
        }

        if save_interval > 0 && last_save.elapsed().as_secs() > save_interval {
            if let Err(err) = save_worker_progress(ws, worker, i, &pairs) {
                eprintln!("Warning: worker {} checkpoint failed: {:#}", worker, err);
            }
            last_save = Instant::now();
            eprintln!(
                "Adj list progress: i={} of {} (worker {})",
                i, total, worker
            );
        }
        i += thread_num;
    }
    pairs
}

fn save_worker_progress(
    ws: &Workspace,
    worker: usize,
    i: usize,
    pairs: &[(u32, u32)],
) -> Result<()> {
    progress::pairs_to_file(&ws.worker_pairs_file(worker), pairs)?;
    progress::num_to_file(&ws.worker_index_file(worker), i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::exact_pair;
    use crate::generator::all_strings;
    use tempfile::TempDir;

    fn reference_edges(candidates: &[String], min_ed: usize) -> Vec<(u32, u32)> {
        let mut out = Vec::new();
        for i in 0..candidates.len() {
            for j in (i + 1)..candidates.len() {
                if exact_pair(&candidates[i], &candidates[j]) < min_ed as i32 {
                    out.push((i as u32, j as u32));
                }
            }
        }
        out
    }

    #[test]
    fn test_edges_match_reference_distances() {
        let candidates = all_strings(3);
        let dir = TempDir::new().unwrap();
        let ws = Workspace::new(dir.path());
        let (adj, ones) = fill_adj_list(&candidates, 2, 2, 0, false, &ws).unwrap();
        let expected = reference_edges(&candidates, 2);
        assert_eq!(adj.edges(), expected);
        assert_eq!(ones, 2 * expected.len() as i64);
    }

    #[test]
    fn test_edge_set_is_thread_invariant() {
        let candidates = all_strings(4);
        let dir = TempDir::new().unwrap();
        let ws = Workspace::new(dir.path());
        let (adj1, ones1) = fill_adj_list(&candidates, 2, 1, 0, false, &ws).unwrap();
        let (adj16, ones16) = fill_adj_list(&candidates, 2, 16, 0, false, &ws).unwrap();
        assert_eq!(adj1.edges(), adj16.edges());
        assert_eq!(ones1, ones16);
    }

    #[test]
    fn test_buckets_mirror_degrees() {
        let mut adj = AdjList::new();
        for (i, j) in [(0u32, 1u32), (0, 2), (0, 3), (1, 2)] {
            adj.set(i, j);
            adj.set(j, i);
        }
        adj.rebuild_buckets();
        assert_eq!(adj.degree(0), Some(3));
        assert_eq!(adj.degree(3), Some(1));
        assert_eq!(adj.max_sum_row(), Some(0));
        assert_eq!(adj.min_sum_row(), Some(3));
    }

    #[test]
    fn test_del_row_col_keeps_zero_degree_rows() {
        let mut adj = AdjList::new();
        adj.set(0, 1);
        adj.set(1, 0);
        adj.rebuild_buckets();
        adj.del_row_col(0);
        // vertex 1 dropped to degree zero but still owns a row
        assert!(!adj.is_empty());
        assert_eq!(adj.degree(1), Some(0));
        assert_eq!(adj.max_sum_row(), Some(1));
        adj.del_row_col(1);
        assert!(adj.is_empty());
    }

    #[test]
    fn test_del_ball_removes_neighborhood_from_remaining() {
        let mut adj = AdjList::new();
        for (i, j) in [(0u32, 1u32), (0, 2), (3, 4)] {
            adj.set(i, j);
            adj.set(j, i);
        }
        adj.rebuild_buckets();
        let mut remaining: AHashSet<u32> = (0..5).collect();
        adj.del_ball(0, &mut remaining);
        assert!(!remaining.contains(&0));
        assert!(!remaining.contains(&1));
        assert!(!remaining.contains(&2));
        assert!(remaining.contains(&3));
        assert_eq!(adj.row_num(), 2);
    }

    #[test]
    fn test_tie_break_is_smallest_id() {
        let mut adj = AdjList::new();
        for (i, j) in [(5u32, 6u32), (2, 3)] {
            adj.set(i, j);
            adj.set(j, i);
        }
        adj.rebuild_buckets();
        // all four vertices have degree 1
        assert_eq!(adj.min_sum_row(), Some(2));
        assert_eq!(adj.max_sum_row(), Some(2));
    }

    #[test]
    fn test_snapshot_round_trip() {
        let candidates = all_strings(3);
        let dir = TempDir::new().unwrap();
        let ws = Workspace::new(dir.path());
        let (adj, _) = fill_adj_list(&candidates, 2, 2, 0, false, &ws).unwrap();
        let path = dir.path().join("adj.txt");
        adj.to_file(&path).unwrap();
        let back = AdjList::from_file(&path).unwrap();
        assert_eq!(adj.edges(), back.edges());
        assert_eq!(adj.min_sum_row(), back.min_sum_row());
        assert_eq!(adj.max_sum_row(), back.max_sum_row());
    }

    #[test]
    fn test_snapshot_preserves_zero_degree_rows() {
        let mut adj = AdjList::new();
        for (i, j) in [(0u32, 1u32), (0, 2)] {
            adj.set(i, j);
            adj.set(j, i);
        }
        adj.rebuild_buckets();
        adj.del_row_col(0);
        // rows 1 and 2 are now at degree zero but still alive
        assert_eq!(adj.row_num(), 2);

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("adj.txt");
        adj.to_file(&path).unwrap();
        let back = AdjList::from_file(&path).unwrap();
        assert_eq!(back.row_num(), 2);
        assert_eq!(back.degree(1), Some(0));
        assert_eq!(back.degree(2), Some(0));
        assert_eq!(back.max_sum_row(), adj.max_sum_row());
    }

    #[test]
    fn test_resume_continues_from_worker_checkpoints() {
        let candidates = all_strings(3);
        let dir = TempDir::new().unwrap();
        let ws = Workspace::new(dir.path());
        // full uninterrupted build as the oracle
        let (oracle, oracle_ones) = fill_adj_list(&candidates, 2, 2, 0, false, &ws).unwrap();

        // emulate an interruption right after the first checkpoint: worker 0
        // has completed outer index 0, worker 1 outer index 1
        let mut done: Vec<Vec<(u32, u32)>> = vec![Vec::new(), Vec::new()];
        for t in 0..2usize {
            let handle = PatternHandle::new(&candidates[t]);
            for j in (t + 1)..candidates.len() {
                if !banded_at_least(&candidates[j], &handle, 2) {
                    done[t].push((t as u32, j as u32));
                }
            }
            progress::pairs_to_file(&ws.worker_pairs_file(t), &done[t]).unwrap();
            progress::num_to_file(&ws.worker_index_file(t), t).unwrap();
        }
        let (resumed, resumed_ones) = fill_adj_list(&candidates, 2, 2, 0, true, &ws).unwrap();
        assert_eq!(resumed.edges(), oracle.edges());
        assert_eq!(resumed_ones, oracle_ones);
    }
}
