//! indexgen - DNA barcode codebook generation library.
//!
//! Builds large sets of fixed-length strands over the {A,C,G,T} alphabet
//! (written as 0-3) in which every pair of strands differs by at least a
//! prescribed Levenshtein distance, while respecting GC-content and
//! homopolymer constraints.
//!
//! # Pipeline
//!
//! 1. A [`generator`] enumerates a structured candidate universe (linear
//!    codes over GF(4), VT codes, exhaustive or random enumeration, or a
//!    file) and filters it biologically.
//! 2. The bit-parallel [`distance`] engine decides for any candidate pair
//!    whether their edit distance is below the bound.
//! 3. A sparse conflict [`graph`] is filled by worker threads, one edge per
//!    too-close pair.
//! 4. The greedy [`solver`] reduces the graph to an independent set, the
//!    codebook.
//! 5. [`verify`] optionally re-checks the invariant in parallel.
//!
//! Long runs snapshot their state through [`progress`] and can be resumed by
//! [`pipeline::resume`].
//!
//! # Example
//!
//! ```ignore
//! use indexgen::config::{Method, Params};
//! use indexgen::pipeline::{self, RunOptions};
//! use indexgen::progress::Workspace;
//!
//! let params = Params {
//!     code_len: 8,
//!     code_min_ed: 3,
//!     max_run: 3,
//!     min_gc: 0.3,
//!     max_gc: 0.7,
//!     thread_num: 4,
//!     save_interval: 600,
//!     method: Method::linear_code(3),
//! };
//! let ws = Workspace::new("out");
//! let summary = pipeline::run(&params, &ws, &RunOptions::default())?;
//! ```

pub mod config;
pub mod decode;
pub mod distance;
pub mod generator;
pub mod gf4;
pub mod graph;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod solver;
pub mod verify;

pub use config::{Method, Params};
pub use graph::AdjList;
pub use progress::Workspace;
pub use solver::Policy;
