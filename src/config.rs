//! Run configuration: the `Params` record, the generation method variants,
//! and their stable on-disk representation.
//!
//! The params file is a plain sequence of ASCII lines in a fixed order. It is
//! purely internal (written next to the other progress files so an
//! interrupted run can be resumed) and versionless: resuming requires the
//! same binary that wrote it.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Configuration for one codebook generation run.
///
/// Immutable once the command-line boundary has resolved it; the pipeline
/// only ever updates `code_len` between sweep iterations.
#[derive(Debug, Clone, PartialEq)]
pub struct Params {
    /// Length of the generated codewords.
    pub code_len: usize,
    /// Minimum Levenshtein distance between any two codebook entries.
    pub code_min_ed: usize,
    /// Longest allowed homopolymer run; 0 disables the filter.
    pub max_run: usize,
    /// Minimum GC-content; together with `max_gc == 0.0` disables the filter.
    pub min_gc: f64,
    /// Maximum GC-content.
    pub max_gc: f64,
    /// Number of worker threads for parallel stages.
    pub thread_num: usize,
    /// Seconds between progress snapshots; 0 disables checkpointing.
    pub save_interval: u64,
    /// Candidate generation method with its parameters.
    pub method: Method,
}

/// Candidate generation method, one variant per strategy.
#[derive(Debug, Clone, PartialEq)]
pub enum Method {
    /// Codewords of a shortened linear code over GF(4) with a guaranteed
    /// minimum Hamming distance in 2..=5, optionally biased and permuted.
    LinearCode {
        min_hd: usize,
        transform: CodeTransform,
    },
    /// All 4^n strings of the configured length.
    AllStrings,
    /// Uniformly random strings; duplicates are possible.
    Random { num_candidates: usize },
    /// Varshamov-Tenengolts code with remainders `a` (mod n) and `b` (mod 4).
    VtCode { a: i64, b: i64 },
    /// Differential VT code with the given syndrome (mod 4n).
    DifferentialVtCode { syndrome: i64 },
    /// Candidates loaded from a text file.
    FileRead { path: PathBuf },
}

/// Bias vector selection for the linear-code generator.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum BiasSpec {
    /// No bias (the plain code, containing the all-zero word).
    #[default]
    Zero,
    /// A seeded random GF(4) vector of the code length.
    Random,
    /// An explicit vector.
    Manual(Vec<u8>),
}

/// Permutation selection for the linear-code generator.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PermSpec {
    #[default]
    Identity,
    /// A seeded random permutation.
    Random,
    /// An explicit 0-based permutation.
    Manual(Vec<usize>),
}

/// Affine transform applied to the linear code: `x -> perm_cols(x) + bias`,
/// with the message enumeration order controlled by a row permutation.
///
/// None of it changes the pairwise Hamming distances; the knobs exist to
/// steer codewords into the biological filters. Random choices are drawn
/// from `seed` in a fixed order (bias, then rows, then columns) so a
/// resumed run regenerates the identical candidate set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CodeTransform {
    pub bias: BiasSpec,
    pub row_perm: PermSpec,
    pub col_perm: PermSpec,
    pub seed: u64,
}

impl CodeTransform {
    /// True when the transform leaves the code untouched.
    pub fn is_identity(&self) -> bool {
        self.bias == BiasSpec::Zero
            && self.row_perm == PermSpec::Identity
            && self.col_perm == PermSpec::Identity
    }
}

impl BiasSpec {
    fn tag(&self) -> u8 {
        match self {
            BiasSpec::Zero => 0,
            BiasSpec::Random => 1,
            BiasSpec::Manual(_) => 2,
        }
    }

    pub fn mode_name(&self) -> &'static str {
        match self {
            BiasSpec::Zero => "default",
            BiasSpec::Random => "random",
            BiasSpec::Manual(_) => "manual",
        }
    }
}

impl PermSpec {
    fn tag(&self) -> u8 {
        match self {
            PermSpec::Identity => 0,
            PermSpec::Random => 1,
            PermSpec::Manual(_) => 2,
        }
    }

    pub fn mode_name(&self) -> &'static str {
        match self {
            PermSpec::Identity => "identity",
            PermSpec::Random => "random",
            PermSpec::Manual(_) => "manual",
        }
    }
}

/// Parses a comma-separated integer vector as used by the `--lc-*` options.
pub fn parse_csv_vector<T: FromStr>(text: &str, what: &str) -> Result<Vec<T>>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    text.split(',')
        .map(|part| {
            part.trim()
                .parse::<T>()
                .with_context(|| format!("invalid {} entry '{}'", what, part))
        })
        .collect()
}

impl Method {
    /// Plain linear code with no bias or permutation.
    pub fn linear_code(min_hd: usize) -> Method {
        Method::LinearCode {
            min_hd,
            transform: CodeTransform::default(),
        }
    }

    /// Integer tag used in the params file.
    pub fn tag(&self) -> u8 {
        match self {
            Method::LinearCode { .. } => 0,
            Method::AllStrings => 1,
            Method::Random { .. } => 2,
            Method::VtCode { .. } => 3,
            Method::DifferentialVtCode { .. } => 4,
            Method::FileRead { .. } => 5,
        }
    }

    /// Human-readable method name, as accepted by `--method`.
    pub fn name(&self) -> &'static str {
        match self {
            Method::LinearCode { .. } => "LinearCode",
            Method::AllStrings => "AllStrings",
            Method::Random { .. } => "Random",
            Method::VtCode { .. } => "VTCode",
            Method::DifferentialVtCode { .. } => "Diff_VTCode",
            Method::FileRead { .. } => "FileRead",
        }
    }

    /// Serializes the method-specific tail of the params file.
    fn write_tail(&self, out: &mut String) {
        use std::fmt::Write;
        let join = |v: &[u8]| {
            v.iter().map(|x| x.to_string()).collect::<Vec<_>>().join(",")
        };
        let join_idx = |v: &[usize]| {
            v.iter().map(|x| x.to_string()).collect::<Vec<_>>().join(",")
        };
        match self {
            Method::LinearCode { min_hd, transform } => {
                writeln!(out, "{}", min_hd).unwrap();
                writeln!(out, "{}", transform.bias.tag()).unwrap();
                if let BiasSpec::Manual(v) = &transform.bias {
                    writeln!(out, "{}", join(v)).unwrap();
                }
                writeln!(out, "{}", transform.row_perm.tag()).unwrap();
                if let PermSpec::Manual(v) = &transform.row_perm {
                    writeln!(out, "{}", join_idx(v)).unwrap();
                }
                writeln!(out, "{}", transform.col_perm.tag()).unwrap();
                if let PermSpec::Manual(v) = &transform.col_perm {
                    writeln!(out, "{}", join_idx(v)).unwrap();
                }
                writeln!(out, "{}", transform.seed).unwrap();
            }
            Method::AllStrings => {}
            Method::Random { num_candidates } => writeln!(out, "{}", num_candidates).unwrap(),
            Method::VtCode { a, b } => {
                writeln!(out, "{}", a).unwrap();
                writeln!(out, "{}", b).unwrap();
            }
            Method::DifferentialVtCode { syndrome } => writeln!(out, "{}", syndrome).unwrap(),
            Method::FileRead { path } => writeln!(out, "{}", path.display()).unwrap(),
        }
    }

    /// Reconstructs a method from its tag and the remaining lines.
    fn read_tail<'a>(tag: u8, lines: &mut impl Iterator<Item = &'a str>) -> Result<Method> {
        let mut next = |what: &str| -> Result<&'a str> {
            lines
                .next()
                .with_context(|| format!("params file truncated: missing {}", what))
        };
        Ok(match tag {
            0 => {
                let min_hd = parse_line(next("min_hd")?, "min_hd")?;
                let bias = match parse_line::<u8>(next("bias mode")?, "bias mode")? {
                    0 => BiasSpec::Zero,
                    1 => BiasSpec::Random,
                    2 => BiasSpec::Manual(parse_csv_vector(next("bias vector")?, "bias")?),
                    other => bail!("unknown bias mode tag {} in params file", other),
                };
                let mut read_perm = |what: &str| -> Result<PermSpec> {
                    Ok(match parse_line::<u8>(next(what)?, what)? {
                        0 => PermSpec::Identity,
                        1 => PermSpec::Random,
                        2 => PermSpec::Manual(parse_csv_vector(next(what)?, what)?),
                        other => bail!("unknown {} tag {} in params file", what, other),
                    })
                };
                let row_perm = read_perm("row permutation")?;
                let col_perm = read_perm("column permutation")?;
                let seed = parse_line(next("transform seed")?, "transform seed")?;
                Method::LinearCode {
                    min_hd,
                    transform: CodeTransform {
                        bias,
                        row_perm,
                        col_perm,
                        seed,
                    },
                }
            }
            1 => Method::AllStrings,
            2 => Method::Random {
                num_candidates: parse_line(next("num_candidates")?, "num_candidates")?,
            },
            3 => Method::VtCode {
                a: parse_line(next("vt a")?, "vt a")?,
                b: parse_line(next("vt b")?, "vt b")?,
            },
            4 => Method::DifferentialVtCode {
                syndrome: parse_line(next("syndrome")?, "syndrome")?,
            },
            5 => Method::FileRead {
                path: PathBuf::from(next("input path")?),
            },
            other => bail!("unknown generation method tag {} in params file", other),
        })
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

fn parse_line<T: FromStr>(line: &str, what: &str) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    line.trim()
        .parse::<T>()
        .with_context(|| format!("invalid {} value '{}' in params file", what, line))
}

impl Params {
    /// Serializes the record to the stable line format.
    pub fn to_file_string(&self) -> String {
        use std::fmt::Write;
        let mut out = String::new();
        writeln!(out, "{}", self.code_len).unwrap();
        writeln!(out, "{}", self.code_min_ed).unwrap();
        writeln!(out, "{}", self.max_run).unwrap();
        writeln!(out, "{}", self.min_gc).unwrap();
        writeln!(out, "{}", self.max_gc).unwrap();
        writeln!(out, "{}", self.thread_num).unwrap();
        writeln!(out, "{}", self.save_interval).unwrap();
        writeln!(out, "{}", self.method.tag()).unwrap();
        self.method.write_tail(&mut out);
        out
    }

    /// Parses a record previously written by [`Params::to_file_string`].
    pub fn from_file_string(text: &str) -> Result<Params> {
        let mut lines = text.lines();
        let mut next = |what: &str| -> Result<&str> {
            lines
                .next()
                .with_context(|| format!("params file truncated: missing {}", what))
        };
        let code_len = parse_line(next("code length")?, "code length")?;
        let code_min_ed = parse_line(next("min edit distance")?, "min edit distance")?;
        let max_run = parse_line(next("max run")?, "max run")?;
        let min_gc = parse_line(next("min GC")?, "min GC")?;
        let max_gc = parse_line(next("max GC")?, "max GC")?;
        let thread_num = parse_line(next("thread count")?, "thread count")?;
        let save_interval = parse_line(next("save interval")?, "save interval")?;
        let tag: u8 = parse_line(next("method tag")?, "method tag")?;
        let method = Method::read_tail(tag, &mut lines)?;
        Ok(Params {
            code_len,
            code_min_ed,
            max_run,
            min_gc,
            max_gc,
            thread_num,
            save_interval,
            method,
        })
    }

    /// Writes the record to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_file_string())
            .with_context(|| format!("failed to write params file {}", path.display()))
    }

    /// Reads a record back from `path`.
    pub fn load(path: &Path) -> Result<Params> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read params file {}", path.display()))?;
        Params::from_file_string(&text)
    }
}

/// Optional JSON configuration file.
///
/// Mirrors the command-line options; explicit CLI flags take precedence over
/// these values, which in turn take precedence over the built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub dir: Option<String>,
    pub verify: Option<bool>,
    pub policy: Option<String>,
    #[serde(default)]
    pub core: CoreConfig,
    #[serde(default)]
    pub constraints: ConstraintsConfig,
    #[serde(default)]
    pub performance: PerformanceConfig,
    #[serde(default)]
    pub method: MethodConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoreConfig {
    #[serde(rename = "lenStart")]
    pub len_start: Option<usize>,
    #[serde(rename = "lenEnd")]
    pub len_end: Option<usize>,
    #[serde(rename = "editDist")]
    pub edit_dist: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConstraintsConfig {
    #[serde(rename = "maxRun")]
    pub max_run: Option<usize>,
    #[serde(rename = "minGC")]
    pub min_gc: Option<f64>,
    #[serde(rename = "maxGC")]
    pub max_gc: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PerformanceConfig {
    pub threads: Option<usize>,
    #[serde(rename = "saveInterval")]
    pub save_interval: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MethodConfig {
    pub name: Option<String>,
    #[serde(rename = "linearCode", default)]
    pub linear_code: LinearCodeConfig,
    #[serde(rename = "vtCode", default)]
    pub vt_code: VtCodeConfig,
    #[serde(default)]
    pub random: RandomConfig,
    #[serde(rename = "diffVtCode", default)]
    pub diff_vt_code: DiffVtCodeConfig,
    #[serde(rename = "fileRead", default)]
    pub file_read: FileReadConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinearCodeConfig {
    #[serde(rename = "minHD")]
    pub min_hd: Option<usize>,
    #[serde(rename = "biasMode")]
    pub bias_mode: Option<String>,
    #[serde(rename = "rowPermMode")]
    pub row_perm_mode: Option<String>,
    #[serde(rename = "colPermMode")]
    pub col_perm_mode: Option<String>,
    pub bias: Option<Vec<u8>>,
    #[serde(rename = "rowPerm")]
    pub row_perm: Option<Vec<usize>>,
    #[serde(rename = "colPerm")]
    pub col_perm: Option<Vec<usize>>,
    #[serde(rename = "randomSeed")]
    pub random_seed: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VtCodeConfig {
    pub a: Option<i64>,
    pub b: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RandomConfig {
    pub candidates: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiffVtCodeConfig {
    pub syndrome: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileReadConfig {
    pub input_file: Option<String>,
}

impl FileConfig {
    /// Loads and parses a JSON configuration file.
    pub fn load(path: &Path) -> Result<FileConfig> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("could not open config file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("error parsing config JSON {}", path.display()))
    }
}
