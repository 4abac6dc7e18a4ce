//! End-to-end tests of the indexgen binary: argument handling, JSON config
//! precedence, the on-disk artifacts and the distance invariant of the
//! emitted codebook.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn indexgen() -> Command {
    Command::new(env!("CARGO_BIN_EXE_indexgen"))
}

/// Finds the single final codebook file inside a run directory.
fn find_output(dir: &Path) -> PathBuf {
    let mut hits: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("CodeSize-"))
        })
        .collect();
    assert_eq!(hits.len(), 1, "expected exactly one codebook file");
    hits.pop().unwrap()
}

/// Codewords are the lines after the `===` rule.
fn read_codebook(path: &Path) -> Vec<String> {
    let text = fs::read_to_string(path).unwrap();
    let mut in_data = false;
    let mut words = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if !in_data {
            if line.len() >= 3 && line.bytes().all(|b| b == b'=') {
                in_data = true;
            }
            continue;
        }
        if !line.is_empty() {
            words.push(line.to_string());
        }
    }
    words
}

fn dp_edit_distance(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];
    for (i, &ac) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b.iter().enumerate() {
            let sub = prev[j] + usize::from(ac != bc);
            curr[j + 1] = sub.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

#[test]
fn test_all_strings_run_end_to_end() {
    let dir = TempDir::new().unwrap();
    let work = dir.path().join("run");

    indexgen()
        .arg("--dir")
        .arg(&work)
        .args(["-s", "4", "-e", "4", "-D", "2"])
        .args(["--method", "AllStrings"])
        .args(["--max-run", "3", "--min-gc", "0.25", "--max-gc", "0.75"])
        .args(["--threads", "2", "--policy", "min-sum-row", "--verify"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Vector distance SUCCESS"));

    let output = find_output(&work);
    let codebook = read_codebook(&output);
    assert!(!codebook.is_empty());
    assert!(output
        .file_name()
        .unwrap()
        .to_str()
        .unwrap()
        .contains("CodeLen-04_MinED-2"));

    // the distance invariant and both filters hold on the emitted set
    for (i, a) in codebook.iter().enumerate() {
        assert_eq!(a.len(), 4);
        let gc = a.bytes().filter(|&b| b == b'1' || b == b'2').count();
        assert!((1..=3).contains(&gc), "GC window violated by {}", a);
        for b in &codebook[i + 1..] {
            assert!(dp_edit_distance(a, b) >= 2);
        }
    }

    // progress files are gone after a clean finish
    for name in [
        "progress_params.txt",
        "progress_cand.txt",
        "progress_stage.txt",
        "matrix_ones_num.txt",
    ] {
        assert!(!work.join(name).exists(), "{} left behind", name);
    }
}

#[test]
fn test_cli_overrides_json_config() {
    let dir = TempDir::new().unwrap();
    let work = dir.path().join("run");
    let config = dir.path().join("config.json");
    fs::write(
        &config,
        r#"{
            "core": {"lenStart": 4, "lenEnd": 4, "editDist": 2},
            "constraints": {"maxRun": 0, "minGC": 0.0, "maxGC": 0.0},
            "performance": {"threads": 2, "saveInterval": 0},
            "method": {"name": "AllStrings"}
        }"#,
    )
    .unwrap();

    // the CLI distance beats the JSON one; everything else comes from JSON
    indexgen()
        .arg("--dir")
        .arg(&work)
        .arg("--config")
        .arg(&config)
        .args(["-D", "3"])
        .assert()
        .success();

    let output = find_output(&work);
    assert!(output
        .file_name()
        .unwrap()
        .to_str()
        .unwrap()
        .contains("CodeLen-04_MinED-3"));
}

#[test]
fn test_file_read_round_trip() {
    let dir = TempDir::new().unwrap();
    let work = dir.path().join("run");
    let input = dir.path().join("candidates.txt");
    fs::write(&input, "ACGT\nTGCA\nAATT\nGGCC\nACGT\n").unwrap();

    indexgen()
        .arg("--dir")
        .arg(&work)
        .args(["-s", "4", "-e", "4", "-D", "1"])
        .args(["--method", "FileRead"])
        .arg("--input-file")
        .arg(&input)
        .args(["--max-run", "0", "--min-gc", "0", "--max-gc", "0"])
        .args(["--threads", "2", "--policy", "min-sum-row"])
        .assert()
        .success();

    // D=1 means no conflicts except exact duplicates: the duplicate ACGT
    // collapses, everything else survives
    let codebook = read_codebook(&find_output(&work));
    assert_eq!(codebook.len(), 4);
    for word in ["0123", "3210", "0033", "2211"] {
        assert!(codebook.contains(&word.to_string()), "missing {}", word);
    }
}

#[test]
fn test_unknown_method_is_a_configuration_error() {
    let dir = TempDir::new().unwrap();
    indexgen()
        .arg("--dir")
        .arg(dir.path().join("run"))
        .args(["--method", "Quantum"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown generation method"));
}

#[test]
fn test_linear_code_length_mismatch_fails_cleanly() {
    let dir = TempDir::new().unwrap();
    indexgen()
        .arg("--dir")
        .arg(dir.path().join("run"))
        .args(["-s", "3", "-e", "3", "-D", "2"])
        .args(["--method", "LinearCode", "--min-hd", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("minHD=3"));
}

#[test]
fn test_resume_requires_an_existing_directory() {
    indexgen()
        .args(["--resume", "--dir", "/definitely/not/a/run/dir"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_resume_requires_a_directory_argument() {
    indexgen()
        .arg("--resume")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--dir"));
}

#[test]
fn test_bad_gc_bounds_are_rejected() {
    let dir = TempDir::new().unwrap();
    indexgen()
        .arg("--dir")
        .arg(dir.path().join("run"))
        .args(["--min-gc", "1.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("min-gc"));
}
