//! Candidate loading from text files.
//!
//! One candidate per line, either over the 0-3 alphabet or as
//! case-insensitive A/C/G/T (mapped A->0, C->1, G->2, T->3). Files may carry
//! a metadata header terminated by a line consisting solely of `=` signs;
//! the final codebook files written by this tool have exactly that shape, so
//! they can be fed back in. Without a separator the reader peeks at the
//! first few non-blank lines: if they all share one length the whole file is
//! treated as raw data.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufRead;
use std::path::Path;

use crate::generator::util::create_buffered_reader;

/// Number of leading non-blank lines inspected when no header separator has
/// been seen yet.
const PEEK_LINES: usize = 20;

/// Minimum length of a `===` header separator line.
const SEPARATOR_MIN_LEN: usize = 3;

/// Reads all valid length-`code_len` candidates from `path` (plain or .gz).
pub fn read_candidates(path: &Path, code_len: usize) -> Result<Vec<String>> {
    let file = File::open(path)
        .with_context(|| format!("could not open input file: {}", path.display()))?;
    let reader = create_buffered_reader(file, path);
    read_candidates_from(reader, code_len)
}

fn read_candidates_from<R: BufRead>(reader: R, code_len: usize) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line.context("failed to read candidate line")?;
        let trimmed = line.trim().to_string();
        if !trimmed.is_empty() {
            lines.push(trimmed);
        }
    }

    let mut result = Vec::new();
    if let Some(sep) = lines.iter().position(|l| is_separator(l)) {
        // explicit metadata header: data starts after the separator
        for line in &lines[sep + 1..] {
            if let Some(candidate) = parse_line(line, code_len) {
                result.push(candidate);
            }
        }
        return Ok(result);
    }

    // no separator: accept the file as raw data when the leading lines agree
    // on a single length
    let peek = &lines[..lines.len().min(PEEK_LINES)];
    let looks_like_data = match peek.first() {
        Some(first) => peek.iter().all(|l| l.len() == first.len()),
        None => false,
    };
    if looks_like_data {
        for line in &lines {
            if let Some(candidate) = parse_line(line, code_len) {
                result.push(candidate);
            }
        }
    }
    Ok(result)
}

/// A line of at least three characters, all of them '='.
fn is_separator(line: &str) -> bool {
    line.len() >= SEPARATOR_MIN_LEN && line.bytes().all(|b| b == b'=')
}

/// Maps one line to the 0-3 alphabet; `None` for wrong length or invalid
/// characters.
fn parse_line(line: &str, code_len: usize) -> Option<String> {
    if line.len() != code_len {
        return None;
    }
    let mut mapped = String::with_capacity(code_len);
    for c in line.chars() {
        let digit = match c.to_ascii_uppercase() {
            '0'..='3' => c,
            'A' => '0',
            'C' => '1',
            'G' => '2',
            'T' => '3',
            _ => return None,
        };
        mapped.push(digit);
    }
    Some(mapped)
}
