//! Shared helpers for candidate input files.

use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Creates a buffered reader that automatically handles gzip-compressed
/// files.
///
/// The file is wrapped in a `GzDecoder` when the path ends with ".gz";
/// otherwise a plain buffered reader is returned.
pub fn create_buffered_reader(file: File, path: &Path) -> Box<dyn BufRead + Send> {
    if path.to_string_lossy().ends_with(".gz") {
        Box::new(BufReader::new(GzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    }
}
