//! Persistence for the single-integer high-score file.
//!
//! The file holds one decimal number and nothing else. A missing or
//! unreadable file is the same as a zero high score; the caller decides what
//! to do about write failures.

use std::{fs, io, path::Path};

/// Reads the stored high score, treating any failure as zero.
pub(crate) fn load(path: &Path) -> u32 {
    fs::read_to_string(path)
        .ok()
        .and_then(|contents| contents.trim().parse().ok())
        .unwrap_or(0)
}

/// Overwrites the stored high score with the provided value.
pub(crate) fn save(path: &Path, score: u32) -> io::Result<()> {
    fs::write(path, score.to_string())
}
