//! Input file resolution.
//!
//! Paths given on the command line win. Without any, paths are read from a
//! list file, one per line; blank lines and lines starting with `#` are
//! skipped.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// List file consulted when no paths are given on the command line.
pub const DEFAULT_LIST: &str = "input_files.txt";

/// Work out which files to process.
///
/// Returns `Ok(None)` when no paths were given and the list file does not
/// exist.
pub fn resolve(files: &[PathBuf], list: &Path) -> Result<Option<Vec<PathBuf>>> {
    if !files.is_empty() {
        return Ok(Some(files.to_vec()));
    }
    if !list.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(list)
        .with_context(|| format!("failed to read {}", list.display()))?;
    Ok(Some(parse_list(&content)))
}

/// Parse the contents of a list file.
#[must_use]
pub fn parse_list(content: &str) -> Vec<PathBuf> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(PathBuf::from)
        .collect()
}
