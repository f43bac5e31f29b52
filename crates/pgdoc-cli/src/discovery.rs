//! Input file discovery.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use pgdoc_core::Error;

use crate::error::Result;

/// Expand command-line paths into the list of files to process.
///
/// Files are taken as given. Directories are searched with `pattern`
/// (relative to the directory) and their matches sorted for deterministic
/// ordering. Paths seen more than once are kept at their first position.
/// A path that does not exist is a [`Error::NotFound`].
pub fn discover_documents(paths: &[PathBuf], pattern: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            files.extend(find_in_directory(path, pattern)?);
        } else {
            return Err(Error::not_found(format!("input path {}", path.display())).into());
        }
    }

    let mut seen = HashSet::new();
    files.retain(|file| seen.insert(file.clone()));

    log::debug!("Discovered {} documents", files.len());
    Ok(files)
}

/// Files under `dir` matching `pattern`, sorted.
pub fn find_in_directory(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let escaped = glob::Pattern::escape(&dir.to_string_lossy());
    let full_pattern = format!("{}/{}", escaped.trim_end_matches('/'), pattern);

    let mut files = Vec::new();
    for entry in glob::glob(&full_pattern)? {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => log::warn!("Skipping {}: {}", e.path().display(), e.error()),
        }
    }

    // Sort for deterministic ordering
    files.sort();
    Ok(files)
}
