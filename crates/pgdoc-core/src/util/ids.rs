//! Identifier utilities.
//!
//! Chunks emitted by pgdoc carry stable ids derived from the source file
//! name, e.g. `backup-3` for the fourth chunk of `backup.sgml`.

use std::path::Path;

/// Normalize an identifier to lowercase kebab-case.
///
/// Trims, lowercases, turns underscores into spaces, then joins the
/// whitespace-separated words with single hyphens.
///
/// # Examples
///
/// ```
/// use pgdoc_core::util::ids::normalize_id;
///
/// assert_eq!(normalize_id("High Availability"), "high-availability");
/// assert_eq!(normalize_id("ref_pg_dump"), "ref-pg-dump");
/// assert_eq!(normalize_id("  Mixed   Case  "), "mixed-case");
/// ```
pub fn normalize_id(id: &str) -> String {
    id.trim()
        .to_lowercase()
        .replace('_', " ")
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join("-")
}

/// Compute a document id from a file path's stem.
///
/// Returns `None` if the path has no file stem.
///
/// ```
/// use std::path::Path;
/// use pgdoc_core::util::ids::id_from_path;
///
/// assert_eq!(
///     id_from_path(Path::new("doc/src/sgml/ref/pg_dump.sgml")),
///     Some("pg-dump".to_string())
/// );
/// assert_eq!(id_from_path(Path::new("/")), None);
/// ```
pub fn id_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(normalize_id)
}

/// Build the id of the `index`-th chunk of a document.
pub fn chunk_id(document_id: &str, index: usize) -> String {
    format!("{document_id}-{index}")
}
