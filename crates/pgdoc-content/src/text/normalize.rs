//! Whitespace normalization for extracted text.
//!
//! Text pulled out of SGML keeps the source indentation and the blank lines
//! left behind by removed tags. Both are noise for embedding.

use std::sync::LazyLock;

use regex::Regex;

static BLANK_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("Invalid blank run regex"));

/// Strip leading whitespace from every line, then collapse runs of three or
/// more newlines into a single blank line.
///
/// ```rust
/// use pgdoc_content::text::normalize_text;
///
/// let raw = "\n    <title> gone\n    Backup and Restore\n\n\n\n\n   Text";
/// assert_eq!(normalize_text(raw), "\n<title> gone\nBackup and Restore\n\nText");
/// ```
pub fn normalize_text(text: &str) -> String {
    let stripped = text
        .split('\n')
        .map(str::trim_start)
        .collect::<Vec<_>>()
        .join("\n");
    BLANK_RUN.replace_all(&stripped, "\n\n").into_owned()
}

/// Returns true if `text` has no non-whitespace characters.
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}
