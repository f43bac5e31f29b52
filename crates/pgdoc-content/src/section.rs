//! DocBook section extraction.
//!
//! Splits a PostgreSQL documentation file along its `<chapter>`/`<preface>`,
//! `<sect1>`, and `<sect2>` structure so every chunk can be labelled with the
//! headings it sits under. Deeper levels (`<sect3>` and below) stay inside
//! their `<sect2>`.
//!
//! Text that sits between sections (a chapter's introduction before its
//! first `<sect1>`, or a `<sect1>`'s closing paragraphs after its last
//! `<sect2>`) becomes a section of its own at the enclosing level.

use serde::Serialize;

use crate::sgml::{Document, NodeId, NodeKind};
use crate::text::is_blank;

/// A run of document text with the headings it belongs to.
///
/// Empty heading strings mean the level does not apply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Section {
    /// Name of the whole document (e.g. "PostgreSQL 16 Documentation").
    pub document: String,
    /// Chapter or preface title.
    pub chapter: String,
    /// `<sect1>` title.
    pub sect1: String,
    /// `<sect2>` title.
    pub sect2: String,
    /// Raw text of the section.
    pub text: String,
}

impl Section {
    /// Prefix `chunk` with Markdown headings for each level that is set.
    ///
    /// ```rust
    /// use pgdoc_content::section::Section;
    ///
    /// let section = Section {
    ///     document: "PostgreSQL".into(),
    ///     chapter: "Backup and Restore".into(),
    ///     sect1: "SQL Dump".into(),
    ///     ..Default::default()
    /// };
    /// assert_eq!(
    ///     section.render("pg_dump writes SQL."),
    ///     "# PostgreSQL\n## Backup and Restore\n### SQL Dump\npg_dump writes SQL."
    /// );
    /// ```
    pub fn render(&self, chunk: &str) -> String {
        let mut lines = vec![format!("# {}", self.document)];
        if !self.chapter.is_empty() {
            lines.push(format!("## {}", self.chapter));
        }
        if !self.sect1.is_empty() {
            lines.push(format!("### {}", self.sect1));
        }
        if !self.sect2.is_empty() {
            lines.push(format!("#### {}", self.sect2));
        }
        lines.push(chunk.to_string());
        lines.join("\n")
    }

    fn new(document: &str, chapter: &str, sect1: &str, sect2: &str, text: String) -> Self {
        Self {
            document: document.to_string(),
            chapter: chapter.to_string(),
            sect1: sect1.to_string(),
            sect2: sect2.to_string(),
            text,
        }
    }
}

/// Title of `node` if its first `<title>` descendant is a direct child.
///
/// Returns an empty string when the first title belongs to a nested
/// element, so a chapter never borrows the title of its first section.
pub fn direct_child_title(doc: &Document, node: NodeId) -> String {
    match doc.find(node, "title") {
        Some(title) if doc.parent(title) == Some(node) => doc.text(title),
        _ => String::new(),
    }
}

/// A container's content, split at child sections.
enum Segment {
    /// Text between sections.
    Text(String),
    /// A nested section element.
    Section(NodeId),
}

/// Walk `node`'s content in document order, stopping at (but not entering)
/// elements called `boundary`.
fn segments(doc: &Document, node: NodeId, boundary: &str) -> Vec<Segment> {
    fn walk(
        doc: &Document,
        node: NodeId,
        boundary: &str,
        pending: &mut String,
        out: &mut Vec<Segment>,
    ) {
        for &child in doc.children(node) {
            match doc.kind(child) {
                NodeKind::Text(text) => pending.push_str(text),
                NodeKind::Element { name, .. } if name == boundary => {
                    out.push(Segment::Text(std::mem::take(pending)));
                    out.push(Segment::Section(child));
                }
                _ => walk(doc, child, boundary, pending, out),
            }
        }
    }

    let mut pending = String::new();
    let mut out = Vec::new();
    walk(doc, node, boundary, &mut pending, &mut out);
    out.push(Segment::Text(pending));
    out
}

/// Extract the chapter/sect1/sect2 sections of a parsed document.
///
/// Every `<chapter>` and `<preface>` is a top-level container. Files that
/// start directly at `<sect1>` level (many reference pages do) are treated as
/// one untitled container holding the whole document. Blank runs are
/// skipped.
pub fn extract_sections(doc: &Document, document_name: &str) -> Vec<Section> {
    let mut containers = doc.find_all(doc.root(), &["chapter", "preface"]);
    if containers.is_empty() {
        containers.push(doc.root());
    }

    let mut sections = Vec::new();

    for chapter in containers {
        let chapter_title = direct_child_title(doc, chapter);

        for segment in segments(doc, chapter, "sect1") {
            let sect1 = match segment {
                Segment::Text(text) => {
                    if !is_blank(&text) {
                        sections.push(Section::new(document_name, &chapter_title, "", "", text));
                    }
                    continue;
                }
                Segment::Section(sect1) => sect1,
            };

            let sect1_title = direct_child_title(doc, sect1);

            for segment in segments(doc, sect1, "sect2") {
                match segment {
                    Segment::Text(text) => {
                        if !is_blank(&text) {
                            sections.push(Section::new(
                                document_name,
                                &chapter_title,
                                &sect1_title,
                                "",
                                text,
                            ));
                        }
                    }
                    Segment::Section(sect2) => {
                        sections.push(Section::new(
                            document_name,
                            &chapter_title,
                            &sect1_title,
                            &direct_child_title(doc, sect2),
                            doc.text(sect2),
                        ));
                    }
                }
            }
        }
    }

    log::debug!("Extracted {} sections from {document_name}", sections.len());
    sections
}
