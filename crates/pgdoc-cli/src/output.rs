//! Rendering processed documents as text, JSON, or JSON Lines.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::io::Write;
use std::path::PathBuf;

use clap::ValueEnum;
use pgdoc_content::{Chunk, PreprocessMode};
use pgdoc_core::{chunk_id, id_from_path};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Separator printed between chunks in text output.
pub const CHUNK_SEPARATOR: &str = "\n========================================\n";

/// Preview length for plain chunks.
pub const PLAIN_PREVIEW_CHARS: usize = 50;

/// Preview length for structured chunks, which start with heading lines.
pub const STRUCTURED_PREVIEW_CHARS: usize = 200;

/// How chunks are written.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable listing with previews
    #[default]
    Text,
    /// One JSON array of chunk records
    Json,
    /// One JSON record per line
    Jsonl,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Jsonl => write!(f, "jsonl"),
        }
    }
}

/// Default preview length for `mode`.
pub fn default_preview_chars(mode: PreprocessMode) -> usize {
    match mode {
        PreprocessMode::Plain => PLAIN_PREVIEW_CHARS,
        PreprocessMode::Structured => STRUCTURED_PREVIEW_CHARS,
    }
}

/// A chunk with its token count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountedChunk {
    pub chunk: Chunk,
    pub tokens: usize,
}

/// All chunks of one source file, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentChunks {
    pub source: PathBuf,
    pub chunks: Vec<CountedChunk>,
}

impl DocumentChunks {
    /// Stable id prefix for this file's chunks.
    ///
    /// Falls back to "document" when the path has no usable file stem.
    pub fn document_id(&self) -> String {
        id_from_path(&self.source).unwrap_or_else(|| "document".to_string())
    }

    /// Flatten into serializable records with ids prefixed by `document_id`.
    pub fn records(&self, document_id: &str) -> Vec<ChunkRecord<'_>> {
        self.chunks
            .iter()
            .enumerate()
            .map(|(index, counted)| ChunkRecord {
                id: chunk_id(document_id, index),
                source: self.source.display().to_string(),
                index,
                tokens: counted.tokens,
                document: counted.chunk.document.as_deref(),
                chapter: counted.chunk.chapter.as_deref(),
                sect1: counted.chunk.sect1.as_deref(),
                sect2: counted.chunk.sect2.as_deref(),
                text: &counted.chunk.text,
            })
            .collect()
    }
}

/// Id prefixes for `documents`, unique across the whole run.
///
/// The first file with a given stem keeps the plain id. Later files sharing
/// it get `-2`, `-3`, ... appended, skipping any id another file already
/// owns by its own stem. Chunk ids built from these prefixes are unique too.
pub fn document_ids(documents: &[DocumentChunks]) -> Vec<String> {
    let bases: Vec<String> = documents.iter().map(DocumentChunks::document_id).collect();
    let mut taken: HashSet<String> = bases.iter().cloned().collect();
    let mut seen: HashMap<&str, usize> = HashMap::new();

    bases
        .iter()
        .zip(documents)
        .map(|(base, document)| {
            let count = seen.entry(base.as_str()).or_insert(0);
            *count += 1;
            if *count == 1 {
                return base.clone();
            }

            let mut n = *count;
            let mut id = format!("{base}-{n}");
            while taken.contains(&id) {
                n += 1;
                id = format!("{base}-{n}");
            }
            log::debug!("{} shares id '{base}', using '{id}'", document.source.display());
            taken.insert(id.clone());
            id
        })
        .collect()
}

/// One line of JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkRecord<'a> {
    pub id: String,
    pub source: String,
    pub index: usize,
    pub tokens: usize,
    pub document: Option<&'a str>,
    pub chapter: Option<&'a str>,
    pub sect1: Option<&'a str>,
    pub sect2: Option<&'a str>,
    pub text: &'a str,
}

/// First `max_chars` chars of `text` on a single line.
pub fn preview(text: &str, max_chars: usize) -> String {
    text.chars()
        .take(max_chars)
        .map(|c| if c == '\n' { ' ' } else { c })
        .collect()
}

/// Write `documents` to `out` in `format`.
pub fn render(
    out: &mut impl Write,
    documents: &[DocumentChunks],
    format: OutputFormat,
    preview_chars: usize,
) -> Result<()> {
    match format {
        OutputFormat::Text => render_text(out, documents, preview_chars),
        OutputFormat::Json => render_json(out, documents),
        OutputFormat::Jsonl => render_jsonl(out, documents),
    }
}

fn render_text(
    out: &mut impl Write,
    documents: &[DocumentChunks],
    preview_chars: usize,
) -> Result<()> {
    for document in documents {
        writeln!(out, "Processing: {}", document.source.display())?;
        for (i, counted) in document.chunks.iter().enumerate() {
            writeln!(
                out,
                "{i}:{}:{}",
                counted.tokens,
                preview(&counted.chunk.text, preview_chars)
            )?;
        }
        let texts: Vec<&str> = document
            .chunks
            .iter()
            .map(|counted| counted.chunk.text.as_str())
            .collect();
        writeln!(out, "{}", texts.join(CHUNK_SEPARATOR))?;
    }
    Ok(())
}

fn render_json(out: &mut impl Write, documents: &[DocumentChunks]) -> Result<()> {
    let records: Vec<ChunkRecord<'_>> = documents
        .iter()
        .zip(document_ids(documents))
        .flat_map(|(document, id)| document.records(&id))
        .collect();
    serde_json::to_writer_pretty(&mut *out, &records)?;
    writeln!(out)?;
    Ok(())
}

fn render_jsonl(out: &mut impl Write, documents: &[DocumentChunks]) -> Result<()> {
    for (document, id) in documents.iter().zip(document_ids(documents)) {
        for record in document.records(&id) {
            serde_json::to_writer(&mut *out, &record)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
