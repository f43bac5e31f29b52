//! Document preprocessors: SGML in, embedding-ready chunks out.
//!
//! Two strategies are provided:
//!
//! - [`PlainPreprocessor`] flattens the whole file to text and splits it.
//! - [`StructuredPreprocessor`] splits along chapter/sect1/sect2 boundaries
//!   first and prefixes each chunk with its headings, which gives retrieval
//!   far better context for short chunks.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use pgdoc_content::preprocessor::{Preprocessor, StructuredPreprocessor};
//! use pgdoc_content::text::TextSplitter;
//! use pgdoc_content::tokens::CharCounter;
//!
//! let preprocessor = StructuredPreprocessor::new(
//!     TextSplitter::default(),
//!     Arc::new(CharCounter),
//!     "PostgreSQL",
//! );
//! let chunks = preprocessor
//!     .create_chunks("<chapter><title>Backup</title>\n<para>Back up often.</para></chapter>")
//!     .unwrap();
//! assert_eq!(chunks.len(), 1);
//! assert_eq!(chunks[0].text, "# PostgreSQL\n## Backup\nBackup\nBack up often.");
//! ```

use std::fmt;
use std::sync::Arc;

use pgdoc_core::Result;
use serde::{Deserialize, Serialize};

use crate::section::{Section, extract_sections};
use crate::sgml::Document;
use crate::text::{TextSplitter, normalize_text};
use crate::tokens::TokenCounter;

/// One chunk of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Chunk {
    /// Document name, for structured chunks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
    /// Chapter or preface title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chapter: Option<String>,
    /// `<sect1>` title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sect1: Option<String>,
    /// `<sect2>` title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sect2: Option<String>,
    /// The chunk text, including heading lines for structured chunks.
    pub text: String,
}

impl Chunk {
    /// A chunk with no heading metadata.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// A chunk of `section`, rendered with its headings.
    pub fn in_section(section: &Section, chunk: &str) -> Self {
        fn non_empty(s: &str) -> Option<String> {
            (!s.is_empty()).then(|| s.to_string())
        }

        Self {
            document: Some(section.document.clone()),
            chapter: non_empty(&section.chapter),
            sect1: non_empty(&section.sect1),
            sect2: non_empty(&section.sect2),
            text: section.render(chunk),
        }
    }
}

/// How a document is cut into chunks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreprocessMode {
    /// Whole-document text.
    Plain,
    /// Section-aware, with heading prefixes.
    #[default]
    Structured,
}

impl fmt::Display for PreprocessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreprocessMode::Plain => write!(f, "plain"),
            PreprocessMode::Structured => write!(f, "structured"),
        }
    }
}

/// Turns document source into chunks.
pub trait Preprocessor: Send + Sync {
    /// Parse `content` and split it into chunks.
    fn create_chunks(&self, content: &str) -> Result<Vec<Chunk>>;

    /// The token counter used to size chunks.
    fn counter(&self) -> &dyn TokenCounter;
}

/// Parse markup and turn cross references into plain text.
fn parse_document(content: &str) -> Document {
    let mut doc = Document::parse(content);
    let replaced = doc.replace_xrefs();
    log::trace!("Replaced {replaced} cross references");
    doc
}

// ============================================================================
// PlainPreprocessor
// ============================================================================

/// Flattens a document to text and splits it.
#[derive(Clone)]
pub struct PlainPreprocessor {
    splitter: TextSplitter,
    counter: Arc<dyn TokenCounter>,
}

impl PlainPreprocessor {
    /// Create a preprocessor that sizes chunks with `counter`.
    pub fn new(splitter: TextSplitter, counter: Arc<dyn TokenCounter>) -> Self {
        Self { splitter, counter }
    }
}

impl fmt::Debug for PlainPreprocessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlainPreprocessor")
            .field("splitter", &self.splitter)
            .field("counter", &self.counter.name())
            .finish()
    }
}

impl Preprocessor for PlainPreprocessor {
    fn create_chunks(&self, content: &str) -> Result<Vec<Chunk>> {
        let doc = parse_document(content);
        let text = normalize_text(&doc.text(doc.root()));
        let chunks: Vec<Chunk> = self
            .splitter
            .split(&text, self.counter.as_ref())?
            .into_iter()
            .map(Chunk::plain)
            .collect();

        log::debug!("Plain preprocessing produced {} chunks", chunks.len());
        Ok(chunks)
    }

    fn counter(&self) -> &dyn TokenCounter {
        self.counter.as_ref()
    }
}

// ============================================================================
// StructuredPreprocessor
// ============================================================================

/// Splits a document section by section, labelling chunks with headings.
#[derive(Clone)]
pub struct StructuredPreprocessor {
    splitter: TextSplitter,
    counter: Arc<dyn TokenCounter>,
    document_name: String,
}

impl StructuredPreprocessor {
    /// Create a preprocessor whose chunks are headed `# {document_name}`.
    pub fn new(
        splitter: TextSplitter,
        counter: Arc<dyn TokenCounter>,
        document_name: impl Into<String>,
    ) -> Self {
        Self {
            splitter,
            counter,
            document_name: document_name.into(),
        }
    }

    /// The name used in every chunk's top heading.
    pub fn document_name(&self) -> &str {
        &self.document_name
    }
}

impl fmt::Debug for StructuredPreprocessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructuredPreprocessor")
            .field("splitter", &self.splitter)
            .field("counter", &self.counter.name())
            .field("document_name", &self.document_name)
            .finish()
    }
}

impl Preprocessor for StructuredPreprocessor {
    fn create_chunks(&self, content: &str) -> Result<Vec<Chunk>> {
        let doc = parse_document(content);
        let sections = extract_sections(&doc, &self.document_name);

        let mut chunks = Vec::new();
        for section in &sections {
            let text = normalize_text(&section.text);
            for piece in self.splitter.split(&text, self.counter.as_ref())? {
                chunks.push(Chunk::in_section(section, &piece));
            }
        }

        log::debug!(
            "Structured preprocessing produced {} chunks from {} sections",
            chunks.len(),
            sections.len()
        );
        Ok(chunks)
    }

    fn counter(&self) -> &dyn TokenCounter {
        self.counter.as_ref()
    }
}

/// Build the preprocessor for `mode`.
pub fn preprocessor_for(
    mode: PreprocessMode,
    splitter: TextSplitter,
    counter: Arc<dyn TokenCounter>,
    document_name: &str,
) -> Box<dyn Preprocessor> {
    match mode {
        PreprocessMode::Plain => Box::new(PlainPreprocessor::new(splitter, counter)),
        PreprocessMode::Structured => Box::new(StructuredPreprocessor::new(
            splitter,
            counter,
            document_name,
        )),
    }
}
