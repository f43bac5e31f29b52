//! SGML parsing, section extraction, and token-aware chunking.
//!
//! This crate turns PostgreSQL documentation sources into text chunks sized
//! for an embedding model, the corpus-preparation step of a retrieval
//! augmented assistant.
//!
//! # Modules
//!
//! - [`sgml`]: lenient markup lexer and arena document tree
//! - [`text`]: whitespace normalization and the chunk splitter
//! - [`tokens`]: token counters (tiktoken, chars, Hugging Face)
//! - [`section`]: chapter/sect1/sect2 extraction
//! - [`preprocessor`]: plain and structured preprocessing pipelines
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use pgdoc_content::{PlainPreprocessor, Preprocessor, TextSplitter};
//! use pgdoc_content::tokens::CharCounter;
//!
//! let preprocessor = PlainPreprocessor::new(TextSplitter::default(), Arc::new(CharCounter));
//! let chunks = preprocessor
//!     .create_chunks("<para>Run <command>VACUUM</command> regularly.</para>")
//!     .unwrap();
//! assert_eq!(chunks[0].text, "Run VACUUM regularly.");
//! ```

pub mod preprocessor;
pub mod section;
pub mod sgml;
pub mod text;
pub mod tokens;

// Re-export commonly used types
pub use preprocessor::{
    Chunk, PlainPreprocessor, PreprocessMode, Preprocessor, StructuredPreprocessor,
    preprocessor_for,
};
pub use section::{Section, extract_sections};
pub use sgml::Document;
pub use text::{SplitterConfig, TextSplitter, normalize_text};
pub use tokens::{TokenCounter, TokenizerSpec};
