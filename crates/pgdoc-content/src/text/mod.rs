//! Plain-text processing: whitespace normalization and chunk splitting.
//!
//! - [`normalize`]: indentation and blank-line cleanup
//! - [`splitter`]: token-aware, boundary-aligned chunking

pub mod normalize;
pub mod splitter;

pub use normalize::{is_blank, normalize_text};
pub use splitter::{SENTENCE_ENDINGS, SplitterConfig, TextSplitter, WORD_BREAKS};
