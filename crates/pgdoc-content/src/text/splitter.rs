//! Token-aware text splitting.
//!
//! Text is cut into chunks of roughly [`SplitterConfig::target_tokens`]
//! tokens. Each cut is nudged forward to the next sentence ending (or, failing
//! that, the last word break) within [`SplitterConfig::max_chars_search`]
//! chars, and each chunk start is nudged back the same way, so chunks begin
//! and end on natural boundaries. Consecutive chunks share about
//! [`SplitterConfig::overlap_chars`] chars of context.
//!
//! Both Latin and Japanese punctuation count as boundaries.
//!
//! All positions are char positions, never byte offsets.
//!
//! ```rust
//! use pgdoc_content::text::{SplitterConfig, TextSplitter};
//! use pgdoc_content::tokens::CharCounter;
//!
//! let splitter = TextSplitter::new(SplitterConfig {
//!     target_tokens: 6,
//!     max_chars_search: 10,
//!     overlap_chars: 2,
//! });
//! let chunks = splitter.split("aaaa. bbbb. cccc. dddd.", &CharCounter).unwrap();
//! assert_eq!(chunks, vec!["aaaa. bbbb.", " bbbb. cccc.", " cccc. dddd."]);
//! ```

use pgdoc_core::{Error, Result};
use serde::{Deserialize, Serialize};

use super::normalize::is_blank;
use crate::tokens::TokenCounter;

/// Chars that end a sentence.
pub const SENTENCE_ENDINGS: &[char] = &['.', '!', '?', '．', '。', '！', '？'];

/// Chars that separate words or clauses.
pub const WORD_BREAKS: &[char] = &[
    ',', ';', ':', ' ', '(', ')', '[', ']', '{', '}', '\t', '\n', '，', '、', '；', '：', '\u{3000}',
    '（', '）', '「', '」', '『', '』', '【', '】', '｛', '｝',
];

fn is_sentence_ending(c: char) -> bool {
    SENTENCE_ENDINGS.contains(&c)
}

fn is_word_break(c: char) -> bool {
    WORD_BREAKS.contains(&c)
}

/// Chunk sizing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitterConfig {
    /// Approximate chunk size in tokens.
    pub target_tokens: usize,
    /// How many chars to scan for a boundary when adjusting a cut.
    pub max_chars_search: usize,
    /// Chars shared by consecutive chunks.
    pub overlap_chars: usize,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            target_tokens: 1000,
            max_chars_search: 100,
            overlap_chars: 100,
        }
    }
}

impl SplitterConfig {
    /// Reject values that cannot produce chunks.
    pub fn validate(&self) -> Result<()> {
        if self.target_tokens == 0 {
            return Err(Error::config("chunking.target_tokens must be at least 1"));
        }
        Ok(())
    }
}

/// Splits normalized text into overlapping, boundary-aligned chunks.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextSplitter {
    config: SplitterConfig,
}

/// Char-indexed view of a string.
struct CharText<'a> {
    text: &'a str,
    chars: Vec<char>,
    /// Byte offset of every char, plus the total length.
    offsets: Vec<usize>,
}

impl<'a> CharText<'a> {
    fn new(text: &'a str) -> Self {
        let (mut offsets, chars): (Vec<usize>, Vec<char>) = text.char_indices().unzip();
        offsets.push(text.len());
        Self {
            text,
            chars,
            offsets,
        }
    }

    fn len(&self) -> usize {
        self.chars.len()
    }

    fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.text[self.offsets[start]..self.offsets[end]]
    }
}

impl TextSplitter {
    /// Create a splitter with the given sizing.
    pub fn new(config: SplitterConfig) -> Self {
        Self { config }
    }

    /// Split `text` into chunks.
    ///
    /// The first chunk is always a prefix of `text` and the last chunk a
    /// suffix. Text no longer than the overlap comes back as a single chunk
    /// unless it is blank.
    pub fn split(&self, text: &str, counter: &dyn TokenCounter) -> Result<Vec<String>> {
        self.config.validate()?;

        let text = CharText::new(text);
        let length = text.len();
        let max_search = self.config.max_chars_search;
        let overlap = self.config.overlap_chars;

        let mut chunks = Vec::new();
        let mut start = 0usize;
        let mut last_end = 0usize;

        while start + overlap < length {
            let origin = start;
            let n_chars = self.char_length_for_tokens(&text, start, counter)?;
            let mut end = start + n_chars;

            if end > length {
                end = length;
            } else {
                // Move the cut forward to a sentence ending, remembering the
                // last word break seen on the way.
                let mut last_word = None;
                while end < length
                    && end < start + n_chars + max_search
                    && !is_sentence_ending(text.chars[end])
                {
                    if is_word_break(text.chars[end]) {
                        last_word = Some(end);
                    }
                    end += 1;
                }

                if end < length && !is_sentence_ending(text.chars[end]) {
                    if let Some(word) = last_word.filter(|&w| w > 0) {
                        end = word;
                    }
                }
            }

            if end < length {
                // Keep the boundary char in this chunk.
                end += 1;
            }

            // Move the start back to the previous sentence ending.
            let mut last_word = None;
            while start > 0
                && start + max_search > origin
                && !is_sentence_ending(text.chars[start])
            {
                if is_word_break(text.chars[start]) {
                    last_word = Some(start);
                }
                start -= 1;
            }

            if !is_sentence_ending(text.chars[start]) {
                if let Some(word) = last_word.filter(|&w| w > 0) {
                    start = word;
                }
            }

            if start > 0 {
                // Begin after the boundary char.
                start += 1;
            }

            if start < end {
                chunks.push(text.slice(start, end).to_string());
            }
            last_end = end;

            // Without progress a tiny target and a wide overlap would loop
            // forever; restart at the cut instead.
            let next = end.saturating_sub(overlap);
            start = if next > origin { next } else { end };
        }

        if chunks.is_empty() {
            if !is_blank(text.text) {
                chunks.push(text.text.to_string());
            }
        } else if last_end < length {
            chunks.push(text.slice(start, length).to_string());
        }

        log::trace!("Split {length} chars into {} chunks", chunks.len());
        Ok(chunks)
    }

    /// Number of chars from `start` whose token count is closest to the
    /// target, found by binary search over prefix lengths.
    fn char_length_for_tokens(
        &self,
        text: &CharText<'_>,
        start: usize,
        counter: &dyn TokenCounter,
    ) -> Result<usize> {
        let target = self.config.target_tokens;
        let mut low: isize = 0;
        let mut high: isize = (text.len() - start) as isize;

        while low <= high {
            let mid = (low + high) / 2;
            let n_tokens = counter.count(text.slice(start, start + mid as usize))?;

            if n_tokens == target {
                return Ok(mid as usize);
            }
            if n_tokens < target {
                low = mid + 1;
            } else {
                high = mid - 1;
            }
        }

        // No exact hit; the midpoint of the final bracket is close enough.
        Ok(((low + high) / 2).max(0) as usize)
    }
}
