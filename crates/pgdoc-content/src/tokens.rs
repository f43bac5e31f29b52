//! Token counting.
//!
//! Chunk sizes are measured in tokens of the embedding model that will
//! consume them, not in characters. [`TokenCounter`] is the seam: the
//! splitter only ever asks "how many tokens is this text?".
//!
//! | counter               | source                                      |
//! |-----------------------|---------------------------------------------|
//! | [`TiktokenCounter`]   | OpenAI BPE encodings (`tiktoken-rs`)        |
//! | [`CharCounter`]       | one token per char, no model data needed    |
//! | `HfTokenizerCounter`  | a Hugging Face `tokenizer.json` (feature `hf-tokenizer`) |

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use pgdoc_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// The embedding model pgdoc sizes chunks for unless told otherwise.
pub const DEFAULT_MODEL: &str = "text-embedding-ada-002";

/// Counts the tokens a piece of text encodes to.
pub trait TokenCounter: Send + Sync {
    /// Number of tokens in `text`.
    fn count(&self, text: &str) -> Result<usize>;

    /// Human-readable name of the encoding, for logs and reports.
    fn name(&self) -> &str;
}

// ============================================================================
// tiktoken
// ============================================================================

/// Counts tokens with the OpenAI BPE encoding used by a model.
pub struct TiktokenCounter {
    model: String,
    bpe: tiktoken_rs::CoreBPE,
}

impl TiktokenCounter {
    /// Load the encoding for an OpenAI model name such as
    /// `text-embedding-ada-002` or `gpt-4o`.
    pub fn for_model(model: &str) -> Result<Self> {
        let bpe = tiktoken_rs::get_bpe_from_model(model)
            .map_err(|e| Error::not_found(format!("token encoding for model '{model}': {e}")))?;
        log::debug!("Loaded tiktoken encoding for {model}");
        Ok(Self {
            model: model.to_string(),
            bpe,
        })
    }
}

impl fmt::Debug for TiktokenCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TiktokenCounter")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl TokenCounter for TiktokenCounter {
    fn count(&self, text: &str) -> Result<usize> {
        Ok(self.bpe.encode_ordinary(text).len())
    }

    fn name(&self) -> &str {
        &self.model
    }
}

// ============================================================================
// chars
// ============================================================================

/// Treats every char as one token.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharCounter;

impl TokenCounter for CharCounter {
    fn count(&self, text: &str) -> Result<usize> {
        Ok(text.chars().count())
    }

    fn name(&self) -> &str {
        "chars"
    }
}

// ============================================================================
// Hugging Face tokenizers
// ============================================================================

/// Counts tokens with a Hugging Face tokenizer definition file.
#[cfg(feature = "hf-tokenizer")]
pub struct HfTokenizerCounter {
    name: String,
    tokenizer: tokenizers::Tokenizer,
}

#[cfg(feature = "hf-tokenizer")]
impl HfTokenizerCounter {
    /// Load a `tokenizer.json`.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::not_found(format!(
                "tokenizer file {}",
                path.display()
            )));
        }
        let tokenizer = tokenizers::Tokenizer::from_file(path)
            .map_err(|e| Error::tokenizer(format!("Failed to load {}: {e}", path.display())))?;
        Ok(Self {
            name: path.display().to_string(),
            tokenizer,
        })
    }
}

#[cfg(feature = "hf-tokenizer")]
impl fmt::Debug for HfTokenizerCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HfTokenizerCounter")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "hf-tokenizer")]
impl TokenCounter for HfTokenizerCounter {
    fn count(&self, text: &str) -> Result<usize> {
        let encoding = self
            .tokenizer
            .encode(text, false)
            .map_err(|e| Error::tokenizer(e.to_string()))?;
        Ok(encoding.len())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

// ============================================================================
// TokenizerSpec
// ============================================================================

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

/// Serializable choice of token counter.
///
/// ```toml
/// [tokenizer]
/// kind = "tiktoken"
/// model = "text-embedding-ada-002"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TokenizerSpec {
    /// OpenAI BPE encoding for a model.
    Tiktoken {
        #[serde(default = "default_model")]
        model: String,
    },
    /// One token per char.
    Chars,
    /// Hugging Face `tokenizer.json`.
    Huggingface { path: PathBuf },
}

impl Default for TokenizerSpec {
    fn default() -> Self {
        TokenizerSpec::Tiktoken {
            model: default_model(),
        }
    }
}

impl TokenizerSpec {
    /// Check the settings without loading anything.
    pub fn validate(&self) -> Result<()> {
        match self {
            TokenizerSpec::Tiktoken { model } if model.trim().is_empty() => {
                Err(Error::config("tokenizer.model must not be empty"))
            }
            TokenizerSpec::Huggingface { path } if path.as_os_str().is_empty() => {
                Err(Error::config("tokenizer.path is required for the huggingface tokenizer"))
            }
            _ => Ok(()),
        }
    }

    /// Build the counter these settings describe.
    pub fn build(&self) -> Result<Arc<dyn TokenCounter>> {
        self.validate()?;
        match self {
            TokenizerSpec::Tiktoken { model } => Ok(Arc::new(TiktokenCounter::for_model(model)?)),
            TokenizerSpec::Chars => Ok(Arc::new(CharCounter)),
            #[cfg(feature = "hf-tokenizer")]
            TokenizerSpec::Huggingface { path } => Ok(Arc::new(HfTokenizerCounter::from_file(path)?)),
            #[cfg(not(feature = "hf-tokenizer"))]
            TokenizerSpec::Huggingface { .. } => Err(Error::config(
                "the huggingface tokenizer requires building pgdoc with the `hf-tokenizer` feature",
            )),
        }
    }
}
