//! pgdoc configuration.
//!
//! Settings come from, lowest precedence first: built-in defaults, the TOML
//! config file, environment variables, and command-line flags. The file is
//! looked up at `--config`, then `$PGDOC_CONFIG`, then
//! `<config dir>/pgdoc/config.toml`.
//!
//! ```toml
//! [chunking]
//! target_tokens = 1000
//! max_chars_search = 100
//! overlap_chars = 100
//!
//! [tokenizer]
//! kind = "tiktoken"
//! model = "text-embedding-ada-002"
//!
//! [document]
//! name = "Document"
//! mode = "structured"
//!
//! [output]
//! format = "text"
//!
//! [discovery]
//! pattern = "**/*.sgml"
//! jobs = 4
//! ```

use std::path::{Path, PathBuf};

use pgdoc_content::{PreprocessMode, SplitterConfig, TokenizerSpec};
use pgdoc_core::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::output::{OutputFormat, default_preview_chars};

/// Name used for the config directory and in hints.
pub const PROJECT_NAME: &str = "pgdoc";

/// File name inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PgdocConfig {
    /// Chunk sizing.
    pub chunking: SplitterConfig,
    /// Token counter.
    pub tokenizer: TokenizerSpec,
    /// Document naming and chunking strategy.
    pub document: DocumentConfig,
    /// Output rendering.
    pub output: OutputConfig,
    /// Input file discovery.
    pub discovery: DiscoveryConfig,
}

/// `[document]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocumentConfig {
    /// Name shown as the top-level heading of structured chunks.
    pub name: String,
    /// Chunking strategy.
    pub mode: PreprocessMode,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            name: "Document".to_string(),
            mode: PreprocessMode::default(),
        }
    }
}

/// `[output]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Preview length for text output. Unset means the mode's default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_chars: Option<usize>,
}

/// `[discovery]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiscoveryConfig {
    /// Glob applied inside directory arguments.
    pub pattern: String,
    /// Files processed concurrently.
    pub jobs: usize,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            pattern: "**/*.sgml".to_string(),
            jobs: 4,
        }
    }
}

impl PgdocConfig {
    /// `<platform config dir>/pgdoc/config.toml`, if the platform has one.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(PROJECT_NAME).join(CONFIG_FILE_NAME))
    }

    /// The explicit path if given, else the default location.
    pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
        explicit
            .map(Path::to_path_buf)
            .or_else(Self::default_config_path)
    }

    /// Load the configuration.
    ///
    /// An explicit path must exist. Without one, the default location is
    /// used if it holds a file, otherwise the built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => {
                if !path.is_file() {
                    return Err(Error::not_found(format!(
                        "config file {}",
                        path.display()
                    )));
                }
                Self::from_file(path)
            }
            None => match Self::default_config_path() {
                Some(path) if path.is_file() => Self::from_file(&path),
                _ => {
                    log::debug!("No config file found, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    /// Read and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        log::debug!("Loading config from {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::config(format!("Failed to parse {}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| Error::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize as pretty TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Reject settings that cannot work.
    pub fn validate(&self) -> Result<()> {
        self.chunking.validate()?;
        self.tokenizer.validate()?;
        if self.discovery.jobs == 0 {
            return Err(Error::config("discovery.jobs must be at least 1"));
        }
        if self.discovery.pattern.trim().is_empty() {
            return Err(Error::config("discovery.pattern must not be empty"));
        }
        if self.document.name.trim().is_empty() {
            return Err(Error::config("document.name must not be empty"));
        }
        Ok(())
    }

    /// Preview length for text output.
    pub fn preview_chars(&self) -> usize {
        self.output
            .preview_chars
            .unwrap_or_else(|| default_preview_chars(self.document.mode))
    }
}

// ============================================================================
// Tests
// ============================================================================
