//! Command-line definitions.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use pgdoc_content::PreprocessMode;

use crate::output::OutputFormat;

/// Chunk PostgreSQL SGML documentation for embedding.
#[derive(Parser, Debug)]
#[command(name = "pgdoc", author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "PGDOC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Default tracing filter for the requested verbosity.
    ///
    /// `RUST_LOG` takes precedence when set.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Split documentation files into chunks
    Chunk(ChunkArgs),

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Arguments for `pgdoc chunk`.
///
/// Every option left unset falls back to the configuration file.
#[derive(Args, Debug, Clone, Default)]
pub struct ChunkArgs {
    /// SGML files or directories to process
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Chunking strategy
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Model whose tokenizer sizes the chunks
    #[arg(long, env = "AZURE_OPENAI_MODEL")]
    pub model: Option<String>,

    /// Token counter to use
    #[arg(long, value_enum)]
    pub tokenizer: Option<TokenizerKind>,

    /// Path to a Hugging Face tokenizer.json (with --tokenizer huggingface)
    #[arg(long)]
    pub tokenizer_path: Option<PathBuf>,

    /// Document name used as the top-level heading
    #[arg(long, env = "DOCUMENT_NAME")]
    pub document_name: Option<String>,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Chars of each chunk shown in the text preview
    #[arg(long)]
    pub preview_chars: Option<usize>,

    /// Write output to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Approximate chunk size in tokens
    #[arg(long)]
    pub target_tokens: Option<usize>,

    /// Chars shared by consecutive chunks
    #[arg(long)]
    pub overlap_chars: Option<usize>,

    /// How far to look for a sentence or word boundary
    #[arg(long)]
    pub max_chars_search: Option<usize>,

    /// Glob pattern used to find files inside directories
    #[arg(long)]
    pub pattern: Option<String>,

    /// Number of files processed at once
    #[arg(short, long)]
    pub jobs: Option<usize>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show the resolved config file path
    Path,

    /// Get a configuration value by dotted key
    Get {
        /// Dotted key (e.g. "chunking.target_tokens")
        key: String,
    },

    /// Set a configuration value by dotted key
    Set {
        /// Dotted key (e.g. "chunking.target_tokens")
        key: String,
        /// New value (type is auto-detected)
        value: String,
    },

    /// Create a default configuration file
    Init {
        /// Output file path (defaults to the platform config directory)
        #[arg(long)]
        file: Option<PathBuf>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,
}

/// `--mode` values.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    /// Whole-document text
    Plain,
    /// Section-aware, with heading prefixes
    Structured,
}

impl From<ModeArg> for PreprocessMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Plain => PreprocessMode::Plain,
            ModeArg::Structured => PreprocessMode::Structured,
        }
    }
}

/// `--tokenizer` values.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenizerKind {
    /// OpenAI BPE encoding for the model
    Tiktoken,
    /// One token per char
    Chars,
    /// Hugging Face tokenizer.json
    Huggingface,
}
