//! Error types for pgdoc-cli

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for pgdoc-cli operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Exit code for processing failures.
pub const EXIT_FAILURE: u8 = 1;

/// Exit code for bad configuration, arguments, or missing inputs.
pub const EXIT_USAGE: u8 = 2;

/// Errors that can occur in pgdoc-cli
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CliError {
    /// Error from pgdoc-core or pgdoc-content
    #[error(transparent)]
    Core(#[from] pgdoc_core::Error),

    /// A single document could not be processed
    #[error("Failed to process {}: {source}", path.display())]
    Document {
        /// The document being processed
        path: PathBuf,
        /// What went wrong
        #[source]
        source: pgdoc_core::Error,
    },

    /// JSON output could not be written
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The discovery pattern is not a valid glob
    #[error("Invalid file pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// A worker task panicked or was cancelled
    #[error("Worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl From<std::io::Error> for CliError {
    fn from(source: std::io::Error) -> Self {
        CliError::Core(pgdoc_core::Error::io(source))
    }
}

impl CliError {
    /// Process exit code for this error.
    ///
    /// User errors (bad settings, missing inputs, bad patterns) exit with 2,
    /// everything else with 1.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Core(err) if err.is_user_error() => EXIT_USAGE,
            CliError::Pattern(_) => EXIT_USAGE,
            _ => EXIT_FAILURE,
        }
    }
}
