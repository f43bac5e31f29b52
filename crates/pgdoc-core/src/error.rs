//! Error types for pgdoc.

use std::path::{Path, PathBuf};

/// Errors that can occur while reading, parsing, and chunking documents.
///
/// Marked `#[non_exhaustive]` so new failure kinds can be added without
/// breaking downstream matches.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// I/O error, optionally tied to the file that caused it.
    #[error("{}", format_io(path.as_deref(), source))]
    Io {
        /// File or directory involved, if known
        path: Option<PathBuf>,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Input that cannot be processed.
    #[error("Parse error: {message}")]
    Parse {
        /// What went wrong
        message: String,
    },

    /// A token counter could not be built or failed to encode text.
    #[error("Tokenizer error: {message}")]
    Tokenizer {
        /// What went wrong
        message: String,
    },

    /// Invalid configuration value or file.
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },

    /// A requested path, model, or key does not exist.
    #[error("Not found: {what}")]
    NotFound {
        /// Description of the missing thing
        what: String,
    },
}

fn format_io(path: Option<&Path>, source: &std::io::Error) -> String {
    match path {
        Some(path) => format!("I/O error at {}: {source}", path.display()),
        None => format!("I/O error: {source}"),
    }
}

/// Convenience `Result` type alias for pgdoc operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::io(source)
    }
}

impl Error {
    /// Returns whether this error was caused by the user's input or settings
    /// rather than by processing.
    ///
    /// The CLI maps user errors to exit code 2.
    pub fn is_user_error(&self) -> bool {
        matches!(self, Error::Config { .. } | Error::NotFound { .. })
    }

    /// Creates an I/O error without path context.
    pub fn io(source: std::io::Error) -> Self {
        Error::Io { path: None, source }
    }

    /// Creates an I/O error for a specific path.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Error::Io {
            path: Some(path.as_ref().to_path_buf()),
            source,
        }
    }

    /// Creates a new parse error.
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Error::Parse {
            message: message.into(),
        }
    }

    /// Creates a new tokenizer error.
    pub fn tokenizer<S: Into<String>>(message: S) -> Self {
        Error::Tokenizer {
            message: message.into(),
        }
    }

    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Creates a new not-found error.
    pub fn not_found<S: Into<String>>(what: S) -> Self {
        Error::NotFound { what: what.into() }
    }
}
