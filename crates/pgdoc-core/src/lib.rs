//! pgdoc core: shared error types and identifier utilities.
//!
//! This crate is dependency level 0 of the pgdoc workspace. Both the content
//! pipeline (`pgdoc-content`) and the command line (`pgdoc-cli`) build on it.
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`util`]: Identifier helpers

pub mod error;
pub mod util;

// Re-export key types at crate root for convenience
pub use error::{Error, Result};

pub use util::ids::{chunk_id, id_from_path, normalize_id};
