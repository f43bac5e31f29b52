//! Utility modules.
//!
//! - [`ids`]: Identifier normalization for documents and chunks

pub mod ids;
