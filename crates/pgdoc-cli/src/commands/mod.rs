//! Subcommand implementations.

pub mod chunk;
