//! # pgdoc-cli
//!
//! Command-line front end for pgdoc.
//!
//! - `pgdoc chunk`: discover SGML files, chunk them concurrently, and write
//!   the chunks as text, JSON, or JSON Lines
//! - `pgdoc config`: inspect and edit the TOML configuration

#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_handlers;
pub mod discovery;
pub mod error;
pub mod output;

pub use cli::{ChunkArgs, Cli, Command, ConfigAction};
pub use config::PgdocConfig;
pub use error::{CliError, Result};

/// Run a parsed command line.
pub async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Chunk(args) => commands::chunk::run(config_path, &args).await,
        Command::Config { action } => {
            config_handlers::handle_config_command(config_path, action, &mut std::io::stdout())?;
            Ok(())
        }
    }
}
