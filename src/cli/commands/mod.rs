//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule for maintainability:
//! - `generate`: Run the pipeline over a candidates file
//! - `protocol`: Show the compiled protocol for a mode
//! - `settings`: Show the config path and effective settings, or write defaults

mod generate;
mod protocol;
mod settings;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::runtime::Runtime;

pub use generate::cmd_generate;
pub use protocol::cmd_protocol;
pub use settings::cmd_config;

/// Brain-Radio CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Build a playlist from ranked candidates
    Generate {
        /// Listening mode: focus, relax, sleep or meditation
        #[arg(short, long)]
        mode: String,
        /// Genre hint for candidate selection (never changes the protocol)
        #[arg(short, long)]
        genre: Option<String>,
        /// Target length in minutes (default from config, normally 60)
        #[arg(short, long)]
        duration: Option<u32>,
        /// JSON file with candidates in priority order
        #[arg(short, long)]
        candidates: PathBuf,
        /// Use only data from the candidates file; no network calls
        #[arg(long)]
        dry_run: bool,
        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
        /// Spotify access token (or set SPOTIFY_ACCESS_TOKEN env var)
        #[arg(long, env = "SPOTIFY_ACCESS_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },
    /// Show the protocol a mode compiles to
    Protocol {
        /// Listening mode: focus, relax, sleep or meditation
        #[arg(short, long)]
        mode: String,
    },
    /// Show config file location and effective settings
    Config {
        /// Write a config file with the default settings first
        #[arg(long)]
        init: bool,
    },
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Generate {
            mode,
            genre,
            duration,
            candidates,
            dry_run,
            json,
            token,
        } => {
            let rt = Runtime::new()?;
            cmd_generate(
                &rt,
                generate::GenerateArgs {
                    mode,
                    genre: genre.as_deref(),
                    duration: *duration,
                    candidates,
                    dry_run: *dry_run,
                    json: *json,
                    token: token.as_deref(),
                },
            )
        }
        Commands::Protocol { mode } => cmd_protocol(mode),
        Commands::Config { init } => cmd_config(*init),
    }
}
