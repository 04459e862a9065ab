//! Brain-Radio - mode-constrained playlist curation.
//!
//! Translates a listening mode (Focus, Relax, Sleep, Meditation) into a strict
//! protocol, gathers evidence about ranked candidate tracks from a music
//! catalog and web search, and keeps only the tracks verified to satisfy it.

pub mod cli;
pub mod composer;
pub mod config;
pub mod enrichment;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod resolver;
#[cfg(test)]
pub mod test_utils;
pub mod verifier;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging on stderr so --json output stays clean
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("brain_radio=info".parse()?))
        .init();

    cli::run_command(&args)
}
