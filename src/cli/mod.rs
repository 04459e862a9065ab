//! Command-line interface for brain-radio.
//!
//! This module provides CLI commands for generating mode-constrained
//! playlists, inspecting protocols and showing the effective configuration.

mod commands;

pub use commands::{Cli, Commands, run_command};
