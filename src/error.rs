//! Application-wide error types.
//!
//! Library modules use specific error types via `thiserror`:
//! [`PipelineError`] for request validation, [`CollaboratorError`] for the
//! catalog and search boundary. This module wraps them together with I/O and
//! parse failures for the CLI, which uses `anyhow` at the very top.
//!
//! # Example
//!
//! ```ignore
//! use brain_radio::error::{Result, ResultExt};
//!
//! fn read_candidates(path: &Path) -> Result<String> {
//!     std::fs::read_to_string(path).with_context("Reading candidates")
//! }
//! ```

use crate::enrichment::CollaboratorError;
use crate::pipeline::PipelineError;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON input
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid playlist request
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// Catalog or search failure that could not be degraded
    #[error("Collaborator error: {0}")]
    Collaborator(#[from] CollaboratorError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context<C: Into<String>>(self, ctx: impl FnOnce() -> C) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context<C: Into<String>>(self, ctx: impl FnOnce() -> C) -> Result<T> {
        self.map_err(|e| e.context(ctx()))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn with_context<C: Into<String>>(self, ctx: impl FnOnce() -> C) -> Result<T> {
        self.map_err(|e| Error::Io(e).context(ctx()))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, serde_json::Error> {
    fn with_context<C: Into<String>>(self, ctx: impl FnOnce() -> C) -> Result<T> {
        self.map_err(|e| Error::Json(e).context(ctx()))
    }
}
