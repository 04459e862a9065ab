//! Web search integration
//!
//! Answers free-text queries through the DuckDuckGo Instant Answer API.
//! No key is needed; results are topic summaries rather than a ranked page
//! list, which is enough for the snippets the heuristics parse.
//!
//! API docs: https://duckduckgo.com/duckduckgo-help-pages/open-source/instant-answer-interface/

pub mod dto;
mod adapter;
mod client;

pub use adapter::to_hits;
pub use client::{DEFAULT_ENDPOINT, WebSearchClient};
