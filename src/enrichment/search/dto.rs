//! DuckDuckGo Instant Answer Data Transfer Objects
//!
//! These types match what the Instant Answer API returns.
//! DO NOT use these types outside the search module - convert to domain types.
//!
//! Field names are PascalCase on the wire.

use serde::{Deserialize, Serialize};

/// Top-level Instant Answer response
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstantAnswer {
    /// Topic heading, e.g. the track or artist name
    #[serde(default)]
    pub heading: String,
    /// Plain-text abstract (empty when there is none)
    #[serde(default)]
    pub abstract_text: String,
    /// Where the abstract came from
    #[serde(default, rename = "AbstractURL")]
    pub abstract_url: String,
    /// Direct results (rare; usually official sites)
    #[serde(default)]
    pub results: Vec<Topic>,
    /// Related topics, possibly grouped
    #[serde(default)]
    pub related_topics: Vec<RelatedTopic>,
}

/// Related topic entry.
///
/// Grouped entries carry a name and nested topics. Serde tries variants in
/// order, so the group must come first.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RelatedTopic {
    Group {
        #[serde(rename = "Name")]
        name: String,
        #[serde(rename = "Topics", default)]
        topics: Vec<Topic>,
    },
    Single(Topic),
}

/// One topic or result
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Topic {
    /// Plain-text summary
    #[serde(default)]
    pub text: String,
    /// Link to the topic
    #[serde(default, rename = "FirstURL")]
    pub first_url: String,
}
