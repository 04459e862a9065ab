//! Internal domain models for the collaborator boundary.
//!
//! These types are OUR types - they don't change when the catalog provider or
//! the search engine change their APIs. Responses get converted into them by
//! each client's adapter.

use serde::{Deserialize, Serialize};

use crate::model::{Field, FieldValue};

/// One web search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub title: String,
    pub snippet: String,
    pub url: String,
}

impl SearchHit {
    pub fn new(title: impl Into<String>, snippet: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            snippet: snippet.into(),
            url: url.into(),
        }
    }
}

/// Which provider endpoint a catalog value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogOrigin {
    /// The track object itself (name, artists, explicit flag)
    TrackObject,
    /// Audio-features endpoint; deprecated by the provider
    AudioFeatures,
    /// Audio-analysis endpoint; deprecated by the provider
    AudioAnalysis,
}

impl CatalogOrigin {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TrackObject => "catalog:track",
            Self::AudioFeatures => "catalog:audio-features",
            Self::AudioAnalysis => "catalog:audio-analysis",
        }
    }

    /// Deprecated endpoints may still answer, but their data is not trusted.
    pub fn is_deprecated(self) -> bool {
        matches!(self, Self::AudioFeatures | Self::AudioAnalysis)
    }
}

/// A field value reported by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogValue {
    pub value: FieldValue,
    pub origin: CatalogOrigin,
}

/// What the catalog resolver knows about one track.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CatalogLookup {
    pub provider_id: Option<String>,
    pub uri: Option<String>,
    pub duration_ms: Option<u64>,
    pub values: Vec<CatalogValue>,
}

impl CatalogLookup {
    /// Values reported for `field`, in the order the catalog gave them.
    pub fn values_for(&self, field: Field) -> impl Iterator<Item = &CatalogValue> {
        self.values.iter().filter(move |v| v.value.field() == field)
    }
}

/// Errors returned by catalog and search collaborators.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CollaboratorError {
    #[error("Not found")]
    NotFound,

    #[error("Transient failure: {0}")]
    Transient(String),

    #[error("Rate limited - try again later")]
    RateLimited,

    #[error("Unauthorized - access token missing or expired")]
    Unauthorized,

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("API request failed: {0}")]
    Api(String),
}

impl CollaboratorError {
    /// Whether a retry has a chance of succeeding.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_) | Self::RateLimited)
    }
}

/// Errors that stop gathering for a whole candidate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GatherError {
    #[error("Candidate '{0}' has no usable title or artist")]
    UnqueryableCandidate(String),
}
