//! Trait definitions for external collaborators.
//!
//! These traits enable dependency injection and mocking for tests.
//! Production code uses the Spotify and DuckDuckGo clients (or the offline
//! fixtures for dry runs), while tests substitute mock implementations.
//!
//! # Example
//!
//! ```ignore
//! use brain_radio::enrichment::traits::WebSearchApi;
//!
//! // In production code:
//! async fn probe<T: WebSearchApi>(search: &T) {
//!     let hits = search.search("Strobe deadmau5 BPM").await?;
//! }
//!
//! // In tests:
//! struct MockSearch { ... }
//! impl WebSearchApi for MockSearch { ... }
//! ```

use async_trait::async_trait;

use super::domain::{CatalogLookup, CollaboratorError, SearchHit};
use crate::model::{Field, TrackCandidate};

/// Catalog resolver: maps a track identity to a provider record.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Look up `candidate` and report whatever it knows about `fields`.
    ///
    /// Returns [`CollaboratorError::NotFound`] when the track is unknown,
    /// distinct from transient failures.
    async fn lookup(
        &self,
        candidate: &TrackCandidate,
        fields: &[Field],
    ) -> Result<CatalogLookup, CollaboratorError>;
}

/// Web search: ordered results for a query string.
#[async_trait]
pub trait WebSearchApi: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, CollaboratorError>;
}

// Implement traits for real clients

#[async_trait]
impl CatalogApi for super::spotify::SpotifyClient {
    async fn lookup(
        &self,
        candidate: &TrackCandidate,
        fields: &[Field],
    ) -> Result<CatalogLookup, CollaboratorError> {
        self.lookup(candidate, fields).await
    }
}

#[async_trait]
impl WebSearchApi for super::search::WebSearchClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, CollaboratorError> {
        self.search(query).await
    }
}
