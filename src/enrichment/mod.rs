//! Evidence gathering - fetches field observations from external services.
//!
//! # Architecture
//!
//! This module follows a clean separation between:
//! - **Domain models** (`domain.rs`) - Internal types at the collaborator boundary
//! - **API DTOs** (`spotify/dto.rs`, `search/dto.rs`) - Exact API response shapes
//! - **Adapters** - Convert DTOs to domain models
//! - **Clients** - HTTP clients for external APIs
//! - **Heuristics** - Field parsers for free text
//! - **Gatherer** - Catalog first, web search for the rest
//!
//! This decoupling means:
//! 1. API changes don't ripple through our codebase
//! 2. We can test API contracts independently
//! 3. We can swap providers without changing business logic
//!
//! # Usage
//!
//! ```ignore
//! use enrichment::{EvidenceGatherer, SpotifyClient, WebSearchClient};
//!
//! let catalog = SpotifyClient::new(token, None)?;
//! let search = WebSearchClient::new(search::DEFAULT_ENDPOINT, 5)?;
//! let gatherer = EvidenceGatherer::new(&catalog, &search);
//!
//! let gathered = gatherer.gather(&candidate, &protocol.required_fields()).await?;
//! ```

pub mod domain;
pub mod fixture;
pub mod gatherer;
pub mod heuristics;
pub mod search;
pub mod spotify;
pub mod traits;

pub use domain::{
    CatalogLookup, CatalogOrigin, CatalogValue, CollaboratorError, GatherError, SearchHit,
};
pub use fixture::{DisabledSearch, FixtureCatalog, FixtureTrack, load_fixture};
pub use gatherer::{EvidenceGatherer, GatheredEvidence};
pub use search::WebSearchClient;
pub use spotify::SpotifyClient;
pub use traits::{CatalogApi, WebSearchApi};
