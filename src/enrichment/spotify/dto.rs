//! Spotify Web API Data Transfer Objects
//!
//! These types match EXACTLY what the Spotify API returns.
//! DO NOT add fields that aren't in the API response.
//! DO NOT use these types outside the spotify module - convert to domain types.

use serde::{Deserialize, Serialize};

/// Full track object (`GET /v1/tracks/{id}`)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Track {
    /// Spotify track ID
    pub id: String,
    /// Spotify URI, e.g. "spotify:track:..."
    pub uri: String,
    /// Track name as the provider titles it
    pub name: String,
    /// Duration in milliseconds
    pub duration_ms: u64,
    /// Explicit lyrics flag
    #[serde(default)]
    pub explicit: bool,
    /// Credited artists, primary first
    #[serde(default)]
    pub artists: Vec<Artist>,
}

/// Simplified artist object
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Artist {
    pub name: String,
}

/// Search response (`GET /v1/search?type=track`)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchResponse {
    pub tracks: Paging,
}

/// Paging object around search results
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Paging {
    #[serde(default)]
    pub items: Vec<Track>,
    #[serde(default)]
    pub total: u32,
}

/// Error body
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ErrorDetail {
    pub status: u16,
    pub message: String,
}
