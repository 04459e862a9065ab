//! Spotify HTTP client
//!
//! Uses a bearer access token obtained out of band (client-credentials flow).
//! Token refresh is not handled here: an expired token surfaces as
//! [`CollaboratorError::Unauthorized`].

use super::{adapter, dto};
use crate::enrichment::domain::{CatalogLookup, CollaboratorError};
use crate::model::{Field, TrackCandidate};

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://api.spotify.com/v1";

/// Spotify Web API client
pub struct SpotifyClient {
    access_token: String,
    market: Option<String>,
    http_client: reqwest::Client,
    base_url: String,
}

impl SpotifyClient {
    /// Create a client against the production API.
    pub fn new(
        access_token: impl Into<String>,
        market: Option<String>,
    ) -> Result<Self, CollaboratorError> {
        Self::with_base_url(access_token, market, DEFAULT_BASE_URL)
    }

    /// Create a client against a custom API root.
    pub fn with_base_url(
        access_token: impl Into<String>,
        market: Option<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, CollaboratorError> {
        let http_client = reqwest::Client::builder()
            .gzip(true)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| CollaboratorError::Api(e.to_string()))?;

        Ok(Self {
            access_token: access_token.into(),
            market,
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Resolve `candidate` to a track object.
    ///
    /// A known provider ID is fetched directly; otherwise the best search match
    /// is used. Only the track object is read, whatever `fields` asks for.
    pub async fn lookup(
        &self,
        candidate: &TrackCandidate,
        fields: &[Field],
    ) -> Result<CatalogLookup, CollaboratorError> {
        tracing::debug!(track = %candidate, ?fields, "Catalog lookup");
        let track = match candidate.provider_id.as_deref().filter(|id| !id.trim().is_empty()) {
            Some(id) => self.get::<dto::Track>(&self.track_url(id)).await?,
            None => self
                .get::<dto::SearchResponse>(&self.search_url(candidate))
                .await?
                .tracks
                .items
                .into_iter()
                .next()
                .ok_or(CollaboratorError::NotFound)?,
        };
        Ok(adapter::to_lookup(track))
    }

    fn market_param(&self, sep: char) -> String {
        self.market
            .as_deref()
            .map(|m| format!("{sep}market={}", urlencoding::encode(m)))
            .unwrap_or_default()
    }

    fn track_url(&self, id: &str) -> String {
        format!(
            "{}/tracks/{}{}",
            self.base_url,
            urlencoding::encode(id.trim()),
            self.market_param('?')
        )
    }

    fn search_url(&self, candidate: &TrackCandidate) -> String {
        let query = format!(
            "track:{} artist:{}",
            candidate.title.trim(),
            candidate.artist.trim()
        );
        format!(
            "{}/search?q={}&type=track&limit=1{}",
            self.base_url,
            urlencoding::encode(&query),
            self.market_param('&')
        )
    }

    /// Send an authorized GET and parse the JSON body.
    async fn get<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, CollaboratorError> {
        let response = self
            .http_client
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| CollaboratorError::Transient(e.to_string()))?;

        let status = response.status();

        match status {
            reqwest::StatusCode::NOT_FOUND => return Err(CollaboratorError::NotFound),
            reqwest::StatusCode::UNAUTHORIZED => return Err(CollaboratorError::Unauthorized),
            reqwest::StatusCode::TOO_MANY_REQUESTS => return Err(CollaboratorError::RateLimited),
            s if s.is_server_error() => {
                return Err(CollaboratorError::Transient(format!("HTTP {s}")));
            }
            _ => {}
        }

        if !status.is_success() {
            // Try to parse error response
            if let Ok(error) = response.json::<dto::ErrorResponse>().await {
                return Err(CollaboratorError::Api(error.error.message));
            }
            return Err(CollaboratorError::Api(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| CollaboratorError::Parse(e.to_string()))
    }
}
