//! Instant Answer HTTP client
//!
//! One GET per query with `format=json`, `no_html=1` and `skip_disambig=1`.
//! The endpoint is configurable so a self-hosted proxy can stand in.

use super::{adapter, dto};
use crate::enrichment::domain::{CollaboratorError, SearchHit};

/// Public Instant Answer endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.duckduckgo.com/";

/// Web search client
pub struct WebSearchClient {
    http_client: reqwest::Client,
    endpoint: String,
    result_limit: usize,
}

impl WebSearchClient {
    /// Create a client returning at most `result_limit` hits per query.
    pub fn new(endpoint: impl Into<String>, result_limit: usize) -> Result<Self, CollaboratorError> {
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
            http_client,
            endpoint: endpoint.into(),
            result_limit: result_limit.max(1),
        })
    }

    /// Run one query and return ordered hits.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchHit>, CollaboratorError> {
        let answer = self.send_query(query).await?;
        let mut hits = adapter::to_hits(answer);
        hits.truncate(self.result_limit);
        tracing::debug!(query, hits = hits.len(), "Web search answered");
        Ok(hits)
    }

    fn query_url(&self, query: &str) -> String {
        format!(
            "{}?q={}&format=json&no_html=1&skip_disambig=1",
            self.endpoint,
            urlencoding::encode(query)
        )
    }

    async fn send_query(&self, query: &str) -> Result<dto::InstantAnswer, CollaboratorError> {
        let response = self
            .http_client
            .get(self.query_url(query))
            .send()
            .await
            .map_err(|e| CollaboratorError::Transient(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(CollaboratorError::RateLimited);
        }

        if status.is_server_error() {
            return Err(CollaboratorError::Transient(format!("HTTP {status}")));
        }

        if !status.is_success() {
            return Err(CollaboratorError::Api(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        // The API sometimes answers with a JavaScript content type, so parse the body text
        let body = response
            .text()
            .await
            .map_err(|e| CollaboratorError::Transient(e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| CollaboratorError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = WebSearchClient::new(DEFAULT_ENDPOINT, 5).unwrap();
        assert_eq!(client.endpoint, "https://api.duckduckgo.com/");
        assert_eq!(client.result_limit, 5);
    }

    #[test]
    fn test_zero_limit_is_clamped() {
        let client = WebSearchClient::new(DEFAULT_ENDPOINT, 0).unwrap();
        assert_eq!(client.result_limit, 1);
    }

    #[test]
    fn test_query_is_url_encoded() {
        let client = WebSearchClient::new("http://localhost:8080/", 5).unwrap();
        assert_eq!(
            client.query_url("Strobe deadmau5 BPM"),
            "http://localhost:8080/?q=Strobe%20deadmau5%20BPM&format=json&no_html=1&skip_disambig=1"
        );
    }
}
