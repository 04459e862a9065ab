//! Timeout and retry policy for collaborator calls.
//!
//! Every catalog lookup and web search made during a run goes through a
//! [`CallGuard`]. A call that outlives the timeout counts as an empty answer;
//! a transient failure is retried once after a fixed backoff.

use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

use crate::enrichment::{CatalogApi, CatalogLookup, CollaboratorError, SearchHit, WebSearchApi};
use crate::model::{Field, TrackCandidate};

pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(500);
/// Retries after the first attempt.
const MAX_RETRIES: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallGuard {
    pub timeout: Duration,
    pub backoff: Duration,
}

impl CallGuard {
    pub fn new(timeout: Duration, backoff: Duration) -> Self {
        Self { timeout, backoff }
    }

    /// Run `call` under the policy. `on_timeout` is returned if any attempt times out.
    pub async fn run<T, F, Fut>(
        &self,
        what: &str,
        on_timeout: Result<T, CollaboratorError>,
        mut call: F,
    ) -> Result<T, CollaboratorError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, CollaboratorError>>,
    {
        let mut retries = 0;
        loop {
            match tokio::time::timeout(self.timeout, call()).await {
                Err(_) => {
                    warn!(call = what, timeout_ms = self.timeout.as_millis() as u64, "Call timed out");
                    return on_timeout;
                }
                Ok(Err(e)) if e.is_transient() && retries < MAX_RETRIES => {
                    retries += 1;
                    warn!(call = what, error = %e, backoff_ms = self.backoff.as_millis() as u64, "Transient failure, retrying");
                    tokio::time::sleep(self.backoff).await;
                }
                Ok(result) => return result,
            }
        }
    }

    pub fn catalog<'a>(&self, inner: &'a dyn CatalogApi) -> GuardedCatalog<'a> {
        GuardedCatalog { inner, guard: *self }
    }

    pub fn search<'a>(&self, inner: &'a dyn WebSearchApi) -> GuardedSearch<'a> {
        GuardedSearch { inner, guard: *self }
    }
}

/// Catalog behind a [`CallGuard`]; a timeout reads as "not found".
pub struct GuardedCatalog<'a> {
    inner: &'a dyn CatalogApi,
    guard: CallGuard,
}

#[async_trait]
impl CatalogApi for GuardedCatalog<'_> {
    async fn lookup(
        &self,
        candidate: &TrackCandidate,
        fields: &[Field],
    ) -> Result<CatalogLookup, CollaboratorError> {
        self.guard
            .run("catalog", Err(CollaboratorError::NotFound), || {
                self.inner.lookup(candidate, fields)
            })
            .await
    }
}

/// Search behind a [`CallGuard`]; a timeout reads as "no results".
pub struct GuardedSearch<'a> {
    inner: &'a dyn WebSearchApi,
    guard: CallGuard,
}

#[async_trait]
impl WebSearchApi for GuardedSearch<'_> {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, CollaboratorError> {
        self.guard
            .run("search", Ok(Vec::new()), || self.inner.search(query))
            .await
    }
}
