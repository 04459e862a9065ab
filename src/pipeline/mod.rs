//! Pipeline orchestrator - builds one playlist from a ranked candidate list.
//!
//! Flow per run:
//! 1. Compile the protocol once
//! 2. For each candidate: gather the required fields, resolve, verify
//! 3. Append accepted tracks in candidate order until the duration target is met
//!
//! Candidates are evaluated concurrently (bounded), but results are consumed in
//! priority order, so the playlist is the same for the same inputs. All per-run
//! state lives inside one [`Pipeline::build_playlist`] call.

mod error;
pub mod guard;

pub use error::PipelineError;
pub use guard::CallGuard;

use futures::stream::{self, StreamExt};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::composer::{self, ModeProtocol};
use crate::enrichment::{CatalogApi, EvidenceGatherer, WebSearchApi, gatherer};
use crate::model::{
    Field, MILLISECONDS_PER_MINUTE, PlaylistResult, PlaylistTrack, TrackCandidate, TrackMetadata,
    VerificationResult,
};
use crate::{resolver, verifier};

pub const DEFAULT_MAX_CONCURRENCY: usize = 4;
pub const DEFAULT_DURATION_MINUTES: u32 = 60;

/// Tunables for one pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Candidates evaluated at once
    pub max_concurrency: usize,
    /// Per-call timeout for catalog and search
    pub call_timeout: Duration,
    /// Wait before the single retry of a transient failure
    pub retry_backoff: Duration,
    /// Search results parsed per field
    pub search_result_limit: usize,
    /// Target when the caller gives no duration
    pub default_duration_minutes: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            call_timeout: guard::DEFAULT_CALL_TIMEOUT,
            retry_backoff: guard::DEFAULT_RETRY_BACKOFF,
            search_result_limit: gatherer::DEFAULT_RESULT_LIMIT,
            default_duration_minutes: DEFAULT_DURATION_MINUTES,
        }
    }
}

/// Result of evaluating one candidate.
struct Evaluation<'c> {
    candidate: &'c TrackCandidate,
    metadata: TrackMetadata,
    verification: VerificationResult,
    provider_uri: Option<String>,
    duration_ms: u64,
}

/// Playlist builder over a catalog and a web search collaborator.
pub struct Pipeline<'a> {
    catalog: &'a dyn CatalogApi,
    search: &'a dyn WebSearchApi,
    config: PipelineConfig,
}

impl<'a> Pipeline<'a> {
    pub fn with_config(
        catalog: &'a dyn CatalogApi,
        search: &'a dyn WebSearchApi,
        config: PipelineConfig,
    ) -> Self {
        Self {
            catalog,
            search,
            config,
        }
    }

    /// Build a playlist for `mode` from `candidates`, in their given order.
    ///
    /// Fails only on caller errors. An empty outcome is a
    /// [`PlaylistResult`] with status `no_acceptable_candidates`; a cancelled
    /// run returns what was accepted so far, marked partial.
    pub async fn build_playlist(
        &self,
        mode: &str,
        genre_hint: Option<&str>,
        duration_minutes: Option<u32>,
        candidates: &[TrackCandidate],
        cancel: &CancellationToken,
    ) -> Result<PlaylistResult, PipelineError> {
        let protocol = composer::compile(mode, genre_hint, duration_minutes)?;
        let minutes = duration_minutes.unwrap_or(self.config.default_duration_minutes);
        if minutes == 0 {
            return Err(PipelineError::InvalidDuration(minutes));
        }

        let seed_genres = match genre_hint.map(str::trim).filter(|g| !g.is_empty()) {
            Some(genre) => vec![genre.to_string()],
            None => protocol.mode.default_genres().iter().map(|g| g.to_string()).collect(),
        };
        let mut playlist = PlaylistResult::new(
            protocol.mode,
            seed_genres,
            u64::from(minutes) * MILLISECONDS_PER_MINUTE,
        );

        info!(
            mode = %protocol.mode,
            candidates = candidates.len(),
            target_minutes = minutes,
            "Building playlist"
        );

        let guard = CallGuard::new(self.config.call_timeout, self.config.retry_backoff);
        let catalog = guard.catalog(self.catalog);
        let search = guard.search(self.search);
        let gatherer = EvidenceGatherer::new(&catalog, &search)
            .with_result_limit(self.config.search_result_limit);
        let required = protocol.required_fields();

        let gatherer = &gatherer;
        let required = required.as_slice();
        let mut evaluations = std::pin::pin!(
            stream::iter(candidates)
                .map(|candidate| evaluate(gatherer, candidate, protocol, required))
                .buffered(self.config.max_concurrency.max(1))
        );

        let mut cancelled = false;
        while !playlist.is_target_met() {
            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    cancelled = true;
                    break;
                }
                next = evaluations.next() => next,
            };
            let Some(evaluation) = next else {
                break;
            };

            playlist.summary_mut().record(&evaluation.verification);
            if evaluation.verification.accepted {
                info!(
                    track = %evaluation.candidate,
                    duration_ms = evaluation.duration_ms,
                    distraction_score = ?evaluation.verification.distraction_score,
                    "Accepted track"
                );
                playlist.push(PlaylistTrack {
                    candidate: evaluation.candidate.clone(),
                    provider_uri: evaluation.provider_uri,
                    duration_ms: evaluation.duration_ms,
                    metadata: evaluation.metadata,
                    distraction_score: evaluation.verification.distraction_score,
                });
            } else {
                debug!(
                    track = %evaluation.candidate,
                    reason = ?evaluation.verification.rejection_reason,
                    detail = ?evaluation.verification.detail,
                    "Rejected track"
                );
            }
        }

        let playlist = playlist.finish(candidates.len(), cancelled);
        info!(
            status = ?playlist.status(),
            tracks = playlist.tracks().len(),
            total_ms = playlist.total_duration_ms(),
            "Playlist finished"
        );
        Ok(playlist)
    }
}

/// Gather, resolve and verify one candidate. Never fails: a candidate that
/// cannot be gathered becomes an `insufficient_evidence` rejection.
async fn evaluate<'c>(
    gatherer: &EvidenceGatherer<'_>,
    candidate: &'c TrackCandidate,
    protocol: &'static ModeProtocol,
    required: &[Field],
) -> Evaluation<'c> {
    let gathered = match gatherer.gather(candidate, required).await {
        Ok(gathered) => gathered,
        Err(e) => {
            return Evaluation {
                candidate,
                metadata: TrackMetadata::default(),
                verification: VerificationResult::insufficient_evidence(e.to_string()),
                provider_uri: None,
                duration_ms: 0,
            };
        }
    };

    let metadata = resolver::resolve(&gathered.evidence);
    let verification = verifier::verify(&metadata, protocol);
    let catalog = gathered.catalog.unwrap_or_default();

    Evaluation {
        candidate,
        metadata,
        verification,
        provider_uri: catalog.uri,
        duration_ms: candidate.duration_ms.or(catalog.duration_ms).unwrap_or(0),
    }
}
