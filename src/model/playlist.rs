//! Playlist output types.

use serde::Serialize;
use std::collections::BTreeMap;

use super::mode::Mode;
use super::track::{TrackCandidate, TrackMetadata};
use super::verification::{RejectionReason, VerificationResult};

pub const MILLISECONDS_PER_MINUTE: u64 = 60_000;

/// An accepted track, with the metadata that got it accepted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaylistTrack {
    pub candidate: TrackCandidate,
    /// Provider URI from the catalog, if the catalog found the track
    pub provider_uri: Option<String>,
    pub duration_ms: u64,
    pub metadata: TrackMetadata,
    pub distraction_score: Option<f64>,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaylistStatus {
    /// Accumulated duration reached the target
    Complete,
    /// Candidates ran out before the target was reached
    Exhausted,
    /// Not a single candidate passed verification
    NoAcceptableCandidates,
    /// The caller aborted the run; tracks are whatever was accepted so far
    Cancelled,
}

/// Counts of verification outcomes for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VerificationSummary {
    pub total_candidates: usize,
    pub evaluated: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub rejections: BTreeMap<RejectionReason, usize>,
}

impl VerificationSummary {
    pub(crate) fn record(&mut self, result: &VerificationResult) {
        self.evaluated += 1;
        if result.accepted {
            self.accepted += 1;
        } else {
            self.rejected += 1;
            if let Some(reason) = result.rejection_reason {
                *self.rejections.entry(reason).or_default() += 1;
            }
        }
    }

    /// Most frequent rejection reason; ties go to the earlier rule.
    pub fn dominant_rejection(&self) -> Option<RejectionReason> {
        self.rejections
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(a.0)))
            .map(|(reason, _)| *reason)
    }
}

/// Ordered, duration-bounded playlist produced by one run.
///
/// Grows only through the pipeline while the run is live; once
/// [`PlaylistResult::finish`] has been called the value is read-only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaylistResult {
    mode: Mode,
    seed_genres: Vec<String>,
    tracks: Vec<PlaylistTrack>,
    total_duration_ms: u64,
    target_duration_ms: u64,
    status: PlaylistStatus,
    summary: VerificationSummary,
}

impl PlaylistResult {
    pub(crate) fn new(mode: Mode, seed_genres: Vec<String>, target_duration_ms: u64) -> Self {
        Self {
            mode,
            seed_genres,
            tracks: Vec::new(),
            total_duration_ms: 0,
            target_duration_ms,
            status: PlaylistStatus::Exhausted,
            summary: VerificationSummary::default(),
        }
    }

    pub(crate) fn push(&mut self, track: PlaylistTrack) {
        self.total_duration_ms += track.duration_ms;
        self.tracks.push(track);
    }

    pub(crate) fn summary_mut(&mut self) -> &mut VerificationSummary {
        &mut self.summary
    }

    pub(crate) fn is_target_met(&self) -> bool {
        self.total_duration_ms >= self.target_duration_ms
    }

    pub(crate) fn finish(mut self, total_candidates: usize, cancelled: bool) -> Self {
        self.summary.total_candidates = total_candidates;
        self.status = if cancelled {
            PlaylistStatus::Cancelled
        } else if self.tracks.is_empty() {
            PlaylistStatus::NoAcceptableCandidates
        } else if self.is_target_met() {
            PlaylistStatus::Complete
        } else {
            PlaylistStatus::Exhausted
        };
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn seed_genres(&self) -> &[String] {
        &self.seed_genres
    }

    pub fn tracks(&self) -> &[PlaylistTrack] {
        &self.tracks
    }

    pub fn total_duration_ms(&self) -> u64 {
        self.total_duration_ms
    }

    pub fn target_duration_ms(&self) -> u64 {
        self.target_duration_ms
    }

    pub fn status(&self) -> PlaylistStatus {
        self.status
    }

    pub fn summary(&self) -> &VerificationSummary {
        &self.summary
    }

    pub fn is_partial(&self) -> bool {
        self.status == PlaylistStatus::Cancelled
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// One-line account of the outcome, suitable for showing to a user.
    pub fn explanation(&self) -> String {
        let minutes = |ms: u64| ms as f64 / MILLISECONDS_PER_MINUTE as f64;
        match self.status {
            PlaylistStatus::Complete => format!(
                "Reached the {:.0}-minute target with {} tracks ({:.1} minutes)",
                minutes(self.target_duration_ms),
                self.tracks.len(),
                minutes(self.total_duration_ms)
            ),
            PlaylistStatus::Exhausted => format!(
                "Candidates exhausted: {} tracks, {:.1} of {:.0} minutes",
                self.tracks.len(),
                minutes(self.total_duration_ms),
                minutes(self.target_duration_ms)
            ),
            PlaylistStatus::NoAcceptableCandidates => {
                let mut msg = format!(
                    "No suitable tracks found: none of {} candidates passed the {} protocol",
                    self.summary.total_candidates, self.mode
                );
                if let Some(reason) = self.summary.dominant_rejection() {
                    msg.push_str(&format!(" (most common rejection: {})", reason));
                }
                msg
            }
            PlaylistStatus::Cancelled => format!(
                "Cancelled: partial playlist with {} tracks ({:.1} minutes)",
                self.tracks.len(),
                minutes(self.total_duration_ms)
            ),
        }
    }
}
