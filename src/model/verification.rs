use serde::Serialize;
use std::fmt;

use super::evidence::Confidence;

/// Why a candidate was kept out of the playlist. Variants are listed in
/// evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    InsufficientEvidence,
    BpmOutOfRange,
    VocalsPresent,
    ExcludedVersion,
    KeyMismatch,
    TooDistracting,
}

impl RejectionReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InsufficientEvidence => "insufficient_evidence",
            Self::BpmOutOfRange => "bpm_out_of_range",
            Self::VocalsPresent => "vocals_present",
            Self::ExcludedVersion => "excluded_version",
            Self::KeyMismatch => "key_mismatch",
            Self::TooDistracting => "too_distracting",
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of checking one candidate's metadata against one protocol.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerificationResult {
    pub accepted: bool,
    /// First failing rule, `None` when accepted
    pub rejection_reason: Option<RejectionReason>,
    /// Human-readable account of the failing rule
    pub detail: Option<String>,
    /// Focus-mode distraction score, when its inputs are resolved
    pub distraction_score: Option<f64>,
    /// Minimum confidence over the protocol's required fields
    pub resolution_confidence: Option<Confidence>,
}

impl VerificationResult {
    pub fn accept(distraction_score: Option<f64>, resolution_confidence: Option<Confidence>) -> Self {
        Self {
            accepted: true,
            rejection_reason: None,
            detail: None,
            distraction_score,
            resolution_confidence,
        }
    }

    pub fn reject(
        reason: RejectionReason,
        detail: impl Into<String>,
        distraction_score: Option<f64>,
        resolution_confidence: Option<Confidence>,
    ) -> Self {
        Self {
            accepted: false,
            rejection_reason: Some(reason),
            detail: Some(detail.into()),
            distraction_score,
            resolution_confidence,
        }
    }

    /// Rejection used when evidence could not be gathered at all.
    pub fn insufficient_evidence(detail: impl Into<String>) -> Self {
        Self::reject(RejectionReason::InsufficientEvidence, detail, None, None)
    }
}
