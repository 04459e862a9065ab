//! Core data models for playlist curation.
//!
//! These are the per-run types that flow through the pipeline:
//! - [`Mode`] - the listening intent that selects a protocol
//! - [`TrackCandidate`] - an identity-only track entering the pipeline
//! - [`Evidence`] - one sourced observation of one metadata field
//! - [`TrackMetadata`] - the reconciled, single-valued view of a candidate
//! - [`VerificationResult`] - the accept/reject decision for one candidate
//! - [`PlaylistResult`] - the ordered output handed back to the caller

mod evidence;
mod mode;
mod playlist;
mod track;
mod verification;

pub use evidence::{Confidence, Evidence, Field, FieldValue, Source};
pub use mode::Mode;
pub use playlist::{
    MILLISECONDS_PER_MINUTE, PlaylistResult, PlaylistStatus, PlaylistTrack, VerificationSummary,
};
pub use track::{KeyQuality, MusicalKey, Resolved, TrackCandidate, TrackMetadata, VersionTag};
pub use verification::{RejectionReason, VerificationResult};
