//! Protocol verifier - accepts or rejects one track against one protocol.
//!
//! Verification is a fixed sequence of pure checks over an immutable
//! (metadata, protocol) pair. The first failing check decides the reason:
//!
//! 1. `insufficient_evidence` - a required field is unresolved
//! 2. `bpm_out_of_range`
//! 3. `vocals_present` - only when the protocol disallows vocals
//! 4. `excluded_version`
//! 5. `key_mismatch` - only when the protocol requires a key quality
//! 6. `too_distracting` - only when the protocol has a distraction ceiling

use crate::composer::ModeProtocol;
use crate::model::{Field, RejectionReason, TrackMetadata, VerificationResult};

/// Weight of speechiness in the distraction score.
pub const SPEECHINESS_WEIGHT: f64 = 0.5;
/// Weight of (1 - instrumentalness) in the distraction score.
pub const NON_INSTRUMENTAL_WEIGHT: f64 = 0.5;
/// Instrumentalness below this adds [`THRESHOLD_PENALTY`].
pub const LOW_INSTRUMENTALNESS: f64 = 0.5;
/// Speechiness above this adds [`THRESHOLD_PENALTY`].
pub const HIGH_SPEECHINESS: f64 = 0.33;
pub const THRESHOLD_PENALTY: f64 = 0.1;
/// Added once when any attention-grabbing version tag is present.
pub const ATTENTION_TAG_PENALTY: f64 = 0.15;

/// Inputs shared by every check.
struct Subject<'a> {
    metadata: &'a TrackMetadata,
    protocol: &'a ModeProtocol,
    required: Vec<Field>,
    distraction_score: Option<f64>,
}

type Rejection = (RejectionReason, String);
type Check = fn(&Subject<'_>) -> Result<(), Rejection>;

/// Checks in evaluation order.
const CHECKS: &[Check] = &[
    check_evidence,
    check_bpm,
    check_vocals,
    check_version,
    check_key,
    check_distraction,
];

/// Verify `metadata` against `protocol`.
pub fn verify(metadata: &TrackMetadata, protocol: &ModeProtocol) -> VerificationResult {
    let required = protocol.required_fields();
    let subject = Subject {
        metadata,
        protocol,
        distraction_score: protocol
            .max_distraction_score
            .and_then(|_| distraction_score(metadata)),
        required,
    };
    let confidence = metadata.resolution_confidence(&subject.required);

    match CHECKS.iter().try_for_each(|check| check(&subject)) {
        Ok(()) => VerificationResult::accept(subject.distraction_score, confidence),
        Err((reason, detail)) => {
            VerificationResult::reject(reason, detail, subject.distraction_score, confidence)
        }
    }
}

/// Continuous Focus-mode distraction metric in [0, 1].
///
/// `None` until both speechiness and instrumentalness are resolved. Unresolved
/// version tags add no penalty.
pub fn distraction_score(metadata: &TrackMetadata) -> Option<f64> {
    let speechiness = metadata.speechiness()?;
    let instrumentalness = metadata.instrumentalness()?;

    let mut score =
        SPEECHINESS_WEIGHT * speechiness + NON_INSTRUMENTAL_WEIGHT * (1.0 - instrumentalness);
    if instrumentalness < LOW_INSTRUMENTALNESS {
        score += THRESHOLD_PENALTY;
    }
    if speechiness > HIGH_SPEECHINESS {
        score += THRESHOLD_PENALTY;
    }
    if metadata
        .version_tags()
        .is_some_and(|tags| tags.iter().any(|t| t.is_attention_grabbing()))
    {
        score += ATTENTION_TAG_PENALTY;
    }
    Some(score.clamp(0.0, 1.0))
}

fn check_evidence(s: &Subject<'_>) -> Result<(), Rejection> {
    let missing = s.metadata.unresolved(&s.required);
    if missing.is_empty() {
        return Ok(());
    }
    let names: Vec<&str> = missing.iter().map(|f| f.as_str()).collect();
    Err((
        RejectionReason::InsufficientEvidence,
        format!("unresolved: {}", names.join(", ")),
    ))
}

fn check_bpm(s: &Subject<'_>) -> Result<(), Rejection> {
    match s.metadata.bpm() {
        Some(bpm) if !s.protocol.bpm_range.contains(bpm) => Err((
            RejectionReason::BpmOutOfRange,
            format!("{bpm} BPM outside {}", s.protocol.bpm_range),
        )),
        _ => Ok(()),
    }
}

fn check_vocals(s: &Subject<'_>) -> Result<(), Rejection> {
    if !s.protocol.allow_vocals && s.metadata.has_vocals() == Some(true) {
        return Err((
            RejectionReason::VocalsPresent,
            format!("vocals not allowed in {}", s.protocol.mode),
        ));
    }
    Ok(())
}

fn check_version(s: &Subject<'_>) -> Result<(), Rejection> {
    let Some(tags) = s.metadata.version_tags() else {
        return Ok(());
    };
    let excluded: Vec<&str> = tags
        .iter()
        .filter(|t| s.protocol.excludes(**t))
        .map(|t| t.as_str())
        .collect();
    if excluded.is_empty() {
        return Ok(());
    }
    Err((
        RejectionReason::ExcludedVersion,
        format!("excluded version: {}", excluded.join(", ")),
    ))
}

fn check_key(s: &Subject<'_>) -> Result<(), Rejection> {
    let Some(required) = s.protocol.required_key_quality else {
        return Ok(());
    };
    match s.metadata.key_quality() {
        Some(quality) if quality != required => Err((
            RejectionReason::KeyMismatch,
            format!("{quality} key, {required} required"),
        )),
        _ => Ok(()),
    }
}

fn check_distraction(s: &Subject<'_>) -> Result<(), Rejection> {
    match (s.protocol.max_distraction_score, s.distraction_score) {
        (Some(ceiling), Some(score)) if score > ceiling => Err((
            RejectionReason::TooDistracting,
            format!("distraction score {score:.2} above {ceiling}"),
        )),
        _ => Ok(()),
    }
}


/// Property-based tests using proptest
#[cfg(test)]
mod proptests {
    use super::*;
    use crate::model::{KeyQuality, Mode, VersionTag};
    use crate::test_utils::MetadataBuilder;
    use proptest::prelude::*;

    fn mode() -> impl Strategy<Value = Mode> {
        prop::sample::select(Mode::ALL.to_vec())
    }

    fn tags() -> impl Strategy<Value = Vec<VersionTag>> {
        prop::collection::vec(
            prop::sample::select(vec![
                VersionTag::Live,
                VersionTag::Remaster,
                VersionTag::Feat,
                VersionTag::Remix,
                VersionTag::Edit,
                VersionTag::Acoustic,
                VersionTag::Explicit,
            ]),
            0..4,
        )
    }

    /// Arbitrary metadata; each field may be unresolved.
    fn metadata() -> impl Strategy<Value = TrackMetadata> {
        (
            proptest::option::of(20.0f64..220.0),
            proptest::option::of(any::<bool>()),
            proptest::option::of(any::<bool>()),
            proptest::option::of(tags()),
            proptest::option::of(0.0f64..=1.0),
            proptest::option::of(0.0f64..=1.0),
        )
            .prop_map(|(bpm, vocals, major, tags, inst, speech)| {
                let mut b = MetadataBuilder::new();
                if let Some(bpm) = bpm {
                    b = b.bpm(bpm);
                }
                if let Some(vocals) = vocals {
                    b = b.vocals(vocals);
                }
                if let Some(major) = major {
                    let quality = if major { KeyQuality::Major } else { KeyQuality::Minor };
                    b = b.key("C", quality);
                }
                if let Some(tags) = tags {
                    b = b.tags(&tags);
                }
                if let Some(inst) = inst {
                    b = b.instrumentalness(inst);
                }
                if let Some(speech) = speech {
                    b = b.speechiness(speech);
                }
                b.build()
            })
    }

    proptest! {
        /// Same inputs give the same result
        #[test]
        fn verify_is_pure(meta in metadata(), mode in mode()) {
            let protocol = ModeProtocol::for_mode(mode);
            prop_assert_eq!(verify(&meta, protocol), verify(&meta, protocol));
        }

        /// Vocal tracks never pass a no-vocals protocol
        #[test]
        fn vocals_always_rejected(
            meta in metadata(),
            mode in prop::sample::select(vec![Mode::Focus, Mode::Sleep, Mode::Meditation]),
        ) {
            let meta = MetadataBuilder::from(meta).vocals(true).build();
            let result = verify(&meta, ModeProtocol::for_mode(mode));
            prop_assert!(!result.accepted);
        }

        /// Once everything before the vocal rule passes, the reason is vocals_present
        #[test]
        fn in_range_vocal_tracks_rejected_for_vocals(
            mode in prop::sample::select(vec![Mode::Focus, Mode::Sleep, Mode::Meditation]),
            inst in 0.0f64..=1.0,
            speech in 0.0f64..=1.0,
        ) {
            let protocol = ModeProtocol::for_mode(mode);
            let bpm = if protocol.bpm_range.max_inclusive {
                protocol.bpm_range.min
            } else {
                protocol.bpm_range.max - 5.0
            };
            let meta = MetadataBuilder::new()
                .bpm(bpm)
                .vocals(true)
                .tags(&[])
                .instrumentalness(inst)
                .speechiness(speech)
                .build();
            let result = verify(&meta, protocol);
            prop_assert_eq!(result.rejection_reason, Some(RejectionReason::VocalsPresent));
        }

        /// Unresolved BPM is never treated as in range
        #[test]
        fn unresolved_bpm_is_insufficient(meta in metadata(), mode in mode()) {
            let meta = MetadataBuilder::from(meta).no_bpm().build();
            let result = verify(&meta, ModeProtocol::for_mode(mode));
            prop_assert_eq!(
                result.rejection_reason,
                Some(RejectionReason::InsufficientEvidence)
            );
        }

        /// The score always lands in [0, 1]
        #[test]
        fn distraction_score_bounded(meta in metadata()) {
            if let Some(score) = distraction_score(&meta) {
                prop_assert!((0.0..=1.0).contains(&score));
            }
        }
    }
}
