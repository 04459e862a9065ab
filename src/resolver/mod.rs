//! Metadata resolver - reconciles evidence into one value per field.
//!
//! Precedence is data, not branching. [`PRECEDENCE`] lists the ranking keys in
//! order; each one narrows the pool of observations for a field to its best
//! tier. Whatever survives every key must then agree by strict majority, or
//! the field stays unresolved.
//!
//! Adding a source means adding it to [`SOURCE_PRECEDENCE`]; the resolution
//! logic does not change.
//!
//! Vocal presence is the one derived field: when no observation of it
//! resolves, it is read off instrumentalness, then speechiness.

use crate::model::{Confidence, Evidence, Field, FieldValue, Resolved, Source, TrackMetadata};
use crate::verifier::{HIGH_SPEECHINESS, LOW_INSTRUMENTALNESS};

/// A key observations are ranked by. Higher rank wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankBy {
    Confidence,
    Source,
}

/// Ranking keys, most significant first.
pub const PRECEDENCE: &[RankBy] = &[RankBy::Confidence, RankBy::Source];

/// Sources from most to least trusted.
pub const SOURCE_PRECEDENCE: &[Source] = &[Source::Catalog, Source::WebSearch];

impl RankBy {
    fn rank(self, evidence: &Evidence) -> usize {
        match self {
            Self::Confidence => match evidence.confidence {
                Confidence::High => 2,
                Confidence::Medium => 1,
                Confidence::Low => 0,
            },
            Self::Source => SOURCE_PRECEDENCE
                .iter()
                .position(|s| *s == evidence.source)
                .map_or(0, |i| SOURCE_PRECEDENCE.len() - i),
        }
    }
}

/// Build a metadata record from one candidate's evidence.
///
/// Among agreeing numeric observations the earliest one is kept as the value.
pub fn resolve(evidence: &[Evidence]) -> TrackMetadata {
    let mut metadata = TrackMetadata::default();
    for field in Field::ALL {
        let Some(winner) = resolve_field(evidence, field) else {
            continue;
        };
        let Evidence {
            value,
            source,
            confidence,
            ..
        } = winner.clone();
        match value {
            FieldValue::Bpm(v) => metadata.bpm = Some(Resolved::new(v, confidence, source)),
            FieldValue::Key(v) => metadata.key = Some(Resolved::new(v, confidence, source)),
            FieldValue::HasVocals(v) => {
                metadata.has_vocals = Some(Resolved::new(v, confidence, source))
            }
            FieldValue::VersionTags(v) => {
                metadata.version_tags = Some(Resolved::new(v, confidence, source))
            }
            FieldValue::Instrumentalness(v) => {
                metadata.instrumentalness = Some(Resolved::new(v, confidence, source))
            }
            FieldValue::Speechiness(v) => {
                metadata.speechiness = Some(Resolved::new(v, confidence, source))
            }
        }
    }
    if metadata.has_vocals.is_none() {
        metadata.has_vocals = infer_vocals(&metadata);
    }
    metadata
}

/// Vocal presence from the audio proxies, keeping the proxy's provenance.
///
/// Instrumental above [`LOW_INSTRUMENTALNESS`]; otherwise instrumental below
/// [`HIGH_SPEECHINESS`].
fn infer_vocals(metadata: &TrackMetadata) -> Option<Resolved<bool>> {
    if let Some(r) = &metadata.instrumentalness {
        return Some(Resolved::new(r.value <= LOW_INSTRUMENTALNESS, r.confidence, r.source));
    }
    metadata
        .speechiness
        .as_ref()
        .map(|r| Resolved::new(r.value >= HIGH_SPEECHINESS, r.confidence, r.source))
}

/// The winning observation for `field`, or `None` if absent or contested.
pub fn resolve_field(evidence: &[Evidence], field: Field) -> Option<&Evidence> {
    let mut pool: Vec<&Evidence> = evidence.iter().filter(|e| e.field() == field).collect();

    for key in PRECEDENCE {
        let best = pool.iter().map(|e| key.rank(e)).max()?;
        pool.retain(|e| key.rank(e) == best);
    }

    majority(&pool)
}

/// Representative of the value held by more than half of `pool`.
fn majority<'a>(pool: &[&'a Evidence]) -> Option<&'a Evidence> {
    pool.iter()
        .find(|candidate| {
            let agreeing = pool
                .iter()
                .filter(|e| e.value.agrees_with(&candidate.value))
                .count();
            agreeing * 2 > pool.len()
        })
        .copied()
}
