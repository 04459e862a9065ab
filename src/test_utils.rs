//! Test utilities and fixtures for brain-radio tests.
//!
//! This module provides metadata builders, candidate factories and
//! catalog records to reduce boilerplate in tests.
//!
//! # Example
//!
//! ```ignore
//! use brain_radio::test_utils::{focus_metadata, MetadataBuilder};
//!
//! #[test]
//! fn test_something() {
//!     let meta = MetadataBuilder::from(focus_metadata()).bpm(150.0).build();
//!     // ... test logic
//! }
//! ```

use std::collections::BTreeSet;

use crate::enrichment::domain::{CatalogLookup, CatalogOrigin, CatalogValue};
use crate::model::{
    Confidence, FieldValue, KeyQuality, MusicalKey, Resolved, Source, TrackCandidate,
    TrackMetadata, VersionTag,
};

/// Builds a [`TrackMetadata`] one field at a time.
///
/// Every field set through the builder is resolved with the builder's
/// confidence and source (high / catalog unless changed).
#[derive(Debug, Clone)]
pub struct MetadataBuilder {
    metadata: TrackMetadata,
    confidence: Confidence,
    source: Source,
}

impl Default for MetadataBuilder {
    fn default() -> Self {
        Self {
            metadata: TrackMetadata::default(),
            confidence: Confidence::High,
            source: Source::Catalog,
        }
    }
}

impl From<TrackMetadata> for MetadataBuilder {
    fn from(metadata: TrackMetadata) -> Self {
        Self {
            metadata,
            ..Default::default()
        }
    }
}

impl MetadataBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Confidence for fields set after this call.
    pub fn confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = confidence;
        self
    }

    fn resolved<T>(&self, value: T) -> Option<Resolved<T>> {
        Some(Resolved::new(value, self.confidence, self.source))
    }

    pub fn bpm(mut self, bpm: f64) -> Self {
        self.metadata.bpm = self.resolved(bpm);
        self
    }

    pub fn key(mut self, tonic: &str, quality: KeyQuality) -> Self {
        self.metadata.key = self.resolved(MusicalKey::new(tonic, quality));
        self
    }

    pub fn vocals(mut self, has_vocals: bool) -> Self {
        self.metadata.has_vocals = self.resolved(has_vocals);
        self
    }

    pub fn tags(mut self, tags: &[VersionTag]) -> Self {
        self.metadata.version_tags = self.resolved(tags.iter().copied().collect::<BTreeSet<_>>());
        self
    }

    pub fn instrumentalness(mut self, value: f64) -> Self {
        self.metadata.instrumentalness = self.resolved(value);
        self
    }

    pub fn speechiness(mut self, value: f64) -> Self {
        self.metadata.speechiness = self.resolved(value);
        self
    }

    /// Clear the BPM, leaving it unresolved.
    pub fn no_bpm(mut self) -> Self {
        self.metadata.bpm = None;
        self
    }

    pub fn build(self) -> TrackMetadata {
        self.metadata
    }
}

/// Metadata that passes every Focus rule.
pub fn focus_metadata() -> TrackMetadata {
    MetadataBuilder::new()
        .bpm(128.0)
        .vocals(false)
        .tags(&[])
        .instrumentalness(0.9)
        .speechiness(0.1)
        .build()
}

/// Numbered candidate with a 4-minute duration.
pub fn mock_candidate(n: usize) -> TrackCandidate {
    TrackCandidate::new(format!("Track {n}"), "Test Artist").with_duration_ms(240_000)
}

/// `count` numbered candidates.
pub fn mock_candidates(count: usize) -> Vec<TrackCandidate> {
    (1..=count).map(mock_candidate).collect()
}

/// Catalog record reporting `values` from the live track endpoint.
pub fn catalog_record(uri: &str, values: Vec<FieldValue>) -> CatalogLookup {
    CatalogLookup {
        provider_id: Some(uri.rsplit(':').next().unwrap_or(uri).to_string()),
        uri: Some(uri.to_string()),
        duration_ms: None,
        values: values
            .into_iter()
            .map(|value| CatalogValue {
                value,
                origin: CatalogOrigin::TrackObject,
            })
            .collect(),
    }
}

/// Catalog values for a track that passes every Focus rule.
pub fn focus_values() -> Vec<FieldValue> {
    vec![
        FieldValue::Bpm(128.0),
        FieldValue::HasVocals(false),
        FieldValue::VersionTags(BTreeSet::new()),
        FieldValue::Instrumentalness(0.9),
        FieldValue::Speechiness(0.1),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Field;

    #[test]
    fn test_builder_sets_confidence_per_field() {
        let meta = MetadataBuilder::new()
            .bpm(120.0)
            .confidence(Confidence::Low)
            .vocals(false)
            .build();
        assert_eq!(meta.field_confidence(Field::Bpm), Some(Confidence::High));
        assert_eq!(meta.field_confidence(Field::HasVocals), Some(Confidence::Low));
        assert!(meta.speechiness().is_none());
    }

    #[test]
    fn test_focus_metadata_resolves_focus_fields() {
        let meta = focus_metadata();
        assert!(
            meta.unresolved(&[
                Field::Bpm,
                Field::HasVocals,
                Field::VersionTag,
                Field::Instrumentalness,
                Field::Speechiness
            ])
            .is_empty()
        );
    }

    #[test]
    fn test_mock_candidates() {
        let candidates = mock_candidates(3);
        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates[2].title, "Track 3");
        assert_eq!(candidates[0].duration_ms, Some(240_000));
    }

    #[test]
    fn test_catalog_record() {
        let record = catalog_record("spotify:track:abc", focus_values());
        assert_eq!(record.provider_id.as_deref(), Some("abc"));
        assert_eq!(record.values.len(), 5);
    }
}
