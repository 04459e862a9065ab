//! Offline collaborators for dry runs and tests.
//!
//! A fixture file is a JSON array of candidates, each optionally carrying the
//! values a catalog would report for it:
//!
//! ```json
//! [
//!   {"title": "Weightless", "artist": "Marconi Union", "bpm": 60,
//!    "has_vocals": false, "version_tags": [], "origin": "track_object"},
//!   {"title": "Strobe", "artist": "deadmau5", "provider_id": "abc"}
//! ]
//! ```
//!
//! `origin` defaults to `track_object`. Values tagged `audio_features` or
//! `audio_analysis` behave like the deprecated provider endpoints and are
//! ignored by the gatherer.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;

use super::domain::{CatalogLookup, CatalogOrigin, CatalogValue, CollaboratorError, SearchHit};
use super::traits::{CatalogApi, WebSearchApi};
use crate::error::{Error, Result, ResultExt};
use crate::model::{Field, FieldValue, MusicalKey, TrackCandidate, VersionTag};

/// One fixture entry.
#[derive(Debug, Clone, Deserialize)]
pub struct FixtureTrack {
    #[serde(flatten)]
    pub candidate: TrackCandidate,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub origin: Option<CatalogOrigin>,
    #[serde(default)]
    pub bpm: Option<f64>,
    #[serde(default)]
    pub key: Option<MusicalKey>,
    #[serde(default)]
    pub has_vocals: Option<bool>,
    #[serde(default)]
    pub version_tags: Option<BTreeSet<VersionTag>>,
    #[serde(default)]
    pub instrumentalness: Option<f64>,
    #[serde(default)]
    pub speechiness: Option<f64>,
}

impl FixtureTrack {
    fn values(&self) -> Vec<FieldValue> {
        [
            self.bpm.map(FieldValue::Bpm),
            self.key.clone().map(FieldValue::Key),
            self.has_vocals.map(FieldValue::HasVocals),
            self.version_tags.clone().map(FieldValue::VersionTags),
            self.instrumentalness.map(FieldValue::Instrumentalness),
            self.speechiness.map(FieldValue::Speechiness),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    fn matches(&self, candidate: &TrackCandidate) -> bool {
        if let (Some(mine), Some(theirs)) = (&self.candidate.provider_id, &candidate.provider_id) {
            return mine == theirs;
        }
        same_text(&self.candidate.title, &candidate.title)
            && same_text(&self.candidate.artist, &candidate.artist)
    }

    fn to_lookup(&self, fields: &[Field]) -> CatalogLookup {
        let origin = self.origin.unwrap_or(CatalogOrigin::TrackObject);
        let fallback_id = format!("fixture:{}", self.candidate.title.trim().to_lowercase());
        let id = self.candidate.provider_id.clone().unwrap_or(fallback_id);
        CatalogLookup {
            uri: Some(self.uri.clone().unwrap_or_else(|| id.clone())),
            provider_id: Some(id),
            duration_ms: self.candidate.duration_ms,
            values: self
                .values()
                .into_iter()
                .filter(|v| fields.contains(&v.field()))
                .map(|value| CatalogValue { value, origin })
                .collect(),
        }
    }
}

fn same_text(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// Load fixture entries from a JSON file.
pub fn load_fixture(path: &Path) -> Result<Vec<FixtureTrack>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Reading candidates file {}", path.display()))?;
    parse_fixture(&text).with_context(|| format!("Parsing candidates file {}", path.display()))
}

/// Parse fixture entries from JSON text.
pub fn parse_fixture(text: &str) -> Result<Vec<FixtureTrack>> {
    serde_json::from_str(text).map_err(Error::from)
}

/// Catalog answering from fixture entries.
#[derive(Debug, Clone, Default)]
pub struct FixtureCatalog {
    tracks: Vec<FixtureTrack>,
}

impl FixtureCatalog {
    pub fn new(tracks: Vec<FixtureTrack>) -> Self {
        Self { tracks }
    }

    /// The candidates in file order.
    pub fn candidates(&self) -> Vec<TrackCandidate> {
        self.tracks.iter().map(|t| t.candidate.clone()).collect()
    }
}

#[async_trait]
impl CatalogApi for FixtureCatalog {
    async fn lookup(
        &self,
        candidate: &TrackCandidate,
        fields: &[Field],
    ) -> std::result::Result<CatalogLookup, CollaboratorError> {
        self.tracks
            .iter()
            .find(|t| t.matches(candidate))
            .map(|t| t.to_lookup(fields))
            .ok_or(CollaboratorError::NotFound)
    }
}

/// Search that never finds anything. Used when the network is off.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledSearch;

#[async_trait]
impl WebSearchApi for DisabledSearch {
    async fn search(&self, _query: &str) -> std::result::Result<Vec<SearchHit>, CollaboratorError> {
        Ok(Vec::new())
    }
}
