//! Track identity and resolved track metadata.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::evidence::{Confidence, Field, Source};

/// A track entering the pipeline. Identity only; never mutated once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackCandidate {
    /// Track title as shown by the provider
    pub title: String,
    /// Primary artist
    pub artist: String,
    /// Provider track ID, when the upstream ranking already knows it
    #[serde(default)]
    pub provider_id: Option<String>,
    /// Track length in milliseconds, when known upstream
    #[serde(default)]
    pub duration_ms: Option<u64>,
}

impl TrackCandidate {
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            provider_id: None,
            duration_ms: None,
        }
    }

    pub fn with_provider_id(mut self, id: impl Into<String>) -> Self {
        self.provider_id = Some(id.into());
        self
    }

    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Whether there is enough identity to query collaborators with.
    pub fn is_queryable(&self) -> bool {
        !self.title.trim().is_empty() && !self.artist.trim().is_empty()
    }
}

impl fmt::Display for TrackCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.title, self.artist)
    }
}

/// Marker for a non-original edit of a recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionTag {
    Live,
    Remaster,
    Feat,
    Remix,
    Edit,
    Acoustic,
    Explicit,
}

impl VersionTag {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Remaster => "remaster",
            Self::Feat => "feat",
            Self::Remix => "remix",
            Self::Edit => "edit",
            Self::Acoustic => "acoustic",
            Self::Explicit => "explicit",
        }
    }

    /// Tags that pull attention toward the track itself.
    pub fn is_attention_grabbing(self) -> bool {
        matches!(self, Self::Remix | Self::Explicit | Self::Live | Self::Feat)
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyQuality {
    Major,
    Minor,
}

impl fmt::Display for KeyQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Major => f.write_str("major"),
            Self::Minor => f.write_str("minor"),
        }
    }
}

/// Musical key: tonic pitch name plus quality, e.g. "F# minor".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MusicalKey {
    pub tonic: String,
    pub quality: KeyQuality,
}

impl MusicalKey {
    pub fn new(tonic: impl Into<String>, quality: KeyQuality) -> Self {
        Self {
            tonic: tonic.into(),
            quality,
        }
    }
}

impl fmt::Display for MusicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.tonic, self.quality)
    }
}

/// A resolved field value with the provenance of the winning observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolved<T> {
    pub value: T,
    pub confidence: Confidence,
    pub source: Source,
}

impl<T> Resolved<T> {
    pub fn new(value: T, confidence: Confidence, source: Source) -> Self {
        Self {
            value,
            confidence,
            source,
        }
    }
}

/// Single-valued metadata view for one candidate.
///
/// `None` means unresolved: no evidence, or evidence too contradictory to pick
/// a value. Built once by the resolver; a re-resolution builds a new record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrackMetadata {
    pub bpm: Option<Resolved<f64>>,
    pub key: Option<Resolved<MusicalKey>>,
    pub has_vocals: Option<Resolved<bool>>,
    pub version_tags: Option<Resolved<BTreeSet<VersionTag>>>,
    pub instrumentalness: Option<Resolved<f64>>,
    pub speechiness: Option<Resolved<f64>>,
}

impl TrackMetadata {
    pub fn bpm(&self) -> Option<f64> {
        self.bpm.as_ref().map(|r| r.value)
    }

    pub fn key_quality(&self) -> Option<KeyQuality> {
        self.key.as_ref().map(|r| r.value.quality)
    }

    pub fn has_vocals(&self) -> Option<bool> {
        self.has_vocals.as_ref().map(|r| r.value)
    }

    pub fn version_tags(&self) -> Option<&BTreeSet<VersionTag>> {
        self.version_tags.as_ref().map(|r| &r.value)
    }

    pub fn instrumentalness(&self) -> Option<f64> {
        self.instrumentalness.as_ref().map(|r| r.value)
    }

    pub fn speechiness(&self) -> Option<f64> {
        self.speechiness.as_ref().map(|r| r.value)
    }

    /// Confidence of a resolved field, `None` if unresolved.
    pub fn field_confidence(&self, field: Field) -> Option<Confidence> {
        match field {
            Field::Bpm => self.bpm.as_ref().map(|r| r.confidence),
            Field::Key => self.key.as_ref().map(|r| r.confidence),
            Field::HasVocals => self.has_vocals.as_ref().map(|r| r.confidence),
            Field::VersionTag => self.version_tags.as_ref().map(|r| r.confidence),
            Field::Instrumentalness => self.instrumentalness.as_ref().map(|r| r.confidence),
            Field::Speechiness => self.speechiness.as_ref().map(|r| r.confidence),
        }
    }

    pub fn is_resolved(&self, field: Field) -> bool {
        self.field_confidence(field).is_some()
    }

    /// Fields from `fields` that have no resolved value.
    pub fn unresolved(&self, fields: &[Field]) -> Vec<Field> {
        fields.iter().copied().filter(|f| !self.is_resolved(*f)).collect()
    }

    /// Minimum confidence across `fields`.
    ///
    /// Computed per protocol at verification time, since protocols depend on
    /// different field subsets. `None` if any of the fields is unresolved.
    pub fn resolution_confidence(&self, fields: &[Field]) -> Option<Confidence> {
        fields
            .iter()
            .map(|f| self.field_confidence(*f))
            .try_fold(Confidence::High, |lowest, c| c.map(|c| lowest.min(c)))
    }
}
