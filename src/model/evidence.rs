//! Evidence: sourced observations of single metadata fields.
//!
//! An [`Evidence`] value is a tagged union over the field it describes, so the
//! field and the value type can never disagree. Records are append-only for the
//! lifetime of one candidate's gathering step.

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

use super::track::{MusicalKey, VersionTag};

/// Tolerance when two BPM observations are compared.
const BPM_AGREEMENT_TOLERANCE: f64 = 0.5;

/// Tolerance when two 0..1 ratios are compared.
const RATIO_AGREEMENT_TOLERANCE: f64 = 0.01;

/// Metadata attribute a protocol can depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Bpm,
    Key,
    HasVocals,
    VersionTag,
    Instrumentalness,
    Speechiness,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Bpm,
        Field::Key,
        Field::HasVocals,
        Field::VersionTag,
        Field::Instrumentalness,
        Field::Speechiness,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bpm => "bpm",
            Self::Key => "key",
            Self::HasVocals => "has_vocals",
            Self::VersionTag => "version_tag",
            Self::Instrumentalness => "instrumentalness",
            Self::Speechiness => "speechiness",
        }
    }

    /// Term appended to "<title> <artist>" when searching the web for this field.
    pub fn search_term(self) -> &'static str {
        match self {
            Self::Bpm => "BPM",
            Self::Key => "key",
            Self::HasVocals => "instrumental",
            Self::VersionTag => "version",
            Self::Instrumentalness => "instrumentalness",
            Self::Speechiness => "speechiness",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an observation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Catalog,
    WebSearch,
}

/// Trust level of an observation. Ordered `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

/// A single observed value, tagged with the field it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Bpm(f64),
    Key(MusicalKey),
    HasVocals(bool),
    VersionTags(BTreeSet<VersionTag>),
    Instrumentalness(f64),
    Speechiness(f64),
}

impl FieldValue {
    pub fn field(&self) -> Field {
        match self {
            Self::Bpm(_) => Field::Bpm,
            Self::Key(_) => Field::Key,
            Self::HasVocals(_) => Field::HasVocals,
            Self::VersionTags(_) => Field::VersionTag,
            Self::Instrumentalness(_) => Field::Instrumentalness,
            Self::Speechiness(_) => Field::Speechiness,
        }
    }

    /// Whether two observations report the same value.
    ///
    /// Numeric values agree within a small tolerance; values for different
    /// fields never agree.
    pub fn agrees_with(&self, other: &FieldValue) -> bool {
        match (self, other) {
            (Self::Bpm(a), Self::Bpm(b)) => (a - b).abs() <= BPM_AGREEMENT_TOLERANCE,
            (Self::Key(a), Self::Key(b)) => a == b,
            (Self::HasVocals(a), Self::HasVocals(b)) => a == b,
            (Self::VersionTags(a), Self::VersionTags(b)) => a == b,
            (Self::Instrumentalness(a), Self::Instrumentalness(b))
            | (Self::Speechiness(a), Self::Speechiness(b)) => {
                (a - b).abs() <= RATIO_AGREEMENT_TOLERANCE
            }
            _ => false,
        }
    }
}

/// One observation of one field from one source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evidence {
    pub value: FieldValue,
    pub source: Source,
    pub confidence: Confidence,
    /// Where the observation was read (search result URL, catalog endpoint)
    pub origin: Option<String>,
}

impl Evidence {
    pub fn new(value: FieldValue, source: Source, confidence: Confidence) -> Self {
        Self {
            value,
            source,
            confidence,
            origin: None,
        }
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn field(&self) -> Field {
        self.value.field()
    }
}
