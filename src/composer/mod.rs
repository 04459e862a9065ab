//! Constraint compiler - turns a listening mode into a strict protocol.
//!
//! Each [`Mode`] maps to exactly one [`ModeProtocol`], held in a `static`.
//! The rules are fixed at compile time: genre and duration hints shape which
//! candidates are selected upstream, but never the protocol a track is
//! checked against.

use serde::Serialize;
use std::fmt;

use crate::model::{Field, KeyQuality, Mode, VersionTag};
use crate::pipeline::PipelineError;

/// Distraction ceiling for Focus mode.
pub const DISTRACTION_SCORE_REJECTION_THRESHOLD: f64 = 0.7;

/// Tempo window a protocol accepts.
///
/// The minimum is always inclusive; the maximum is inclusive for bounded
/// windows (Focus, Relax) and exclusive for ceilings (Sleep, Meditation).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BpmRange {
    pub min: f64,
    pub max: f64,
    pub max_inclusive: bool,
}

impl BpmRange {
    pub const fn inclusive(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            max_inclusive: true,
        }
    }

    pub const fn below(max: f64) -> Self {
        Self {
            min: 0.0,
            max,
            max_inclusive: false,
        }
    }

    pub fn contains(&self, bpm: f64) -> bool {
        if bpm < self.min {
            return false;
        }
        if self.max_inclusive {
            bpm <= self.max
        } else {
            bpm < self.max
        }
    }
}

impl fmt::Display for BpmRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.max_inclusive {
            write!(f, "{}-{}", self.min, self.max)
        } else {
            write!(f, "<{}", self.max)
        }
    }
}

/// Immutable constraint set for one mode.
#[derive(Debug, PartialEq, Serialize)]
pub struct ModeProtocol {
    pub mode: Mode,
    pub bpm_range: BpmRange,
    pub allow_vocals: bool,
    pub required_key_quality: Option<KeyQuality>,
    pub excluded_version_tags: &'static [VersionTag],
    /// Focus only: reject above this distraction score
    pub max_distraction_score: Option<f64>,
}

static FOCUS: ModeProtocol = ModeProtocol {
    mode: Mode::Focus,
    bpm_range: BpmRange::inclusive(120.0, 140.0),
    allow_vocals: false,
    required_key_quality: None,
    excluded_version_tags: &[VersionTag::Live, VersionTag::Remaster, VersionTag::Feat],
    max_distraction_score: Some(DISTRACTION_SCORE_REJECTION_THRESHOLD),
};

static RELAX: ModeProtocol = ModeProtocol {
    mode: Mode::Relax,
    bpm_range: BpmRange::inclusive(60.0, 90.0),
    allow_vocals: true,
    required_key_quality: Some(KeyQuality::Major),
    excluded_version_tags: &[],
    max_distraction_score: None,
};

static SLEEP: ModeProtocol = ModeProtocol {
    mode: Mode::Sleep,
    bpm_range: BpmRange::below(60.0),
    allow_vocals: false,
    required_key_quality: None,
    excluded_version_tags: &[VersionTag::Live],
    max_distraction_score: None,
};

static MEDITATION: ModeProtocol = ModeProtocol {
    mode: Mode::Meditation,
    bpm_range: BpmRange::below(70.0),
    allow_vocals: false,
    required_key_quality: None,
    excluded_version_tags: &[VersionTag::Live],
    max_distraction_score: None,
};

impl ModeProtocol {
    /// The single protocol for `mode`.
    pub fn for_mode(mode: Mode) -> &'static ModeProtocol {
        match mode {
            Mode::Focus => &FOCUS,
            Mode::Relax => &RELAX,
            Mode::Sleep => &SLEEP,
            Mode::Meditation => &MEDITATION,
        }
    }

    pub fn excludes(&self, tag: VersionTag) -> bool {
        self.excluded_version_tags.contains(&tag)
    }

    /// Fields the verifier needs resolved to decide on a track.
    ///
    /// This is also the exact set the gatherer fetches; nothing else is looked up.
    pub fn required_fields(&self) -> Vec<Field> {
        let mut fields = vec![Field::Bpm];
        if !self.allow_vocals {
            fields.push(Field::HasVocals);
        }
        if !self.excluded_version_tags.is_empty() {
            fields.push(Field::VersionTag);
        }
        if self.required_key_quality.is_some() {
            fields.push(Field::Key);
        }
        if self.max_distraction_score.is_some() {
            fields.push(Field::Instrumentalness);
            fields.push(Field::Speechiness);
        }
        fields
    }
}

/// Compile the protocol for a mode name.
///
/// Fails only with [`PipelineError::UnknownMode`]. The hints are accepted so the
/// caller has one entry point, and are deliberately not consulted.
pub fn compile(
    mode: &str,
    genre_hint: Option<&str>,
    duration_minutes: Option<u32>,
) -> Result<&'static ModeProtocol, PipelineError> {
    let mode: Mode = mode.parse()?;
    tracing::debug!(
        mode = %mode,
        genre_hint = ?genre_hint,
        duration_minutes = ?duration_minutes,
        "Compiled protocol"
    );
    Ok(ModeProtocol::for_mode(mode))
}
