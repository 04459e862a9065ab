use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::pipeline::PipelineError;

/// Cognitive listening goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Focus,
    Relax,
    Sleep,
    Meditation,
}

impl Mode {
    /// Every mode, in display order.
    pub const ALL: [Mode; 4] = [Mode::Focus, Mode::Relax, Mode::Sleep, Mode::Meditation];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Focus => "focus",
            Self::Relax => "relax",
            Self::Sleep => "sleep",
            Self::Meditation => "meditation",
        }
    }

    /// Genres used to seed candidate selection when the caller gives no hint.
    pub fn default_genres(self) -> &'static [&'static str] {
        match self {
            Self::Focus => &["Techno", "Baroque", "Post-Rock"],
            Self::Relax => &["Acoustic", "Ambient", "Jazz"],
            Self::Sleep | Self::Meditation => &["Ambient", "Drone", "Nature Sounds"],
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "focus" => Ok(Self::Focus),
            "relax" => Ok(Self::Relax),
            "sleep" => Ok(Self::Sleep),
            "meditation" => Ok(Self::Meditation),
            _ => Err(PipelineError::UnknownMode(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Focus".parse::<Mode>().unwrap(), Mode::Focus);
        assert_eq!(" SLEEP ".parse::<Mode>().unwrap(), Mode::Sleep);
        assert_eq!("meditation".parse::<Mode>().unwrap(), Mode::Meditation);
    }

    #[test]
    fn test_parse_unknown_mode() {
        let err = "party".parse::<Mode>().unwrap_err();
        assert!(matches!(err, PipelineError::UnknownMode(ref m) if m == "party"));
    }

    #[test]
    fn test_display_roundtrips_through_parse() {
        for mode in Mode::ALL {
            assert_eq!(mode.to_string().parse::<Mode>().unwrap(), mode);
        }
    }
}
