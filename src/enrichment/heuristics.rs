//! Field-specific parsers for free text.
//!
//! Search snippets and track titles are messy. Each parser here looks for
//! one field and returns `None` rather than a guess when the text does not
//! carry a plausible answer.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

use super::domain::SearchHit;
use crate::model::{Field, FieldValue, KeyQuality, MusicalKey, TrackCandidate, VersionTag};

/// Lowest tempo accepted from web text.
pub const MIN_VALID_BPM: f64 = 60.0;
/// Highest tempo accepted from web text.
pub const MAX_VALID_BPM: f64 = 200.0;

static BPM_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\b(\d{2,3}(?:\.\d+)?)\s*bpm\b",
        r"(?i)\bbpm[:\s]+(\d{2,3}(?:\.\d+)?)",
        r"(?i)\btempo(?:\s+of)?[:\s]+(\d{2,3}(?:\.\d+)?)",
    ]
    .iter()
    .filter_map(|p| Regex::new(p).ok())
    .collect()
});

static KEY_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\bkey(?:\s+of)?[:\s]+([a-g])\s*(#|♯|b|♭|sharp|flat)?\s*(major|minor|maj|min)\b",
        r"(?i)\bin\s+([a-g])\s*(#|♯|b|♭|sharp|flat)?\s+(major|minor)\b",
    ]
    .iter()
    .filter_map(|p| Regex::new(p).ok())
    .collect()
});

static INSTRUMENTALNESS: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)\binstrumentalness[:\s]+(\d{1,3}(?:\.\d+)?)\s*(%)?").ok());

static SPEECHINESS: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)\bspeechiness[:\s]+(\d{1,3}(?:\.\d+)?)\s*(%)?").ok());

/// Bracketed or dash-separated title segments: "(Live)", "[Remix]", " - 2011 Remaster".
static VERSION_SEGMENTS: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\(([^)]*)\)|\[([^\]]*)\]|\s[-–]\s(.*)$").ok());

static FEATURING: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)\b(feat\.|feat\b|ft\.|featuring\b)").ok());

const NO_VOCAL_MARKERS: &[&str] = &["no vocals", "without vocals", "no lyrics", "instrumental"];
const VOCAL_MARKERS: &[&str] = &["lyrics", "vocals", "sung by", "singer", "vocalist", "feat."];

/// Parse the value of `field` from one search result.
pub fn extract(field: Field, candidate: &TrackCandidate, hit: &SearchHit) -> Option<FieldValue> {
    let text = format!("{} {}", hit.title, hit.snippet);
    match field {
        Field::Bpm => parse_bpm(&text).map(FieldValue::Bpm),
        Field::Key => parse_key(&text).map(FieldValue::Key),
        Field::HasVocals => parse_has_vocals(&text).map(FieldValue::HasVocals),
        Field::VersionTag => version_tags_from_hit(candidate, hit).map(FieldValue::VersionTags),
        Field::Instrumentalness => {
            parse_ratio(INSTRUMENTALNESS.as_ref()?, &text).map(FieldValue::Instrumentalness)
        }
        Field::Speechiness => parse_ratio(SPEECHINESS.as_ref()?, &text).map(FieldValue::Speechiness),
    }
}

/// First tempo mention within [`MIN_VALID_BPM`, `MAX_VALID_BPM`].
pub fn parse_bpm(text: &str) -> Option<f64> {
    BPM_PATTERNS
        .iter()
        .flat_map(|re| re.captures_iter(text))
        .filter_map(|caps| caps.get(1)?.as_str().parse::<f64>().ok())
        .find(|bpm| (MIN_VALID_BPM..=MAX_VALID_BPM).contains(bpm))
}

/// A key stated alongside "key" or "in", e.g. "Key: F# minor", "in Bb major".
pub fn parse_key(text: &str) -> Option<MusicalKey> {
    let caps = KEY_PATTERNS.iter().find_map(|re| re.captures(text))?;
    let letter = caps.get(1)?.as_str().to_ascii_uppercase();
    let accidental = match caps.get(2).map(|m| m.as_str().to_ascii_lowercase()) {
        Some(a) if a == "#" || a == "♯" || a == "sharp" => "#",
        Some(a) if a == "b" || a == "♭" || a == "flat" => "b",
        _ => "",
    };
    let quality = match caps.get(3)?.as_str().to_ascii_lowercase().as_str() {
        "major" | "maj" => KeyQuality::Major,
        _ => KeyQuality::Minor,
    };
    Some(MusicalKey::new(format!("{letter}{accidental}"), quality))
}

/// Vote on vocal presence. Mixed signals give no answer.
pub fn parse_has_vocals(text: &str) -> Option<bool> {
    // "instrumentalness: 0.02" is a feature readout, not a claim about vocals
    let mut lower = text.to_lowercase().replace("instrumentalness", " ");
    let mut negative = 0;
    for marker in NO_VOCAL_MARKERS {
        negative += lower.matches(marker).count();
        lower = lower.replace(marker, " ");
    }
    let positive: usize = VOCAL_MARKERS.iter().map(|m| lower.matches(m).count()).sum();
    match (negative > 0, positive > 0) {
        (true, false) => Some(false),
        (false, true) => Some(true),
        _ => None,
    }
}

/// A 0..1 ratio after `re`'s label; percentages are scaled down.
fn parse_ratio(re: &Regex, text: &str) -> Option<f64> {
    let caps = re.captures(text)?;
    let raw: f64 = caps.get(1)?.as_str().parse().ok()?;
    let value = if caps.get(2).is_some() || raw > 1.0 {
        raw / 100.0
    } else {
        raw
    };
    (0.0..=1.0).contains(&value).then_some(value)
}

/// Version markers in a track title.
///
/// Markers only count inside brackets or after a dash, so "Live Forever" is
/// not a live recording but "Song (Live)" and "Song - Live at Wembley" are.
/// Featuring credits count anywhere.
pub fn detect_version_tags(title: &str) -> BTreeSet<VersionTag> {
    let mut tags = BTreeSet::new();

    if FEATURING.as_ref().is_some_and(|re| re.is_match(title)) {
        tags.insert(VersionTag::Feat);
    }

    let Some(segments) = VERSION_SEGMENTS.as_ref() else {
        return tags;
    };
    for caps in segments.captures_iter(title) {
        let Some(segment) = caps.iter().skip(1).flatten().next() else {
            continue;
        };
        let segment = segment.as_str().to_lowercase();
        for word in segment.split(|c: char| !c.is_alphanumeric()) {
            let tag = match word {
                "live" => VersionTag::Live,
                "remaster" | "remastered" | "remasters" => VersionTag::Remaster,
                "remix" | "remixed" | "rmx" => VersionTag::Remix,
                "edit" => VersionTag::Edit,
                "acoustic" | "unplugged" => VersionTag::Acoustic,
                _ => continue,
            };
            tags.insert(tag);
        }
    }
    tags
}

/// Tags of the candidate's recording as a search result titles it.
///
/// Only results whose title mentions the candidate's title count; the artist
/// name is blanked out first so a band called "Live" does not tag every track.
fn version_tags_from_hit(candidate: &TrackCandidate, hit: &SearchHit) -> Option<BTreeSet<VersionTag>> {
    let title = hit.title.to_lowercase();
    let wanted = candidate.title.trim().to_lowercase();
    if wanted.is_empty() || !title.contains(&wanted) {
        return None;
    }
    let artist = candidate.artist.trim().to_lowercase();
    let title = if artist.is_empty() {
        title
    } else {
        title.replace(&artist, " ")
    };
    Some(detect_version_tags(&title))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bpm_patterns() {
        assert_eq!(parse_bpm("Strobe has a tempo of 128 BPM."), Some(128.0));
        assert_eq!(parse_bpm("BPM: 140"), Some(140.0));
        assert_eq!(parse_bpm("tempo: 95"), Some(95.0));
        assert_eq!(parse_bpm("runs at 122.5 bpm"), Some(122.5));
    }

    #[test]
    fn test_parse_bpm_rejects_out_of_range() {
        assert_eq!(parse_bpm("played at 45 BPM"), None);
        assert_eq!(parse_bpm("a blistering 250 BPM"), None);
        // The first plausible value wins over an implausible earlier one
        assert_eq!(parse_bpm("250 BPM or maybe 125 BPM"), Some(125.0));
    }

    #[test]
    fn test_parse_bpm_ignores_unrelated_numbers() {
        assert_eq!(parse_bpm("Released in 1999, 4 minutes long"), None);
    }

    #[test]
    fn test_parse_key() {
        assert_eq!(parse_key("Key: F# minor"), Some(MusicalKey::new("F#", KeyQuality::Minor)));
        assert_eq!(
            parse_key("The song is in Bb major"),
            Some(MusicalKey::new("Bb", KeyQuality::Major))
        );
        assert_eq!(parse_key("key of C maj"), Some(MusicalKey::new("C", KeyQuality::Major)));
        assert_eq!(parse_key("No key information here"), None);
    }

    #[test]
    fn test_parse_has_vocals() {
        assert_eq!(parse_has_vocals("An instrumental piece for piano"), Some(false));
        assert_eq!(parse_has_vocals("Track without vocals"), Some(false));
        assert_eq!(parse_has_vocals("Read the full lyrics on our site"), Some(true));
        assert_eq!(
            parse_has_vocals("Lyrics and an instrumental version available"),
            None
        );
        assert_eq!(parse_has_vocals("A song from 2004"), None);
    }

    #[test]
    fn test_parse_ratios() {
        let inst = INSTRUMENTALNESS.as_ref().unwrap();
        assert_eq!(parse_ratio(inst, "Instrumentalness: 0.92"), Some(0.92));
        assert_eq!(parse_ratio(inst, "Instrumentalness 85%"), Some(0.85));
        assert_eq!(parse_ratio(inst, "Instrumentalness 400"), None);
        let speech = SPEECHINESS.as_ref().unwrap();
        assert_eq!(parse_ratio(speech, "speechiness: 4"), Some(0.04));
    }

    #[test]
    fn test_detect_version_tags() {
        assert!(detect_version_tags("Strobe").is_empty());
        assert!(detect_version_tags("Live Forever").is_empty());
        assert_eq!(
            detect_version_tags("Heroes - 2017 Remaster"),
            BTreeSet::from([VersionTag::Remaster])
        );
        assert_eq!(
            detect_version_tags("Teardrop (Live at Glastonbury)"),
            BTreeSet::from([VersionTag::Live])
        );
        assert_eq!(
            detect_version_tags("Midnight City feat. Someone [Radio Edit]"),
            BTreeSet::from([VersionTag::Feat, VersionTag::Edit])
        );
        assert_eq!(
            detect_version_tags("Song (Acoustic Remix)"),
            BTreeSet::from([VersionTag::Remix, VersionTag::Acoustic])
        );
    }

    #[test]
    fn test_extract_version_tags_requires_title_match() {
        let candidate = TrackCandidate::new("Teardrop", "Massive Attack");
        let matching = SearchHit::new("Teardrop (Live) - Massive Attack", "", "https://a");
        let unrelated = SearchHit::new("Angel - Massive Attack", "", "https://b");
        assert_eq!(
            extract(Field::VersionTag, &candidate, &matching),
            Some(FieldValue::VersionTags(BTreeSet::from([VersionTag::Live])))
        );
        assert_eq!(extract(Field::VersionTag, &candidate, &unrelated), None);
    }

    #[test]
    fn test_extract_version_tags_ignores_artist_name() {
        let candidate = TrackCandidate::new("Waves", "Live Remix Club");
        let hit = SearchHit::new("Waves - Live Remix Club", "", "https://a");
        assert_eq!(
            extract(Field::VersionTag, &candidate, &hit),
            Some(FieldValue::VersionTags(BTreeSet::new()))
        );
    }
}
