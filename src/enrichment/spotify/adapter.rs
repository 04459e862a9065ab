//! Adapter layer: Convert Spotify DTOs to catalog lookups
//!
//! This is the ONLY place where Spotify types become domain types.

use super::dto;
use crate::enrichment::domain::{CatalogLookup, CatalogOrigin, CatalogValue};
use crate::enrichment::heuristics::detect_version_tags;
use crate::model::{FieldValue, VersionTag};

/// Convert a track object to a catalog lookup.
///
/// Version tags come from the provider's own title plus its credits: more than
/// one artist means a featured guest, and the explicit flag is a tag of its own.
pub fn to_lookup(track: dto::Track) -> CatalogLookup {
    let mut tags = detect_version_tags(&track.name);
    if track.artists.len() > 1 {
        tags.insert(VersionTag::Feat);
    }
    if track.explicit {
        tags.insert(VersionTag::Explicit);
    }

    CatalogLookup {
        provider_id: Some(track.id),
        uri: Some(track.uri),
        duration_ms: Some(track.duration_ms),
        values: vec![CatalogValue {
            value: FieldValue::VersionTags(tags),
            origin: CatalogOrigin::TrackObject,
        }],
    }
}
