//! Evidence gatherer - collects field observations for one candidate.
//!
//! Gathering flow:
//! 1. Ask the catalog for every needed field; live (non-deprecated) values
//!    become `high` confidence evidence. When vocal presence is needed the
//!    catalog is also asked for instrumentalness and speechiness, which the
//!    resolver falls back to if nothing reports vocals directly
//! 2. Version tags the catalog did not report are read from the candidate's
//!    own title, which is the provider's title
//! 3. For each field still not covered, search the web for
//!    "<title> <artist> <field>" and parse the top results
//! 4. Web observations are `medium` when all parsed results agree, `low` when
//!    they disagree
//! 5. A field with nothing found gets no evidence at all
//!
//! Failures degrade per field: a search error for one field leaves the other
//! fields untouched. Retrying failed calls is the caller's job.

use tracing::{debug, warn};

use super::domain::{CatalogLookup, CollaboratorError, GatherError};
use super::heuristics;
use super::traits::{CatalogApi, WebSearchApi};
use crate::model::{Confidence, Evidence, Field, FieldValue, Source, TrackCandidate};

/// Default number of search results parsed per field.
pub const DEFAULT_RESULT_LIMIT: usize = 5;

/// Origin of version tags parsed from the candidate title.
pub const TITLE_ORIGIN: &str = "catalog:title";

/// Catalog fields that stand in for vocal presence.
const VOCAL_PROXIES: [Field; 2] = [Field::Instrumentalness, Field::Speechiness];

/// Everything gathered for one candidate.
#[derive(Debug, Clone, Default)]
pub struct GatheredEvidence {
    /// Observations in the order they were recorded
    pub evidence: Vec<Evidence>,
    /// Catalog record, when the catalog found the track
    pub catalog: Option<CatalogLookup>,
}

impl GatheredEvidence {
    fn record(&mut self, evidence: Evidence) {
        debug!(
            field = %evidence.field(),
            source = ?evidence.source,
            confidence = ?evidence.confidence,
            origin = ?evidence.origin,
            "Recorded evidence"
        );
        self.evidence.push(evidence);
    }

    fn covers(&self, field: Field) -> bool {
        self.evidence.iter().any(|e| e.field() == field)
    }
}

/// Gathers evidence from a catalog and a web search collaborator.
pub struct EvidenceGatherer<'a> {
    catalog: &'a dyn CatalogApi,
    search: &'a dyn WebSearchApi,
    result_limit: usize,
}

impl<'a> EvidenceGatherer<'a> {
    pub fn new(catalog: &'a dyn CatalogApi, search: &'a dyn WebSearchApi) -> Self {
        Self {
            catalog,
            search,
            result_limit: DEFAULT_RESULT_LIMIT,
        }
    }

    /// Parse at most `limit` search results per field.
    pub fn with_result_limit(mut self, limit: usize) -> Self {
        self.result_limit = limit.max(1);
        self
    }

    /// Gather evidence for the `needed` fields of `candidate`.
    pub async fn gather(
        &self,
        candidate: &TrackCandidate,
        needed: &[Field],
    ) -> Result<GatheredEvidence, GatherError> {
        if !candidate.is_queryable() {
            return Err(GatherError::UnqueryableCandidate(candidate.to_string()));
        }

        let mut gathered = GatheredEvidence::default();

        match self.catalog.lookup(candidate, &catalog_fields(needed)).await {
            Ok(lookup) => {
                record_catalog_values(&mut gathered, &lookup, needed);
                gathered.catalog = Some(lookup);
            }
            Err(CollaboratorError::NotFound) => {
                debug!(track = %candidate, "Catalog has no record");
            }
            Err(e) => {
                warn!(track = %candidate, error = %e, "Catalog lookup failed, using web search only");
            }
        }

        if needed.contains(&Field::VersionTag) && !gathered.covers(Field::VersionTag) {
            let tags = heuristics::detect_version_tags(&candidate.title);
            gathered.record(
                Evidence::new(FieldValue::VersionTags(tags), Source::Catalog, Confidence::High)
                    .with_origin(TITLE_ORIGIN),
            );
        }

        for &field in needed {
            if gathered.covers(field) {
                continue;
            }
            for evidence in self.search_field(candidate, field).await {
                gathered.record(evidence);
            }
        }

        Ok(gathered)
    }

    /// Web observations for one field. Empty on failure or when nothing parses.
    async fn search_field(&self, candidate: &TrackCandidate, field: Field) -> Vec<Evidence> {
        let query = format!(
            "{} {} {}",
            candidate.title.trim(),
            candidate.artist.trim(),
            field.search_term()
        );

        let hits = match self.search.search(&query).await {
            Ok(hits) => hits,
            Err(e) => {
                warn!(track = %candidate, field = %field, error = %e, "Web search failed for field");
                return Vec::new();
            }
        };

        let observations: Vec<(FieldValue, String)> = hits
            .iter()
            .take(self.result_limit)
            .filter_map(|hit| {
                heuristics::extract(field, candidate, hit).map(|value| (value, hit.url.clone()))
            })
            .collect();

        let Some((first, _)) = observations.first() else {
            debug!(track = %candidate, field = %field, hits = hits.len(), "No usable web evidence");
            return Vec::new();
        };

        let confidence = if observations.iter().all(|(v, _)| v.agrees_with(first)) {
            Confidence::Medium
        } else {
            Confidence::Low
        };

        observations
            .into_iter()
            .map(|(value, url)| Evidence::new(value, Source::WebSearch, confidence).with_origin(url))
            .collect()
    }
}

/// Fields to ask the catalog for: `needed`, plus the vocal proxies when
/// vocal presence is needed.
fn catalog_fields(needed: &[Field]) -> Vec<Field> {
    let mut fields = needed.to_vec();
    if needed.contains(&Field::HasVocals) {
        for field in VOCAL_PROXIES {
            if !fields.contains(&field) {
                fields.push(field);
            }
        }
    }
    fields
}

fn record_catalog_values(
    gathered: &mut GatheredEvidence,
    lookup: &CatalogLookup,
    needed: &[Field],
) {
    for &field in needed {
        record_catalog_field(gathered, lookup, field);
    }
    if needed.contains(&Field::HasVocals) && !gathered.covers(Field::HasVocals) {
        for field in VOCAL_PROXIES {
            if !needed.contains(&field) {
                record_catalog_field(gathered, lookup, field);
            }
        }
    }
}

fn record_catalog_field(gathered: &mut GatheredEvidence, lookup: &CatalogLookup, field: Field) {
    for value in lookup.values_for(field) {
        if value.origin.is_deprecated() {
            debug!(
                field = %field,
                origin = value.origin.as_str(),
                "Discarding value from deprecated catalog endpoint"
            );
            continue;
        }
        gathered.record(
            Evidence::new(value.value.clone(), Source::Catalog, Confidence::High)
                .with_origin(value.origin.as_str()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrichment::domain::{CatalogOrigin, CatalogValue, SearchHit};
    use crate::enrichment::traits::mocks::{MockCatalog, MockSearch};
    use crate::model::VersionTag;
    use std::collections::BTreeSet;

    fn candidate() -> TrackCandidate {
        TrackCandidate::new("Strobe", "deadmau5")
    }

    fn catalog_with(values: Vec<CatalogValue>) -> MockCatalog {
        MockCatalog::empty().with_record(
            "Strobe",
            CatalogLookup {
                provider_id: Some("abc".to_string()),
                uri: Some("spotify:track:abc".to_string()),
                duration_ms: Some(600_000),
                values,
            },
        )
    }

    #[tokio::test]
    async fn test_catalog_values_are_high_confidence() {
        let catalog = catalog_with(vec![CatalogValue {
            value: FieldValue::Bpm(128.0),
            origin: CatalogOrigin::TrackObject,
        }]);
        let search = MockSearch::no_results();
        let gatherer = EvidenceGatherer::new(&catalog, &search);

        let gathered = gatherer.gather(&candidate(), &[Field::Bpm]).await.unwrap();
        assert_eq!(gathered.evidence.len(), 1);
        assert_eq!(gathered.evidence[0].confidence, Confidence::High);
        assert_eq!(gathered.evidence[0].source, Source::Catalog);
        assert!(gathered.catalog.is_some());
        // Catalog covered the field, so the web was never asked
        assert_eq!(search.call_count(), 0);
    }

    #[tokio::test]
    async fn test_deprecated_catalog_values_fall_back_to_web() {
        let catalog = catalog_with(vec![CatalogValue {
            value: FieldValue::Bpm(64.0),
            origin: CatalogOrigin::AudioFeatures,
        }]);
        let search = MockSearch::no_results().with_hits(
            "bpm",
            vec![SearchHit::new("Strobe BPM", "Strobe is 128 BPM", "https://songbpm.example")],
        );
        let gatherer = EvidenceGatherer::new(&catalog, &search);

        let gathered = gatherer.gather(&candidate(), &[Field::Bpm]).await.unwrap();
        assert_eq!(gathered.evidence.len(), 1);
        assert_eq!(gathered.evidence[0].source, Source::WebSearch);
        assert_eq!(gathered.evidence[0].value, FieldValue::Bpm(128.0));
        assert_eq!(search.queries(), vec!["Strobe deadmau5 BPM".to_string()]);
    }

    #[tokio::test]
    async fn test_consistent_web_results_are_medium() {
        let catalog = MockCatalog::empty();
        let search = MockSearch::no_results().with_hits(
            "bpm",
            vec![
                SearchHit::new("Strobe", "128 BPM", "https://a.example"),
                SearchHit::new("Strobe tempo", "BPM: 128", "https://b.example"),
                SearchHit::new("Strobe review", "A long build", "https://c.example"),
            ],
        );
        let gatherer = EvidenceGatherer::new(&catalog, &search);

        let gathered = gatherer.gather(&candidate(), &[Field::Bpm]).await.unwrap();
        assert_eq!(gathered.evidence.len(), 2);
        assert!(gathered.evidence.iter().all(|e| e.confidence == Confidence::Medium));
        assert_eq!(gathered.evidence[0].origin.as_deref(), Some("https://a.example"));
        assert!(gathered.catalog.is_none());
    }

    #[tokio::test]
    async fn test_disagreeing_web_results_are_low() {
        let catalog = MockCatalog::empty();
        let search = MockSearch::no_results().with_hits(
            "bpm",
            vec![
                SearchHit::new("Strobe", "128 BPM", "https://a.example"),
                SearchHit::new("Strobe", "64 BPM half-time", "https://b.example"),
            ],
        );
        let gatherer = EvidenceGatherer::new(&catalog, &search);

        let gathered = gatherer.gather(&candidate(), &[Field::Bpm]).await.unwrap();
        assert_eq!(gathered.evidence.len(), 2);
        assert!(gathered.evidence.iter().all(|e| e.confidence == Confidence::Low));
    }

    #[tokio::test]
    async fn test_nothing_found_records_no_evidence() {
        let catalog = MockCatalog::empty();
        let search = MockSearch::no_results();
        let gatherer = EvidenceGatherer::new(&catalog, &search);

        let gathered = gatherer
            .gather(&candidate(), &[Field::Bpm, Field::HasVocals])
            .await
            .unwrap();
        assert!(gathered.evidence.is_empty());
        assert_eq!(search.call_count(), 2);
    }

    #[tokio::test]
    async fn test_search_failure_degrades_per_field() {
        let catalog = MockCatalog::with_error(CollaboratorError::Transient("down".into()));
        let search = MockSearch::no_results()
            .failing_for("bpm")
            .with_hits(
                "instrumental",
                vec![SearchHit::new("Strobe", "An instrumental track", "https://a.example")],
            );
        let gatherer = EvidenceGatherer::new(&catalog, &search);

        let gathered = gatherer
            .gather(&candidate(), &[Field::Bpm, Field::HasVocals])
            .await
            .unwrap();
        assert_eq!(gathered.evidence.len(), 1);
        assert_eq!(gathered.evidence[0].value, FieldValue::HasVocals(false));
    }

    #[tokio::test]
    async fn test_only_needed_fields_are_fetched() {
        let catalog = MockCatalog::empty();
        let search = MockSearch::no_results();
        let gatherer = EvidenceGatherer::new(&catalog, &search);

        gatherer.gather(&candidate(), &[Field::Bpm, Field::Key]).await.unwrap();
        assert_eq!(
            catalog.calls(),
            vec![("Strobe".to_string(), vec![Field::Bpm, Field::Key])]
        );
        assert_eq!(
            search.queries(),
            vec!["Strobe deadmau5 BPM".to_string(), "Strobe deadmau5 key".to_string()]
        );
    }

    #[tokio::test]
    async fn test_catalog_values_for_unneeded_fields_are_ignored() {
        let catalog = catalog_with(vec![CatalogValue {
            value: FieldValue::Speechiness(0.1),
            origin: CatalogOrigin::TrackObject,
        }]);
        let search = MockSearch::no_results();
        let gatherer = EvidenceGatherer::new(&catalog, &search);

        let gathered = gatherer.gather(&candidate(), &[Field::Bpm]).await.unwrap();
        assert!(gathered.evidence.is_empty());
    }

    #[tokio::test]
    async fn test_result_limit_caps_parsed_hits() {
        let catalog = MockCatalog::empty();
        let hits = (0..10)
            .map(|i| SearchHit::new("Strobe", "128 BPM", format!("https://{i}.example")))
            .collect();
        let search = MockSearch::no_results().with_hits("bpm", hits);
        let gatherer = EvidenceGatherer::new(&catalog, &search).with_result_limit(3);

        let gathered = gatherer.gather(&candidate(), &[Field::Bpm]).await.unwrap();
        assert_eq!(gathered.evidence.len(), 3);
    }

    #[tokio::test]
    async fn test_unqueryable_candidate() {
        let catalog = MockCatalog::empty();
        let search = MockSearch::no_results();
        let gatherer = EvidenceGatherer::new(&catalog, &search);

        let result = gatherer.gather(&TrackCandidate::new("", "Nobody"), &[Field::Bpm]).await;
        assert!(matches!(result, Err(GatherError::UnqueryableCandidate(_))));
        assert!(catalog.calls().is_empty());
    }

    #[tokio::test]
    async fn test_title_supplies_missing_version_tags() {
        let catalog = MockCatalog::empty();
        let search = MockSearch::no_results();
        let gatherer = EvidenceGatherer::new(&catalog, &search);

        let live = TrackCandidate::new("Sleepy Song (Live)", "Nils Frahm");
        let gathered = gatherer.gather(&live, &[Field::VersionTag]).await.unwrap();
        assert_eq!(gathered.evidence.len(), 1);
        assert_eq!(
            gathered.evidence[0].value,
            FieldValue::VersionTags(BTreeSet::from([VersionTag::Live]))
        );
        assert_eq!(gathered.evidence[0].origin.as_deref(), Some(TITLE_ORIGIN));
        assert_eq!(gathered.evidence[0].confidence, Confidence::High);

        let gathered = gatherer.gather(&candidate(), &[Field::VersionTag]).await.unwrap();
        assert_eq!(gathered.evidence[0].value, FieldValue::VersionTags(BTreeSet::new()));
        // The title answered, so nothing was searched
        assert_eq!(search.call_count(), 0);
    }

    #[tokio::test]
    async fn test_catalog_version_tags_win_over_title() {
        let catalog = catalog_with(vec![CatalogValue {
            value: FieldValue::VersionTags(BTreeSet::from([VersionTag::Remaster])),
            origin: CatalogOrigin::TrackObject,
        }]);
        let search = MockSearch::no_results();
        let gatherer = EvidenceGatherer::new(&catalog, &search);

        let gathered = gatherer.gather(&candidate(), &[Field::VersionTag]).await.unwrap();
        assert_eq!(gathered.evidence.len(), 1);
        assert_eq!(gathered.evidence[0].origin.as_deref(), Some("catalog:track"));
    }

    #[tokio::test]
    async fn test_vocal_proxies_requested_with_vocals() {
        let catalog = catalog_with(vec![CatalogValue {
            value: FieldValue::Instrumentalness(0.95),
            origin: CatalogOrigin::TrackObject,
        }]);
        let search = MockSearch::no_results();
        let gatherer = EvidenceGatherer::new(&catalog, &search);

        let gathered = gatherer
            .gather(&candidate(), &[Field::Bpm, Field::HasVocals])
            .await
            .unwrap();
        assert_eq!(
            catalog.calls()[0].1,
            vec![Field::Bpm, Field::HasVocals, Field::Instrumentalness, Field::Speechiness]
        );
        assert_eq!(gathered.evidence.len(), 1);
        assert_eq!(gathered.evidence[0].value, FieldValue::Instrumentalness(0.95));
    }

    #[tokio::test]
    async fn test_vocal_proxies_unused_when_vocals_reported() {
        let catalog = catalog_with(vec![
            CatalogValue {
                value: FieldValue::HasVocals(true),
                origin: CatalogOrigin::TrackObject,
            },
            CatalogValue {
                value: FieldValue::Speechiness(0.02),
                origin: CatalogOrigin::TrackObject,
            },
        ]);
        let search = MockSearch::no_results();
        let gatherer = EvidenceGatherer::new(&catalog, &search);

        let gathered = gatherer.gather(&candidate(), &[Field::HasVocals]).await.unwrap();
        assert_eq!(gathered.evidence.len(), 1);
        assert_eq!(gathered.evidence[0].value, FieldValue::HasVocals(true));
    }
}
