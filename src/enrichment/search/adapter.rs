//! Adapter layer: Convert Instant Answer DTOs to search hits
//!
//! Result order is abstract first, then direct results, then related topics
//! with groups flattened in place.

use super::dto;
use crate::enrichment::domain::SearchHit;

/// Flatten an answer into ordered hits, dropping entries with no text.
pub fn to_hits(answer: dto::InstantAnswer) -> Vec<SearchHit> {
    let mut hits = Vec::new();

    if !answer.abstract_text.trim().is_empty() {
        hits.push(SearchHit::new(
            answer.heading.clone(),
            answer.abstract_text,
            answer.abstract_url,
        ));
    }

    let topics = answer
        .results
        .into_iter()
        .chain(answer.related_topics.into_iter().flat_map(|related| match related {
            dto::RelatedTopic::Group { topics, .. } => topics,
            dto::RelatedTopic::Single(topic) => vec![topic],
        }));

    for topic in topics {
        if topic.text.trim().is_empty() {
            continue;
        }
        hits.push(topic_to_hit(topic));
    }

    hits
}

/// Topic text reads "Title - description"; split off the title part.
fn topic_to_hit(topic: dto::Topic) -> SearchHit {
    let title = topic
        .text
        .split_once(" - ")
        .map(|(title, _)| title.to_string())
        .unwrap_or_else(|| topic.text.clone());
    SearchHit::new(title, topic.text, topic.first_url)
}
