//! Grouping retrieved chunks by entity and ranking entities by aggregate score.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::document::SearchResult;

/// An entity with its aggregate similarity score for one query.
///
/// Produced by [`rank_matches`]; entities with zero retrieved chunks never
/// appear. Ephemeral — not persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedProfile {
    /// The entity this profile aggregates (parent document ID).
    pub entity_id: String,
    /// Mean similarity across the entity's matches, as a percentage rounded
    /// to two decimals. Higher is more similar. Not clamped: with cosine
    /// distances above 1 (anti-correlated vectors) the score can go
    /// negative; callers needing a strict 0–100 range must clamp.
    pub match_score_percent: f64,
    /// Texts of the chunks that contributed to the score, in retrieval order.
    pub contributing_chunks: Vec<String>,
    /// Free-text explanation, filled in by a downstream reasoning consumer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// Per-entity accumulator used while grouping.
#[derive(Debug, Default)]
struct EntityScore {
    total_similarity: f64,
    chunks: Vec<String>,
}

/// Group retrieved matches by parent entity and rank entities by mean
/// similarity, descending.
///
/// Each match's distance `d` is converted to a similarity `s = 1 − d`.
/// Precondition: `d` is a normalized cosine distance; unnormalized metrics
/// must be normalized before this step. The per-entity score is
/// `round(100 × mean(s), 2)`. The sort is stable, so entities with equal
/// scores keep their first-seen relative order.
pub fn rank_matches(results: &[SearchResult]) -> Vec<RankedProfile> {
    let mut order: Vec<String> = Vec::new();
    let mut scores: HashMap<String, EntityScore> = HashMap::new();

    for result in results {
        let entity_id = &result.chunk.document_id;
        if !scores.contains_key(entity_id) {
            order.push(entity_id.clone());
        }
        let entry = scores.entry(entity_id.clone()).or_default();
        entry.total_similarity += 1.0 - f64::from(result.distance);
        entry.chunks.push(result.chunk.text.clone());
    }

    let mut profiles: Vec<RankedProfile> = order
        .into_iter()
        .filter_map(|entity_id| {
            let entry = scores.remove(&entity_id)?;
            let mean = entry.total_similarity / entry.chunks.len() as f64;
            Some(RankedProfile {
                entity_id,
                match_score_percent: (mean * 100.0 * 100.0).round() / 100.0,
                contributing_chunks: entry.chunks,
                explanation: None,
            })
        })
        .collect();

    // Stable sort preserves first-seen order among equal scores.
    profiles.sort_by(|a, b| {
        b.match_score_percent
            .partial_cmp(&a.match_score_percent)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    profiles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Chunk;

    fn result(entity: &str, text: &str, distance: f32) -> SearchResult {
        SearchResult {
            chunk: Chunk {
                id: format!("{entity}_{text}"),
                text: text.to_string(),
                embedding: Vec::new(),
                metadata: HashMap::new(),
                document_id: entity.to_string(),
            },
            distance,
        }
    }

    #[test]
    fn groups_by_entity_and_averages() {
        let results = vec![
            result("a", "first", 0.2),
            result("b", "second", 0.4),
            result("a", "third", 0.4),
        ];
        let ranked = rank_matches(&results);
        assert_eq!(ranked.len(), 2);
        // a: mean(0.8, 0.6) = 0.7 → 70.0; b: 0.6 → 60.0
        assert_eq!(ranked[0].entity_id, "a");
        assert_eq!(ranked[0].match_score_percent, 70.0);
        assert_eq!(ranked[0].contributing_chunks, vec!["first", "third"]);
        assert_eq!(ranked[1].entity_id, "b");
        assert_eq!(ranked[1].match_score_percent, 60.0);
    }

    #[test]
    fn sorted_descending_with_stable_ties() {
        let results = vec![
            result("x", "one", 0.5),
            result("y", "two", 0.5),
            result("z", "three", 0.1),
        ];
        let ranked = rank_matches(&results);
        assert_eq!(ranked[0].entity_id, "z");
        // x and y tie at 50.0; x was seen first.
        assert_eq!(ranked[1].entity_id, "x");
        assert_eq!(ranked[2].entity_id, "y");
    }

    #[test]
    fn every_profile_has_contributing_chunks() {
        let results = vec![result("a", "only", 0.3)];
        let ranked = rank_matches(&results);
        assert!(ranked.iter().all(|p| !p.contributing_chunks.is_empty()));
    }

    #[test]
    fn maximum_distance_yields_zero_score() {
        let ranked = rank_matches(&[result("a", "far", 1.0)]);
        assert_eq!(ranked[0].match_score_percent, 0.0);
    }

    #[test]
    fn distance_above_one_goes_negative_without_clamping() {
        let ranked = rank_matches(&[result("a", "anti", 1.5)]);
        assert_eq!(ranked[0].match_score_percent, -50.0);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(rank_matches(&[]).is_empty());
    }

    #[test]
    fn score_rounds_to_two_decimals() {
        // mean similarity 1 - 0.333... = 0.66666…7 → 66.67
        let ranked = rank_matches(&[result("a", "chunk", 1.0 / 3.0)]);
        assert_eq!(ranked[0].match_score_percent, 66.67);
    }
}
