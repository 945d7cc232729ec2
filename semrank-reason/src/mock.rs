//! Canned reasoning implementations for testing.

use async_trait::async_trait;

use semrank_retrieval::RankedProfile;

use crate::classify::{Classifier, TicketAnalysis};
use crate::error::Result;
use crate::explain::Explainer;

/// An [`Explainer`] that returns a fixed explanation.
///
/// Useful in tests and offline runs where no model backend is available.
#[derive(Debug, Clone)]
pub struct StaticExplainer {
    response: String,
}

impl StaticExplainer {
    /// Create an explainer that always returns `response`.
    pub fn new(response: impl Into<String>) -> Self {
        Self { response: response.into() }
    }
}

impl Default for StaticExplainer {
    fn default() -> Self {
        Self::new("These profiles share overlapping topics and terminology.")
    }
}

#[async_trait]
impl Explainer for StaticExplainer {
    async fn explain(&self, _query: &str, _profile: &RankedProfile) -> Result<String> {
        Ok(self.response.clone())
    }
}

/// A [`Classifier`] that returns a fixed analysis.
#[derive(Debug, Clone, Default)]
pub struct StaticClassifier {
    analysis: TicketAnalysis,
}

impl StaticClassifier {
    /// Create a classifier that always returns `analysis`.
    pub fn new(analysis: TicketAnalysis) -> Self {
        Self { analysis }
    }
}

#[async_trait]
impl Classifier for StaticClassifier {
    async fn classify(&self, _query: &str, _context: &str) -> Result<TicketAnalysis> {
        Ok(self.analysis.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explain::explain_top;

    fn profile(entity: &str) -> RankedProfile {
        RankedProfile {
            entity_id: entity.to_string(),
            match_score_percent: 80.0,
            contributing_chunks: vec!["chunk".to_string()],
            explanation: None,
        }
    }

    #[tokio::test]
    async fn static_explainer_fills_top_n() {
        let explainer = StaticExplainer::new("canned");
        let mut profiles = vec![profile("a"), profile("b"), profile("c")];

        explain_top(&explainer, "query", &mut profiles, 2).await;

        assert_eq!(profiles[0].explanation.as_deref(), Some("canned"));
        assert_eq!(profiles[1].explanation.as_deref(), Some("canned"));
        assert!(profiles[2].explanation.is_none());
    }

    #[tokio::test]
    async fn static_classifier_returns_configured_analysis() {
        let analysis = TicketAnalysis {
            category: "Hardware".into(),
            priority: "P2".into(),
            ..Default::default()
        };
        let classifier = StaticClassifier::new(analysis);

        let result = classifier.classify("laptop won't boot", "").await.unwrap();
        assert_eq!(result.category, "Hardware");
        assert_eq!(result.priority, "P2");
    }
}
