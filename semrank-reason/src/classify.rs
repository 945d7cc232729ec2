//! Structured ticket classification.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Structured result of classifying a support ticket against historical
/// context.
///
/// All fields default when the model omits them, so a partially conforming
/// response still parses.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct TicketAnalysis {
    /// Primary category based on issue type.
    pub category: String,
    /// Specific subcategory for precise classification.
    pub subcategory: String,
    /// Priority label (P1–P4).
    pub priority: String,
    /// Team with the best expertise match.
    pub assigned_team: String,
    /// Technical complexity: critical/high/medium/low.
    pub technical_complexity: String,
    /// Specific technical skills needed.
    pub required_expertise: Vec<String>,
    /// Whether the ticket needs immediate escalation.
    pub escalation_required: bool,
    /// The model's explanation of its analysis.
    pub reasoning: String,
    /// Model self-reported confidence in [0, 1].
    pub confidence_score: f64,
    /// First actions to take toward resolution.
    pub immediate_actions: Vec<String>,
}

/// A strategy that classifies a query given retrieved context.
///
/// Implementations are swappable without touching the retrieval core:
/// an LLM-backed client in production, a canned one in tests.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify `query` using the retrieved `context` block.
    async fn classify(&self, query: &str, context: &str) -> Result<TicketAnalysis>;
}
