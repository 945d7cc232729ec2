//! Free-text match explanation.

use async_trait::async_trait;
use tracing::{info, warn};

use semrank_retrieval::RankedProfile;

use crate::error::Result;

/// A strategy that explains why a ranked profile matches a query.
///
/// Implementations are swappable without touching the retrieval core.
#[async_trait]
pub trait Explainer: Send + Sync {
    /// Produce a short free-text explanation of why `profile` matches `query`.
    async fn explain(&self, query: &str, profile: &RankedProfile) -> Result<String>;
}

/// Fill in explanations for the top `n` profiles in place.
///
/// A failed explanation leaves that profile's `explanation` empty with a
/// warning; it does not abort the rest. Latency and retry behavior are the
/// caller's concern.
pub async fn explain_top(
    explainer: &dyn Explainer,
    query: &str,
    profiles: &mut [RankedProfile],
    n: usize,
) {
    for profile in profiles.iter_mut().take(n) {
        match explainer.explain(query, profile).await {
            Ok(text) => {
                info!(entity = %profile.entity_id, "generated explanation");
                profile.explanation = Some(text);
            }
            Err(e) => {
                warn!(entity = %profile.entity_id, error = %e, "explanation failed");
            }
        }
    }
}
