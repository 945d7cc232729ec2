//! Bounded, deterministic context construction for reasoning prompts.
//!
//! The context block handed to a model is built under a fixed protocol:
//! at most `max_profiles` entities, each chunk snippet cut at a fixed
//! character budget, sections laid out in rank order. The same ranked input
//! always produces the same string.

use semrank_retrieval::RankedProfile;

/// Bounds for context construction.
#[derive(Debug, Clone)]
pub struct ContextOptions {
    /// Maximum number of profiles included.
    pub max_profiles: usize,
    /// Character budget per chunk snippet; longer text is truncated with an
    /// ellipsis.
    pub snippet_chars: usize,
    /// Profiles scoring below this percentage are left out.
    pub min_score_percent: f64,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self { max_profiles: 8, snippet_chars: 300, min_score_percent: 30.0 }
    }
}

/// Truncate to at most `limit` characters, appending `...` when cut.
/// Never splits inside a code point.
fn snippet(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let cut: String = text.chars().take(limit).collect();
    format!("{cut}...")
}

/// Build the context block for a set of ranked profiles.
///
/// Returns an empty string when no profile clears the score floor — the
/// caller decides whether to proceed without historical context.
pub fn build_match_context(profiles: &[RankedProfile], options: &ContextOptions) -> String {
    let mut sections = Vec::new();

    for (i, profile) in profiles
        .iter()
        .filter(|p| p.match_score_percent >= options.min_score_percent)
        .take(options.max_profiles)
        .enumerate()
    {
        let snippets: Vec<String> = profile
            .contributing_chunks
            .iter()
            .map(|chunk| snippet(chunk, options.snippet_chars))
            .collect();

        sections.push(format!(
            "MATCH {n} (score: {score:.2}%)\nEntity: {entity}\nContent: {content}\n---",
            n = i + 1,
            score = profile.match_score_percent,
            entity = profile.entity_id,
            content = snippets.join("\n"),
        ));
    }

    if sections.is_empty() {
        return String::new();
    }

    format!("=== SIMILAR HISTORICAL MATCHES ===\n{}", sections.join("\n"))
}
