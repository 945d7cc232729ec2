//! OpenAI-compatible chat completions client.
//!
//! Implements both [`Explainer`](crate::explain::Explainer) and
//! [`Classifier`](crate::classify::Classifier) against any endpoint that
//! speaks the `/v1/chat/completions` protocol.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use semrank_retrieval::RankedProfile;

use crate::classify::{Classifier, TicketAnalysis};
use crate::error::{ReasonError, Result};
use crate::explain::Explainer;
use crate::prompts;

/// The default chat completions base URL.
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// The default chat model.
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// A chat-completions-backed reasoning client.
///
/// # Configuration
///
/// - `model` – defaults to `gpt-4o-mini`.
/// - `base_url` – defaults to the OpenAI endpoint; point it at any
///   compatible server.
/// - `api_key` – from the constructor or the `SEMRANK_CHAT_API_KEY`
///   environment variable.
///
/// Temperature is kept low (0.1) so classifications stay consistent across
/// runs of the same ticket.
pub struct ChatCompletionsClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f64,
    max_tokens: u32,
}

impl ChatCompletionsClient {
    /// Create a new client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(ReasonError::Model {
                provider: "chat".into(),
                message: "API key must not be empty".into(),
            });
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.into(),
            model: DEFAULT_MODEL.into(),
            temperature: 0.1,
            max_tokens: 2000,
        })
    }

    /// Create a new client using the `SEMRANK_CHAT_API_KEY` environment
    /// variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("SEMRANK_CHAT_API_KEY").map_err(|_| ReasonError::Model {
            provider: "chat".into(),
            message: "SEMRANK_CHAT_API_KEY environment variable not set".into(),
        })?;
        Self::new(api_key)
    }

    /// Point the client at a different OpenAI-compatible server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    async fn complete(&self, system: Option<&str>, user: &str) -> Result<String> {
        let mut messages = Vec::new();
        if let Some(system) = system {
            messages.push(Message { role: "system", content: system });
        }
        messages.push(Message { role: "user", content: user });

        debug!(model = %self.model, messages = messages.len(), "chat completion request");

        let request_body = ChatRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "chat request failed");
                ReasonError::Model {
                    provider: "chat".into(),
                    message: format!("request failed: {e}"),
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);

            error!(%status, "chat API error");
            return Err(ReasonError::Model {
                provider: "chat".into(),
                message: format!("API returned {status}: {detail}"),
            });
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            error!(error = %e, "failed to parse chat response");
            ReasonError::Model {
                provider: "chat".into(),
                message: format!("failed to parse response: {e}"),
            }
        })?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ReasonError::Model {
                provider: "chat".into(),
                message: "API returned no choices".into(),
            })
    }
}

/// Parse a model response into a [`TicketAnalysis`], tolerating markdown
/// code fences around the JSON body.
pub fn parse_analysis(raw: &str) -> Result<TicketAnalysis> {
    let trimmed = strip_code_fences(raw);
    serde_json::from_str(trimmed)
        .map_err(|e| ReasonError::Parse(format!("invalid analysis JSON: {e}")))
}

fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the language tag on the opening fence, then the closing fence.
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

// ── Chat API request/response types ────────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

// ── Trait implementations ──────────────────────────────────────────

#[async_trait]
impl Explainer for ChatCompletionsClient {
    async fn explain(&self, query: &str, profile: &RankedProfile) -> Result<String> {
        let matched = profile.contributing_chunks.join("\n");
        let prompt = prompts::explanation_prompt(query, &matched);
        self.complete(None, &prompt).await
    }
}

#[async_trait]
impl Classifier for ChatCompletionsClient {
    async fn classify(&self, query: &str, context: &str) -> Result<TicketAnalysis> {
        let prompt = prompts::classification_prompt(query, context);
        let raw = self.complete(Some(prompts::CLASSIFY_SYSTEM_PROMPT), &prompt).await?;
        parse_analysis(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_json() {
        let analysis =
            parse_analysis(r#"{"category": "Hardware", "escalation_required": true}"#).unwrap();
        assert_eq!(analysis.category, "Hardware");
        assert!(analysis.escalation_required);
    }

    #[test]
    fn parses_fenced_json() {
        let raw = "```json\n{\"category\": \"Network\", \"priority\": \"P1\"}\n```";
        let analysis = parse_analysis(raw).unwrap();
        assert_eq!(analysis.category, "Network");
        assert_eq!(analysis.priority, "P1");
    }

    #[test]
    fn parses_fence_without_language_tag() {
        let raw = "```\n{\"category\": \"Software\"}\n```";
        assert_eq!(parse_analysis(raw).unwrap().category, "Software");
    }

    #[test]
    fn rejects_non_json_output() {
        let err = parse_analysis("I think this is a hardware issue.").unwrap_err();
        assert!(matches!(err, ReasonError::Parse(_)));
    }

    #[test]
    fn empty_api_key_is_rejected() {
        assert!(ChatCompletionsClient::new("").is_err());
    }
}
