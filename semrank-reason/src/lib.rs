//! Model-backed reasoning over retrieval results.
//!
//! Consumes ranked matches from `semrank-retrieval` and turns them into
//! human-readable output: free-text match explanations and structured
//! ticket classifications.
//!
//! # Components
//!
//! - [`Explainer`] / [`Classifier`] - trait seams for model backends
//! - [`ChatCompletionsClient`] - OpenAI-compatible chat client implementing both
//! - [`build_match_context`] - bounded, deterministic prompt context
//! - [`TicketAnalysis`] - the structured classification result
//! - [`StaticExplainer`] / [`StaticClassifier`] - canned implementations for tests

pub mod chat;
pub mod classify;
pub mod context;
pub mod error;
pub mod explain;
pub mod mock;
pub mod prompts;

pub use chat::{ChatCompletionsClient, parse_analysis};
pub use classify::{Classifier, TicketAnalysis};
pub use context::{ContextOptions, build_match_context};
pub use error::{ReasonError, Result};
pub use explain::{Explainer, explain_top};
pub use mock::{StaticClassifier, StaticExplainer};
