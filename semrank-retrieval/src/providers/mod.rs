//! Embedding provider implementations.

#[cfg(feature = "http-embeddings")]
pub mod http;
#[cfg(feature = "local-embeddings")]
pub mod local;

#[cfg(feature = "http-embeddings")]
pub use http::HttpEmbeddingProvider;
#[cfg(feature = "local-embeddings")]
pub use local::LocalEmbeddingProvider;
