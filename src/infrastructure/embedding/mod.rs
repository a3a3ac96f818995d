//! Embedding provider implementations

mod factory;
mod hash;
mod openai;

pub use factory::EmbeddingProviderFactory;
pub use hash::HashEmbedder;
pub use openai::OpenAiEmbeddingProvider;

// Re-export HTTP client for convenience
pub use super::llm::{HttpClient, HttpClientTrait};
