use std::sync::Arc;

use super::{HashEmbedder, HttpClient, OpenAiEmbeddingProvider};
use crate::config::{EmbeddingConfig, EmbeddingProviderKind};
use crate::domain::{DomainError, Embedder};

/// Factory for creating embedders
#[derive(Debug)]
pub struct EmbeddingProviderFactory;

impl EmbeddingProviderFactory {
    /// Create the configured embedder.
    ///
    /// `openai_api_key` is only consulted for the OpenAI provider.
    pub fn create(
        config: &EmbeddingConfig,
        openai_api_key: Option<String>,
    ) -> Result<Arc<dyn Embedder>, DomainError> {
        match config.provider {
            EmbeddingProviderKind::Hash => Ok(Arc::new(HashEmbedder::new(config.dimensions)?)),

            EmbeddingProviderKind::OpenAi => {
                let api_key = openai_api_key.ok_or_else(|| {
                    DomainError::configuration("OPENAI_API_KEY must be set to use OpenAI embeddings")
                })?;

                let provider = match &config.base_url {
                    Some(base_url) => OpenAiEmbeddingProvider::with_base_url(
                        HttpClient::new(),
                        api_key,
                        &config.model,
                        config.dimensions,
                        base_url,
                    ),
                    None => OpenAiEmbeddingProvider::new(
                        HttpClient::new(),
                        api_key,
                        &config.model,
                        config.dimensions,
                    ),
                };
                Ok(Arc::new(provider))
            }
        }
    }
}
