use std::sync::Arc;
use std::time::Duration;

use super::http_client::HttpClient;
use super::{GeminiProvider, OpenAiProvider};
use crate::config::{LlmConfig, LlmProviderKind};
use crate::domain::{DomainError, LanguageModel};

/// Factory for creating language models
#[derive(Debug)]
pub struct LlmProviderFactory;

impl LlmProviderFactory {
    /// Create the configured language model.
    ///
    /// Fails with a configuration error when the provider's API key is
    /// neither configured nor present in the environment.
    pub fn create(config: &LlmConfig) -> Result<Arc<dyn LanguageModel>, DomainError> {
        let http_client = HttpClient::with_timeout(Duration::from_secs(config.request_timeout_secs))?;

        match config.provider {
            LlmProviderKind::Gemini => {
                let api_key = config.resolved_gemini_key().ok_or_else(|| {
                    DomainError::configuration("GEMINI_API_KEY must be set to use Gemini")
                })?;

                let provider = match &config.base_url {
                    Some(base_url) => GeminiProvider::with_base_url(
                        http_client,
                        api_key,
                        &config.gemini_model,
                        base_url,
                    ),
                    None => GeminiProvider::new(http_client, api_key, &config.gemini_model),
                };
                Ok(Arc::new(provider))
            }

            LlmProviderKind::OpenAi => {
                let api_key = config.resolved_openai_key().ok_or_else(|| {
                    DomainError::configuration("OPENAI_API_KEY must be set to use OpenAI")
                })?;

                let provider = match &config.base_url {
                    Some(base_url) => OpenAiProvider::with_base_url(
                        http_client,
                        api_key,
                        &config.openai_model,
                        base_url,
                    ),
                    None => OpenAiProvider::new(http_client, api_key, &config.openai_model),
                };
                Ok(Arc::new(provider))
            }
        }
    }

    /// Create a Gemini model directly
    pub fn create_gemini(
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Arc<dyn LanguageModel> {
        Arc::new(GeminiProvider::new(HttpClient::new(), api_key, model))
    }

    /// Create an OpenAI model directly
    pub fn create_openai(
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Arc<dyn LanguageModel> {
        Arc::new(OpenAiProvider::new(HttpClient::new(), api_key, model))
    }
}
