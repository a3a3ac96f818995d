//! OpenAI embedding provider implementation

use async_trait::async_trait;
use serde::Deserialize;

use super::HttpClientTrait;
use crate::domain::embedding::Embedder;
use crate::domain::DomainError;

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";

const PROVIDER: &str = "openai";

/// Texts sent per embeddings request
const MAX_BATCH_SIZE: usize = 100;

/// OpenAI embedding provider
#[derive(Debug)]
pub struct OpenAiEmbeddingProvider<C: HttpClientTrait> {
    client: C,
    auth_header: String,
    base_url: String,
    model: String,
    dimensions: usize,
}

impl<C: HttpClientTrait> OpenAiEmbeddingProvider<C> {
    /// Create a new OpenAI embedding provider
    pub fn new(
        client: C,
        api_key: impl Into<String>,
        model: impl Into<String>,
        dimensions: usize,
    ) -> Self {
        Self::with_base_url(client, api_key, model, dimensions, DEFAULT_OPENAI_BASE_URL)
    }

    /// Create a new provider with custom base URL
    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        model: impl Into<String>,
        dimensions: usize,
        base_url: impl Into<String>,
    ) -> Self {
        let auth_header = format!("Bearer {}", api_key.into());
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            client,
            auth_header,
            base_url,
            model: model.into(),
            dimensions,
        }
    }

    fn embeddings_url(&self) -> String {
        format!("{}/v1/embeddings", self.base_url)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("Authorization", self.auth_header.as_str()),
            ("Content-Type", "application/json"),
        ]
    }

    fn build_request(&self, texts: &[String]) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": self.model,
            "input": texts,
        });

        // Only the v3 models accept a reduced dimension count
        if self.model.starts_with("text-embedding-3") {
            body["dimensions"] = serde_json::json!(self.dimensions);
        }

        body
    }

    fn parse_response(
        &self,
        json: serde_json::Value,
        expected: usize,
    ) -> Result<Vec<Vec<f32>>, DomainError> {
        let mut response: OpenAiEmbeddingResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::provider(PROVIDER, format!("Failed to parse embedding response: {}", e))
        })?;

        if response.data.len() != expected {
            return Err(DomainError::provider(
                PROVIDER,
                format!(
                    "Expected {} embeddings, got {}",
                    expected,
                    response.data.len()
                ),
            ));
        }

        response.data.sort_by_key(|d| d.index);
        Ok(response.data.into_iter().map(|d| d.embedding).collect())
    }
}

#[async_trait]
impl<C: HttpClientTrait> Embedder for OpenAiEmbeddingProvider<C> {
    async fn embed_many(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, DomainError> {
        let url = self.embeddings_url();
        let mut vectors = Vec::with_capacity(texts.len());

        for batch in texts.chunks(MAX_BATCH_SIZE) {
            let body = self.build_request(batch);
            let response = self
                .client
                .post_json(&url, self.headers(), &body)
                .await
                .map_err(|e| e.for_provider(PROVIDER))?;

            vectors.extend(self.parse_response(response, batch.len())?);
        }

        Ok(vectors)
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

// OpenAI API types for embeddings

#[derive(Debug, Deserialize)]
struct OpenAiEmbeddingResponse {
    data: Vec<OpenAiEmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct OpenAiEmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::llm::MockHttpClient;

    const TEST_URL: &str = "https://api.openai.com/v1/embeddings";

    fn create_mock_response(indices: &[usize], dimensions: usize) -> serde_json::Value {
        let data: Vec<serde_json::Value> = indices
            .iter()
            .map(|&i| {
                let embedding: Vec<f32> = (0..dimensions).map(|j| (i * 10 + j) as f32).collect();
                serde_json::json!({
                    "index": i,
                    "embedding": embedding,
                    "object": "embedding"
                })
            })
            .collect();

        serde_json::json!({
            "model": "text-embedding-3-small",
            "data": data,
            "usage": { "prompt_tokens": 10, "total_tokens": 10 }
        })
    }

    fn provider(client: MockHttpClient) -> OpenAiEmbeddingProvider<MockHttpClient> {
        OpenAiEmbeddingProvider::new(client, "test-api-key", "text-embedding-3-small", 4)
    }

    #[tokio::test]
    async fn test_embed_single_text() {
        let client = MockHttpClient::new().with_response(TEST_URL, create_mock_response(&[0], 4));
        let provider = provider(client);

        let vector = provider.embed("Hello world").await.unwrap();
        assert_eq!(vector, vec![0.0, 1.0, 2.0, 3.0]);

        let (_, body) = &provider.client.requests()[0];
        assert_eq!(body["dimensions"], 4);
        assert_eq!(body["input"][0], "Hello world");
    }

    #[tokio::test]
    async fn test_embed_many_restores_input_order() {
        let client =
            MockHttpClient::new().with_response(TEST_URL, create_mock_response(&[2, 0, 1], 2));
        let provider = provider(client);

        let texts = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let vectors = provider.embed_many(&texts).await.unwrap();

        assert_eq!(vectors, vec![vec![0.0, 1.0], vec![10.0, 11.0], vec![20.0, 21.0]]);
    }

    #[tokio::test]
    async fn test_count_mismatch_is_error() {
        let client = MockHttpClient::new().with_response(TEST_URL, create_mock_response(&[0], 2));
        let provider = provider(client);

        let texts = vec!["a".to_string(), "b".to_string()];
        assert!(provider.embed_many(&texts).await.is_err());
    }

    #[tokio::test]
    async fn test_embed_error() {
        let client = MockHttpClient::new().with_error(TEST_URL, "Invalid key");
        let error = provider(client).embed("Hello").await.unwrap_err();

        assert_eq!(error.to_string(), "Provider error: openai - Invalid key");
    }

    #[test]
    fn test_legacy_model_omits_dimensions() {
        let provider =
            OpenAiEmbeddingProvider::new(MockHttpClient::new(), "key", "text-embedding-ada-002", 1536);
        let body = provider.build_request(&["x".to_string()]);

        assert!(body.get("dimensions").is_none());
        assert_eq!(provider.model_name(), "text-embedding-ada-002");
        assert_eq!(provider.dimensions(), 1536);
    }
}
