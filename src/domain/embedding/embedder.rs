//! Embedder trait definition

use async_trait::async_trait;
use std::fmt::Debug;

use crate::domain::DomainError;

/// Turns text into fixed-length vectors
#[async_trait]
pub trait Embedder: Send + Sync + Debug {
    /// Embed a batch of texts; output order matches input order
    async fn embed_many(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, DomainError>;

    /// Embed a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        self.embed_many(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::provider(self.model_name(), "Empty embedding response"))
    }

    /// Model identifier
    fn model_name(&self) -> &str;

    /// Length of every produced vector
    fn dimensions(&self) -> usize;
}
