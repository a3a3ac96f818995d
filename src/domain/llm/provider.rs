use async_trait::async_trait;
use std::fmt::Debug;

use super::Message;
use crate::domain::DomainError;

/// A chat-style language model (Gemini, OpenAI, ...)
///
/// Implementations report upstream rate limiting as
/// `DomainError::QuotaExceeded` and every other failure as
/// `DomainError::Provider`.
#[async_trait]
pub trait LanguageModel: Send + Sync + Debug {
    /// Generate a reply to the ordered messages
    async fn generate(&self, messages: &[Message], temperature: f32) -> Result<String, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;

    /// Model used for generation
    fn model(&self) -> &str;
}
