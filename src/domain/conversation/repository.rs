//! Conversation store trait

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::ConversationMessage;
use crate::domain::error::DomainError;

/// Storage for conversation histories
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Starts an empty conversation and returns its id
    async fn create(&self) -> Result<String, DomainError>;

    /// Full history, or `None` for an unknown id
    async fn get(&self, conversation_id: &str)
        -> Result<Option<Vec<ConversationMessage>>, DomainError>;

    /// Appends a message, starting the conversation if needed
    async fn append(
        &self,
        conversation_id: &str,
        message: ConversationMessage,
    ) -> Result<(), DomainError>;

    /// The last `limit` messages in order; empty for an unknown id
    async fn recent(
        &self,
        conversation_id: &str,
        limit: usize,
    ) -> Result<Vec<ConversationMessage>, DomainError>;

    /// Removes all messages; returns false for an unknown id
    async fn clear(&self, conversation_id: &str) -> Result<bool, DomainError>;
}
