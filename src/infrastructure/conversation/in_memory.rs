//! In-memory conversation store

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::conversation::{ConversationMessage, ConversationStore};
use crate::domain::DomainError;

/// Conversation histories held for the lifetime of the process
#[derive(Debug, Default, Clone)]
pub struct InMemoryConversationStore {
    conversations: Arc<RwLock<HashMap<String, Vec<ConversationMessage>>>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn create(&self) -> Result<String, DomainError> {
        let id = Uuid::new_v4().to_string();
        self.conversations.write().await.insert(id.clone(), Vec::new());
        Ok(id)
    }

    async fn get(
        &self,
        conversation_id: &str,
    ) -> Result<Option<Vec<ConversationMessage>>, DomainError> {
        Ok(self.conversations.read().await.get(conversation_id).cloned())
    }

    async fn append(
        &self,
        conversation_id: &str,
        message: ConversationMessage,
    ) -> Result<(), DomainError> {
        self.conversations
            .write()
            .await
            .entry(conversation_id.to_string())
            .or_default()
            .push(message);
        Ok(())
    }

    async fn recent(
        &self,
        conversation_id: &str,
        limit: usize,
    ) -> Result<Vec<ConversationMessage>, DomainError> {
        let conversations = self.conversations.read().await;

        Ok(conversations
            .get(conversation_id)
            .map(|messages| messages[messages.len().saturating_sub(limit)..].to_vec())
            .unwrap_or_default())
    }

    async fn clear(&self, conversation_id: &str) -> Result<bool, DomainError> {
        let mut conversations = self.conversations.write().await;

        match conversations.get_mut(conversation_id) {
            Some(messages) => {
                messages.clear();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
