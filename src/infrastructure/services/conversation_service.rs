//! Conversation service - history bookkeeping for chat

use std::sync::Arc;

use tracing::debug;

use crate::domain::conversation::{ConversationHistory, ConversationMessage, ConversationStore};
use crate::domain::{DomainError, Message};

/// Resolves conversations and windows their history for the prompt
pub struct ConversationService {
    store: Arc<dyn ConversationStore>,
    history_limit: usize,
}

impl std::fmt::Debug for ConversationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationService")
            .field("history_limit", &self.history_limit)
            .finish()
    }
}

impl ConversationService {
    pub fn new(store: Arc<dyn ConversationStore>, history_limit: usize) -> Self {
        Self {
            store,
            history_limit,
        }
    }

    /// Use the caller's conversation id when given, otherwise start a new one
    pub async fn resolve(&self, conversation_id: Option<&str>) -> Result<String, DomainError> {
        match conversation_id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => Ok(id.to_string()),
            None => {
                let id = self.store.create().await?;
                debug!(conversation_id = %id, "Started conversation");
                Ok(id)
            }
        }
    }

    /// The most recent messages, oldest first, ready for the prompt
    pub async fn recent_messages(&self, conversation_id: &str) -> Result<Vec<Message>, DomainError> {
        let recent = self.store.recent(conversation_id, self.history_limit).await?;
        Ok(recent.iter().map(ConversationMessage::to_message).collect())
    }

    /// Record one question and its answer
    pub async fn record_exchange(
        &self,
        conversation_id: &str,
        question: &str,
        answer: &str,
    ) -> Result<(), DomainError> {
        self.store
            .append(conversation_id, ConversationMessage::user(question))
            .await?;
        self.store
            .append(conversation_id, ConversationMessage::assistant(answer))
            .await
    }

    /// Full history of a known conversation
    pub async fn history(&self, conversation_id: &str) -> Result<ConversationHistory, DomainError> {
        let messages = self
            .store
            .get(conversation_id)
            .await?
            .ok_or_else(|| not_found(conversation_id))?;

        Ok(ConversationHistory {
            conversation_id: conversation_id.to_string(),
            messages,
        })
    }

    pub async fn clear(&self, conversation_id: &str) -> Result<(), DomainError> {
        if self.store.clear(conversation_id).await? {
            debug!(conversation_id = %conversation_id, "Cleared conversation");
            Ok(())
        } else {
            Err(not_found(conversation_id))
        }
    }
}

fn not_found(conversation_id: &str) -> DomainError {
    DomainError::not_found(format!("Conversation '{}' not found", conversation_id))
}
