//! Conversation history domain

mod entity;
mod repository;

pub use entity::{ConversationHistory, ConversationMessage};
pub use repository::ConversationStore;

#[cfg(test)]
pub use repository::MockConversationStore;
