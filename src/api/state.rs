//! Application state for shared services

use std::sync::Arc;

use crate::infrastructure::services::{
    ConversationService, DocumentService, EvaluationService, RagService,
};

/// Application state shared by every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub rag: Arc<RagService>,
    pub documents: Arc<DocumentService>,
    pub evaluation: Arc<EvaluationService>,
    pub conversations: Arc<ConversationService>,
    /// Prefix for links to stored files, e.g. `/documents/files`
    pub document_base_url: String,
}

impl AppState {
    /// Create new application state with provided services
    pub fn new(
        rag: Arc<RagService>,
        documents: Arc<DocumentService>,
        evaluation: Arc<EvaluationService>,
        document_base_url: impl Into<String>,
    ) -> Self {
        let conversations = rag.conversations().clone();

        Self {
            rag,
            documents,
            evaluation,
            conversations,
            document_base_url: document_base_url.into(),
        }
    }
}
