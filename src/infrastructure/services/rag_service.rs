//! RAG service - retrieval, prompting and generation for one question

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use super::ConversationService;
use crate::domain::citation::display_texts;
use crate::domain::{
    CitationAttributor, DomainError, LanguageModel, PromptAssembler, RetrievedPassage, Retriever,
    SourceCitation,
};

/// Answer to one question, with everything needed to evaluate it
#[derive(Debug, Clone, Serialize)]
pub struct RagAnswer {
    pub answer: String,
    /// Citation display texts, e.g. `minutes.pdf (Page 4)`
    pub sources: Vec<String>,
    pub citations: Vec<SourceCitation>,
    pub passages: Vec<RetrievedPassage>,
    pub conversation_id: String,
    pub timestamp: DateTime<Utc>,
}

/// Runtime settings for the RAG service
#[derive(Debug, Clone, Copy)]
pub struct RagServiceConfig {
    pub top_k: usize,
    pub temperature: f32,
}

impl Default for RagServiceConfig {
    fn default() -> Self {
        Self {
            top_k: 12,
            temperature: 0.7,
        }
    }
}

/// Orchestrates the question-answering pipeline
pub struct RagService {
    retriever: Retriever,
    llm: Arc<dyn LanguageModel>,
    conversations: Arc<ConversationService>,
    attributor: CitationAttributor,
    assembler: PromptAssembler,
    config: RagServiceConfig,
}

impl std::fmt::Debug for RagService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RagService")
            .field("provider", &self.llm.provider_name())
            .field("model", &self.llm.model())
            .field("config", &self.config)
            .finish()
    }
}

impl RagService {
    pub fn new(
        retriever: Retriever,
        llm: Arc<dyn LanguageModel>,
        conversations: Arc<ConversationService>,
        attributor: CitationAttributor,
    ) -> Self {
        Self {
            retriever,
            llm,
            conversations,
            attributor,
            assembler: PromptAssembler::new(),
            config: RagServiceConfig::default(),
        }
    }

    pub fn with_config(mut self, config: RagServiceConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_assembler(mut self, assembler: PromptAssembler) -> Self {
        self.assembler = assembler;
        self
    }

    pub fn conversations(&self) -> &Arc<ConversationService> {
        &self.conversations
    }

    /// Answer a question within a conversation.
    ///
    /// The exchange is only recorded once generation succeeds.
    pub async fn answer(
        &self,
        query: &str,
        conversation_id: Option<&str>,
    ) -> Result<RagAnswer, DomainError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(DomainError::validation("Message cannot be empty"));
        }

        let conversation_id = self.conversations.resolve(conversation_id).await?;
        let history = self.conversations.recent_messages(&conversation_id).await?;

        let passages = self.retriever.search(query, self.config.top_k).await?;
        let citations = self.attributor.attribute(&passages);
        let messages = self.assembler.assemble(query, &passages, &history);

        debug!(
            conversation_id = %conversation_id,
            history = history.len(),
            passages = passages.len(),
            "Prompt assembled"
        );

        let answer = self.llm.generate(&messages, self.config.temperature).await?;

        self.conversations
            .record_exchange(&conversation_id, query, &answer)
            .await?;

        info!(
            conversation_id = %conversation_id,
            provider = self.llm.provider_name(),
            passages = passages.len(),
            citations = citations.len(),
            "Answered question"
        );

        Ok(RagAnswer {
            answer,
            sources: display_texts(&citations),
            citations,
            passages,
            conversation_id,
            timestamp: Utc::now(),
        })
    }
}
