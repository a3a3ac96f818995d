//! Archive RAG
//!
//! Grounded question answering over historical documents:
//! - Page-aware chunking with printed page number inference
//! - Vector retrieval with citation links back to the source page
//! - Chat with conversation history over Gemini or OpenAI
//! - Grounding evaluation of generated answers

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use domain::{
    Chunker, ChunkingConfig, CitationAttributor, Embedder, GroundingEvaluator, Retriever,
    VectorIndex,
};
use infrastructure::{
    conversation::InMemoryConversationStore,
    document_store::LocalDocumentStore,
    embedding::EmbeddingProviderFactory,
    llm::LlmProviderFactory,
    services::{
        ConversationService, DocumentService, EvaluationService, RagService, RagServiceConfig,
    },
    vector_index::InMemoryVectorIndex,
};
use tracing::info;

/// Create the configured embedder
pub fn create_embedder(config: &AppConfig) -> anyhow::Result<Arc<dyn Embedder>> {
    let embedder =
        EmbeddingProviderFactory::create(&config.embedding, config.llm.resolved_openai_key())?;

    info!(
        model = embedder.model_name(),
        dimensions = embedder.dimensions(),
        "Embedder ready"
    );
    Ok(embedder)
}

/// Create the document service over the configured upload directory
pub async fn create_document_service(
    config: &AppConfig,
    index: Arc<dyn VectorIndex>,
    embedder: Arc<dyn Embedder>,
) -> anyhow::Result<DocumentService> {
    let store = LocalDocumentStore::new(&config.storage.upload_dir).await?;
    let chunker = Chunker::new(ChunkingConfig::new(
        config.rag.chunk_size,
        config.rag.chunk_overlap,
    ))?;

    info!(upload_dir = %config.storage.upload_dir, "Document store ready");

    Ok(DocumentService::new(
        Arc::new(store),
        index,
        embedder,
        chunker,
        config.storage.max_upload_bytes,
    ))
}

/// Create the application state with all services initialized
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let embedder = create_embedder(config)?;
    let index: Arc<dyn VectorIndex> = Arc::new(InMemoryVectorIndex::new());
    let documents = create_document_service(config, index.clone(), embedder.clone()).await?;

    let llm = LlmProviderFactory::create(&config.llm)?;
    info!(provider = llm.provider_name(), model = llm.model(), "Language model ready");

    let conversations = Arc::new(ConversationService::new(
        Arc::new(InMemoryConversationStore::new()),
        config.rag.history_limit,
    ));

    let rag = Arc::new(
        RagService::new(
            Retriever::new(embedder, index),
            llm,
            conversations,
            CitationAttributor::new(&config.rag.document_base_url),
        )
        .with_config(RagServiceConfig {
            top_k: config.rag.top_k,
            temperature: config.llm.temperature,
        }),
    );

    let evaluator = GroundingEvaluator::new(config.evaluation.clone())?;
    let evaluation = EvaluationService::new(evaluator, rag.clone());

    Ok(AppState::new(
        rag,
        Arc::new(documents),
        Arc::new(evaluation),
        &config.rag.document_base_url,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LlmConfig;

    fn offline_config(upload_dir: &std::path::Path) -> AppConfig {
        let mut config = AppConfig::default();
        config.storage.upload_dir = upload_dir.to_string_lossy().into_owned();
        config.llm = LlmConfig {
            gemini_api_key: Some("test-key".to_string()),
            ..LlmConfig::default()
        };
        config
    }

    #[tokio::test]
    async fn test_app_state_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let state = create_app_state_with_config(&offline_config(dir.path()))
            .await
            .unwrap();

        assert_eq!(state.document_base_url, "/documents/files");
        assert!(state.documents.list_files().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_chunking_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = offline_config(dir.path());
        config.rag.chunk_size = 0;

        assert!(create_app_state_with_config(&config).await.is_err());
    }
}
