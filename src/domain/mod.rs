//! Domain layer - Core retrieval and grounding logic

pub mod citation;
pub mod conversation;
pub mod document;
pub mod embedding;
pub mod error;
pub mod evaluation;
pub mod ingestion;
pub mod llm;
pub mod prompt;
pub mod retrieval;

pub use citation::{CitationAttributor, SourceCitation};
pub use conversation::{ConversationMessage, ConversationStore};
pub use document::{DocumentStore, StoredDocumentInfo, StoredFile};
pub use embedding::Embedder;
pub use error::DomainError;
pub use evaluation::{
    EvaluationConfig, EvaluationMetrics, EvaluationRequest, EvaluationResponse, GroundingEvaluator,
};
pub use ingestion::{
    Chunk, Chunker, ChunkingConfig, DocumentFormat, DocumentParser, ExtractedText,
    PageInferenceConfig, PageNumberInferencer, RawPage,
};
pub use llm::{LanguageModel, Message, MessageRole};
pub use prompt::PromptAssembler;
pub use retrieval::{ChunkMetadata, RetrievedPassage, Retriever, VectorIndex};
