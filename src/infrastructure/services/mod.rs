//! Infrastructure services

mod conversation_service;
mod document_service;
mod evaluation_service;
mod rag_service;

pub use conversation_service::ConversationService;
pub use document_service::{DocumentService, IndexedFile, RemovedDocument, UploadedDocument};
pub use evaluation_service::EvaluationService;
pub use rag_service::{RagAnswer, RagService, RagServiceConfig};
