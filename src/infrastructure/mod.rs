//! Infrastructure layer - External service implementations

pub mod conversation;
pub mod document_store;
pub mod embedding;
pub mod ingestion;
pub mod llm;
pub mod logging;
pub mod services;
pub mod vector_index;
