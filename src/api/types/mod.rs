//! Request, response and error types for the HTTP API

pub mod chat;
pub mod documents;
pub mod error;
pub mod json;

pub use chat::{ChatRequest, ChatResponse};
pub use documents::{
    DocumentIndexRequest, DocumentIndexResponse, DocumentInfo, DocumentUploadResponse,
};
pub use error::{ApiError, ApiErrorResponse, ApiErrorType};
pub use json::Json;
