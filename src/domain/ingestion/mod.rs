//! Document ingestion domain types
//!
//! This module provides:
//! - `DocumentParser` trait for extracting text from uploaded formats
//! - Sliding-window chunking with per-page chunk inheritance
//! - Printed page-number inference for paginated sources
//! - Upload and index-request validation

pub mod chunker;
pub mod pages;
pub mod parser;
pub mod validation;

pub use chunker::{split_text, window_ranges, Chunk, Chunker, ChunkingConfig, FILE_UPLOAD_TAG};
pub use pages::{
    InferredPage, PageInferenceConfig, PageNumberInferencer, PageNumberSource, RawPage,
    MAX_PAGE_NUMBER, PAGE_PATTERNS,
};
pub use parser::{DocumentFormat, DocumentParser, ExtractedText};
pub use validation::{
    detect_format_from_filename, validate_file_upload, validate_top_k, IndexTarget,
    ALLOWED_EXTENSIONS, DEFAULT_MAX_UPLOAD_BYTES,
};
