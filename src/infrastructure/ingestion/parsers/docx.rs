//! DOCX placeholder parser

use crate::domain::ingestion::{DocumentFormat, DocumentParser, ExtractedText};
use crate::domain::DomainError;

/// Accepted at upload, but extraction is not available yet
#[derive(Debug, Clone, Default)]
pub struct DocxParser;

impl DocxParser {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentParser for DocxParser {
    fn supported_formats(&self) -> &[DocumentFormat] {
        &[DocumentFormat::Docx]
    }

    fn parse(&self, _bytes: &[u8]) -> Result<ExtractedText, DomainError> {
        Err(DomainError::not_implemented(
            "DOCX support is not yet implemented. Please convert to .txt or .md format.",
        ))
    }
}
