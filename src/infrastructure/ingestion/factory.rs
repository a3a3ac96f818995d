//! Factory for creating document parsers

use std::sync::Arc;

use crate::domain::ingestion::{DocumentFormat, DocumentParser};

use super::parsers::{DocxParser, PdfParser, PlainTextParser};

/// Factory for creating document parsers
#[derive(Debug, Default)]
pub struct ParserFactory;

impl ParserFactory {
    /// Create the parser for the given format
    pub fn create(format: DocumentFormat) -> Arc<dyn DocumentParser> {
        match format {
            DocumentFormat::PlainText | DocumentFormat::Markdown => {
                Arc::new(PlainTextParser::new())
            }
            DocumentFormat::Pdf => Arc::new(PdfParser::new()),
            DocumentFormat::Docx => Arc::new(DocxParser::new()),
        }
    }
}
