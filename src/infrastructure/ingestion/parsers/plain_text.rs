//! Plain text and markdown parser

use tracing::warn;

use crate::domain::ingestion::{DocumentFormat, DocumentParser, ExtractedText};
use crate::domain::DomainError;

/// Decodes `.txt` and `.md` uploads as UTF-8.
///
/// Markdown is kept as written; its markup is harmless to retrieval.
#[derive(Debug, Clone, Default)]
pub struct PlainTextParser;

impl PlainTextParser {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentParser for PlainTextParser {
    fn supported_formats(&self) -> &[DocumentFormat] {
        &[DocumentFormat::PlainText, DocumentFormat::Markdown]
    }

    fn parse(&self, bytes: &[u8]) -> Result<ExtractedText, DomainError> {
        let text = match std::str::from_utf8(bytes) {
            Ok(text) => text.to_string(),
            Err(e) => {
                warn!(
                    valid_up_to = e.valid_up_to(),
                    "Invalid UTF-8 in text document, replacing bad bytes"
                );
                String::from_utf8_lossy(bytes).into_owned()
            }
        };

        Ok(ExtractedText::Plain(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_utf8() {
        let parser = PlainTextParser::new();
        let result = parser.parse("Traité de Paris, 1815".as_bytes()).unwrap();

        assert_eq!(result, ExtractedText::Plain("Traité de Paris, 1815".into()));
    }

    #[test]
    fn test_parse_invalid_utf8_is_lossy() {
        let parser = PlainTextParser::new();
        let result = parser.parse(&[b'a', 0xff, b'b']).unwrap();

        assert_eq!(result, ExtractedText::Plain("a\u{FFFD}b".into()));
    }

    #[test]
    fn test_supported_formats() {
        let parser = PlainTextParser::new();
        assert!(parser.supported_formats().contains(&DocumentFormat::Markdown));
        assert!(!parser.supported_formats().contains(&DocumentFormat::Pdf));
    }
}
