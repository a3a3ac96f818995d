//! PDF parser built on lopdf

use lopdf::Document;
use tracing::{debug, warn};

use crate::domain::ingestion::{DocumentFormat, DocumentParser, ExtractedText, RawPage};
use crate::domain::DomainError;

/// Extracts text page by page.
///
/// A page that fails to decode is skipped with a warning; blank pages are
/// dropped but the remaining pages keep their physical index.
#[derive(Debug, Clone, Default)]
pub struct PdfParser;

impl PdfParser {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentParser for PdfParser {
    fn supported_formats(&self) -> &[DocumentFormat] {
        &[DocumentFormat::Pdf]
    }

    fn parse(&self, bytes: &[u8]) -> Result<ExtractedText, DomainError> {
        let document = Document::load_mem(bytes)
            .map_err(|e| DomainError::extraction(format!("Failed to read PDF: {}", e)))?;

        if document.trailer.get(b"Encrypt").is_ok() {
            return Err(DomainError::extraction(
                "PDF is encrypted and cannot be read",
            ));
        }

        let page_numbers: Vec<u32> = document.get_pages().into_keys().collect();
        let mut pages = Vec::new();

        for page_number in &page_numbers {
            match document.extract_text(&[*page_number]) {
                Ok(text) if !text.trim().is_empty() => pages.push(RawPage::new(*page_number, text)),
                Ok(_) => debug!(page = page_number, "Skipping blank PDF page"),
                Err(e) => warn!(page = page_number, error = %e, "Failed to extract PDF page"),
            }
        }

        if pages.is_empty() {
            return Err(DomainError::extraction(
                "No text could be extracted from the PDF; it may be scanned or image-only",
            ));
        }

        debug!(
            total_pages = page_numbers.len(),
            text_pages = pages.len(),
            "Extracted PDF text"
        );

        Ok(ExtractedText::Paged(pages))
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use lopdf::{Dictionary, Document, Object, Stream};

    /// A PDF with one page per entry; each entry's lines are drawn top down.
    /// An empty entry produces a page without text.
    pub fn pdf_with_pages(pages: &[&[&str]]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");

        let pages_id = doc.new_object_id();
        let catalog_id = doc.new_object_id();

        let mut font = Dictionary::new();
        font.set("Type", Object::Name(b"Font".to_vec()));
        font.set("Subtype", Object::Name(b"Type1".to_vec()));
        font.set("BaseFont", Object::Name(b"Helvetica".to_vec()));
        font.set("Encoding", Object::Name(b"WinAnsiEncoding".to_vec()));
        let font_id = doc.add_object(Object::Dictionary(font));

        let mut fonts = Dictionary::new();
        fonts.set("F1", Object::Reference(font_id));
        let mut resources = Dictionary::new();
        resources.set("Font", Object::Dictionary(fonts));
        let resources_id = doc.add_object(Object::Dictionary(resources));

        let mut page_ids = Vec::new();
        for lines in pages {
            let content: String = lines
                .iter()
                .enumerate()
                .map(|(i, line)| {
                    format!("BT /F1 12 Tf 50 {} Td ({}) Tj ET\n", 700 - 20 * i, line)
                })
                .collect();
            let content_id = doc.add_object(Object::Stream(Stream::new(
                Dictionary::new(),
                content.into_bytes(),
            )));

            let mut page = Dictionary::new();
            page.set("Type", Object::Name(b"Page".to_vec()));
            page.set("Parent", Object::Reference(pages_id));
            page.set("Contents", Object::Reference(content_id));
            page.set("Resources", Object::Reference(resources_id));
            page.set(
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(612),
                    Object::Integer(792),
                ]),
            );
            page_ids.push(Object::Reference(doc.add_object(Object::Dictionary(page))));
        }

        let mut pages_dict = Dictionary::new();
        pages_dict.set("Type", Object::Name(b"Pages".to_vec()));
        pages_dict.set("Count", Object::Integer(page_ids.len() as i64));
        pages_dict.set("Kids", Object::Array(page_ids));
        doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::Name(b"Catalog".to_vec()));
        catalog.set("Pages", Object::Reference(pages_id));
        doc.objects.insert(catalog_id, Object::Dictionary(catalog));
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).unwrap();
        buffer
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::pdf_with_pages;
    use super::*;

    #[test]
    fn test_extracts_each_page() {
        let bytes = pdf_with_pages(&[
            &["Page 188", "The treaty was signed"],
            &["Delegates met at the palace"],
        ]);

        let ExtractedText::Paged(pages) = PdfParser::new().parse(&bytes).unwrap() else {
            panic!("expected paged text");
        };

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].physical_index, 1);
        assert!(pages[0].text.contains("Page 188"));
        assert!(pages[0].text.contains("The treaty was signed"));
        assert_eq!(pages[1].physical_index, 2);
        assert!(pages[1].text.contains("Delegates"));
    }

    #[test]
    fn test_blank_pages_keep_physical_index() {
        let bytes = pdf_with_pages(&[&[], &["Second page text"]]);

        let ExtractedText::Paged(pages) = PdfParser::new().parse(&bytes).unwrap() else {
            panic!("expected paged text");
        };

        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].physical_index, 2);
    }

    #[test]
    fn test_no_text_is_extraction_error() {
        let bytes = pdf_with_pages(&[&[], &[]]);

        let err = PdfParser::new().parse(&bytes).unwrap_err();
        assert!(matches!(err, DomainError::Extraction { .. }));
    }

    #[test]
    fn test_garbage_is_extraction_error() {
        let err = PdfParser::new().parse(b"not a pdf").unwrap_err();
        assert!(matches!(err, DomainError::Extraction { .. }));
    }
}
