//! Source attribution for retrieved passages

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::retrieval::RetrievedPassage;

/// A user-facing reference to a source document and page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCitation {
    pub source: String,
    pub page: Option<u32>,
    pub display_text: String,
    pub url: String,
}

/// Builds deduplicated, sorted citations with document-view links
#[derive(Debug, Clone)]
pub struct CitationAttributor {
    document_base_url: String,
}

impl CitationAttributor {
    pub fn new(document_base_url: impl Into<String>) -> Self {
        Self {
            document_base_url: document_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// One citation per distinct (source, page), sorted by source then page
    /// with unknown pages first
    pub fn attribute(&self, passages: &[RetrievedPassage]) -> Vec<SourceCitation> {
        let mut seen = HashSet::new();
        let mut citations: Vec<SourceCitation> = passages
            .iter()
            .filter(|p| seen.insert((p.metadata.source.as_str(), p.metadata.page)))
            .map(|p| self.citation_for(p))
            .collect();

        citations.sort_by(|a, b| a.source.cmp(&b.source).then(a.page.cmp(&b.page)));
        citations
    }

    fn citation_for(&self, passage: &RetrievedPassage) -> SourceCitation {
        let source = passage.metadata.source.clone();
        let page = passage.metadata.page;

        let display_text = match page {
            Some(page) => format!("{source} (Page {page})"),
            None => source.clone(),
        };

        // Viewers navigate by physical page, not by the printed label.
        let navigation_page = passage.metadata.physical_page.or(page);
        let mut url = format!("{}/{}", self.document_base_url, urlencoding::encode(&source));
        if let Some(nav) = navigation_page {
            url.push_str(&format!("#page={nav}"));
        }

        SourceCitation {
            source,
            page,
            display_text,
            url,
        }
    }
}

/// Display texts in citation order
pub fn display_texts(citations: &[SourceCitation]) -> Vec<String> {
    citations.iter().map(|c| c.display_text.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::retrieval::ChunkMetadata;

    fn passage(source: &str, page: Option<u32>, physical: Option<u32>) -> RetrievedPassage {
        let mut metadata = ChunkMetadata::new(source);
        metadata.page = page;
        metadata.physical_page = physical;
        RetrievedPassage::new(format!("{source}:{page:?}"), "text", metadata)
    }

    #[test]
    fn test_dedupes_and_sorts() {
        let attributor = CitationAttributor::new("/documents/files");
        let citations = attributor.attribute(&[
            passage("b.pdf", Some(4), None),
            passage("a.pdf", Some(9), None),
            passage("b.pdf", Some(4), None),
            passage("a.pdf", None, None),
            passage("a.pdf", Some(2), None),
        ]);

        let labels = display_texts(&citations);
        assert_eq!(
            labels,
            vec!["a.pdf", "a.pdf (Page 2)", "a.pdf (Page 9)", "b.pdf (Page 4)"]
        );
    }

    #[test]
    fn test_url_is_percent_encoded_with_page_fragment() {
        let attributor = CitationAttributor::new("/documents/files/");
        let citations = attributor.attribute(&[passage("Treaty of Ghent.pdf", Some(12), None)]);

        assert_eq!(
            citations[0].url,
            "/documents/files/Treaty%20of%20Ghent.pdf#page=12"
        );
    }

    #[test]
    fn test_url_prefers_physical_page() {
        let attributor = CitationAttributor::new("/files");
        let citations = attributor.attribute(&[passage("a.pdf", Some(189), Some(2))]);

        assert_eq!(citations[0].display_text, "a.pdf (Page 189)");
        assert_eq!(citations[0].url, "/files/a.pdf#page=2");
    }

    #[test]
    fn test_unknown_page_has_no_fragment() {
        let attributor = CitationAttributor::new("/files");
        let citations = attributor.attribute(&[passage("notes.txt", None, None)]);

        assert_eq!(citations[0].url, "/files/notes.txt");
        assert_eq!(citations[0].page, None);
    }

    #[test]
    fn test_first_occurrence_wins() {
        let attributor = CitationAttributor::new("/files");
        let citations = attributor.attribute(&[
            passage("a.pdf", Some(5), Some(7)),
            passage("a.pdf", Some(5), Some(8)),
        ]);

        assert_eq!(citations.len(), 1);
        assert_eq!(citations[0].url, "/files/a.pdf#page=7");
    }

    #[test]
    fn test_empty_passages() {
        assert!(CitationAttributor::new("/files").attribute(&[]).is_empty());
    }
}
