//! Sliding-window chunking of extracted document text

use std::ops::Range;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::pages::{InferredPage, PageNumberInferencer, RawPage, MAX_PAGE_NUMBER};
use crate::domain::retrieval::ChunkMetadata;
use crate::domain::DomainError;

/// Tag recorded on chunks produced from uploaded files
pub const FILE_UPLOAD_TAG: &str = "file_upload";

/// Configuration for chunking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Window size in characters
    pub chunk_size: usize,
    /// Characters shared by consecutive windows
    pub chunk_overlap: usize,
}

impl ChunkingConfig {
    /// Create a new chunking configuration
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    /// Validate the configuration.
    ///
    /// An overlap at or above the chunk size is accepted; the window then
    /// advances one character at a time.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.chunk_size == 0 {
            return Err(DomainError::validation("chunk_size must be greater than 0"));
        }

        Ok(())
    }

    /// Distance between the starts of consecutive windows
    pub fn step(&self) -> usize {
        self.chunk_size.saturating_sub(self.chunk_overlap).max(1)
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            chunk_overlap: 200,
        }
    }
}

/// Character ranges of the windows covering a text of `char_len` characters
pub fn window_ranges(char_len: usize, chunk_size: usize, overlap: usize) -> Vec<Range<usize>> {
    if chunk_size == 0 {
        return Vec::new();
    }

    let step = ChunkingConfig::new(chunk_size, overlap).step();
    let mut ranges = Vec::new();
    let mut start = 0;

    while start < char_len {
        ranges.push(start..(start + chunk_size).min(char_len));
        start += step;
    }

    ranges
}

/// Split text into overlapping windows of at most `chunk_size` characters
pub fn split_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    let offsets: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    let byte_at = |char_idx: usize| offsets.get(char_idx).copied().unwrap_or(text.len());

    window_ranges(offsets.len(), chunk_size, overlap)
        .into_iter()
        .map(|range| text[byte_at(range.start)..byte_at(range.end)].to_string())
        .collect()
}

/// A bounded slice of document text, the unit of retrieval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub content: String,
    pub source: String,
    /// Printed page number, best effort
    pub page: Option<u32>,
    /// 1-based physical page index in the source file
    pub physical_page: Option<u32>,
    pub sequence_index: usize,
    pub upload_tag: Option<String>,
}

impl Chunk {
    /// Create a new chunk
    pub fn new(content: impl Into<String>, source: impl Into<String>, sequence_index: usize) -> Self {
        Self {
            content: content.into(),
            source: source.into(),
            page: None,
            physical_page: None,
            sequence_index,
            upload_tag: None,
        }
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_physical_page(mut self, physical_page: u32) -> Self {
        self.physical_page = Some(physical_page);
        self
    }

    pub fn with_upload_tag(mut self, tag: impl Into<String>) -> Self {
        self.upload_tag = Some(tag.into());
        self
    }

    /// Stable vector-index id
    pub fn id(&self) -> String {
        format!("{}:{}", self.source, self.sequence_index)
    }

    /// Metadata stored alongside the chunk's vector
    pub fn to_metadata(&self, indexed_at: DateTime<Utc>) -> ChunkMetadata {
        ChunkMetadata {
            source: self.source.clone(),
            page: self.page,
            physical_page: self.physical_page,
            sequence_index: self.sequence_index,
            upload_tag: self.upload_tag.clone(),
            indexed_at: Some(indexed_at),
        }
    }
}

/// Turns extracted text into chunks for one source document
#[derive(Debug, Clone, Default)]
pub struct Chunker {
    config: ChunkingConfig,
    upload_tag: Option<String>,
}

impl Chunker {
    pub fn new(config: ChunkingConfig) -> Result<Self, DomainError> {
        config.validate()?;
        Ok(Self {
            config,
            upload_tag: None,
        })
    }

    pub fn with_upload_tag(mut self, tag: impl Into<String>) -> Self {
        self.upload_tag = Some(tag.into());
        self
    }

    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    /// Chunk unpaginated text
    pub fn chunk_text(&self, source: &str, text: &str) -> Vec<Chunk> {
        split_text(text, self.config.chunk_size, self.config.chunk_overlap)
            .into_iter()
            .enumerate()
            .map(|(index, content)| self.tag(Chunk::new(content, source, index)))
            .collect()
    }

    /// Chunk each page on its own; chunks inherit the page's number and
    /// sequence indices run on across pages.
    pub fn chunk_pages(&self, source: &str, pages: &[InferredPage]) -> Vec<Chunk> {
        let mut chunks = Vec::new();

        for page in pages {
            for content in split_text(&page.text, self.config.chunk_size, self.config.chunk_overlap)
            {
                let mut chunk = Chunk::new(content, source, chunks.len());
                if let Some(number) = page.page {
                    chunk = chunk.with_page(number);
                }
                if page.physical_index <= MAX_PAGE_NUMBER {
                    chunk = chunk.with_physical_page(page.physical_index);
                }
                chunks.push(self.tag(chunk));
            }
        }

        chunks
    }

    /// Infer page numbers for raw pages, then chunk them
    pub fn chunk_raw_pages(
        &self,
        source: &str,
        pages: Vec<RawPage>,
        inferencer: &PageNumberInferencer,
    ) -> Result<Vec<Chunk>, DomainError> {
        let inferred = inferencer.infer(pages)?;
        Ok(self.chunk_pages(source, &inferred))
    }

    fn tag(&self, chunk: Chunk) -> Chunk {
        match &self.upload_tag {
            Some(tag) => chunk.with_upload_tag(tag.clone()),
            None => chunk,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ingestion::pages::PageNumberSource;

    fn page(physical_index: u32, page: u32, text: &str) -> InferredPage {
        InferredPage {
            physical_index,
            page: Some(page),
            source: PageNumberSource::Fallback,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_empty_text() {
        assert!(split_text("", 10, 2).is_empty());
    }

    #[test]
    fn test_exact_windows() {
        let chunks = split_text("abcdefghij", 4, 1);
        assert_eq!(chunks, vec!["abcd", "defg", "ghij", "j"]);
    }

    #[test]
    fn test_consecutive_chunks_share_overlap() {
        let text = "The quick brown fox jumps over the lazy dog. ".repeat(4);
        let chunks = split_text(&text, 30, 10);

        for pair in chunks.windows(2) {
            if pair[1].chars().count() >= 10 {
                let tail: String = pair[0].chars().skip(20).collect();
                let head: String = pair[1].chars().take(10).collect();
                assert_eq!(tail, head);
            }
        }
    }

    #[test]
    fn test_overlap_larger_than_size_terminates() {
        let chunks = split_text("abcdef", 3, 5);
        assert_eq!(chunks.len(), 6);
        assert_eq!(chunks[0], "abc");
        assert_eq!(chunks[5], "f");
    }

    #[test]
    fn test_windows_cover_every_character() {
        for (len, size, overlap) in [(0, 1, 0), (1, 1, 0), (17, 5, 2), (100, 7, 7), (33, 4, 9)] {
            let ranges = window_ranges(len, size, overlap);
            let step = size.saturating_sub(overlap).max(1);
            assert!(ranges.len() <= len.div_ceil(step));

            for idx in 0..len {
                assert!(
                    ranges.iter().any(|r| r.contains(&idx)),
                    "index {idx} uncovered for len={len} size={size} overlap={overlap}"
                );
            }
            for range in &ranges {
                assert!(range.len() <= size);
            }
        }
    }

    #[test]
    fn test_multibyte_characters_counted_as_chars() {
        let chunks = split_text("éàüöß", 2, 0);
        assert_eq!(chunks, vec!["éà", "üö", "ß"]);
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        assert!(Chunker::new(ChunkingConfig::new(0, 0)).is_err());
        assert!(split_text("abc", 0, 0).is_empty());
    }

    #[test]
    fn test_chunk_text_metadata() {
        let chunker = Chunker::new(ChunkingConfig::new(5, 0))
            .unwrap()
            .with_upload_tag(FILE_UPLOAD_TAG);
        let chunks = chunker.chunk_text("notes.txt", "abcdefghijk");

        assert_eq!(chunks.len(), 3);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.sequence_index, i);
            assert_eq!(chunk.source, "notes.txt");
            assert_eq!(chunk.page, None);
            assert_eq!(chunk.upload_tag.as_deref(), Some(FILE_UPLOAD_TAG));
        }
        assert_eq!(chunks[1].id(), "notes.txt:1");
    }

    #[test]
    fn test_chunk_pages_never_span_pages() {
        let chunker = Chunker::new(ChunkingConfig::new(4, 0)).unwrap();
        let pages = vec![page(1, 11, "aaaaaa"), page(2, 12, "bb")];
        let chunks = chunker.chunk_pages("book.pdf", &pages);

        let contents: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["aaaa", "aa", "bb"]);
        assert_eq!(chunks[0].page, Some(11));
        assert_eq!(chunks[1].page, Some(11));
        assert_eq!(chunks[2].page, Some(12));
        assert_eq!(chunks[2].physical_page, Some(2));
        assert_eq!(
            chunks.iter().map(|c| c.sequence_index).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn test_out_of_range_page_is_left_unset() {
        let chunker = Chunker::new(ChunkingConfig::new(10, 0)).unwrap();
        let pages = vec![InferredPage {
            physical_index: MAX_PAGE_NUMBER + 1,
            page: None,
            source: PageNumberSource::Fallback,
            text: "appendix".to_string(),
        }];
        let chunks = chunker.chunk_pages("huge.pdf", &pages);

        assert_eq!(chunks[0].page, None);
        assert_eq!(chunks[0].physical_page, None);
    }

    #[test]
    fn test_chunk_raw_pages_uses_inferred_numbers() {
        let chunker = Chunker::new(ChunkingConfig::new(100, 0)).unwrap();
        let raw = RawPage::from_texts(["Page 5\nFirst.", "Second.", "Page 7\nThird."]);
        let chunks = chunker
            .chunk_raw_pages("a.pdf", raw, &PageNumberInferencer::default())
            .unwrap();

        assert_eq!(
            chunks.iter().map(|c| c.page).collect::<Vec<_>>(),
            vec![Some(5), Some(6), Some(7)]
        );
    }

    #[test]
    fn test_to_metadata() {
        let indexed_at = Utc::now();
        let chunk = Chunk::new("text", "a.pdf", 3).with_page(7).with_physical_page(9);
        let metadata = chunk.to_metadata(indexed_at);

        assert_eq!(metadata.source, "a.pdf");
        assert_eq!(metadata.page, Some(7));
        assert_eq!(metadata.physical_page, Some(9));
        assert_eq!(metadata.sequence_index, 3);
        assert_eq!(metadata.indexed_at, Some(indexed_at));
    }
}
