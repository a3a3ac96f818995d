//! Citations: attributing passages to sources and parsing cited sources

mod attributor;
mod extractor;

pub use attributor::{display_texts, CitationAttributor, SourceCitation};
pub use extractor::{
    extract_inline_citations, parse_source_entry, strip_inline_citations, Citation,
    UNKNOWN_PAGE_TOKEN,
};
