//! Parsing of citations from answer text and source lists

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

/// Page token used when the page is unknown
pub const UNKNOWN_PAGE_TOKEN: &str = "?";

/// A parsed mention of a source and page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub source: String,
    /// Digit string, `?`, or `None` when no page was given
    pub page_token: Option<String>,
    /// Text the citation was parsed from
    pub raw: String,
}

impl Citation {
    /// True when the page is absent or explicitly unknown
    pub fn page_unspecified(&self) -> bool {
        self.page_token
            .as_deref()
            .is_none_or(|token| token == UNKNOWN_PAGE_TOKEN)
    }
}

static INLINE_CITATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\[Source:\s*([^,\]]+),\s*Page:\s*(\d+|\?)\]").unwrap());

static INLINE_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\[Source:[^\]]+\]").unwrap());

/// A named pattern for one shape of provided-source entry
struct SourceEntryPattern {
    name: &'static str,
    regex: Regex,
    extract: fn(&Captures<'_>) -> Option<(String, Option<String>)>,
}

fn source_with_page(caps: &Captures<'_>) -> Option<(String, Option<String>)> {
    let source = caps.get(1)?.as_str().trim();
    let page = caps.get(2)?.as_str().trim();
    (!source.is_empty()).then(|| (source.to_string(), Some(page.to_string())))
}

fn bare_source(caps: &Captures<'_>) -> Option<(String, Option<String>)> {
    let source = caps.get(1)?.as_str().trim();
    (!source.is_empty()).then(|| (source.to_string(), None))
}

/// Provided-source entry shapes, tried in order
static SOURCE_ENTRY_PATTERNS: Lazy<Vec<SourceEntryPattern>> = Lazy::new(|| {
    vec![
        SourceEntryPattern {
            name: "with_page",
            regex: Regex::new(r"(?i)^\s*(.+?)\s*\(\s*Page\s+(\d+|\?)\s*\)\s*$").unwrap(),
            extract: source_with_page,
        },
        SourceEntryPattern {
            name: "bare",
            regex: Regex::new(r"^\s*(.+?)\s*$").unwrap(),
            extract: bare_source,
        },
    ]
});

/// Recover `[Source: X, Page: Y]` markers from answer text
pub fn extract_inline_citations(answer: &str) -> Vec<Citation> {
    INLINE_CITATION
        .captures_iter(answer)
        .filter_map(|caps| {
            let raw = caps.get(0)?.as_str().to_string();
            let source = caps.get(1)?.as_str().trim().to_string();
            let page = caps.get(2)?.as_str().trim().to_string();
            Some(Citation {
                source,
                page_token: Some(page),
                raw,
            })
        })
        .collect()
}

/// Remove inline citation markers from answer text
pub fn strip_inline_citations(answer: &str) -> String {
    INLINE_MARKER.replace_all(answer, "").into_owned()
}

/// Parse a provided-source entry such as `"a.pdf (Page 5)"` or `"a.pdf"`
pub fn parse_source_entry(entry: &str) -> Option<Citation> {
    SOURCE_ENTRY_PATTERNS.iter().find_map(|pattern| {
        let caps = pattern.regex.captures(entry)?;
        let (source, page_token) = (pattern.extract)(&caps)?;
        tracing::trace!(pattern = pattern.name, entry, "Parsed source entry");
        Some(Citation {
            source,
            page_token,
            raw: entry.to_string(),
        })
    })
}
