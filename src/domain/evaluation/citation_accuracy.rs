//! Citation accuracy scoring

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::citation::{extract_inline_citations, parse_source_entry, Citation};
use crate::domain::retrieval::RetrievedPassage;

use super::metrics::CitationAccuracy;

/// Known page tokens per source; an empty set means no page is known
pub type AvailableSources = BTreeMap<String, BTreeSet<String>>;

/// Collect the sources and page tokens present in the passages
pub fn available_sources(passages: &[RetrievedPassage]) -> AvailableSources {
    let mut available = AvailableSources::new();

    for passage in passages {
        let pages = available.entry(passage.source().to_string()).or_default();
        if let Some(page) = passage.page() {
            pages.insert(page.to_string());
        }
    }

    available
}

fn page_matches(token: &str, known: &BTreeSet<String>) -> bool {
    if known.contains(token) {
        return true;
    }

    match token.parse::<u64>() {
        Ok(number) => known
            .iter()
            .filter_map(|page| page.parse::<u64>().ok())
            .any(|page| page == number),
        Err(_) => false,
    }
}

/// Whether a citation names a retrieved source and one of its pages
pub fn is_valid_citation(citation: &Citation, available: &AvailableSources) -> bool {
    let Some(known) = available.get(&citation.source) else {
        return false;
    };

    if citation.page_unspecified() || known.is_empty() {
        return true;
    }

    citation
        .page_token
        .as_deref()
        .is_some_and(|token| page_matches(token, known))
}

/// Score citations against the retrieved passages.
///
/// A non-empty `provided` list is used as the answer's citations; otherwise
/// inline `[Source: X, Page: Y]` markers are parsed from the answer.
pub fn score_citations(
    answer: &str,
    passages: &[RetrievedPassage],
    provided: Option<&[String]>,
) -> CitationAccuracy {
    let available = available_sources(passages);

    let citations: Vec<Citation> = match provided {
        Some(entries) if !entries.is_empty() => entries
            .iter()
            .filter_map(|entry| parse_source_entry(entry))
            .collect(),
        _ => extract_inline_citations(answer),
    };

    let mut valid_citations = 0;
    let mut invalid_citations = Vec::new();

    for citation in &citations {
        if is_valid_citation(citation, &available) {
            valid_citations += 1;
        } else {
            invalid_citations.push(citation.raw.clone());
        }
    }

    let cited: BTreeSet<&str> = citations.iter().map(|c| c.source.as_str()).collect();
    let missing_sources = available
        .keys()
        .filter(|source| !cited.contains(source.as_str()))
        .cloned()
        .collect();

    let total_citations = citations.len();
    let citation_accuracy = if total_citations > 0 {
        valid_citations as f64 / total_citations as f64
    } else {
        0.0
    };

    CitationAccuracy {
        total_citations,
        valid_citations,
        citation_accuracy,
        missing_sources,
        invalid_citations,
    }
}
