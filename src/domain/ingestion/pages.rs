//! Printed page-number recovery for paginated documents
//!
//! Physical page order in a PDF and the numbers printed on the pages often
//! diverge (front matter, foldouts, reprints). Each page is scanned for a
//! printed number near its top and bottom; pages without one fall back to
//! their physical index, and a consistent global shift observed on the
//! readable pages is then applied to those fallbacks.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Largest page number accepted from page text
pub const MAX_PAGE_NUMBER: u32 = 10_000;

/// Tunables for page-number inference
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageInferenceConfig {
    /// Non-empty lines scanned at the top and at the bottom of each page
    pub scan_lines: usize,
    pub max_page_number: u32,
    /// Mean offsets with magnitude at or below this are treated as noise
    pub min_offset: f64,
    /// Mean offsets with magnitude at or above this are treated as a renumbering
    pub max_offset: f64,
}

impl Default for PageInferenceConfig {
    fn default() -> Self {
        Self {
            scan_lines: 10,
            max_page_number: MAX_PAGE_NUMBER,
            min_offset: 0.5,
            max_offset: 20.0,
        }
    }
}

impl PageInferenceConfig {
    pub fn with_offset_bounds(mut self, min_offset: f64, max_offset: f64) -> Self {
        self.min_offset = min_offset;
        self.max_offset = max_offset;
        self
    }
}

/// A named page-number pattern and the validator for its captures
pub struct PagePattern {
    pub name: &'static str,
    regex: Regex,
    extract: fn(&Captures<'_>) -> Option<u32>,
}

impl PagePattern {
    fn new(name: &'static str, pattern: &str, extract: fn(&Captures<'_>) -> Option<u32>) -> Self {
        Self {
            name,
            regex: Regex::new(pattern).unwrap(),
            extract,
        }
    }

    /// Page number in `line`, if this pattern matches and its validator accepts
    pub fn match_line(&self, line: &str) -> Option<u32> {
        self.regex.captures(line).and_then(|caps| (self.extract)(&caps))
    }
}

impl std::fmt::Debug for PagePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PagePattern")
            .field("name", &self.name)
            .field("regex", &self.regex.as_str())
            .finish()
    }
}

fn first_number(caps: &Captures<'_>) -> Option<u32> {
    caps.get(1)?.as_str().parse().ok()
}

fn number_within_total(caps: &Captures<'_>) -> Option<u32> {
    let number: u32 = caps.get(1)?.as_str().parse().ok()?;
    let total: u32 = caps.get(2)?.as_str().parse().ok()?;
    (number <= total).then_some(number)
}

/// Page-number patterns in evaluation order
pub static PAGE_PATTERNS: Lazy<Vec<PagePattern>> = Lazy::new(|| {
    vec![
        PagePattern::new("labeled", r"(?i)\bpage\s+(\d{1,5})\b", first_number),
        PagePattern::new("abbreviated", r"(?i)(?:^|\s)p\.\s*(\d{1,5})\b", first_number),
        PagePattern::new("pg", r"(?i)\bpg\.?\s*(\d{1,5})\b", first_number),
        PagePattern::new("bare", r"^\s*(\d{1,5})\s*$", first_number),
        PagePattern::new(
            "of_total",
            r"(?i)\b(\d{1,5})\s+of\s+(\d{1,5})\b",
            number_within_total,
        ),
        PagePattern::new("dashed", r"^\s*[-–—]\s*(\d{1,5})\s*[-–—]\s*$", first_number),
        PagePattern::new("parenthesized", r"^\s*\((\d{1,5})\)\s*$", first_number),
        PagePattern::new("bracketed", r"^\s*\[(\d{1,5})\]\s*$", first_number),
    ]
});

/// How a page's number was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageNumberSource {
    /// Read from the page text by the named pattern
    Extracted { pattern: &'static str },
    /// Physical index, no number found
    Fallback,
    /// Physical index shifted by the document-wide offset
    OffsetCorrected,
}

/// Raw text of one physical page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPage {
    /// 1-based physical page index
    pub physical_index: u32,
    pub text: String,
}

impl RawPage {
    pub fn new(physical_index: u32, text: impl Into<String>) -> Self {
        Self {
            physical_index,
            text: text.into(),
        }
    }

    /// Pages numbered by position, for extractors that never skip pages
    pub fn from_texts<I, S>(texts: I) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        texts
            .into_iter()
            .zip(1u32..)
            .map(|(text, index)| Self::new(index, text))
            .collect()
    }
}

/// A page with its inferred human page number; `None` when even the
/// physical index lies outside the accepted range
#[derive(Debug, Clone, PartialEq)]
pub struct InferredPage {
    pub physical_index: u32,
    pub page: Option<u32>,
    pub source: PageNumberSource,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct PageNumberInferencer {
    config: PageInferenceConfig,
}

impl PageNumberInferencer {
    pub fn new(config: PageInferenceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PageInferenceConfig {
        &self.config
    }

    /// Find a printed page number in the header or footer lines of `text`.
    ///
    /// Patterns are tried in order and pattern order takes precedence over
    /// position: a footer `Page 31` beats a bare header `1815`. Within one
    /// pattern the header lines are scanned before the footer lines.
    pub fn extract_page_number(&self, text: &str) -> Option<(u32, &'static str)> {
        let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        let n = self.config.scan_lines;
        let header = &lines[..lines.len().min(n)];
        let footer = &lines[lines.len().saturating_sub(n)..];

        PAGE_PATTERNS.iter().find_map(|pattern| {
            header
                .iter()
                .chain(footer.iter())
                .filter_map(|line| pattern.match_line(line))
                .find(|number| (1..=self.config.max_page_number).contains(number))
                .map(|number| (number, pattern.name))
        })
    }

    /// Assign every page a page number.
    ///
    /// Fails only when no page carries any text at all.
    pub fn infer(&self, pages: Vec<RawPage>) -> Result<Vec<InferredPage>, DomainError> {
        if pages.iter().all(|p| p.text.trim().is_empty()) {
            return Err(DomainError::extraction(
                "No text content could be extracted from the document (possibly image-only)",
            ));
        }

        let mut inferred: Vec<InferredPage> = pages
            .into_iter()
            .map(|raw| match self.extract_page_number(&raw.text) {
                Some((page, pattern)) => InferredPage {
                    physical_index: raw.physical_index,
                    page: Some(page),
                    source: PageNumberSource::Extracted { pattern },
                    text: raw.text,
                },
                None => InferredPage {
                    physical_index: raw.physical_index,
                    page: self.accepted(raw.physical_index),
                    source: PageNumberSource::Fallback,
                    text: raw.text,
                },
            })
            .collect();

        if let Some(offset) = self.consistent_offset(&inferred) {
            for page in inferred
                .iter_mut()
                .filter(|p| p.source == PageNumberSource::Fallback)
            {
                let corrected = i64::from(page.physical_index) + offset;
                if corrected >= 1 && corrected <= i64::from(self.config.max_page_number) {
                    page.page = Some(corrected as u32);
                    page.source = PageNumberSource::OffsetCorrected;
                }
            }
        }

        Ok(inferred)
    }

    fn accepted(&self, number: u32) -> Option<u32> {
        Some(number).filter(|n| (1..=self.config.max_page_number).contains(n))
    }

    /// Rounded mean offset of extracted numbers from physical indices, when
    /// its magnitude lies strictly inside the configured bounds
    fn consistent_offset(&self, pages: &[InferredPage]) -> Option<i64> {
        let offsets: Vec<f64> = pages
            .iter()
            .filter_map(|p| match (p.source, p.page) {
                (PageNumberSource::Extracted { .. }, Some(page)) => {
                    Some(f64::from(page) - f64::from(p.physical_index))
                }
                _ => None,
            })
            .collect();

        if offsets.is_empty() {
            return None;
        }

        let mean = offsets.iter().sum::<f64>() / offsets.len() as f64;
        let magnitude = mean.abs();

        (magnitude > self.config.min_offset && magnitude < self.config.max_offset)
            .then(|| mean.round() as i64)
    }
}
