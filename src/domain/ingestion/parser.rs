//! Document parser trait and types

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use super::pages::RawPage;
use crate::domain::DomainError;

/// Supported upload formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    PlainText,
    Markdown,
    Pdf,
    Docx,
}

impl DocumentFormat {
    pub fn is_paginated(&self) -> bool {
        matches!(self, Self::Pdf)
    }
}

/// Text pulled out of a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractedText {
    /// Unpaginated text (plain text, markdown)
    Plain(String),
    /// One entry per physical page that yielded text
    Paged(Vec<RawPage>),
}

impl ExtractedText {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Plain(text) => text.trim().is_empty(),
            Self::Paged(pages) => pages.iter().all(|p| p.text.trim().is_empty()),
        }
    }
}

/// Extracts text from raw document bytes.
///
/// Parsing is CPU-bound and synchronous; async callers should run it on a
/// blocking thread.
pub trait DocumentParser: Send + Sync + Debug {
    /// Formats this parser handles
    fn supported_formats(&self) -> &[DocumentFormat];

    /// Extract text from the given bytes
    fn parse(&self, bytes: &[u8]) -> Result<ExtractedText, DomainError>;
}
