//! Document ingestion infrastructure
//!
//! Parsers that turn uploaded bytes into text, one per supported format.

pub mod factory;
pub mod parsers;

pub use factory::ParserFactory;
pub use parsers::{DocxParser, PdfParser, PlainTextParser};
