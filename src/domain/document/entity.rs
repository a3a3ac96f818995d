//! Stored document entities and key rules

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::DomainError;

/// Suffix of the metadata sidecar written next to each stored file
pub const METADATA_SUFFIX: &str = ".meta";

/// Content type used when none is known
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

static UNSAFE_KEY_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_.-]").unwrap());

/// Metadata kept alongside a stored file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub original_filename: String,
    #[serde(default = "default_content_type")]
    pub content_type: String,
}

fn default_content_type() -> String {
    DEFAULT_CONTENT_TYPE.to_string()
}

/// Listing entry for a stored file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredDocumentInfo {
    pub key: String,
    pub size: Option<u64>,
    pub last_modified: Option<DateTime<Utc>>,
    pub original_filename: String,
}

/// A stored file with its bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub key: String,
    pub bytes: Vec<u8>,
    pub metadata: DocumentMetadata,
}

/// Replace characters outside `[A-Za-z0-9_.-]` with `_`
pub fn sanitize_stem(stem: &str) -> String {
    let sanitized = UNSAFE_KEY_CHARS.replace_all(stem, "_").replace("..", "__");
    if sanitized.is_empty() {
        "file".to_string()
    } else {
        sanitized
    }
}

/// Build a unique storage key `{sanitized_stem}-{uuid}{ext}` for a filename
pub fn storage_key(filename: &str) -> String {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let (stem, ext) = match base.rfind('.') {
        Some(idx) if idx > 0 => (&base[..idx], &base[idx..]),
        _ => (base, ""),
    };

    format!(
        "{}-{}{}",
        sanitize_stem(stem),
        Uuid::new_v4().simple(),
        UNSAFE_KEY_CHARS.replace_all(ext, "_")
    )
}

/// Reject keys that could escape the storage root
pub fn validate_key(key: &str) -> Result<(), DomainError> {
    if key.trim().is_empty() {
        return Err(DomainError::validation("File key is required"));
    }

    if key.contains('/') || key.contains('\\') || key.contains("..") {
        return Err(DomainError::validation(format!("Invalid file key: {key}")));
    }

    Ok(())
}
