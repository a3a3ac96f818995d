//! Document endpoint bodies

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ingestion::IndexTarget;
use crate::domain::{DomainError, StoredDocumentInfo};
use crate::infrastructure::services::{IndexedFile, UploadedDocument};

/// POST /documents/upload response. `chunks_count` stays null since
/// uploading does not index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentUploadResponse {
    pub message: String,
    pub filename: Option<String>,
    pub chunks_count: Option<usize>,
    pub file_path: Option<String>,
}

impl From<UploadedDocument> for DocumentUploadResponse {
    fn from(uploaded: UploadedDocument) -> Self {
        Self {
            message: "File uploaded successfully".to_string(),
            filename: Some(uploaded.filename),
            chunks_count: None,
            file_path: Some(uploaded.key),
        }
    }
}

/// POST /documents/index body; exactly one field must be set
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentIndexRequest {
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
}

impl DocumentIndexRequest {
    pub fn into_target(self) -> Result<IndexTarget, DomainError> {
        IndexTarget::from_fields(self.file_path, self.filename)
    }
}

/// POST /documents/index response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentIndexResponse {
    pub message: String,
    pub filename: Option<String>,
    pub chunks_count: usize,
    pub file_path: String,
}

impl From<IndexedFile> for DocumentIndexResponse {
    fn from(indexed: IndexedFile) -> Self {
        Self {
            message: format!(
                "Successfully indexed {} document chunks",
                indexed.chunks_count
            ),
            filename: Some(indexed.filename),
            chunks_count: indexed.chunks_count,
            file_path: indexed.key,
        }
    }
}

/// GET /documents/list entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub key: String,
    pub size: Option<u64>,
    pub last_modified: Option<DateTime<Utc>>,
    pub original_filename: Option<String>,
    /// Link that serves the stored bytes
    pub url: String,
}

impl DocumentInfo {
    pub fn from_stored(info: StoredDocumentInfo, base_url: &str) -> Self {
        let url = format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            urlencoding::encode(&info.key)
        );

        Self {
            key: info.key,
            size: info.size,
            last_modified: info.last_modified,
            original_filename: Some(info.original_filename),
            url,
        }
    }
}
