//! Document store backed by a local directory

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::domain::document::{
    storage_key, validate_key, DocumentMetadata, DocumentStore, StoredDocumentInfo, StoredFile,
    METADATA_SUFFIX,
};
use crate::domain::DomainError;

/// Stores each upload as `{root}/{key}` with a JSON sidecar `{key}.meta`
#[derive(Debug, Clone)]
pub struct LocalDocumentStore {
    root: PathBuf,
}

impl LocalDocumentStore {
    /// Open the store, creating the directory when missing
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await.map_err(|e| {
            DomainError::storage(format!(
                "Failed to create upload directory {}: {}",
                root.display(),
                e
            ))
        })?;

        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn file_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    fn metadata_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}{METADATA_SUFFIX}"))
    }

    /// Sidecar contents; files stored without one report their key as name
    async fn read_metadata(&self, key: &str) -> DocumentMetadata {
        let fallback = || DocumentMetadata {
            original_filename: key.to_string(),
            content_type: mime_guess::from_path(key)
                .first_or_octet_stream()
                .to_string(),
        };

        match tokio::fs::read(self.metadata_path(key)).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                warn!(key = %key, error = %e, "Unreadable metadata sidecar");
                fallback()
            }),
            Err(_) => fallback(),
        }
    }
}

fn storage_error(action: &str, key: &str, error: std::io::Error) -> DomainError {
    if error.kind() == ErrorKind::NotFound {
        DomainError::not_found(format!("File '{key}' not found"))
    } else {
        DomainError::storage(format!("Failed to {action} '{key}': {error}"))
    }
}

#[async_trait]
impl DocumentStore for LocalDocumentStore {
    async fn put(
        &self,
        filename: &str,
        bytes: Vec<u8>,
        content_type: Option<String>,
    ) -> Result<String, DomainError> {
        let key = storage_key(filename);
        let metadata = DocumentMetadata {
            original_filename: filename.to_string(),
            content_type: content_type
                .filter(|ct| !ct.trim().is_empty())
                .unwrap_or_else(|| mime_guess::from_path(filename).first_or_octet_stream().to_string()),
        };

        let size = bytes.len();
        tokio::fs::write(self.file_path(&key), bytes)
            .await
            .map_err(|e| storage_error("write", &key, e))?;

        let sidecar = serde_json::to_vec(&metadata)
            .map_err(|e| DomainError::internal(format!("Failed to encode metadata: {e}")))?;
        tokio::fs::write(self.metadata_path(&key), sidecar)
            .await
            .map_err(|e| storage_error("write metadata for", &key, e))?;

        debug!(key = %key, filename = %filename, size, "Stored document");
        Ok(key)
    }

    async fn get(&self, key: &str) -> Result<StoredFile, DomainError> {
        validate_key(key)?;

        let bytes = tokio::fs::read(self.file_path(key))
            .await
            .map_err(|e| storage_error("read", key, e))?;
        let metadata = self.read_metadata(key).await;

        Ok(StoredFile {
            key: key.to_string(),
            bytes,
            metadata,
        })
    }

    async fn list(&self) -> Result<Vec<StoredDocumentInfo>, DomainError> {
        let mut entries = tokio::fs::read_dir(&self.root)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list uploads: {e}")))?;

        let mut files = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list uploads: {e}")))?
        {
            let key = entry.file_name().to_string_lossy().into_owned();
            if key.ends_with(METADATA_SUFFIX) {
                continue;
            }

            let Ok(info) = entry.metadata().await else {
                continue;
            };
            if !info.is_file() {
                continue;
            }

            let metadata = self.read_metadata(&key).await;
            files.push(StoredDocumentInfo {
                size: Some(info.len()),
                last_modified: info.modified().ok().map(DateTime::<Utc>::from),
                original_filename: metadata.original_filename,
                key,
            });
        }

        files.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(files)
    }

    fn store_type(&self) -> &'static str {
        "local"
    }
}
