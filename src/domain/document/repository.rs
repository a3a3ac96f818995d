//! Document store trait

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::{StoredDocumentInfo, StoredFile};
use crate::domain::error::DomainError;

/// Byte-level storage for uploaded documents
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Stores the bytes under a fresh key and returns that key
    async fn put(
        &self,
        filename: &str,
        bytes: Vec<u8>,
        content_type: Option<String>,
    ) -> Result<String, DomainError>;

    /// Reads a stored file and its metadata
    async fn get(&self, key: &str) -> Result<StoredFile, DomainError>;

    /// Lists stored files, excluding metadata sidecars
    async fn list(&self) -> Result<Vec<StoredDocumentInfo>, DomainError>;

    /// Name of the store implementation
    fn store_type(&self) -> &'static str;
}
