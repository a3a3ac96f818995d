//! Stored source documents

mod entity;
mod repository;

pub use entity::{
    sanitize_stem, storage_key, validate_key, DocumentMetadata, StoredDocumentInfo, StoredFile,
    DEFAULT_CONTENT_TYPE, METADATA_SUFFIX,
};
pub use repository::DocumentStore;

#[cfg(test)]
pub use repository::MockDocumentStore;
