//! Document service - upload, extraction, chunking and indexing

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::domain::document::{DocumentStore, StoredDocumentInfo, StoredFile};
use crate::domain::ingestion::{
    validate_file_upload, Chunk, Chunker, DocumentFormat, ExtractedText, IndexTarget,
    PageNumberInferencer, FILE_UPLOAD_TAG,
};
use crate::domain::retrieval::{
    aggregate_by_source, ids_for_source, IndexedDocument, VectorIndex, VectorRecord,
};
use crate::domain::{DomainError, Embedder};
use crate::infrastructure::ingestion::ParserFactory;

/// A file accepted into the document store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedDocument {
    pub key: String,
    pub filename: String,
}

/// Outcome of indexing one stored file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexedFile {
    pub key: String,
    pub filename: String,
    pub chunks_count: usize,
}

/// Chunks removed for one source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemovedDocument {
    pub source: String,
    pub deleted_chunks: usize,
}

/// Moves documents from upload to the vector index
pub struct DocumentService {
    store: Arc<dyn DocumentStore>,
    index: Arc<dyn VectorIndex>,
    embedder: Arc<dyn Embedder>,
    chunker: Chunker,
    inferencer: PageNumberInferencer,
    max_upload_bytes: usize,
    /// Serializes writes so concurrent re-indexes of one source cannot interleave
    index_lock: Mutex<()>,
}

impl std::fmt::Debug for DocumentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentService")
            .field("store", &self.store.store_type())
            .field("index", &self.index.index_type())
            .field("chunker", &self.chunker)
            .finish()
    }
}

impl DocumentService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        index: Arc<dyn VectorIndex>,
        embedder: Arc<dyn Embedder>,
        chunker: Chunker,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            store,
            index,
            embedder,
            chunker: chunker.with_upload_tag(FILE_UPLOAD_TAG),
            inferencer: PageNumberInferencer::default(),
            max_upload_bytes,
            index_lock: Mutex::new(()),
        }
    }

    pub fn with_inferencer(mut self, inferencer: PageNumberInferencer) -> Self {
        self.inferencer = inferencer;
        self
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    /// Validate and store an upload without indexing it
    pub async fn upload(
        &self,
        filename: Option<&str>,
        bytes: Vec<u8>,
        content_type: Option<String>,
    ) -> Result<UploadedDocument, DomainError> {
        validate_file_upload(filename, bytes.len(), self.max_upload_bytes)?;
        let filename = filename.map(str::trim).unwrap_or_default().to_string();

        let key = self.store.put(&filename, bytes, content_type).await?;
        info!(key = %key, filename = %filename, "Uploaded document");

        Ok(UploadedDocument { key, filename })
    }

    /// Files in the document store
    pub async fn list_files(&self) -> Result<Vec<StoredDocumentInfo>, DomainError> {
        self.store.list().await
    }

    /// A stored file by key, falling back to a lookup by original filename
    pub async fn get_file(&self, key: &str) -> Result<StoredFile, DomainError> {
        match self.store.get(key).await {
            Err(DomainError::NotFound { .. }) => {
                let stored = self.find_by_filename(key).await?;
                self.store.get(&stored.key).await
            }
            result => result,
        }
    }

    /// Index a stored file, replacing any chunks previously indexed for it
    pub async fn index(&self, target: IndexTarget) -> Result<IndexedFile, DomainError> {
        let key = match target {
            IndexTarget::FilePath(key) => key,
            IndexTarget::Filename(filename) => self.find_by_filename(&filename).await?.key,
        };

        let file = self.store.get(&key).await?;
        let filename = file.metadata.original_filename.clone();
        let format = validate_file_upload(Some(&filename), file.bytes.len(), self.max_upload_bytes)?;

        let chunks = self.chunk_document(&filename, format, file.bytes).await?;
        let chunks_count = self.index_chunks(&filename, chunks).await?;

        info!(key = %key, source = %filename, chunks = chunks_count, "Indexed document");

        Ok(IndexedFile {
            key,
            filename,
            chunks_count,
        })
    }

    /// Extract text from raw bytes and chunk it; PDFs are chunked per page
    pub async fn chunk_document(
        &self,
        source: &str,
        format: DocumentFormat,
        bytes: Vec<u8>,
    ) -> Result<Vec<Chunk>, DomainError> {
        let parser = ParserFactory::create(format);
        let extracted = tokio::task::spawn_blocking(move || parser.parse(&bytes))
            .await
            .map_err(|e| DomainError::internal(format!("Extraction task failed: {}", e)))??;

        let chunks = match extracted {
            ExtractedText::Plain(text) => self.chunker.chunk_text(source, &text),
            ExtractedText::Paged(pages) => {
                self.chunker
                    .chunk_raw_pages(source, pages, &self.inferencer)?
            }
        };

        if chunks.is_empty() {
            return Err(DomainError::validation(
                "No content could be extracted from the file",
            ));
        }

        debug!(source = %source, chunks = chunks.len(), "Chunked document");
        Ok(chunks)
    }

    /// Embed chunks and write them to the index under `{source}:{sequence_index}`.
    ///
    /// The previous chunks of `source` stay in place until the new ones are
    /// written; only the ids the new set no longer covers are removed.
    pub async fn index_chunks(&self, source: &str, chunks: Vec<Chunk>) -> Result<usize, DomainError> {
        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let vectors = self.embedder.embed_many(&texts).await?;
        if vectors.len() != chunks.len() {
            return Err(DomainError::internal(format!(
                "Embedder returned {} vectors for {} chunks",
                vectors.len(),
                chunks.len()
            )));
        }

        let indexed_at = Utc::now();
        let records: Vec<VectorRecord> = chunks
            .into_iter()
            .zip(vectors)
            .map(|(chunk, vector)| VectorRecord {
                id: chunk.id(),
                vector,
                metadata: chunk.to_metadata(indexed_at),
                text: chunk.content,
            })
            .collect();
        let fresh: HashSet<String> = records.iter().map(|r| r.id.clone()).collect();

        let _guard = self.index_lock.lock().await;
        let written = self.index.upsert(records).await?;

        let entries = self.index.list_all().await?;
        let stale: Vec<String> = ids_for_source(&entries, source)
            .into_iter()
            .filter(|id| !fresh.contains(id))
            .collect();
        if !stale.is_empty() {
            let removed = self.index.delete(&stale).await?;
            debug!(source = %source, removed, "Removed stale chunks");
        }

        Ok(written)
    }

    /// Indexed documents grouped by source
    pub async fn list_indexed(&self) -> Result<Vec<IndexedDocument>, DomainError> {
        let entries = self.index.list_all().await?;
        Ok(aggregate_by_source(&entries))
    }

    /// Remove every indexed chunk of a source
    pub async fn remove_indexed(&self, source: &str) -> Result<RemovedDocument, DomainError> {
        let deleted_chunks = {
            let _guard = self.index_lock.lock().await;
            self.delete_source(source).await?
        };
        if deleted_chunks == 0 {
            return Err(DomainError::not_found(format!(
                "No indexed chunks found for source '{}'",
                source
            )));
        }

        info!(source = %source, deleted_chunks, "Removed indexed document");

        Ok(RemovedDocument {
            source: source.to_string(),
            deleted_chunks,
        })
    }

    async fn delete_source(&self, source: &str) -> Result<usize, DomainError> {
        let entries = self.index.list_all().await?;
        let ids = ids_for_source(&entries, source);
        if ids.is_empty() {
            return Ok(0);
        }

        self.index.delete(&ids).await
    }

    async fn find_by_filename(&self, filename: &str) -> Result<StoredDocumentInfo, DomainError> {
        self.store
            .list()
            .await?
            .into_iter()
            .find(|f| f.original_filename == filename)
            .ok_or_else(|| {
                DomainError::not_found(format!(
                    "File with filename '{}' not found. Use /documents/list to see available files.",
                    filename
                ))
            })
    }
}
