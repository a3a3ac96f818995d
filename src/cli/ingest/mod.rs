//! Ingest command - stores and indexes a single local file

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::config::AppConfig;
use crate::domain::ingestion::IndexTarget;
use crate::infrastructure::services::IndexedFile;
use crate::infrastructure::vector_index::InMemoryVectorIndex;

/// Ingest `path` and print the outcome as JSON.
///
/// The vector index lives in memory, so the chunks only last for this run;
/// the stored copy stays in the upload directory.
pub async fn run(path: &Path) -> anyhow::Result<()> {
    let config = super::bootstrap()?;

    let indexed = ingest_file(&config, path).await?;
    println!("{}", serde_json::to_string_pretty(&indexed)?);

    Ok(())
}

pub async fn ingest_file(config: &AppConfig, path: &Path) -> anyhow::Result<IndexedFile> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| anyhow::anyhow!("{} has no file name", path.display()))?;

    let embedder = crate::create_embedder(config)?;
    let index = Arc::new(InMemoryVectorIndex::new());
    let documents = crate::create_document_service(config, index, embedder).await?;

    let uploaded = documents.upload(Some(filename.as_str()), bytes, None).await?;
    let indexed = documents.index(IndexTarget::FilePath(uploaded.key)).await?;

    info!(
        filename = %indexed.filename,
        chunks = indexed.chunks_count,
        "Ingested file"
    );
    Ok(indexed)
}
