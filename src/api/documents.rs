//! Document endpoint handlers

use axum::{
    body::Body,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use tracing::{debug, info};

use super::state::AppState;
use super::types::{
    ApiError, DocumentIndexRequest, DocumentIndexResponse, DocumentInfo, DocumentUploadResponse,
    Json,
};
use crate::domain::retrieval::IndexedDocument;
use crate::infrastructure::services::RemovedDocument;

/// Headroom for multipart boundaries and part headers
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Create documents router; uploads may be as large as `max_upload_bytes`
pub fn create_documents_router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/list", get(list_documents))
        .route(
            "/upload",
            post(upload_document).layer(DefaultBodyLimit::max(
                max_upload_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES),
            )),
        )
        .route("/index", post(index_document))
        .route("/indexed", get(list_indexed_documents))
        .route("/indexed/{source}", delete(delete_indexed_document))
        .route("/files/{key}", get(get_document_file))
}

/// GET /documents/list
pub async fn list_documents(
    State(state): State<AppState>,
) -> Result<Json<Vec<DocumentInfo>>, ApiError> {
    let files = state.documents.list_files().await?;

    let documents = files
        .into_iter()
        .map(|info| DocumentInfo::from_stored(info, &state.document_base_url))
        .collect();

    Ok(Json(documents))
}

/// POST /documents/upload
///
/// Expects a multipart form with a `file` part. The file is stored but not
/// indexed.
pub async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<DocumentUploadResponse>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Failed to read multipart field: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to read uploaded file: {}", e)))?;

        debug!(filename = ?filename, size = bytes.len(), "Received upload");

        let uploaded = state
            .documents
            .upload(filename.as_deref(), bytes.to_vec(), content_type)
            .await?;

        return Ok(Json(DocumentUploadResponse::from(uploaded)));
    }

    Err(ApiError::bad_request("No file provided").with_param("file"))
}

/// POST /documents/index
pub async fn index_document(
    State(state): State<AppState>,
    Json(request): Json<DocumentIndexRequest>,
) -> Result<Json<DocumentIndexResponse>, ApiError> {
    let target = request.into_target()?;
    let indexed = state.documents.index(target).await?;

    info!(
        key = %indexed.key,
        chunks = indexed.chunks_count,
        "Indexed document via API"
    );

    Ok(Json(DocumentIndexResponse::from(indexed)))
}

/// GET /documents/indexed
pub async fn list_indexed_documents(
    State(state): State<AppState>,
) -> Result<Json<Vec<IndexedDocument>>, ApiError> {
    Ok(Json(state.documents.list_indexed().await?))
}

/// DELETE /documents/indexed/{source}
pub async fn delete_indexed_document(
    State(state): State<AppState>,
    Path(source): Path<String>,
) -> Result<Json<RemovedDocument>, ApiError> {
    Ok(Json(state.documents.remove_indexed(&source).await?))
}

/// GET /documents/files/{key}
pub async fn get_document_file(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Response, ApiError> {
    let file = state.documents.get_file(&key).await?;

    let content_type = HeaderValue::from_str(&file.metadata.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
    let disposition = format!(
        "inline; filename*=UTF-8''{}",
        urlencoding::encode(&file.metadata.original_filename)
    );

    let mut response = Body::from(file.bytes).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, content_type);
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }

    Ok(response)
}
