use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use serde_json::{json, Value};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use super::chat::create_chat_router;
use super::documents::create_documents_router;
use super::evaluation::create_evaluation_router;
use super::health;
use super::state::AppState;
use super::types::Json;
use crate::config::ServerConfig;

/// Create the full router with application state
pub fn create_router(state: AppState, server: &ServerConfig) -> Router {
    let max_upload_bytes = state.documents.max_upload_bytes();

    Router::new()
        .route("/", get(root))
        // Health endpoints (no state needed except readiness)
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::ready_check))
        .route("/health/live", get(health::live_check))
        .nest("/chat", create_chat_router())
        .nest("/documents", create_documents_router(max_upload_bytes))
        .nest("/evaluation", create_evaluation_router())
        .with_state(state)
        .layer(cors_layer(server))
        .layer(TraceLayer::new_for_http())
}

/// GET /
async fn root() -> Json<Value> {
    Json(json!({
        "message": "RAG Chat Bot API",
        "version": env!("CARGO_PKG_VERSION"),
        "docs": "/health",
    }))
}

/// Any origin when configured with `*`; otherwise only the listed origins,
/// with credentials allowed
fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let Some(origins) = server.allowed_origins() else {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    };

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, Response, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::domain::llm::MockLanguageModel;
    use crate::domain::{
        Chunker, ChunkingConfig, CitationAttributor, GroundingEvaluator, Retriever,
    };
    use crate::infrastructure::conversation::InMemoryConversationStore;
    use crate::infrastructure::document_store::LocalDocumentStore;
    use crate::infrastructure::embedding::HashEmbedder;
    use crate::infrastructure::services::{
        ConversationService, DocumentService, EvaluationService, RagService,
    };
    use crate::infrastructure::vector_index::InMemoryVectorIndex;

    const BOUNDARY: &str = "archive-rag-test-boundary";
    const REPLY: &str = "The treaty was signed in 1815 [Source: treaty.txt, Page: ?].";

    struct TestApp {
        _dir: tempfile::TempDir,
        router: Router,
    }

    async fn test_app_with(server: ServerConfig) -> TestApp {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(LocalDocumentStore::new(dir.path()).await.unwrap());
        let index = Arc::new(InMemoryVectorIndex::new());
        let embedder = Arc::new(HashEmbedder::new(64).unwrap());

        let documents = DocumentService::new(
            store,
            index.clone(),
            embedder.clone(),
            Chunker::new(ChunkingConfig::new(200, 20)).unwrap(),
            1024 * 1024,
        );

        let conversations = Arc::new(ConversationService::new(
            Arc::new(InMemoryConversationStore::new()),
            10,
        ));
        let rag = Arc::new(RagService::new(
            Retriever::new(embedder, index),
            Arc::new(MockLanguageModel::new(REPLY)),
            conversations,
            CitationAttributor::new("/documents/files"),
        ));
        let evaluation = EvaluationService::new(GroundingEvaluator::default(), rag.clone());

        let state = AppState::new(
            rag,
            Arc::new(documents),
            Arc::new(evaluation),
            "/documents/files",
        );

        TestApp {
            _dir: dir,
            router: create_router(state, &server),
        }
    }

    async fn test_app() -> TestApp {
        test_app_with(ServerConfig::default()).await
    }

    async fn send(router: &Router, request: Request<Body>) -> Response<Body> {
        router.clone().oneshot(request).await.unwrap()
    }

    async fn body_json(response: Response<Body>) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn delete(uri: &str) -> Request<Body> {
        Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn upload(filename: &str, content: &str) -> Request<Body> {
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{f}\"\r\n\
             Content-Type: text/plain\r\n\r\n{c}\r\n--{b}--\r\n",
            b = BOUNDARY,
            f = filename,
            c = content
        );

        Request::builder()
            .method("POST")
            .uri("/documents/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn upload_and_index(router: &Router, filename: &str, content: &str) -> Value {
        let response = send(router, upload(filename, content)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = send(
            router,
            post_json("/documents/index", json!({ "filename": filename })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        body_json(response).await
    }

    #[tokio::test]
    async fn test_health_and_root() {
        let app = test_app().await;

        let response = send(&app.router, get("/health")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");

        let response = send(&app.router, get("/health/ready")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["checks"].as_array().unwrap().len(), 2);

        let response = send(&app.router, get("/health/live")).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = send(&app.router, get("/")).await;
        assert_eq!(body_json(response).await["message"], "RAG Chat Bot API");
    }

    #[tokio::test]
    async fn test_upload_index_and_chat() {
        let app = test_app().await;

        let indexed = upload_and_index(
            &app.router,
            "treaty.txt",
            "The treaty was signed in 1815 at the congress in Vienna.",
        )
        .await;
        assert_eq!(indexed["chunks_count"], 1);
        assert_eq!(indexed["message"], "Successfully indexed 1 document chunks");

        let response = send(
            &app.router,
            post_json("/chat", json!({ "message": "When was the treaty signed?" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["response"], REPLY);
        assert_eq!(body["sources"][0], "treaty.txt");
        let conversation_id = body["conversation_id"].as_str().unwrap().to_string();

        let response = send(&app.router, get(&format!("/chat/{}", conversation_id))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let history = body_json(response).await;
        assert_eq!(history["messages"].as_array().unwrap().len(), 2);
        assert_eq!(history["messages"][0]["role"], "user");

        let response = send(&app.router, delete(&format!("/chat/{}", conversation_id))).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_upload_response_and_listing() {
        let app = test_app().await;

        let response = send(&app.router, upload("notes.txt", "Harvest records.")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["message"], "File uploaded successfully");
        assert_eq!(body["filename"], "notes.txt");
        assert!(body["chunks_count"].is_null());
        let key = body["file_path"].as_str().unwrap().to_string();

        let response = send(&app.router, get("/documents/list")).await;
        let listing = body_json(response).await;
        assert_eq!(listing[0]["key"], key.as_str());
        assert_eq!(listing[0]["original_filename"], "notes.txt");

        let response = send(&app.router, get(&format!("/documents/files/{}", key))).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/plain");
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"Harvest records.");
    }

    #[tokio::test]
    async fn test_unsupported_upload_is_bad_request() {
        let app = test_app().await;

        let response = send(&app.router, upload("tool.exe", "MZ")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["type"], "invalid_request_error");
    }

    #[tokio::test]
    async fn test_index_request_validation() {
        let app = test_app().await;

        let response = send(
            &app.router,
            post_json(
                "/documents/index",
                json!({ "file_path": "a.txt", "filename": "a.txt" }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(
            &app.router,
            post_json("/documents/index", json!({ "filename": "missing.pdf" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_indexed_listing_and_delete() {
        let app = test_app().await;
        upload_and_index(&app.router, "minutes 1848.txt", "Council minutes.").await;

        let response = send(&app.router, get("/documents/indexed")).await;
        let indexed = body_json(response).await;
        assert_eq!(indexed[0]["source"], "minutes 1848.txt");
        assert_eq!(indexed[0]["chunks_count"], 1);

        let response = send(&app.router, delete("/documents/indexed/minutes%201848.txt")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let removed = body_json(response).await;
        assert_eq!(removed["deleted_chunks"], 1);

        let response = send(&app.router, delete("/documents/indexed/minutes%201848.txt")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_blank_chat_message_is_rejected() {
        let app = test_app().await;

        let response = send(&app.router, post_json("/chat", json!({ "message": "  " }))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["message"], "Message cannot be empty");
    }

    #[tokio::test]
    async fn test_unknown_conversation_is_not_found() {
        let app = test_app().await;

        let response = send(&app.router, get("/chat/does-not-exist")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_evaluate_endpoint() {
        let app = test_app().await;

        let request = json!({
            "query": "When was the treaty signed?",
            "answer": "The treaty was signed in 1815.",
            "context_chunks": [{
                "text": "The treaty was signed in 1815 at the congress.",
                "metadata": { "source": "treaty.pdf", "page": 12 },
                "similarity": 0.81
            }],
            "sources": ["treaty.pdf (Page 12)"]
        });

        let response = send(&app.router, post_json("/evaluation/evaluate", request)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["metrics"]["citation_accuracy"]["citation_accuracy"], 1.0);
        assert_eq!(body["metrics"]["overall_score"], 0.962);
    }

    #[tokio::test]
    async fn test_evaluate_chat_without_context_is_bad_request() {
        let app = test_app().await;

        let request = Request::builder()
            .method("POST")
            .uri("/evaluation/evaluate-chat?query=When%20was%20the%20treaty%20signed%3F")
            .body(Body::empty())
            .unwrap();

        let response = send(&app.router, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(
            body["error"]["message"],
            "No context chunks retrieved. Cannot evaluate response."
        );
    }

    #[tokio::test]
    async fn test_evaluate_chat_with_context() {
        let app = test_app().await;
        upload_and_index(
            &app.router,
            "treaty.txt",
            "The treaty was signed in 1815 at the congress in Vienna.",
        )
        .await;

        let request = Request::builder()
            .method("POST")
            .uri("/evaluation/evaluate-chat?query=When%20was%20the%20treaty%20signed%3F")
            .body(Body::empty())
            .unwrap();

        let response = send(&app.router, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["answer"], REPLY);
        assert!(body["metrics"]["overall_score"].as_f64().is_some());
    }

    #[tokio::test]
    async fn test_cors_allows_listed_origin() {
        let server = ServerConfig {
            cors_origins: "http://localhost:3000".to_string(),
            ..ServerConfig::default()
        };
        let app = test_app_with(server).await;

        let request = Request::builder()
            .method("OPTIONS")
            .uri("/chat")
            .header(header::ORIGIN, "http://localhost:3000")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();

        let response = send(&app.router, request).await;
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:3000"
        );
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS],
            "true"
        );
    }
}
