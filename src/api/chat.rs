//! Chat endpoint handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use tracing::debug;

use super::state::AppState;
use super::types::{ApiError, ChatRequest, ChatResponse, Json};
use crate::domain::conversation::ConversationHistory;

/// Create chat router
pub fn create_chat_router() -> Router<AppState> {
    Router::new()
        .route("/", post(chat))
        .route(
            "/{conversation_id}",
            get(get_history).delete(clear_history),
        )
}

/// POST /chat
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    debug!(
        conversation_id = ?request.conversation_id,
        "Answering chat message"
    );

    let answer = state
        .rag
        .answer(&request.message, request.conversation_id.as_deref())
        .await?;

    Ok(Json(ChatResponse::from(answer)))
}

/// GET /chat/{conversation_id}
pub async fn get_history(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
) -> Result<Json<ConversationHistory>, ApiError> {
    let history = state.conversations.history(&conversation_id).await?;
    Ok(Json(history))
}

/// DELETE /chat/{conversation_id}
pub async fn clear_history(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.conversations.clear(&conversation_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
