//! Evaluation endpoint handlers

use axum::{
    extract::{Query, State},
    routing::post,
    Router,
};
use serde::Deserialize;

use super::state::AppState;
use super::types::{ApiError, Json};
use crate::domain::{EvaluationRequest, EvaluationResponse};

/// Query string of POST /evaluation/evaluate-chat
#[derive(Debug, Deserialize)]
pub struct EvaluateChatQuery {
    pub query: String,
}

/// Create evaluation router
pub fn create_evaluation_router() -> Router<AppState> {
    Router::new()
        .route("/evaluate", post(evaluate_response))
        .route("/evaluate-chat", post(evaluate_chat_response))
}

/// POST /evaluation/evaluate
pub async fn evaluate_response(
    State(state): State<AppState>,
    Json(request): Json<EvaluationRequest>,
) -> Json<EvaluationResponse> {
    Json(state.evaluation.evaluate(&request))
}

/// POST /evaluation/evaluate-chat?query=
///
/// Runs the chat pipeline in a fresh conversation and scores its answer.
pub async fn evaluate_chat_response(
    State(state): State<AppState>,
    Query(params): Query<EvaluateChatQuery>,
) -> Result<Json<EvaluationResponse>, ApiError> {
    Ok(Json(state.evaluation.evaluate_chat(&params.query).await?))
}
