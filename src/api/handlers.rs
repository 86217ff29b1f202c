//! API handlers

use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use axum::Json;
use tracing::info;

use crate::api::types::ApiResponse;
use crate::api::types::AskRequest;
use crate::api::types::AskResponse;
use crate::api::types::HealthResponse;
use crate::api::Assistant;

/// Shared application state: the long-lived assistant handle.
#[derive(Clone)]
pub struct AppState {
    pub assistant: Arc<Assistant>,
}

const INDEX_HTML: &str = include_str!("index.html");

/// Single-page query form
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Health check
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Answer a legal query.
///
/// Always answers 200: both retrieval and generation failures degrade to
/// substitute values inside the pipeline, so there is no error branch here.
pub async fn ask(
    State(state): State<AppState>,
    Json(req): Json<AskRequest>,
) -> Json<ApiResponse<AskResponse>> {
    info!("POST /api/ask: {}", req.query);

    let answer = state.assistant.answer(&req.query).await;
    Json(ApiResponse::success(AskResponse { answer }))
}
