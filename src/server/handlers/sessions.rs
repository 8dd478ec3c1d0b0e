use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::core::errors::ApiError;
use crate::state::AppState;

pub async fn create_session(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let (session_id, messages) = state.sessions.create().await;
    Json(json!({
        "session_id": session_id,
        "messages": messages
    }))
}

pub async fn get_session_messages(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let messages = state.sessions.messages(&session_id).await?;
    Ok(Json(json!({ "messages": messages })))
}

pub async fn reset_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.sessions.reset(&session_id).await?;
    Ok(Json(json!({ "success": true })))
}
