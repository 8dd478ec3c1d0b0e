use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::core::errors::ApiError;
use crate::pipeline;
use crate::state::AppState;

const HELP_TEXT: &str = "**사용법:**\n1. 에러 코드나 증상을 입력하세요\n2. AI가 관련 정보를 검색하여 해결책을 제공합니다\n3. 사이드바에서 실시간 시스템 상태를 확인하세요";

#[derive(Debug, Deserialize)]
pub struct ChatTurnRequest {
    pub message: String,
}

/// One user turn: retrieve, generate, append the exchange to the session,
/// and return the reply with the raw matches for the detail cards.
pub async fn chat_turn(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(payload): Json<ChatTurnRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let message = payload.message.trim();
    if message.is_empty() {
        return Err(ApiError::BadRequest("message cannot be empty".to_string()));
    }
    if !state.sessions.exists(&session_id).await {
        return Err(ApiError::NotFound(format!(
            "session not found: {}",
            session_id
        )));
    }

    let result = pipeline::answer_query(state.search.as_ref(), state.llm.as_ref(), message).await;

    state
        .sessions
        .append_exchange(&session_id, message, &result.reply)
        .await?;

    Ok(Json(json!({
        "reply": result.reply,
        "matches": result.matches
    })))
}

pub async fn help() -> impl IntoResponse {
    Json(json!({ "help": HELP_TEXT }))
}
