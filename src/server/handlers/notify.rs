use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::core::errors::ApiError;
use crate::notify::send_to_webhook;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NotifyRequest {
    pub session_id: String,
}

/// Forward the session's latest assistant reply to the configured webhook.
/// Send outcomes come back as a (success, message) pair; only the
/// preconditions (webhook configured, reply available) reject the request.
pub async fn send_notification(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NotifyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let webhook_url = state.settings.slack_webhook_url.clone().ok_or_else(|| {
        ApiError::BadRequest("SLACK_WEBHOOK_URL이 설정되지 않았습니다.".to_string())
    })?;

    let reply = state
        .sessions
        .latest_assistant_reply(&payload.session_id)
        .await?
        .ok_or_else(|| {
            ApiError::BadRequest("전송할 assistant 응답이 없습니다.".to_string())
        })?;

    let outcome = send_to_webhook(&state.http, &reply, &webhook_url).await;

    Ok(Json(json!({
        "success": outcome.success,
        "message": outcome.message
    })))
}
