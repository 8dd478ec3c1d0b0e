use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::core::errors::ApiError;
use crate::search::SearchOptions;
use crate::state::AppState;

pub async fn health(State(_state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "initialized": true
    }))
}

/// Reachability probe for both managed services: a wildcard one-document
/// search against the index and a minimal completion against the deployment.
pub async fn connectivity(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let search_ok = state
        .search
        .search(
            "*",
            SearchOptions {
                top: 1,
                select: None,
                include_total_count: false,
            },
        )
        .await
        .is_ok();

    let model_ok = state.llm.health_check().await.unwrap_or(false);

    Ok(Json(json!({
        "search": search_ok,
        "model": model_ok
    })))
}
