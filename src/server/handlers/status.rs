use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::state::AppState;
use crate::status::system_status_summary;

/// Side-panel refresh: a fresh tally plus the headline metrics.
pub async fn get_status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let summary = system_status_summary(state.search.as_ref()).await;

    Json(json!({
        "by_status": summary.by_status,
        "all_systems": summary.all_systems,
        "total_systems": summary.total_systems(),
        "normal_systems": summary.normal_systems(),
        "refreshed_at": chrono::Utc::now().to_rfc3339()
    }))
}
