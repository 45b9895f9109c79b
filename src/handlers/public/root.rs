use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::middleware::StatusMessage;
use crate::router::AppState;

/// ANY / - the bare root is not an endpoint
pub async fn route_not_supported() -> StatusMessage {
    StatusMessage::failure(StatusCode::FORBIDDEN, "This route is not supported.")
}

/// GET /health - store reachability plus the deployment key
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();
    let key = state.config.unique_key.clone();

    match state.health.ping().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok",
                    "key": key,
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "message": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                        "key": key,
                    }
                })),
            )
        }
    }
}
