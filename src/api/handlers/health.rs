//! Health and readiness handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::server::AppState;

/// GET /health - Liveness check.
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "mintgate",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /ready - Readiness check (store connectivity probe).
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    match state.store.event_by_id(0).await {
        Ok(_) => Ok(Json(serde_json::json!({
            "status": "ready",
            "store": "connected",
        }))),
        Err(e) => Err((
            StatusCode::SERVICE_UNAVAILABLE,
            format!("Store unavailable: {}", e),
        )),
    }
}
