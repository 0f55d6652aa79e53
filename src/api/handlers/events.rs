//! Event read and update handlers.

use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::handlers::ensure_privileged;
use crate::api::types::UpdateEventRequest;
use crate::api::ErrorCode;
use crate::auth::AuthContextExt;
use crate::domain::Event;
use crate::server::AppState;

/// GET /api/events - List all events.
pub async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<Event>>, ApiError> {
    let events = state.store.list_events().await?;
    Ok(Json(events))
}

/// GET /api/events/:fancy_id - Look up one event by alias.
pub async fn get_event(
    State(state): State<AppState>,
    Path(fancy_id): Path<String>,
) -> Result<Json<Event>, ApiError> {
    let event = state
        .store
        .event_by_fancy_id(&fancy_id)
        .await?
        .ok_or_else(|| {
            ApiError::new(ErrorCode::EventNotFound, format!("Event not found: {}", fancy_id))
        })?;

    Ok(Json(event))
}

/// PUT /api/events/:fancy_id - Update signer/URLs of an event (privileged).
pub async fn update_event(
    State(state): State<AppState>,
    Extension(AuthContextExt(auth)): Extension<AuthContextExt>,
    Path(fancy_id): Path<String>,
    Json(request): Json<UpdateEventRequest>,
) -> Result<StatusCode, ApiError> {
    ensure_privileged(&auth)?;

    let update = request.into_update()?;

    let updated = state.store.update_event(&fancy_id, update).await?;
    if !updated {
        return Err(ApiError::new(
            ErrorCode::EventNotFound,
            format!("Event not found: {}", fancy_id),
        ));
    }

    Ok(StatusCode::NO_CONTENT)
}
