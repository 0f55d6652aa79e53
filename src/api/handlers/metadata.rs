//! Token metadata handler.

use axum::extract::{Path, State};
use axum::Json;

use crate::api::error::ApiError;
use crate::api::ErrorCode;
use crate::metadata::{build_metadata, MetadataDocument};
use crate::server::AppState;

/// GET /metadata/:event_id/:token_id - Metadata document for a token.
pub async fn token_metadata(
    State(state): State<AppState>,
    Path((event_id, token_id)): Path<(i64, i64)>,
) -> Result<Json<MetadataDocument>, ApiError> {
    let event = state.store.event_by_id(event_id).await?.ok_or_else(|| {
        ApiError::new(ErrorCode::EventNotFound, format!("Event not found: {}", event_id))
    })?;

    let canonical_url = format!(
        "{}/metadata/{}/{}",
        state.public_base_url, event_id, token_id
    );

    Ok(Json(build_metadata(&canonical_url, &event)))
}
