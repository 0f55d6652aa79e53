//! Batch mint handler.

use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::info;

use crate::api::error::ApiError;
use crate::api::handlers::ensure_privileged;
use crate::api::types::MintBatchRequest;
use crate::api::ErrorCode;
use crate::auth::AuthContextExt;
use crate::server::AppState;

/// POST /api/mintTokenBatch - Mint tokens for a list of addresses
/// (privileged).
///
/// Failures are per-address and never abort siblings: 204 when every mint
/// succeeded, otherwise 200 with one outcome per submitted address in
/// input order.
pub async fn mint_token_batch(
    State(state): State<AppState>,
    Extension(AuthContextExt(auth)): Extension<AuthContextExt>,
    Json(request): Json<MintBatchRequest>,
) -> Result<Response, ApiError> {
    ensure_privileged(&auth)?;

    let (event_id, addresses) = request.validate()?;

    let event = state.store.event_by_id(event_id).await?.ok_or_else(|| {
        ApiError::new(ErrorCode::EventNotFound, format!("Event not found: {}", event_id))
    })?;

    let outcomes = state.orchestrator.mint_batch(event.id, &addresses).await;

    // Record receipts for the successful mints
    for outcome in &outcomes {
        if let Some(tx_ref) = outcome.tx_ref() {
            state
                .store
                .insert_token(event.id, &outcome.address, tx_ref)
                .await?;
        }
    }

    let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
    info!(
        event_id = event.id,
        total = outcomes.len(),
        succeeded,
        "batch mint finished"
    );

    if succeeded == outcomes.len() {
        Ok(StatusCode::NO_CONTENT.into_response())
    } else {
        Ok((StatusCode::OK, Json(serde_json::json!({ "outcomes": outcomes }))).into_response())
    }
}
