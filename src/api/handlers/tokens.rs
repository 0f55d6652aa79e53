//! Token lookup handlers.

use axum::extract::{Path, State};
use axum::Json;

use crate::api::error::{validation_error, ApiError};
use crate::api::types::TokenInfoResponse;
use crate::api::ErrorCode;
use crate::domain::Address;
use crate::server::AppState;

/// GET /api/scan/:address - Tokens owned by an address.
pub async fn scan_address(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<Vec<TokenInfoResponse>>, ApiError> {
    let address = Address::parse(&address)
        .map_err(|_| validation_error("address", "address must match ^0x[0-9a-fA-F]{40}$"))?;

    let tokens = state.store.tokens_by_owner(&address).await?;

    let mut entries = Vec::with_capacity(tokens.len());
    for token in tokens {
        let event = state
            .store
            .event_by_id(token.event_id)
            .await?
            .ok_or_else(|| {
                ApiError::new(
                    ErrorCode::InternalError,
                    format!("token {} references unknown event {}", token.token_id, token.event_id),
                )
            })?;
        entries.push(TokenInfoResponse::new(token, event));
    }

    Ok(Json(entries))
}

/// GET /api/token/:token_id - Single token info.
pub async fn token_info(
    State(state): State<AppState>,
    Path(token_id): Path<i64>,
) -> Result<Json<TokenInfoResponse>, ApiError> {
    let token = state.store.token_by_id(token_id).await?.ok_or_else(|| {
        ApiError::new(ErrorCode::TokenNotFound, format!("Token not found: {}", token_id))
    })?;

    let event = state
        .store
        .event_by_id(token.event_id)
        .await?
        .ok_or_else(|| {
            ApiError::new(
                ErrorCode::InternalError,
                format!("token {} references unknown event {}", token_id, token.event_id),
            )
        })?;

    Ok(Json(TokenInfoResponse::new(token, event)))
}
