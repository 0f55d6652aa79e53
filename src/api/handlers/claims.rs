//! Claim redemption handler.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::debug;

use crate::api::error::ApiError;
use crate::api::types::ClaimRequest;
use crate::claims::RedeemError;
use crate::server::AppState;

/// POST /api/claim - Redeem a claim and mint a token for the claimer.
///
/// Every authorization failure maps to the same "Invalid Claim" response;
/// the precise reason is only visible in the logs.
pub async fn redeem_claim(
    State(state): State<AppState>,
    Json(request): Json<ClaimRequest>,
) -> Result<StatusCode, ApiError> {
    let claim = request.into_claim()?;

    match state.claim_service.redeem(&claim).await {
        Ok(_token) => Ok(StatusCode::NO_CONTENT),
        Err(e) => {
            if let RedeemError::Rejected(ref rejection) = e {
                debug!(claim_id = %claim.claim_id, reason = %rejection, "claim rejected");
            }
            Err(e.into())
        }
    }
}
