//! REST API endpoints for Mintgate.

use axum::routing::{get, post};
use axum::Router;

use crate::server::AppState;

use super::handlers;

/// Build the `/api` router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/scan/:address", get(handlers::tokens::scan_address))
        .route("/token/:token_id", get(handlers::tokens::token_info))
        .route("/events", get(handlers::events::list_events))
        .route(
            "/events/:fancy_id",
            get(handlers::events::get_event).put(handlers::events::update_event),
        )
        .route("/mintTokenBatch", post(handlers::mint::mint_token_batch))
        .route("/claim", post(handlers::claims::redeem_claim))
}

/// Root-level metadata router.
///
/// Token marketplaces resolve metadata at `/metadata/...` without the
/// `/api` prefix.
pub fn metadata_router() -> Router<AppState> {
    Router::new().route(
        "/metadata/:event_id/:token_id",
        get(handlers::metadata::token_metadata),
    )
}
