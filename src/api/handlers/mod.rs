//! Request handlers

pub mod claims;
pub mod events;
pub mod health;
pub mod metadata;
pub mod mint;
pub mod tokens;

use crate::api::error::{unauthorized, ApiError};
use crate::auth::AuthContext;

/// Guard for privileged endpoints.
pub(crate) fn ensure_privileged(auth: &AuthContext) -> Result<(), ApiError> {
    if !auth.privileged {
        return Err(unauthorized("Privileged credential required"));
    }
    Ok(())
}
