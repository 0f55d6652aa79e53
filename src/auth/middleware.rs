//! Authentication middleware for Axum
//!
//! Attaches an [`AuthContext`] to every request. Public endpoints ignore
//! it; privileged handlers require the flag. A request that presents a
//! credential which fails validation is rejected outright rather than
//! silently downgraded.

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::{ApiKeyValidator, AuthContext, AuthError};

/// Auth context extension for request
#[derive(Clone)]
pub struct AuthContextExt(pub AuthContext);

/// Authentication middleware configuration/state.
#[derive(Clone)]
pub struct AuthMiddlewareState {
    pub validator: Arc<ApiKeyValidator>,
    /// Optional global rate limiter.
    pub rate_limiter: Option<Arc<RateLimiter>>,
}

/// Authentication middleware
pub async fn auth_middleware(
    State(state): State<AuthMiddlewareState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let context = match auth_header {
        None => AuthContext::default(),
        Some(header) => {
            let key = header.strip_prefix("ApiKey ").unwrap_or(header);
            match state.validator.validate(key) {
                Ok(context) => context,
                Err(e) => return auth_error_response(e),
            }
        }
    };

    if let Some(ref limiter) = state.rate_limiter {
        let key = if context.privileged { "admin" } else { "public" };
        if let Err(e) = limiter.check(key) {
            return auth_error_response(e);
        }
    }

    request.extensions_mut().insert(AuthContextExt(context));
    next.run(request).await
}

/// Convert auth error to HTTP response
fn auth_error_response(error: AuthError) -> Response {
    let (status, message) = match error {
        AuthError::MissingAuth => (StatusCode::UNAUTHORIZED, "Missing authentication"),
        AuthError::InvalidApiKey => (StatusCode::UNAUTHORIZED, "Invalid API key"),
        AuthError::RateLimited => (StatusCode::TOO_MANY_REQUESTS, "Rate limit exceeded"),
    };

    (
        status,
        axum::Json(serde_json::json!({ "error": message })),
    )
        .into_response()
}

/// Rate limiter for API requests
pub struct RateLimiter {
    /// Requests per minute per key
    requests_per_minute: u32,
    counts: std::sync::RwLock<std::collections::HashMap<String, (u32, std::time::Instant)>>,
}

impl RateLimiter {
    pub fn new(requests_per_minute: u32) -> Self {
        Self {
            requests_per_minute,
            counts: std::sync::RwLock::new(std::collections::HashMap::new()),
        }
    }

    /// Check if a request is allowed
    pub fn check(&self, key: &str) -> Result<(), AuthError> {
        let mut counts = self.counts.write().unwrap();
        let now = std::time::Instant::now();

        let entry = counts.entry(key.to_string()).or_insert((0, now));

        // Reset counter if the minute has passed
        if now.duration_since(entry.1).as_secs() >= 60 {
            *entry = (0, now);
        }

        if entry.0 >= self.requests_per_minute {
            return Err(AuthError::RateLimited);
        }

        entry.0 += 1;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limiter() {
        let limiter = RateLimiter::new(5);

        for _ in 0..5 {
            assert!(limiter.check("public").is_ok());
        }

        assert!(matches!(
            limiter.check("public"),
            Err(AuthError::RateLimited)
        ));

        // Other keys are unaffected
        assert!(limiter.check("admin").is_ok());
    }
}
