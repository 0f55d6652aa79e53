//! Structured API error responses with error codes
//!
//! Consistent error handling across all endpoints with machine-readable
//! error codes and human-readable messages. The five claim-authorization
//! failure kinds all map to the single `InvalidClaim` code so the response
//! cannot be used as an oracle against the verification protocol.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

// ============================================================================
// Error Codes
// ============================================================================

/// Error codes for API responses
///
/// These codes are stable and can be used by clients for programmatic error
/// handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Authentication errors (1xxx)
    /// No authentication credentials provided
    AuthRequired,
    /// Invalid API key format or value
    InvalidApiKey,
    /// Insufficient permissions for this operation
    InsufficientPermissions,

    // Rate limiting errors (2xxx)
    /// Too many requests, rate limit exceeded
    RateLimitExceeded,

    // Validation errors (3xxx)
    /// Request body is malformed
    InvalidRequestBody,
    /// Required field is missing
    MissingRequiredField,
    /// Field value is invalid
    InvalidFieldValue,

    // Resource errors (4xxx)
    /// Requested resource not found
    ResourceNotFound,
    /// Event not found
    EventNotFound,
    /// Token not found
    TokenNotFound,

    // Claim errors (5xxx)
    /// Claim authorization failed (undifferentiated on purpose)
    InvalidClaim,

    // Ledger errors (6xxx)
    /// Ledger kept failing transiently; retry later
    LedgerUnavailable,
    /// Ledger rejected the submission
    LedgerRejected,

    // Infrastructure errors (8xxx)
    /// Database operation failed
    DatabaseError,
    /// Internal server error
    InternalError,
}

impl ErrorCode {
    /// Get the numeric code for this error
    pub fn numeric_code(&self) -> u32 {
        match self {
            // Auth (1xxx)
            ErrorCode::AuthRequired => 1001,
            ErrorCode::InvalidApiKey => 1002,
            ErrorCode::InsufficientPermissions => 1005,

            // Rate limiting (2xxx)
            ErrorCode::RateLimitExceeded => 2001,

            // Validation (3xxx)
            ErrorCode::InvalidRequestBody => 3001,
            ErrorCode::MissingRequiredField => 3002,
            ErrorCode::InvalidFieldValue => 3003,

            // Resource (4xxx)
            ErrorCode::ResourceNotFound => 4001,
            ErrorCode::EventNotFound => 4002,
            ErrorCode::TokenNotFound => 4003,

            // Claims (5xxx)
            ErrorCode::InvalidClaim => 5001,

            // Ledger (6xxx)
            ErrorCode::LedgerUnavailable => 6001,
            ErrorCode::LedgerRejected => 6002,

            // Infrastructure (8xxx)
            ErrorCode::DatabaseError => 8001,
            ErrorCode::InternalError => 8999,
        }
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        match self {
            ErrorCode::AuthRequired => StatusCode::UNAUTHORIZED,
            ErrorCode::InvalidApiKey => StatusCode::UNAUTHORIZED,
            ErrorCode::InsufficientPermissions => StatusCode::FORBIDDEN,

            ErrorCode::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,

            ErrorCode::InvalidRequestBody => StatusCode::BAD_REQUEST,
            ErrorCode::MissingRequiredField => StatusCode::BAD_REQUEST,
            ErrorCode::InvalidFieldValue => StatusCode::BAD_REQUEST,

            ErrorCode::ResourceNotFound => StatusCode::NOT_FOUND,
            ErrorCode::EventNotFound => StatusCode::NOT_FOUND,
            ErrorCode::TokenNotFound => StatusCode::NOT_FOUND,

            ErrorCode::InvalidClaim => StatusCode::BAD_REQUEST,

            ErrorCode::LedgerUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::LedgerRejected => StatusCode::UNPROCESSABLE_ENTITY,

            ErrorCode::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code_str = match self {
            ErrorCode::AuthRequired => "AUTH_REQUIRED",
            ErrorCode::InvalidApiKey => "INVALID_API_KEY",
            ErrorCode::InsufficientPermissions => "INSUFFICIENT_PERMISSIONS",
            ErrorCode::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            ErrorCode::InvalidRequestBody => "INVALID_REQUEST_BODY",
            ErrorCode::MissingRequiredField => "MISSING_REQUIRED_FIELD",
            ErrorCode::InvalidFieldValue => "INVALID_FIELD_VALUE",
            ErrorCode::ResourceNotFound => "RESOURCE_NOT_FOUND",
            ErrorCode::EventNotFound => "EVENT_NOT_FOUND",
            ErrorCode::TokenNotFound => "TOKEN_NOT_FOUND",
            ErrorCode::InvalidClaim => "INVALID_CLAIM",
            ErrorCode::LedgerUnavailable => "LEDGER_UNAVAILABLE",
            ErrorCode::LedgerRejected => "LEDGER_REJECTED",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", code_str)
    }
}

// ============================================================================
// Structured Error Response
// ============================================================================

/// Structured error response for API endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error details
    pub error: ErrorDetails,
}

/// Detailed error information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Numeric error code for easy categorization
    pub numeric_code: u32,

    /// Human-readable error message
    pub message: String,

    /// Additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetails {
                code,
                numeric_code: code.numeric_code(),
                message: message.into(),
                details: None,
            },
        }
    }

    /// Set additional details
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.error.details = Some(details);
        self
    }

    /// Get the HTTP status code
    pub fn status(&self) -> StatusCode {
        self.error.code.http_status()
    }

    /// The undifferentiated claim rejection, regardless of which check
    /// failed.
    pub fn invalid_claim() -> Self {
        Self::new(ErrorCode::InvalidClaim, "Invalid Claim")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code_str = self.error.code.to_string();
        let mut response = (status, Json(self)).into_response();

        if let Ok(code_value) = axum::http::HeaderValue::from_str(&code_str) {
            response.headers_mut().insert(
                axum::http::header::HeaderName::from_static("x-error-code"),
                code_value,
            );
        }

        response
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl From<crate::infra::ServiceError> for ApiError {
    fn from(err: crate::infra::ServiceError) -> Self {
        use crate::infra::ServiceError;

        match err {
            ServiceError::Database(e) => {
                ApiError::new(ErrorCode::DatabaseError, format!("Database error: {}", e))
            }
            ServiceError::EventNotFound(id) => {
                ApiError::new(ErrorCode::EventNotFound, format!("Event not found: {}", id))
            }
            ServiceError::EventAliasNotFound(id) => {
                ApiError::new(ErrorCode::EventNotFound, format!("Event not found: {}", id))
            }
            ServiceError::TokenNotFound(id) => {
                ApiError::new(ErrorCode::TokenNotFound, format!("Token not found: {}", id))
            }
            ServiceError::Validation(msg) => ApiError::new(ErrorCode::InvalidFieldValue, msg),
            ServiceError::Configuration(msg) => {
                ApiError::new(ErrorCode::InternalError, format!("Configuration error: {}", msg))
            }
            ServiceError::Internal(msg) => ApiError::new(ErrorCode::InternalError, msg),
        }
    }
}

impl From<crate::claims::RedeemError> for ApiError {
    fn from(err: crate::claims::RedeemError) -> Self {
        use crate::claims::RedeemError;

        match err {
            // Deliberately undifferentiated: the caller must not learn
            // which of the authorization checks failed.
            RedeemError::Rejected(_) => ApiError::invalid_claim(),
            RedeemError::LedgerUnavailable => {
                ApiError::new(ErrorCode::LedgerUnavailable, "Ledger unavailable, retry later")
            }
            RedeemError::LedgerRejected => {
                ApiError::new(ErrorCode::LedgerRejected, "Ledger rejected the mint")
            }
            RedeemError::Store(e) => e.into(),
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Create a not found error for a specific resource type
pub fn not_found(resource_type: &str, id: impl std::fmt::Display) -> ApiError {
    ApiError::new(
        ErrorCode::ResourceNotFound,
        format!("{} not found: {}", resource_type, id),
    )
}

/// Create a validation error with field details
pub fn validation_error(field: &str, message: impl Into<String>) -> ApiError {
    ApiError::new(ErrorCode::InvalidFieldValue, message.into())
        .with_details(serde_json::json!({ "field": field }))
}

/// Create an unauthorized error
pub fn unauthorized(message: impl Into<String>) -> ApiError {
    ApiError::new(ErrorCode::AuthRequired, message.into())
}

// ============================================================================
// Tests
// ============================================================================
