//! Error types for Mintgate infrastructure

use thiserror::Error;

/// Errors that can occur in the service infrastructure
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Database error
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Event not found by numeric id
    #[error("event not found: {0}")]
    EventNotFound(i64),

    /// Event not found by fancy id
    #[error("event not found: {0}")]
    EventAliasNotFound(String),

    /// Token not found
    #[error("token not found: {0}")]
    TokenNotFound(i64),

    /// Validation error
    #[error("validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for service operations
pub type Result<T> = std::result::Result<T, ServiceError>;
