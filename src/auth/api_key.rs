//! Admin API key validation
//!
//! Keys are formatted as `mg_<random>` and only their SHA-256 hash is held
//! in memory.

use sha2::{Digest, Sha256};

use super::{AuthContext, AuthError};

/// API key prefix
pub const API_KEY_PREFIX: &str = "mg_";

/// Validates the admin API key for privileged endpoints.
pub struct ApiKeyValidator {
    /// Hash of the admin key (never store plaintext); None disables
    /// privileged access entirely
    admin_key_hash: Option<String>,
}

impl ApiKeyValidator {
    /// Create a validator with no registered key (all privileged requests
    /// are rejected).
    pub fn disabled() -> Self {
        Self {
            admin_key_hash: None,
        }
    }

    /// Create a validator for the given plaintext admin key.
    pub fn new(admin_key: &str) -> Self {
        Self {
            admin_key_hash: Some(Self::hash_key(admin_key)),
        }
    }

    /// Generate a new API key.
    ///
    /// Returns (plaintext_key, key_hash).
    pub fn generate_key() -> (String, String) {
        use rand::Rng;

        let random_bytes: [u8; 24] = rand::thread_rng().gen();
        let random_part = base64::Engine::encode(
            &base64::engine::general_purpose::URL_SAFE_NO_PAD,
            random_bytes,
        );

        let plaintext_key = format!("{}{}", API_KEY_PREFIX, random_part);
        let key_hash = Self::hash_key(&plaintext_key);

        (plaintext_key, key_hash)
    }

    /// Hash an API key for storage
    pub fn hash_key(key: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(key.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Validate an API key and return the auth context
    pub fn validate(&self, key: &str) -> Result<AuthContext, AuthError> {
        if !key.starts_with(API_KEY_PREFIX) {
            return Err(AuthError::InvalidApiKey);
        }

        let expected = self.admin_key_hash.as_ref().ok_or(AuthError::InvalidApiKey)?;

        if &Self::hash_key(key) != expected {
            return Err(AuthError::InvalidApiKey);
        }

        Ok(AuthContext { privileged: true })
    }
}
