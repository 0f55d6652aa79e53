//! Boundary request/response types
//!
//! Requests arrive as plain strings and are validated here — hex patterns,
//! required-ness, numeric ranges — before anything touches business logic.
//! Handlers only ever see fully typed domain values.

use serde::{Deserialize, Serialize};

use crate::api::error::{validation_error, ApiError};
use crate::domain::{Address, Claim, Event, EventUpdate, SignatureBytes, TokenRecord};

fn parse_address(field: &str, value: &str) -> Result<Address, ApiError> {
    Address::parse(value)
        .map_err(|_| validation_error(field, format!("{} must match ^0x[0-9a-fA-F]{{40}}$", field)))
}

fn parse_signature(field: &str, value: &str) -> Result<SignatureBytes, ApiError> {
    SignatureBytes::parse(value).map_err(|_| {
        validation_error(field, format!("{} must match ^0x[0-9a-fA-F]{{130}}$", field))
    })
}

// ============================================================================
// Requests
// ============================================================================

/// POST /api/claim request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimRequest {
    pub claim_id: String,
    pub event_id: i64,
    pub proof: String,
    pub claimer: String,
    pub claimer_signature: String,
}

impl ClaimRequest {
    /// Validate field shapes and produce a typed claim.
    pub fn into_claim(self) -> Result<Claim, ApiError> {
        if self.claim_id.is_empty() {
            return Err(validation_error("claim_id", "claim_id must not be empty"));
        }
        if self.event_id < 1 {
            return Err(validation_error("event_id", "event_id must be >= 1"));
        }

        Ok(Claim {
            proof: parse_signature("proof", &self.proof)?,
            claimer: parse_address("claimer", &self.claimer)?,
            claimer_signature: parse_signature("claimer_signature", &self.claimer_signature)?,
            claim_id: self.claim_id,
            event_id: self.event_id,
        })
    }
}

/// PUT /api/events/:fancy_id request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateEventRequest {
    pub signer: Option<String>,
    pub signer_ip: Option<String>,
    pub event_url: String,
    pub image_url: String,
}

impl UpdateEventRequest {
    pub fn into_update(self) -> Result<EventUpdate, ApiError> {
        let signer = self
            .signer
            .map(|s| parse_address("signer", &s))
            .transpose()?;

        if self.event_url.is_empty() {
            return Err(validation_error("event_url", "event_url must not be empty"));
        }
        if self.image_url.is_empty() {
            return Err(validation_error("image_url", "image_url must not be empty"));
        }

        Ok(EventUpdate {
            signer,
            signer_ip: self.signer_ip,
            event_url: self.event_url,
            image_url: self.image_url,
        })
    }
}

/// POST /api/mintTokenBatch request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MintBatchRequest {
    pub event_id: i64,
    pub addresses: Vec<String>,
}

impl MintBatchRequest {
    pub fn validate(self) -> Result<(i64, Vec<Address>), ApiError> {
        if self.event_id < 1 {
            return Err(validation_error("event_id", "event_id must be >= 1"));
        }
        if self.addresses.is_empty() {
            return Err(validation_error("addresses", "addresses must not be empty"));
        }

        let addresses = self
            .addresses
            .iter()
            .map(|a| parse_address("addresses", a))
            .collect::<Result<Vec<_>, _>>()?;

        Ok((self.event_id, addresses))
    }
}

// ============================================================================
// Responses
// ============================================================================

/// Token info joined with its event, served by scan and token lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenInfoResponse {
    pub token_id: i64,
    pub owner: Address,
    pub tx_ref: String,
    pub minted_at: chrono::DateTime<chrono::Utc>,
    pub event: Event,
}

impl TokenInfoResponse {
    pub fn new(token: TokenRecord, event: Event) -> Self {
        Self {
            token_id: token.token_id,
            owner: token.owner,
            tx_ref: token.tx_ref,
            minted_at: token.minted_at,
            event,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
