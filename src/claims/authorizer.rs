//! Pure claim checks
//!
//! The full authorization protocol runs these checks in a fixed order,
//! short-circuiting on the first failure:
//!
//! 1. structural validation (claim targets this event)
//! 2. event-state (event has a signer, i.e. is activated for claiming)
//! 3. redemption-state (claim id not yet redeemed) - owned by the store,
//!    interleaved by [`super::ClaimService`]
//! 4. proof recovers to the event signer
//! 5. consent signature recovers to the claimer
//!
//! All five rejection kinds collapse to one undifferentiated "Invalid
//! Claim" response at the API boundary, so a caller cannot probe which
//! check failed.

use crate::crypto::{consent_message, proof_message, recover_signer};
use crate::domain::{Claim, Event};

/// Why a claim was rejected. Internal only; never serialized to clients.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClaimRejection {
    #[error("claim validation failed: {0}")]
    Validation(String),

    #[error("event is not active for claiming")]
    EventNotActive,

    #[error("claim already redeemed")]
    AlreadyRedeemed,

    #[error("proof does not recover to the event signer")]
    InvalidProof,

    #[error("signature does not recover to the claimer")]
    InvalidClaimerSignature,
}

/// Stateless claim validation against an event record.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClaimAuthorizer;

impl ClaimAuthorizer {
    pub fn new() -> Self {
        Self
    }

    /// Steps 1-2: structural validation and event-state check.
    ///
    /// The hex shapes of `claimer`, `proof` and `claimer_signature` are
    /// guaranteed by their types before a `Claim` can exist.
    pub fn validate_shape(&self, claim: &Claim, event: &Event) -> Result<(), ClaimRejection> {
        if claim.event_id != event.id {
            return Err(ClaimRejection::Validation(format!(
                "claim targets event {} but was checked against event {}",
                claim.event_id, event.id
            )));
        }

        if claim.claim_id.is_empty() {
            return Err(ClaimRejection::Validation("empty claim id".to_string()));
        }

        if !event.is_active() {
            return Err(ClaimRejection::EventNotActive);
        }

        Ok(())
    }

    /// Steps 4-5: both signature recoveries.
    ///
    /// A signature that is malformed beyond recovery rejects the same way
    /// as one recovering to the wrong address.
    pub fn verify_signatures(&self, claim: &Claim, event: &Event) -> Result<(), ClaimRejection> {
        // validate_shape has established the signer exists
        let signer = event.signer.ok_or(ClaimRejection::EventNotActive)?;

        let bound = proof_message(&claim.claim_id, claim.event_id, &claim.claimer);
        let recovered = recover_signer(bound.as_bytes(), &claim.proof)
            .map_err(|_| ClaimRejection::InvalidProof)?;
        if recovered != signer {
            return Err(ClaimRejection::InvalidProof);
        }

        let consent = consent_message(&claim.claim_id);
        let recovered = recover_signer(consent.as_bytes(), &claim.claimer_signature)
            .map_err(|_| ClaimRejection::InvalidClaimerSignature)?;
        if recovered != claim.claimer {
            return Err(ClaimRejection::InvalidClaimerSignature);
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
