//! ECDSA signer recovery for claim verification
//!
//! Claims carry secp256k1 signatures over EIP-191 personal-sign digests
//! (`"\x19Ethereum Signed Message:\n" + len(message) + message`). Instead of
//! verifying against a known key, we recover the signing address from the
//! signature and let the caller compare it to the expected one.
//!
//! The binding formats below are a stability contract with every client that
//! produces signatures for this service. Changing them invalidates all
//! previously issued claims; do not change them without versioning.

use alloy::primitives::Signature as EcdsaSignature;

use crate::domain::{Address, SignatureBytes};

/// Error type for recovery operations
#[derive(Debug, thiserror::Error)]
pub enum RecoverError {
    /// The 65 bytes do not decode to `(r, s, v)` components recoverable on
    /// the curve. A well-formed but *wrong* signature does not hit this; it
    /// recovers a wrong address instead.
    #[error("malformed signature")]
    MalformedSignature,
}

/// Message bound by the event-signer's proof signature.
///
/// Binds the claim id, the event id and the recipient so a proof for one
/// `(claim, event, claimer)` triple cannot authorize any other.
pub fn proof_message(claim_id: &str, event_id: i64, claimer: &Address) -> String {
    format!("{} {} {}", claim_id, event_id, claimer.to_hex())
}

/// Message bound by the claimer's consent signature.
pub fn consent_message(claim_id: &str) -> String {
    claim_id.to_string()
}

/// Recover the address that signed `message` (EIP-191 prefixed) with
/// `signature`.
///
/// Deterministic and pure. Fails only for signatures that are not
/// recoverable at all.
pub fn recover_signer(message: &[u8], signature: &SignatureBytes) -> Result<Address, RecoverError> {
    let sig = EcdsaSignature::try_from(&signature.as_bytes()[..])
        .map_err(|_| RecoverError::MalformedSignature)?;

    let recovered = sig
        .recover_address_from_msg(message)
        .map_err(|_| RecoverError::MalformedSignature)?;

    Ok(Address::from(recovered.into_array()))
}

// ============================================================================
// Tests
// ============================================================================
