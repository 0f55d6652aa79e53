//! Claims, redemption records and mint outcomes
//!
//! A claim is a twice-signed assertion that `claimer` may mint one token for
//! `event_id`. The `RedemptionRecord` for a claim id exists at most once;
//! its existence is the idempotency gate for the whole redeem flow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Address, SignatureBytes};

/// A structured, twice-signed mint authorization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claim {
    /// Unique claim identifier (unique per event)
    pub claim_id: String,

    /// Event the claim is against
    pub event_id: i64,

    /// Event-signer's signature over (claim_id, event_id, claimer)
    pub proof: SignatureBytes,

    /// Recipient address
    pub claimer: Address,

    /// Claimer's signature over claim_id, proving control of the address
    pub claimer_signature: SignatureBytes,
}

/// Redemption state of a claim id.
///
/// Inserted provisionally (`mint_tx_ref = None`) before the ledger
/// submission, finalized with the transaction reference on success. A row
/// with `mint_tx_ref = None` means a mint is in flight for this claim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedemptionRecord {
    pub claim_id: String,
    pub event_id: i64,
    pub redeemed_at: DateTime<Utc>,
    pub mint_tx_ref: Option<String>,
}

/// Durable receipt for a minted token; backs the scan and token lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenRecord {
    /// Store-assigned token identifier
    pub token_id: i64,
    pub event_id: i64,
    pub owner: Address,
    /// Ledger transaction reference for the mint
    pub tx_ref: String,
    pub minted_at: DateTime<Utc>,
}

/// Why a mint failed, as surfaced per address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MintErrorKind {
    /// Retry budget exhausted on transient ledger failures
    LedgerUnavailable,
    /// Ledger rejected the submission outright
    LedgerRejected,
}

/// Per-address result of a mint operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MintOutcome {
    pub address: Address,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Success or classified failure for one address.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Minted { tx_ref: String },
    Failed { error: MintErrorKind },
}

impl MintOutcome {
    pub fn minted(address: Address, tx_ref: impl Into<String>) -> Self {
        Self {
            address,
            outcome: Outcome::Minted {
                tx_ref: tx_ref.into(),
            },
        }
    }

    pub fn failed(address: Address, error: MintErrorKind) -> Self {
        Self {
            address,
            outcome: Outcome::Failed { error },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Minted { .. })
    }

    /// Transaction reference, if the mint succeeded.
    pub fn tx_ref(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Minted { tx_ref } => Some(tx_ref),
            Outcome::Failed { .. } => None,
        }
    }
}
