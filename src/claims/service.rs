//! Claim redemption service
//!
//! Composes the authorizer, the store's redemption gate and the mint
//! orchestrator into the full redeem flow. The redemption reservation is
//! taken *before* the ledger submission and compensated on failure:
//! duplicates are blocked for the whole in-flight window, and a failed
//! mint releases the claim instead of leaving it consumed-but-unminted.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{Claim, TokenRecord};
use crate::infra::{EventStore, ServiceError};
use crate::mint::MintOrchestrator;

use super::{ClaimAuthorizer, ClaimRejection};

/// Error type for the redeem flow
#[derive(Debug, thiserror::Error)]
pub enum RedeemError {
    /// Authorization failed; collapsed to "Invalid Claim" at the boundary
    #[error("claim rejected: {0}")]
    Rejected(#[from] ClaimRejection),

    /// Ledger kept failing transiently past the retry budget
    #[error("ledger unavailable")]
    LedgerUnavailable,

    /// Ledger rejected the mint outright
    #[error("ledger rejected the mint")]
    LedgerRejected,

    /// Store failure
    #[error(transparent)]
    Store(#[from] ServiceError),
}

/// Root service implementing "redeem claim".
pub struct ClaimService {
    store: Arc<dyn EventStore>,
    authorizer: ClaimAuthorizer,
    orchestrator: Arc<MintOrchestrator>,
}

impl ClaimService {
    pub fn new(store: Arc<dyn EventStore>, orchestrator: Arc<MintOrchestrator>) -> Self {
        Self {
            store,
            authorizer: ClaimAuthorizer::new(),
            orchestrator,
        }
    }

    /// Redeem a claim: authorize, reserve, mint, record.
    ///
    /// Checks run in the protocol order (structural, event-state,
    /// redemption-state, proof, consent), short-circuiting on the first
    /// failure. Under concurrent identical claims, exactly one caller
    /// reaches the ledger; every other caller fails with
    /// `AlreadyRedeemed` without a ledger call.
    pub async fn redeem(&self, claim: &Claim) -> Result<TokenRecord, RedeemError> {
        let event = self
            .store
            .event_by_id(claim.event_id)
            .await?
            .ok_or_else(|| {
                ClaimRejection::Validation(format!("unknown event {}", claim.event_id))
            })?;

        self.authorizer.validate_shape(claim, &event)?;

        // Fast-path duplicate check; the reservation below is authoritative.
        if self.store.redemption(&claim.claim_id).await?.is_some() {
            return Err(ClaimRejection::AlreadyRedeemed.into());
        }

        self.authorizer.verify_signatures(claim, &event)?;

        // Atomic check-and-set on the claim id; the loser of a race lands
        // here instead of at the ledger.
        if !self
            .store
            .reserve_redemption(&claim.claim_id, event.id)
            .await?
        {
            return Err(ClaimRejection::AlreadyRedeemed.into());
        }

        match self
            .orchestrator
            .submit_with_retry(event.id, &claim.claimer)
            .await
        {
            Ok(receipt) => {
                // The mint is on the ledger; from here the redemption is
                // irreversible even if the bookkeeping below fails.
                self.store
                    .finalize_redemption(&claim.claim_id, &receipt.tx_ref)
                    .await?;
                let token = self
                    .store
                    .insert_token(event.id, &claim.claimer, &receipt.tx_ref)
                    .await?;

                info!(
                    claim_id = %claim.claim_id,
                    event_id = event.id,
                    claimer = %claim.claimer,
                    tx = %receipt.tx_ref,
                    token_id = token.token_id,
                    "claim redeemed"
                );

                Ok(token)
            }
            Err(e) => {
                warn!(
                    claim_id = %claim.claim_id,
                    event_id = event.id,
                    error = %e,
                    "mint failed, releasing redemption reservation"
                );
                self.store.release_redemption(&claim.claim_id).await?;

                Err(if e.is_transient() {
                    RedeemError::LedgerUnavailable
                } else {
                    RedeemError::LedgerRejected
                })
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{consent_message, proof_message};
    use crate::domain::{Address, Event, SignatureBytes};
    use crate::infra::retry::RetryConfig;
    use crate::infra::MockEventStore;
    use crate::mint::{LedgerError, MintReceipt, MockLedgerClient};
    use alloy::signers::{local::PrivateKeySigner, SignerSync};
    use chrono::NaiveDate;

    fn address_of(signer: &PrivateKeySigner) -> Address {
        Address::from(signer.address().into_array())
    }

    fn sign(signer: &PrivateKeySigner, message: &str) -> SignatureBytes {
        SignatureBytes::from(signer.sign_message_sync(message.as_bytes()).unwrap().as_bytes())
    }

    fn fixture() -> (Event, Claim) {
        let event_signer = PrivateKeySigner::random();
        let claimer = PrivateKeySigner::random();
        let claimer_addr = address_of(&claimer);

        let event = Event {
            id: 1,
            fancy_id: "devcon6".to_string(),
            name: "Devcon 6".to_string(),
            description: "".to_string(),
            city: "Bogota".to_string(),
            country: "Colombia".to_string(),
            start_date: NaiveDate::from_ymd_opt(2022, 10, 11).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2022, 10, 14).unwrap(),
            event_url: "https://devcon.org".to_string(),
            image_url: "https://img.example/devcon6.png".to_string(),
            signer: Some(address_of(&event_signer)),
            signer_ip: None,
        };

        let claim = Claim {
            claim_id: "c1".to_string(),
            event_id: 1,
            proof: sign(&event_signer, &proof_message("c1", 1, &claimer_addr)),
            claimer: claimer_addr,
            claimer_signature: sign(&claimer, &consent_message("c1")),
        };

        (event, claim)
    }

    fn service(store: MockEventStore, ledger: MockLedgerClient) -> ClaimService {
        let orchestrator = Arc::new(
            MintOrchestrator::new(Arc::new(ledger)).with_retry_config(RetryConfig::fast()),
        );
        ClaimService::new(Arc::new(store), orchestrator)
    }

    #[tokio::test]
    async fn test_redeem_happy_path() {
        let (event, claim) = fixture();
        let claimer = claim.claimer;

        let mut store = MockEventStore::new();
        let ev = event.clone();
        store
            .expect_event_by_id()
            .returning(move |_| Ok(Some(ev.clone())));
        store.expect_redemption().returning(|_| Ok(None));
        store
            .expect_reserve_redemption()
            .times(1)
            .returning(|_, _| Ok(true));
        store
            .expect_finalize_redemption()
            .times(1)
            .returning(|_, _| Ok(()));
        store
            .expect_insert_token()
            .times(1)
            .returning(move |event_id, owner, tx_ref| {
                Ok(TokenRecord {
                    token_id: 7,
                    event_id,
                    owner: *owner,
                    tx_ref: tx_ref.to_string(),
                    minted_at: chrono::Utc::now(),
                })
            });

        let mut ledger = MockLedgerClient::new();
        ledger.expect_submit_mint().times(1).returning(|_, _| {
            Ok(MintReceipt {
                tx_ref: "0xfeed".to_string(),
            })
        });

        let token = service(store, ledger).redeem(&claim).await.unwrap();
        assert_eq!(token.token_id, 7);
        assert_eq!(token.owner, claimer);
        assert_eq!(token.tx_ref, "0xfeed");
    }

    #[tokio::test]
    async fn test_already_redeemed_never_reaches_ledger() {
        let (event, claim) = fixture();

        let mut store = MockEventStore::new();
        let ev = event.clone();
        store
            .expect_event_by_id()
            .returning(move |_| Ok(Some(ev.clone())));
        store.expect_redemption().returning(|claim_id| {
            Ok(Some(crate::domain::RedemptionRecord {
                claim_id: claim_id.to_string(),
                event_id: 1,
                redeemed_at: chrono::Utc::now(),
                mint_tx_ref: Some("0x01".to_string()),
            }))
        });

        let mut ledger = MockLedgerClient::new();
        ledger.expect_submit_mint().times(0);

        let result = service(store, ledger).redeem(&claim).await;
        assert!(matches!(
            result,
            Err(RedeemError::Rejected(ClaimRejection::AlreadyRedeemed))
        ));
    }

    #[tokio::test]
    async fn test_cas_loser_gets_already_redeemed() {
        let (event, claim) = fixture();

        let mut store = MockEventStore::new();
        let ev = event.clone();
        store
            .expect_event_by_id()
            .returning(move |_| Ok(Some(ev.clone())));
        // Fast-path read sees nothing, but the reservation loses the race
        store.expect_redemption().returning(|_| Ok(None));
        store
            .expect_reserve_redemption()
            .times(1)
            .returning(|_, _| Ok(false));

        let mut ledger = MockLedgerClient::new();
        ledger.expect_submit_mint().times(0);

        let result = service(store, ledger).redeem(&claim).await;
        assert!(matches!(
            result,
            Err(RedeemError::Rejected(ClaimRejection::AlreadyRedeemed))
        ));
    }

    #[tokio::test]
    async fn test_failed_mint_releases_reservation() {
        let (event, claim) = fixture();

        let mut store = MockEventStore::new();
        let ev = event.clone();
        store
            .expect_event_by_id()
            .returning(move |_| Ok(Some(ev.clone())));
        store.expect_redemption().returning(|_| Ok(None));
        store
            .expect_reserve_redemption()
            .times(1)
            .returning(|_, _| Ok(true));
        store
            .expect_release_redemption()
            .times(1)
            .returning(|_| Ok(()));

        let mut ledger = MockLedgerClient::new();
        ledger
            .expect_submit_mint()
            .times(1)
            .returning(|_, _| Err(LedgerError::Permanent("revert".to_string())));

        let result = service(store, ledger).redeem(&claim).await;
        assert!(matches!(result, Err(RedeemError::LedgerRejected)));
    }

    #[tokio::test]
    async fn test_unknown_event_is_rejection() {
        let (_, claim) = fixture();

        let mut store = MockEventStore::new();
        store.expect_event_by_id().returning(|_| Ok(None));

        let ledger = MockLedgerClient::new();

        let result = service(store, ledger).redeem(&claim).await;
        assert!(matches!(
            result,
            Err(RedeemError::Rejected(ClaimRejection::Validation(_)))
        ));
    }
}
