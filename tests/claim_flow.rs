//! End-to-end tests for the claim redemption flow: double-signature
//! verification, at-most-once redemption under concurrency, and
//! compensation when the ledger fails.

mod common;

use std::sync::Arc;

use alloy::signers::local::PrivateKeySigner;
use tokio::sync::Barrier;

use common::{
    address_of, claim_service, signed_claim, test_event, CountingLedger, LedgerMode,
};
use mintgate::claims::{ClaimRejection, RedeemError};
use mintgate::domain::SignatureBytes;
use mintgate::infra::{EventStore, MemEventStore};

struct Setup {
    store: Arc<MemEventStore>,
    ledger: Arc<CountingLedger>,
    service: Arc<mintgate::claims::ClaimService>,
    event_signer: PrivateKeySigner,
}

fn setup(mode: LedgerMode) -> Setup {
    let event_signer = PrivateKeySigner::random();
    let store = Arc::new(MemEventStore::new());
    store.put_event(test_event(1, "devcon6", Some(address_of(&event_signer))));

    let ledger = Arc::new(CountingLedger::new(mode));
    let service = claim_service(store.clone(), ledger.clone());

    Setup {
        store,
        ledger,
        service,
        event_signer,
    }
}

#[tokio::test]
async fn valid_claim_mints_once_and_records_receipts() {
    let s = setup(LedgerMode::Succeed);
    let claimer = PrivateKeySigner::random();
    let claim = signed_claim(&s.event_signer, &claimer, "c1", 1);

    let token = s.service.redeem(&claim).await.unwrap();

    assert_eq!(s.ledger.calls(), 1);
    assert_eq!(token.owner, address_of(&claimer));

    // The redemption is finalized with the tx ref
    let record = s.store.redemption("c1").await.unwrap().unwrap();
    assert_eq!(record.event_id, 1);
    assert_eq!(record.mint_tx_ref.as_deref(), Some(token.tx_ref.as_str()));

    // And the token is visible through owner lookups
    let owned = s.store.tokens_by_owner(&token.owner).await.unwrap();
    assert_eq!(owned.len(), 1);
    assert_eq!(owned[0].token_id, token.token_id);
}

#[tokio::test]
async fn second_redeem_is_already_redeemed_without_ledger_call() {
    let s = setup(LedgerMode::Succeed);
    let claimer = PrivateKeySigner::random();
    let claim = signed_claim(&s.event_signer, &claimer, "c1", 1);

    s.service.redeem(&claim).await.unwrap();
    assert_eq!(s.ledger.calls(), 1);

    let result = s.service.redeem(&claim).await;
    assert!(matches!(
        result,
        Err(RedeemError::Rejected(ClaimRejection::AlreadyRedeemed))
    ));
    // The ledger was not called again
    assert_eq!(s.ledger.calls(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_identical_claims_mint_exactly_once() {
    const CONCURRENCY: usize = 12;

    let s = setup(LedgerMode::Succeed);
    let claimer = PrivateKeySigner::random();
    let claim = signed_claim(&s.event_signer, &claimer, "c-race", 1);

    let barrier = Arc::new(Barrier::new(CONCURRENCY));
    let mut handles = Vec::with_capacity(CONCURRENCY);

    for _ in 0..CONCURRENCY {
        let service = s.service.clone();
        let claim = claim.clone();
        let barrier = barrier.clone();
        handles.push(tokio::spawn(async move {
            barrier.wait().await;
            service.redeem(&claim).await
        }));
    }

    let mut successes = 0;
    let mut already_redeemed = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(RedeemError::Rejected(ClaimRejection::AlreadyRedeemed)) => already_redeemed += 1,
            Err(other) => panic!("unexpected outcome: {other}"),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(already_redeemed, CONCURRENCY - 1);
    // Exactly one submission reached the ledger
    assert_eq!(s.ledger.calls(), 1);
}

#[tokio::test]
async fn distinct_claims_do_not_block_each_other() {
    let s = setup(LedgerMode::Succeed);
    let alice = PrivateKeySigner::random();
    let bob = PrivateKeySigner::random();

    let a = signed_claim(&s.event_signer, &alice, "c-alice", 1);
    let b = signed_claim(&s.event_signer, &bob, "c-bob", 1);

    let (ra, rb) = tokio::join!(s.service.redeem(&a), s.service.redeem(&b));
    ra.unwrap();
    rb.unwrap();

    assert_eq!(s.ledger.calls(), 2);
}

#[tokio::test]
async fn tampered_proof_is_rejected() {
    let s = setup(LedgerMode::Succeed);
    let claimer = PrivateKeySigner::random();

    let mut claim = signed_claim(&s.event_signer, &claimer, "c1", 1);
    let mut bytes = *claim.proof.as_bytes();
    bytes[7] ^= 0x01;
    claim.proof = SignatureBytes::from(bytes);

    let result = s.service.redeem(&claim).await;
    assert!(matches!(
        result,
        Err(RedeemError::Rejected(ClaimRejection::InvalidProof))
    ));
    assert_eq!(s.ledger.calls(), 0);
}

#[tokio::test]
async fn proof_from_wrong_key_is_rejected() {
    let s = setup(LedgerMode::Succeed);
    let impostor = PrivateKeySigner::random();
    let claimer = PrivateKeySigner::random();

    let claim = signed_claim(&impostor, &claimer, "c1", 1);

    let result = s.service.redeem(&claim).await;
    assert!(matches!(
        result,
        Err(RedeemError::Rejected(ClaimRejection::InvalidProof))
    ));
}

#[tokio::test]
async fn inactive_event_accepts_no_claims() {
    let event_signer = PrivateKeySigner::random();
    let store = Arc::new(MemEventStore::new());
    // No signer: event not activated for claiming
    store.put_event(test_event(1, "devcon6", None));

    let ledger = Arc::new(CountingLedger::succeeding());
    let service = claim_service(store, ledger.clone());

    let claimer = PrivateKeySigner::random();
    let claim = signed_claim(&event_signer, &claimer, "c1", 1);

    let result = service.redeem(&claim).await;
    assert!(matches!(
        result,
        Err(RedeemError::Rejected(ClaimRejection::EventNotActive))
    ));
    assert_eq!(ledger.calls(), 0);
}

#[tokio::test]
async fn failed_mint_releases_the_claim_for_retry() {
    let s = setup(LedgerMode::Permanent);
    let claimer = PrivateKeySigner::random();
    let claim = signed_claim(&s.event_signer, &claimer, "c1", 1);

    let result = s.service.redeem(&claim).await;
    assert!(matches!(result, Err(RedeemError::LedgerRejected)));

    // The reservation was released; the claim is still usable
    assert!(s.store.redemption("c1").await.unwrap().is_none());

    // A later retry against a healthy ledger succeeds
    let healthy = Arc::new(CountingLedger::succeeding());
    let service = claim_service(s.store.clone(), healthy.clone());
    service.redeem(&claim).await.unwrap();
    assert_eq!(healthy.calls(), 1);
}

#[tokio::test]
async fn transient_exhaustion_surfaces_unavailable_and_releases() {
    let s = setup(LedgerMode::Transient);
    let claimer = PrivateKeySigner::random();
    let claim = signed_claim(&s.event_signer, &claimer, "c1", 1);

    let result = s.service.redeem(&claim).await;
    assert!(matches!(result, Err(RedeemError::LedgerUnavailable)));

    // Three attempts: initial + 2 retries
    assert_eq!(s.ledger.calls(), 3);
    assert!(s.store.redemption("c1").await.unwrap().is_none());
}
