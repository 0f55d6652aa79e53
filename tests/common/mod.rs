//! Common test utilities and fixtures for integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use alloy::signers::{local::PrivateKeySigner, SignerSync};
use async_trait::async_trait;
use chrono::NaiveDate;

use mintgate::claims::ClaimService;
use mintgate::crypto::{consent_message, proof_message};
use mintgate::domain::{Address, Claim, Event, SignatureBytes};
use mintgate::infra::retry::RetryConfig;
use mintgate::infra::MemEventStore;
use mintgate::mint::{LedgerClient, LedgerError, MintOrchestrator, MintReceipt};

/// Domain address of a local signer
pub fn address_of(signer: &PrivateKeySigner) -> Address {
    Address::from(signer.address().into_array())
}

/// EIP-191 sign a message string
pub fn sign(signer: &PrivateKeySigner, message: &str) -> SignatureBytes {
    SignatureBytes::from(signer.sign_message_sync(message.as_bytes()).unwrap().as_bytes())
}

/// Test event; active iff a signer address is given
pub fn test_event(id: i64, fancy_id: &str, signer: Option<Address>) -> Event {
    Event {
        id,
        fancy_id: fancy_id.to_string(),
        name: format!("Event {fancy_id}"),
        description: "An event worth attending".to_string(),
        city: "Bogota".to_string(),
        country: "Colombia".to_string(),
        start_date: NaiveDate::from_ymd_opt(2022, 10, 11).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2022, 10, 14).unwrap(),
        event_url: "https://devcon.org".to_string(),
        image_url: "https://img.example/devcon6.png".to_string(),
        signer,
        signer_ip: None,
    }
}

/// Build a correctly signed claim for an event
pub fn signed_claim(
    event_signer: &PrivateKeySigner,
    claimer: &PrivateKeySigner,
    claim_id: &str,
    event_id: i64,
) -> Claim {
    let claimer_addr = address_of(claimer);
    Claim {
        claim_id: claim_id.to_string(),
        event_id,
        proof: sign(event_signer, &proof_message(claim_id, event_id, &claimer_addr)),
        claimer: claimer_addr,
        claimer_signature: sign(claimer, &consent_message(claim_id)),
    }
}

/// How the counting ledger behaves for every submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerMode {
    Succeed,
    Transient,
    Permanent,
}

/// Ledger double that counts submissions.
pub struct CountingLedger {
    calls: AtomicUsize,
    mode: LedgerMode,
}

impl CountingLedger {
    pub fn new(mode: LedgerMode) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            mode,
        }
    }

    pub fn succeeding() -> Self {
        Self::new(LedgerMode::Succeed)
    }

    /// Number of submissions that reached the ledger
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LedgerClient for CountingLedger {
    async fn submit_mint(
        &self,
        _event_id: i64,
        _recipient: &Address,
    ) -> Result<MintReceipt, LedgerError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        match self.mode {
            LedgerMode::Succeed => Ok(MintReceipt {
                tx_ref: format!("0x{:064x}", n),
            }),
            LedgerMode::Transient => Err(LedgerError::Transient("node busy".to_string())),
            LedgerMode::Permanent => Err(LedgerError::Permanent("execution reverted".to_string())),
        }
    }
}

/// Claim service over a shared in-memory store and counting ledger
pub fn claim_service(
    store: Arc<MemEventStore>,
    ledger: Arc<CountingLedger>,
) -> Arc<ClaimService> {
    let orchestrator =
        Arc::new(MintOrchestrator::new(ledger).with_retry_config(RetryConfig::fast()));
    Arc::new(ClaimService::new(store, orchestrator))
}
