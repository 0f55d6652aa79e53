//! Mint orchestration
//!
//! Drives single and batch mints against the ledger client. Mints for one
//! event originate from one signing account on the ledger, so batch
//! submissions flow through an ordered pipeline of bounded width rather
//! than a full fan-out; a failed address never aborts its siblings.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::warn;

use crate::domain::{Address, MintErrorKind, MintOutcome};
use crate::infra::retry::RetryConfig;

use super::{LedgerClient, LedgerError, MintReceipt};

/// Upper bound on in-flight batch submissions; beyond this, per-account
/// transaction ordering conflicts outweigh the latency overlap.
const MAX_BATCH_WIDTH: usize = 4;

/// Orchestrates mint submissions with retry and bounded batch concurrency.
pub struct MintOrchestrator {
    ledger: Arc<dyn LedgerClient>,
    retry: RetryConfig,
    batch_width: usize,
}

impl MintOrchestrator {
    /// Create an orchestrator with the default retry budget and batch width.
    pub fn new(ledger: Arc<dyn LedgerClient>) -> Self {
        Self {
            ledger,
            retry: RetryConfig::ledger(),
            batch_width: 2,
        }
    }

    /// Override the retry configuration
    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Override the batch pipeline width (clamped to 1..=4)
    pub fn with_batch_width(mut self, width: usize) -> Self {
        self.batch_width = width.clamp(1, MAX_BATCH_WIDTH);
        self
    }

    /// Submit one mint, retrying transient failures within the budget.
    pub async fn submit_with_retry(
        &self,
        event_id: i64,
        recipient: &Address,
    ) -> Result<MintReceipt, LedgerError> {
        self.retry
            .run(
                || self.ledger.submit_mint(event_id, recipient),
                LedgerError::is_transient,
            )
            .await
    }

    /// Mint one token, returning a per-address outcome.
    pub async fn mint_single(&self, event_id: i64, recipient: &Address) -> MintOutcome {
        match self.submit_with_retry(event_id, recipient).await {
            Ok(receipt) => MintOutcome::minted(*recipient, receipt.tx_ref),
            Err(e) => {
                warn!(event_id, recipient = %recipient, error = %e, "mint failed");
                let kind = if e.is_transient() {
                    MintErrorKind::LedgerUnavailable
                } else {
                    MintErrorKind::LedgerRejected
                };
                MintOutcome::failed(*recipient, kind)
            }
        }
    }

    /// Mint for every recipient, one outcome per input address in input
    /// order. Submissions start in input order with at most `batch_width`
    /// in flight.
    pub async fn mint_batch(&self, event_id: i64, recipients: &[Address]) -> Vec<MintOutcome> {
        stream::iter(recipients.iter().copied())
            .map(|recipient| async move { self.mint_single(event_id, &recipient).await })
            .buffered(self.batch_width)
            .collect()
            .await
    }
}

// ============================================================================
// Tests
// ============================================================================
