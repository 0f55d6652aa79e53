//! Ledger client for token mint submissions
//!
//! The ledger is an external system of record: we submit `mint(event, to)`
//! and get back a transaction reference or a classified failure. Transient
//! failures (transport, timeout) are eligible for retry by the
//! orchestrator; permanent failures (contract rejection) are not.

use std::time::Duration;

use alloy::primitives::{Address as EthAddress, U256};
use alloy::providers::ProviderBuilder;
use alloy::signers::local::PrivateKeySigner;
use alloy::sol;
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use tracing::info;

use crate::domain::Address;

/// Error type for ledger submissions, pre-classified for retry decisions.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Network timeout, node busy, transport failure; eligible for retry
    #[error("transient ledger failure: {0}")]
    Transient(String),

    /// Contract-level rejection or unusable configuration; never retried
    #[error("permanent ledger failure: {0}")]
    Permanent(String),
}

impl LedgerError {
    pub fn is_transient(&self) -> bool {
        matches!(self, LedgerError::Transient(_))
    }
}

/// Receipt for a successful mint submission.
#[derive(Debug, Clone)]
pub struct MintReceipt {
    /// Transaction hash on the ledger
    pub tx_ref: String,
}

/// External ledger executing mints.
///
/// Implementations are injected at startup; handlers and services never
/// construct one themselves.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Submit one mint and wait for the ledger's verdict.
    ///
    /// Must not hang indefinitely; implementations bound each submission
    /// with a timeout and surface it as `Transient`.
    async fn submit_mint(&self, event_id: i64, recipient: &Address)
        -> Result<MintReceipt, LedgerError>;
}

// Generate contract bindings
sol! {
    #[sol(rpc)]
    interface IAttendanceMinter {
        function mintToken(uint256 eventId, address to) external returns (uint256);
    }
}

/// Ledger client configuration
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// RPC URL for the chain
    pub rpc_url: String,
    /// Minter contract address
    pub minter_address: EthAddress,
    /// Private key of the minting account
    pub private_key: String,
    /// Per-submission timeout
    pub submit_timeout: Duration,
}

impl LedgerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Option<Self> {
        let rpc_url = std::env::var("LEDGER_RPC_URL").ok()?;
        let minter_address = std::env::var("MINTER_CONTRACT_ADDRESS")
            .ok()
            .and_then(|s| s.parse().ok())?;
        let private_key = std::env::var("MINTER_PRIVATE_KEY").ok()?;
        let submit_timeout = std::env::var("LEDGER_SUBMIT_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(30));

        Some(Self {
            rpc_url,
            minter_address,
            private_key,
            submit_timeout,
        })
    }
}

/// Chain-backed ledger client.
pub struct EthLedgerClient {
    config: LedgerConfig,
}

impl EthLedgerClient {
    /// Create a new ledger client
    pub fn new(config: LedgerConfig) -> Self {
        Self { config }
    }

    fn to_eth_address(address: &Address) -> EthAddress {
        EthAddress::from_slice(address.as_bytes())
    }

    async fn submit(&self, event_id: i64, recipient: &Address) -> Result<MintReceipt, LedgerError> {
        // Configuration problems are permanent; retrying cannot fix them.
        let signer: PrivateKeySigner = self
            .config
            .private_key
            .parse()
            .map_err(|e| LedgerError::Permanent(format!("invalid private key: {}", e)))?;

        let provider = ProviderBuilder::new()
            .with_recommended_fillers()
            .wallet(alloy::network::EthereumWallet::from(signer))
            .on_http(
                self.config
                    .rpc_url
                    .parse()
                    .map_err(|e| LedgerError::Permanent(format!("invalid RPC URL: {}", e)))?,
            );

        let contract = IAttendanceMinter::new(self.config.minter_address, &provider);

        let tx = contract.mintToken(U256::from(event_id as u64), Self::to_eth_address(recipient));

        let pending = tx.send().await.map_err(classify_contract_error)?;

        let receipt = pending
            .get_receipt()
            .await
            .map_err(|e| LedgerError::Transient(format!("failed to get receipt: {}", e)))?;

        let tx_ref = format!("0x{}", hex::encode(receipt.transaction_hash.0));

        info!(
            event_id,
            recipient = %recipient,
            tx = %tx_ref,
            block = receipt.block_number.unwrap_or(0),
            "mint confirmed"
        );

        Ok(MintReceipt { tx_ref })
    }
}

/// Classify a contract call failure.
///
/// Transport-level failures may clear up on retry; anything the node
/// understood and rejected (reverts, ABI mismatches) is final.
fn classify_contract_error(err: alloy::contract::Error) -> LedgerError {
    match err {
        alloy::contract::Error::TransportError(e) => LedgerError::Transient(e.to_string()),
        other => LedgerError::Permanent(other.to_string()),
    }
}

#[async_trait]
impl LedgerClient for EthLedgerClient {
    async fn submit_mint(
        &self,
        event_id: i64,
        recipient: &Address,
    ) -> Result<MintReceipt, LedgerError> {
        match tokio::time::timeout(self.config.submit_timeout, self.submit(event_id, recipient))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(LedgerError::Transient(format!(
                "mint submission timed out after {:?}",
                self.config.submit_timeout
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(LedgerError::Transient("timeout".into()).is_transient());
        assert!(!LedgerError::Permanent("revert".into()).is_transient());
    }

    #[test]
    fn test_to_eth_address() {
        let addr: Address = "0x22d491bde2303f2f43325b2108d26f1eaba1e32b"
            .parse()
            .unwrap();
        let eth = EthLedgerClient::to_eth_address(&addr);
        assert_eq!(eth.as_slice(), addr.as_bytes());
    }
}
