//! Mintgate Library
//!
//! Attendance-token service: participants present a twice-signed claim and
//! receive a non-fungible token minted on an external ledger. Each claim is
//! redeemable at most once, under any level of request concurrency.
//!
//! ## Modules
//!
//! - [`domain`] - Core domain types (events, claims, tokens, addresses)
//! - [`crypto`] - Signature recovery and claim message binding
//! - [`claims`] - Claim authorization and the redeem flow
//! - [`mint`] - Ledger client and mint orchestration
//! - [`metadata`] - Token metadata documents
//! - [`infra`] - Infrastructure (store trait, PostgreSQL, retry)
//! - [`auth`] - Privileged-endpoint authentication
//! - [`api`] - REST API routes

pub mod api;
pub mod auth;
pub mod claims;
pub mod crypto;
pub mod domain;
pub mod infra;
pub mod metadata;
pub mod migrations;
pub mod mint;
pub mod server;

// Re-export commonly used types
pub use domain::{
    Address, Claim, Event, MintOutcome, RedemptionRecord, SignatureBytes, TokenRecord,
};

pub use infra::{EventStore, Result, ServiceError};
