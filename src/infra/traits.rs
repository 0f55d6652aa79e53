//! Trait definition for the event/claim/token store

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::domain::{Address, Event, EventUpdate, RedemptionRecord, TokenRecord};

use super::Result;

/// Persistent store for events, redemption state and mint receipts.
///
/// Invariant: `reserve_redemption` is an atomic check-and-set on the claim
/// id. For any claim id, across any number of concurrent callers, it returns
/// `true` exactly once until that reservation is released.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Look up an event by numeric id
    async fn event_by_id(&self, id: i64) -> Result<Option<Event>>;

    /// Look up an event by its human-readable alias
    async fn event_by_fancy_id(&self, fancy_id: &str) -> Result<Option<Event>>;

    /// List all events, ordered by id
    async fn list_events(&self) -> Result<Vec<Event>>;

    /// Apply an update to the event with the given alias.
    ///
    /// Returns false if no such event exists.
    async fn update_event(&self, fancy_id: &str, update: EventUpdate) -> Result<bool>;

    /// Read the redemption record for a claim id, if any
    async fn redemption(&self, claim_id: &str) -> Result<Option<RedemptionRecord>>;

    /// Atomically reserve redemption of a claim id.
    ///
    /// Inserts a provisional record (no tx ref yet). Returns true if this
    /// caller won the reservation, false if a record already exists.
    async fn reserve_redemption(&self, claim_id: &str, event_id: i64) -> Result<bool>;

    /// Finalize a reserved redemption with the mint transaction reference
    async fn finalize_redemption(&self, claim_id: &str, tx_ref: &str) -> Result<()>;

    /// Release a reserved redemption after a failed mint, making the claim
    /// usable again
    async fn release_redemption(&self, claim_id: &str) -> Result<()>;

    /// Record a mint receipt; the store assigns the token id
    async fn insert_token(&self, event_id: i64, owner: &Address, tx_ref: &str)
        -> Result<TokenRecord>;

    /// Tokens owned by an address, ordered by token id
    async fn tokens_by_owner(&self, owner: &Address) -> Result<Vec<TokenRecord>>;

    /// Look up a token by id
    async fn token_by_id(&self, token_id: i64) -> Result<Option<TokenRecord>>;
}
