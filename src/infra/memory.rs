//! In-memory event store
//!
//! Backs the test suite and local development without a database. The
//! redemption reservation takes the same "insert wins, duplicate loses"
//! shape as the PostgreSQL unique-constraint insert, under a single lock.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{Address, Event, EventUpdate, RedemptionRecord, TokenRecord};

use super::{EventStore, Result};

/// In-memory store for events, redemptions and tokens.
pub struct MemEventStore {
    events: RwLock<HashMap<i64, Event>>,
    redemptions: RwLock<HashMap<String, RedemptionRecord>>,
    tokens: RwLock<Vec<TokenRecord>>,
    next_token_id: AtomicI64,
}

impl MemEventStore {
    pub fn new() -> Self {
        Self {
            events: RwLock::new(HashMap::new()),
            redemptions: RwLock::new(HashMap::new()),
            tokens: RwLock::new(Vec::new()),
            next_token_id: AtomicI64::new(1),
        }
    }

    /// Seed an event (test/dev setup).
    pub fn put_event(&self, event: Event) {
        self.events.write().unwrap().insert(event.id, event);
    }
}

impl Default for MemEventStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventStore for MemEventStore {
    async fn event_by_id(&self, id: i64) -> Result<Option<Event>> {
        Ok(self.events.read().unwrap().get(&id).cloned())
    }

    async fn event_by_fancy_id(&self, fancy_id: &str) -> Result<Option<Event>> {
        Ok(self
            .events
            .read()
            .unwrap()
            .values()
            .find(|e| e.fancy_id == fancy_id)
            .cloned())
    }

    async fn list_events(&self) -> Result<Vec<Event>> {
        let mut events: Vec<Event> = self.events.read().unwrap().values().cloned().collect();
        events.sort_by_key(|e| e.id);
        Ok(events)
    }

    async fn update_event(&self, fancy_id: &str, update: EventUpdate) -> Result<bool> {
        let mut events = self.events.write().unwrap();
        match events.values_mut().find(|e| e.fancy_id == fancy_id) {
            Some(event) => {
                event.signer = update.signer;
                event.signer_ip = update.signer_ip;
                event.event_url = update.event_url;
                event.image_url = update.image_url;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn redemption(&self, claim_id: &str) -> Result<Option<RedemptionRecord>> {
        Ok(self.redemptions.read().unwrap().get(claim_id).cloned())
    }

    async fn reserve_redemption(&self, claim_id: &str, event_id: i64) -> Result<bool> {
        let mut redemptions = self.redemptions.write().unwrap();
        if redemptions.contains_key(claim_id) {
            return Ok(false);
        }
        redemptions.insert(
            claim_id.to_string(),
            RedemptionRecord {
                claim_id: claim_id.to_string(),
                event_id,
                redeemed_at: Utc::now(),
                mint_tx_ref: None,
            },
        );
        Ok(true)
    }

    async fn finalize_redemption(&self, claim_id: &str, tx_ref: &str) -> Result<()> {
        if let Some(record) = self.redemptions.write().unwrap().get_mut(claim_id) {
            record.mint_tx_ref = Some(tx_ref.to_string());
        }
        Ok(())
    }

    async fn release_redemption(&self, claim_id: &str) -> Result<()> {
        self.redemptions.write().unwrap().remove(claim_id);
        Ok(())
    }

    async fn insert_token(
        &self,
        event_id: i64,
        owner: &Address,
        tx_ref: &str,
    ) -> Result<TokenRecord> {
        let record = TokenRecord {
            token_id: self.next_token_id.fetch_add(1, Ordering::SeqCst),
            event_id,
            owner: *owner,
            tx_ref: tx_ref.to_string(),
            minted_at: Utc::now(),
        };
        self.tokens.write().unwrap().push(record.clone());
        Ok(record)
    }

    async fn tokens_by_owner(&self, owner: &Address) -> Result<Vec<TokenRecord>> {
        Ok(self
            .tokens
            .read()
            .unwrap()
            .iter()
            .filter(|t| t.owner == *owner)
            .cloned()
            .collect())
    }

    async fn token_by_id(&self, token_id: i64) -> Result<Option<TokenRecord>> {
        Ok(self
            .tokens
            .read()
            .unwrap()
            .iter()
            .find(|t| t.token_id == token_id)
            .cloned())
    }
}
