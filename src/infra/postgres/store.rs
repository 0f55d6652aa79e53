//! PostgreSQL event store implementation
//!
//! The redemption reservation is a unique-constraint insert on
//! `redemptions.claim_id`: of any number of concurrent claimants, exactly
//! one insert takes effect and the rest observe a conflict.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{postgres::PgPool, FromRow};

use crate::domain::{Address, Event, EventUpdate, RedemptionRecord, TokenRecord};
use crate::infra::{EventStore, Result, ServiceError};

/// PostgreSQL-based event store
pub struct PgEventStore {
    pool: PgPool,
}

impl PgEventStore {
    /// Create a new PostgreSQL event store
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create from connection string
    pub async fn from_url(url: &str) -> Result<Self> {
        let pool = PgPool::connect(url).await?;
        Ok(Self::new(pool))
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[derive(FromRow)]
struct EventRow {
    id: i64,
    fancy_id: String,
    name: String,
    description: String,
    city: String,
    country: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    event_url: String,
    image_url: String,
    signer: Option<String>,
    signer_ip: Option<String>,
}

impl EventRow {
    fn decode(self) -> Result<Event> {
        let signer = self
            .signer
            .map(|s| Address::parse(&s))
            .transpose()
            .map_err(|e| ServiceError::Internal(format!("invalid signer in store: {}", e)))?;

        Ok(Event {
            id: self.id,
            fancy_id: self.fancy_id,
            name: self.name,
            description: self.description,
            city: self.city,
            country: self.country,
            start_date: self.start_date,
            end_date: self.end_date,
            event_url: self.event_url,
            image_url: self.image_url,
            signer,
            signer_ip: self.signer_ip,
        })
    }
}

#[derive(FromRow)]
struct RedemptionRow {
    claim_id: String,
    event_id: i64,
    redeemed_at: DateTime<Utc>,
    mint_tx_ref: Option<String>,
}

impl From<RedemptionRow> for RedemptionRecord {
    fn from(row: RedemptionRow) -> Self {
        Self {
            claim_id: row.claim_id,
            event_id: row.event_id,
            redeemed_at: row.redeemed_at,
            mint_tx_ref: row.mint_tx_ref,
        }
    }
}

#[derive(FromRow)]
struct TokenRow {
    token_id: i64,
    event_id: i64,
    owner_address: String,
    tx_ref: String,
    minted_at: DateTime<Utc>,
}

impl TokenRow {
    fn decode(self) -> Result<TokenRecord> {
        let owner = Address::parse(&self.owner_address)
            .map_err(|e| ServiceError::Internal(format!("invalid owner in store: {}", e)))?;

        Ok(TokenRecord {
            token_id: self.token_id,
            event_id: self.event_id,
            owner,
            tx_ref: self.tx_ref,
            minted_at: self.minted_at,
        })
    }
}

const EVENT_COLUMNS: &str = "id, fancy_id, name, description, city, country, \
     start_date, end_date, event_url, image_url, signer, signer_ip";

#[async_trait]
impl EventStore for PgEventStore {
    async fn event_by_id(&self, id: i64) -> Result<Option<Event>> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {} FROM events WHERE id = $1",
            EVENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(EventRow::decode).transpose()
    }

    async fn event_by_fancy_id(&self, fancy_id: &str) -> Result<Option<Event>> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {} FROM events WHERE fancy_id = $1",
            EVENT_COLUMNS
        ))
        .bind(fancy_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(EventRow::decode).transpose()
    }

    async fn list_events(&self) -> Result<Vec<Event>> {
        let rows = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {} FROM events ORDER BY id",
            EVENT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(EventRow::decode).collect()
    }

    async fn update_event(&self, fancy_id: &str, update: EventUpdate) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE events
            SET signer = $2, signer_ip = $3, event_url = $4, image_url = $5
            WHERE fancy_id = $1
            "#,
        )
        .bind(fancy_id)
        .bind(update.signer.map(|a| a.to_hex()))
        .bind(update.signer_ip)
        .bind(update.event_url)
        .bind(update.image_url)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn redemption(&self, claim_id: &str) -> Result<Option<RedemptionRecord>> {
        let row = sqlx::query_as::<_, RedemptionRow>(
            "SELECT claim_id, event_id, redeemed_at, mint_tx_ref \
             FROM redemptions WHERE claim_id = $1",
        )
        .bind(claim_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(RedemptionRecord::from))
    }

    async fn reserve_redemption(&self, claim_id: &str, event_id: i64) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO redemptions (claim_id, event_id, redeemed_at)
            VALUES ($1, $2, now())
            ON CONFLICT (claim_id) DO NOTHING
            "#,
        )
        .bind(claim_id)
        .bind(event_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn finalize_redemption(&self, claim_id: &str, tx_ref: &str) -> Result<()> {
        sqlx::query("UPDATE redemptions SET mint_tx_ref = $2 WHERE claim_id = $1")
            .bind(claim_id)
            .bind(tx_ref)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn release_redemption(&self, claim_id: &str) -> Result<()> {
        // Only provisional reservations may be released; a finalized
        // redemption is irreversible.
        sqlx::query("DELETE FROM redemptions WHERE claim_id = $1 AND mint_tx_ref IS NULL")
            .bind(claim_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn insert_token(
        &self,
        event_id: i64,
        owner: &Address,
        tx_ref: &str,
    ) -> Result<TokenRecord> {
        let row = sqlx::query_as::<_, TokenRow>(
            r#"
            INSERT INTO tokens (event_id, owner_address, tx_ref)
            VALUES ($1, $2, $3)
            RETURNING token_id, event_id, owner_address, tx_ref, minted_at
            "#,
        )
        .bind(event_id)
        .bind(owner.to_hex())
        .bind(tx_ref)
        .fetch_one(&self.pool)
        .await?;

        row.decode()
    }

    async fn tokens_by_owner(&self, owner: &Address) -> Result<Vec<TokenRecord>> {
        let rows = sqlx::query_as::<_, TokenRow>(
            "SELECT token_id, event_id, owner_address, tx_ref, minted_at \
             FROM tokens WHERE owner_address = $1 ORDER BY token_id",
        )
        .bind(owner.to_hex())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TokenRow::decode).collect()
    }

    async fn token_by_id(&self, token_id: i64) -> Result<Option<TokenRecord>> {
        let row = sqlx::query_as::<_, TokenRow>(
            "SELECT token_id, event_id, owner_address, tx_ref, minted_at \
             FROM tokens WHERE token_id = $1",
        )
        .bind(token_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TokenRow::decode).transpose()
    }
}
