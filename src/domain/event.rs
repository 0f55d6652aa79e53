//! Event records
//!
//! An event is the unit participants claim attendance tokens against. The
//! `signer` address authorizes claims for the event; until it is set the
//! event is not activated for claiming.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Address;

/// An event that attendance tokens can be minted for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Numeric event identifier
    pub id: i64,

    /// Human-readable unique alias (e.g. "devcon6")
    pub fancy_id: String,

    pub name: String,
    pub description: String,
    pub city: String,
    pub country: String,

    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    pub event_url: String,
    pub image_url: String,

    /// Address whose signature authorizes claims; None until activation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signer: Option<Address>,

    /// IP the signer device registered from (operational metadata)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signer_ip: Option<String>,
}

impl Event {
    /// Whether the event currently accepts claims.
    pub fn is_active(&self) -> bool {
        self.signer.is_some()
    }
}

/// Mutable subset of an event, applied by the privileged update endpoint.
///
/// `signer`/`signer_ip` are full replacements (setting `None` deactivates
/// claiming for the event).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventUpdate {
    pub signer: Option<Address>,
    pub signer_ip: Option<String>,
    pub event_url: String,
    pub image_url: String,
}
