//! Token metadata documents
//!
//! Pure transform from an event record to the fixed metadata schema served
//! at `/metadata/:event_id/:token_id`. Deterministic: the same event always
//! serializes to byte-identical output (fixed field order, no maps).

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::domain::Event;

/// Fixed tag set stamped on every document.
const TAGS: [&str; 2] = ["attendance", "event"];

/// One trait entry in the attribute list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataAttribute {
    pub trait_type: String,
    pub value: String,
}

/// Token metadata document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataDocument {
    pub description: String,
    pub external_url: String,
    pub home_url: String,
    pub image_url: String,
    pub name: String,
    pub year: i32,
    pub tags: Vec<String>,
    pub attributes: Vec<MetadataAttribute>,
}

fn attribute(trait_type: &str, value: impl Into<String>) -> MetadataAttribute {
    MetadataAttribute {
        trait_type: trait_type.to_string(),
        value: value.into(),
    }
}

/// Build the metadata document for a token of `event`.
///
/// `canonical_url` is the URL this document is served at and becomes the
/// document's `external_url`.
pub fn build_metadata(canonical_url: &str, event: &Event) -> MetadataDocument {
    MetadataDocument {
        description: event.description.clone(),
        external_url: canonical_url.to_string(),
        home_url: event.event_url.clone(),
        image_url: event.image_url.clone(),
        name: event.name.clone(),
        year: event.start_date.year(),
        tags: TAGS.iter().map(|t| t.to_string()).collect(),
        attributes: vec![
            attribute("startDate", event.start_date.to_string()),
            attribute("endDate", event.end_date.to_string()),
            attribute("city", event.city.clone()),
            attribute("country", event.country.clone()),
            attribute("eventURL", event.event_url.clone()),
        ],
    }
}

// ============================================================================
// Tests
// ============================================================================
