//! Event catalog shown by the storefront.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub venue: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organizer {
    pub name: String,
    pub logo: String,
    pub description: String,
}

/// A purchasable ticket category of an event.
///
/// `available` is the capacity the storefront lets a visitor put in the
/// cart; the cart itself never enforces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketTier {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub description: String,
    pub available: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub featured: bool,
    pub image: String,
    pub header_image: String,
    #[serde(with = "time::serde::rfc3339")]
    pub date_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_date_time: OffsetDateTime,
    pub location: Location,
    pub starting_price: Decimal,
    pub organizer: Organizer,
    pub ticket_tiers: Vec<TicketTier>,
}

impl Event {
    pub fn tier(&self, tier_id: &str) -> Option<&TicketTier> {
        self.ticket_tiers.iter().find(|t| t.id == tier_id)
    }
}

/// Compact listing entry used by the event grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSummary {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub featured: bool,
    pub image: String,
    #[serde(with = "time::serde::rfc3339")]
    pub date_time: OffsetDateTime,
    pub city: String,
    pub venue: String,
    pub starting_price: Decimal,
}

impl From<&Event> for EventSummary {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id.clone(),
            name: event.name.clone(),
            kind: event.kind.clone(),
            featured: event.featured,
            image: event.image.clone(),
            date_time: event.date_time,
            city: event.location.city.clone(),
            venue: event.location.venue.clone(),
            starting_price: event.starting_price,
        }
    }
}
