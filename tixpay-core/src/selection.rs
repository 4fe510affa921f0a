//! Ticket selector for one event.

use rust_decimal::Decimal;
use std::num::NonZeroU32;
use tixpay_sdk::objects::{CartKey, Event, SelectionView, TicketTier, TierSelection};

use crate::cart::{CartStorage, CartStore, Decrement};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Event {event_id} has no ticket tier {tier_id}")]
    UnknownTier { event_id: String, tier_id: String },
    #[error("Only {available} ticket(s) of {tier_id} are available")]
    SoldOut { tier_id: String, available: u32 },
}

/// Read view of a cart restricted to one event's tiers.
pub struct TicketSelection<'a, S> {
    event: &'a Event,
    cart: &'a CartStore<S>,
}

impl<'a, S> TicketSelection<'a, S> {
    pub fn new(event: &'a Event, cart: &'a CartStore<S>) -> Self {
        Self { event, cart }
    }

    pub fn quantity(&self, tier: &TicketTier) -> u32 {
        self.cart.quantity(CartKey::new(&self.event.id, &tier.id).as_str())
    }

    /// False once the cart holds every available ticket of `tier`.
    pub fn can_increment(&self, tier: &TicketTier) -> bool {
        self.quantity(tier) < tier.available
    }

    pub fn can_decrement(&self, tier: &TicketTier) -> bool {
        self.quantity(tier) > 0
    }

    pub fn total(&self) -> Decimal {
        self.cart.scope_total(&self.event.id)
    }

    pub fn view(&self) -> SelectionView {
        let tiers = self
            .event
            .ticket_tiers
            .iter()
            .map(|tier| TierSelection {
                tier: tier.clone(),
                quantity: self.quantity(tier),
                can_increment: self.can_increment(tier),
                can_decrement: self.can_decrement(tier),
            })
            .collect();
        let total = self.total();
        SelectionView {
            event_id: self.event.id.clone(),
            tiers,
            total,
            can_checkout: total > Decimal::ZERO,
        }
    }
}

/// Add one ticket of `tier_id` to the cart, respecting the tier's capacity.
pub fn add_ticket<S: CartStorage>(
    cart: &mut CartStore<S>,
    event: &Event,
    tier_id: &str,
) -> Result<NonZeroU32, SelectionError> {
    let tier = find_tier(event, tier_id)?;
    if !TicketSelection::new(event, cart).can_increment(tier) {
        return Err(SelectionError::SoldOut {
            tier_id: tier.id.clone(),
            available: tier.available,
        });
    }
    Ok(cart.increment_quantity(CartKey::new(&event.id, &tier.id), tier))
}

/// Remove one ticket of `tier_id` from the cart.
pub fn remove_ticket<S: CartStorage>(
    cart: &mut CartStore<S>,
    event: &Event,
    tier_id: &str,
) -> Result<Decrement, SelectionError> {
    let tier = find_tier(event, tier_id)?;
    Ok(cart.decrement_quantity(CartKey::new(&event.id, &tier.id).as_str()))
}

fn find_tier<'e>(event: &'e Event, tier_id: &str) -> Result<&'e TicketTier, SelectionError> {
    event
        .tier(tier_id)
        .ok_or_else(|| SelectionError::UnknownTier {
            event_id: event.id.clone(),
            tier_id: tier_id.to_owned(),
        })
}
