//! Storefront request and response types.
//!
//! These are returned by the demo HTTP surface to the pages that render the
//! event grid, the ticket selector and the checkout stepper.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::cart::CartLineItem;
use super::catalog::TicketTier;
use super::widget::PaymentWidgetProps;

/// A cart line together with the event it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
    pub event_id: String,
    #[serde(flatten)]
    pub item: CartLineItem,
    pub line_total: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub total: Decimal,
}

/// One tier as rendered by the ticket selector.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierSelection {
    #[serde(flatten)]
    pub tier: TicketTier,
    pub quantity: u32,
    pub can_increment: bool,
    pub can_decrement: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionView {
    pub event_id: String,
    pub tiers: Vec<TierSelection>,
    pub total: Decimal,
    pub can_checkout: bool,
}

/// Steps of the checkout stepper.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutStep {
    #[default]
    Cart,
    Payment,
}

impl CheckoutStep {
    pub const ALL: [CheckoutStep; 2] = [CheckoutStep::Cart, CheckoutStep::Payment];

    pub const fn title(self) -> &'static str {
        match self {
            CheckoutStep::Cart => "Cart Review",
            CheckoutStep::Payment => "Payment",
        }
    }
}

/// Stepper state. `widget` is only present on the payment step.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutView {
    pub step: CheckoutStep,
    pub has_items: bool,
    pub cart: CartView,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget: Option<PaymentWidgetProps>,
}

/// Returned once the widget reported a successful payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSuccessView {
    pub cleared_items: usize,
    pub redirect_to: String,
    pub redirect_after_secs: u64,
}
