//! HTTP API of the demo storefront and playground.
//!
//! # Endpoints
//!
//! - `GET    /events`                                   – catalog listing
//! - `GET    /events/{event_id}`                        – event detail
//! - `GET    /events/{event_id}/selection`              – ticket selector state
//! - `POST   /events/{event_id}/tiers/{tier_id}/increment`
//! - `POST   /events/{event_id}/tiers/{tier_id}/decrement`
//! - `GET    /cart`, `DELETE /cart`
//! - `GET    /checkout`, `POST /checkout/{proceed,back,payment-success}`
//! - `POST   /playground/validate`
//! - `GET    /currencies`
//!
//! Cart and checkout endpoints require the `X-Session-Id` header.

use axum::{
    Router,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tixpay_core::checkout::CheckoutError;
use tixpay_core::selection::SelectionError;

use crate::state::AppState;

mod cart;
mod checkout;
mod currencies;
mod events;
pub mod extractors;
mod playground;

/// Build the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(events::router())
        .merge(cart::router())
        .merge(checkout::router())
        .merge(playground::router())
        .merge(currencies::router())
}

// ---------------------------------------------------------------------------
// Error handling
// ---------------------------------------------------------------------------

/// Errors that can occur in API handlers.
#[derive(Debug, thiserror::Error)]
enum ApiError {
    #[error("event {0} not found")]
    EventNotFound(String),
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error(transparent)]
    Checkout(#[from] CheckoutError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::EventNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Selection(SelectionError::UnknownTier { .. }) => StatusCode::NOT_FOUND,
            ApiError::Selection(SelectionError::SoldOut { .. }) => StatusCode::CONFLICT,
            ApiError::Checkout(CheckoutError::EmptyCart) => StatusCode::CONFLICT,
        };
        (status, self.to_string()).into_response()
    }
}
