//! Checkout stepper endpoints.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use tixpay_sdk::objects::{CheckoutView, PaymentSuccessView};

use super::ApiError;
use crate::api::extractors::SessionId;
use crate::state::AppState;

pub(super) fn router() -> Router<AppState> {
    Router::new()
        .route("/checkout", get(get_checkout))
        .route("/checkout/proceed", post(proceed_to_payment))
        .route("/checkout/back", post(back_to_cart))
        .route("/checkout/payment-success", post(payment_success))
}

async fn get_checkout(
    State(state): State<AppState>,
    SessionId(session_id): SessionId,
) -> Json<CheckoutView> {
    let config = state.config().await;
    let view = state
        .sessions
        .view(session_id, |session| {
            session.stepper.view(&session.cart, &config.checkout)
        })
        .await;
    Json(view)
}

/// `POST /checkout/proceed`: 409 while the cart is empty.
async fn proceed_to_payment(
    State(state): State<AppState>,
    SessionId(session_id): SessionId,
) -> Result<Json<CheckoutView>, ApiError> {
    let config = state.config().await;
    let session = state.sessions.get_or_open(session_id).await;
    let mut session = session.lock().await;
    let session = &mut *session;
    session.stepper.proceed_to_payment(&session.cart)?;
    Ok(Json(session.stepper.view(&session.cart, &config.checkout)))
}

async fn back_to_cart(
    State(state): State<AppState>,
    SessionId(session_id): SessionId,
) -> Json<CheckoutView> {
    let config = state.config().await;
    let session = state.sessions.get_or_open(session_id).await;
    let mut session = session.lock().await;
    session.stepper.back_to_cart();
    Json(session.stepper.view(&session.cart, &config.checkout))
}

/// `POST /checkout/payment-success`: called once the widget reports a
/// successful payment. Clears the cart and schedules the redirect.
async fn payment_success(
    State(state): State<AppState>,
    SessionId(session_id): SessionId,
) -> Json<PaymentSuccessView> {
    let config = state.config().await;
    let session = state.sessions.get_or_open(session_id).await;
    let mut session = session.lock().await;
    let session = &mut *session;

    let cleared_items = session.cart.len();
    let redirect = config.checkout.on_payment_success(&mut session.cart);
    session.stepper.back_to_cart();

    let view = PaymentSuccessView {
        cleared_items,
        redirect_to: redirect.target().to_owned(),
        redirect_after_secs: redirect.delay().as_secs(),
    };
    if let Some(previous) = session.redirect.replace(redirect)
        && previous.is_pending()
    {
        tracing::debug!(session_id = %session_id, "Cancelling earlier pending redirect");
    }
    Json(view)
}
