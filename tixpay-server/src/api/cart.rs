use axum::{
    Json, Router,
    extract::State,
    routing::get,
};
use tixpay_core::checkout::cart_view;
use tixpay_sdk::objects::CartView;

use crate::api::extractors::SessionId;
use crate::state::AppState;

pub(super) fn router() -> Router<AppState> {
    Router::new().route("/cart", get(get_cart).delete(clear_cart))
}

/// `GET /cart`: every line of the visitor's cart and the overall total.
/// Does not open a session.
async fn get_cart(State(state): State<AppState>, SessionId(session_id): SessionId) -> Json<CartView> {
    Json(
        state
            .sessions
            .view(session_id, |session| cart_view(&session.cart))
            .await,
    )
}

/// `DELETE /cart`: empty the cart and return it.
async fn clear_cart(
    State(state): State<AppState>,
    SessionId(session_id): SessionId,
) -> Json<CartView> {
    let session = state.sessions.get_or_open(session_id).await;
    let mut session = session.lock().await;
    let cleared = session.cart.clear_tickets();
    tracing::debug!(session_id = %session_id, cleared, "Cart cleared");
    Json(cart_view(&session.cart))
}
