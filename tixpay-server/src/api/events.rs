//! Catalog and ticket selector endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use tixpay_core::selection::{TicketSelection, add_ticket, remove_ticket};
use tixpay_sdk::objects::{Event, EventSummary, SelectionView};

use super::ApiError;
use crate::api::extractors::SessionId;
use crate::state::AppState;

pub(super) fn router() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_events))
        .route("/events/{event_id}", get(get_event))
        .route("/events/{event_id}/selection", get(get_selection))
        .route(
            "/events/{event_id}/tiers/{tier_id}/increment",
            post(increment_tier),
        )
        .route(
            "/events/{event_id}/tiers/{tier_id}/decrement",
            post(decrement_tier),
        )
}

/// `GET /events`: featured events first.
async fn list_events(State(state): State<AppState>) -> Json<Vec<EventSummary>> {
    Json(state.config().await.catalog.summaries())
}

async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> Result<Json<Event>, ApiError> {
    let config = state.config().await;
    let event = config
        .catalog
        .get(&event_id)
        .ok_or(ApiError::EventNotFound(event_id))?;
    Ok(Json(event.clone()))
}

/// `GET /events/{event_id}/selection`: tiers with the visitor's quantities.
async fn get_selection(
    State(state): State<AppState>,
    SessionId(session_id): SessionId,
    Path(event_id): Path<String>,
) -> Result<Json<SelectionView>, ApiError> {
    let config = state.config().await;
    let event = config
        .catalog
        .get(&event_id)
        .ok_or(ApiError::EventNotFound(event_id))?;

    let view = state
        .sessions
        .view(session_id, |session| {
            TicketSelection::new(event, &session.cart).view()
        })
        .await;
    Ok(Json(view))
}

/// `POST /events/{event_id}/tiers/{tier_id}/increment`: 409 once the
/// visitor holds every available ticket of the tier.
async fn increment_tier(
    State(state): State<AppState>,
    SessionId(session_id): SessionId,
    Path((event_id, tier_id)): Path<(String, String)>,
) -> Result<Json<SelectionView>, ApiError> {
    let config = state.config().await;
    let event = config
        .catalog
        .get(&event_id)
        .ok_or(ApiError::EventNotFound(event_id))?;

    let session = state.sessions.get_or_open(session_id).await;
    let mut session = session.lock().await;
    let quantity = add_ticket(&mut session.cart, event, &tier_id)?;
    tracing::debug!(session_id = %session_id, event_id = %event.id, tier_id = %tier_id, quantity = quantity.get(), "Ticket added");
    Ok(Json(TicketSelection::new(event, &session.cart).view()))
}

/// `POST /events/{event_id}/tiers/{tier_id}/decrement`: a tier that is not
/// in the cart is left alone.
async fn decrement_tier(
    State(state): State<AppState>,
    SessionId(session_id): SessionId,
    Path((event_id, tier_id)): Path<(String, String)>,
) -> Result<Json<SelectionView>, ApiError> {
    let config = state.config().await;
    let event = config
        .catalog
        .get(&event_id)
        .ok_or(ApiError::EventNotFound(event_id))?;

    let session = state.sessions.get_or_open(session_id).await;
    let mut session = session.lock().await;
    let outcome = remove_ticket(&mut session.cart, event, &tier_id)?;
    tracing::debug!(session_id = %session_id, event_id = %event.id, tier_id = %tier_id, ?outcome, "Ticket removed");
    Ok(Json(TicketSelection::new(event, &session.cart).view()))
}
