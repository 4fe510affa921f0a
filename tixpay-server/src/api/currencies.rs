use axum::{Json, Router, routing::get};
use tixpay_sdk::objects::{CurrencyId, CurrencyOption};

use crate::state::AppState;

pub(super) fn router() -> Router<AppState> {
    Router::new().route("/currencies", get(list_currencies))
}

/// `GET /currencies`: every currency the widget accepts, with labels.
async fn list_currencies() -> Json<Vec<CurrencyOption>> {
    Json(CurrencyId::ALL.iter().copied().map(CurrencyOption::from).collect())
}
