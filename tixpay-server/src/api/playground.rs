use axum::{Json, Router, extract::State, routing::post};
use serde_json::Value;
use tixpay_core::playground::PlaygroundSession;
use tixpay_sdk::objects::PlaygroundReport;

use crate::state::AppState;

pub(super) fn router() -> Router<AppState> {
    Router::new().route("/playground/validate", post(validate_draft))
}

/// `POST /playground/validate`: validate a widget configuration draft.
///
/// Field errors are part of the report, so an invalid draft still answers
/// 200 with `valid: false`.
async fn validate_draft(
    State(state): State<AppState>,
    Json(draft): Json<Value>,
) -> Json<PlaygroundReport> {
    let builder_id = state.config().await.checkout.builder_id.clone();
    let report = PlaygroundSession::from_draft(draft)
        .with_builder_id(builder_id)
        .report();
    if !report.valid {
        tracing::debug!(fields = report.errors.len(), "Playground draft rejected");
    }
    Json(report)
}
