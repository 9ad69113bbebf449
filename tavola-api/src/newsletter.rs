use axum::{extract::State, routing::post, Json, Router};
use axum_extra::extract::WithRejection;
use tavola_core::SubscriptionConfirmation;
use tavola_shared::SubscribeRequest;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/newsletter", post(subscribe))
}

async fn subscribe(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<SubscribeRequest>, AppError>,
) -> Result<Json<SubscriptionConfirmation>, AppError> {
    Ok(Json(state.subscribers.subscribe(&req).await?))
}
