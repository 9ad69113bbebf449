use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use axum_extra::extract::WithRejection;
use tavola_core::{ReservationConfirmation, ReservationList};
use tavola_shared::{AvailabilitySnapshot, ReservationFilter, ReservationRequest};

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reservations", get(list_reservations).post(create_reservation))
        .route("/reservations/availability/{date}", get(check_availability))
}

async fn create_reservation(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<ReservationRequest>, AppError>,
) -> Result<(StatusCode, Json<ReservationConfirmation>), AppError> {
    let confirmation = state.reservations.submit_reservation(&req).await?;
    Ok((StatusCode::CREATED, Json(confirmation)))
}

async fn check_availability(
    State(state): State<AppState>,
    WithRejection(Path(date), _): WithRejection<Path<String>, AppError>,
) -> Result<Json<AvailabilitySnapshot>, AppError> {
    Ok(Json(state.reservations.check_availability(&date).await?))
}

async fn list_reservations(
    State(state): State<AppState>,
    WithRejection(Query(filter), _): WithRejection<Query<ReservationFilter>, AppError>,
) -> Result<Json<ReservationList>, AppError> {
    Ok(Json(state.reservations.list_reservations(&filter).await?))
}
