use axum::{extract::State, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    timestamp: DateTime<Utc>,
    environment: String,
    store: &'static str,
}

#[derive(Debug, Serialize)]
pub struct StoreProbe {
    success: bool,
    message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct StoreInfo {
    configured: bool,
    environment: String,
    timestamp: DateTime<Utc>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/store/test", get(store_test))
        .route("/store/info", get(store_info))
}

fn store_status(state: &AppState) -> &'static str {
    if state.store.is_configured() {
        "configured"
    } else {
        "not configured"
    }
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now(),
        store: store_status(&state),
        environment: state.environment.clone(),
    })
}

async fn store_test(State(state): State<AppState>) -> Result<Json<StoreProbe>, AppError> {
    state
        .store
        .ping()
        .await
        .map_err(|e| AppError::Persistence(format!("Store connection test failed: {}", e)))?;

    Ok(Json(StoreProbe { success: true, message: "Store connection OK" }))
}

async fn store_info(State(state): State<AppState>) -> Json<StoreInfo> {
    Json(StoreInfo {
        configured: state.store.is_configured(),
        environment: state.environment.clone(),
        timestamp: Utc::now(),
    })
}
