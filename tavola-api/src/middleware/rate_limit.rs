use axum::{
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::net::SocketAddr;
use tavola_store::redis_repo::rate_limit_key;

use crate::state::AppState;

/// Fixed-window limit per client IP. Redis errors let the request through.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    req: Request,
    next: Next,
) -> Response {
    let Some(redis) = state.redis.as_ref() else {
        return next.run(req).await;
    };

    let key = rate_limit_key(&addr.ip().to_string());
    let limit = state.rate_limit;

    match redis.check_rate_limit(&key, limit.max_requests, limit.window_seconds).await {
        Ok(true) => next.run(req).await,
        Ok(false) => {
            tracing::warn!(client = %addr.ip(), "Rate limit exceeded");
            (
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({ "error": "Rate limit exceeded" })),
            )
                .into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Rate limiter unavailable, failing open");
            next.run(req).await
        }
    }
}
