//! Readiness endpoint

use axum::{
    Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
};
use axum_helpers::{HealthCheckFuture, run_health_checks};
#[allow(unused_imports)]
use serde_json::json;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(readiness_check))
        .with_state(state)
}

/// Readiness check - verifies the MongoDB connection
#[utoipa::path(
    get,
    path = "/ready",
    tag = "health",
    responses(
        (status = 200, description = "All dependencies reachable", body = Object,
            example = json!({ "status": "ready", "mongodb": "connected" })),
        (status = 503, description = "A dependency is unreachable", body = Object,
            example = json!({ "status": "not ready", "mongodb": "disconnected" }))
    )
)]
pub async fn readiness_check(State(state): State<AppState>) -> Response {
    let client = state.mongo_client.clone();
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
        "mongodb",
        Box::pin(async move {
            database::mongodb::ping(&client)
                .await
                .map_err(|e| e.to_string())
        }),
    )];

    match run_health_checks(checks).await {
        Ok(ready) => ready.into_response(),
        Err(not_ready) => not_ready.into_response(),
    }
}
