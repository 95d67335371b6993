use crate::error::ServerResult;
use crate::state::ServerState;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use std::sync::Arc;

/// Liveness check: the process is up and serving.
pub async fn health_check() -> ServerResult<impl IntoResponse> {
    Ok(Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    })))
}

/// Readiness check: the enrollment store answers reads.
pub async fn readiness_check(
    State(state): State<Arc<ServerState>>,
) -> ServerResult<impl IntoResponse> {
    let enrolled = state.store.count()?;
    Ok(Json(json!({
        "status": "ready",
        "enrolled_identities": enrolled,
    })))
}
