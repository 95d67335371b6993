use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

/// One enrolled identity, embedding omitted.
#[derive(Debug, Serialize)]
pub struct IdentitySummary {
    pub identity_ref: String,
    pub created_at: DateTime<Utc>,
}

/// List response
#[derive(Debug, Serialize)]
pub struct IdentityListResponse {
    pub total: usize,
    pub identities: Vec<IdentitySummary>,
}

/// List enrolled identities.
///
/// Descriptors never leave the store; only references and timestamps are
/// exposed.
pub async fn list_identities(
    State(state): State<Arc<ServerState>>,
) -> ServerResult<impl IntoResponse> {
    let mut identities: Vec<IdentitySummary> = state
        .store
        .list_all()?
        .into_iter()
        .map(|record| IdentitySummary {
            identity_ref: record.identity_ref,
            created_at: record.created_at,
        })
        .collect();
    identities.sort_by(|a, b| a.identity_ref.cmp(&b.identity_ref));

    Ok(Json(IdentityListResponse {
        total: identities.len(),
        identities,
    }))
}

/// Remove an identity's enrollment.
pub async fn delete_identity(
    State(state): State<Arc<ServerState>>,
    Path(identity_ref): Path<String>,
) -> ServerResult<impl IntoResponse> {
    if state.store.get(&identity_ref)?.is_none() {
        return Err(ServerError::NotFound);
    }
    state.store.remove(&identity_ref)?;
    tracing::info!(identity_ref = %identity_ref, "identity removed");
    Ok(StatusCode::NO_CONTENT)
}
