//! API route handlers
//!
//! This module contains all HTTP endpoint implementations for the Facegate
//! server. Routes are organized by functionality:
//!
//! - `health`: Health and readiness checks
//! - `auth`: Face registration and face-login verification
//! - `identities`: Enrollment listing and removal

pub mod auth;
pub mod health;
pub mod identities;

use crate::error::{ServerError, ServerResult};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

/// API version and base info
///
/// Returns server information including version and available endpoints.
/// This is the root endpoint (GET /) and requires no authentication.
pub async fn api_info() -> ServerResult<impl IntoResponse> {
    Ok(Json(json!({
        "name": "Facegate Server",
        "version": env!("CARGO_PKG_VERSION"),
        "api_version": "v1",
        "endpoints": [
            "/auth/register",
            "/auth/login",
            "/auth/session",
            "/auth/logout",
            "/api/v1/identities",
            "/health",
            "/ready"
        ]
    })))
}

/// 404 Not Found handler
///
/// Returns a standardized error response for undefined routes.
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
