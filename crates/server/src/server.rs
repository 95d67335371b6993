//! Server initialization and routing
//!
//! This module handles the Axum server setup including:
//! - Router configuration with all API endpoints
//! - Middleware stack (request IDs, logging, CORS, timeouts)
//! - Graceful shutdown handling

use crate::config::ServerConfig;
use crate::middleware::{log_requests, request_id};
use crate::routes::{api_info, not_found};
use crate::routes::{auth, health, identities};
use crate::state::ServerState;
use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn;
use axum::routing::{delete, get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Build the Axum router with all routes and middleware
///
/// Routes are divided into:
/// - Public routes: /, /health, /ready
/// - Auth routes: /auth/register, /auth/login (multipart photo uploads)
/// - Management routes: /api/v1/identities
///
/// Middleware stack (applied in reverse order):
/// 1. Request ID tracking
/// 2. Request logging
/// 3. Timeout handling
/// 4. CORS
pub fn build_router(state: Arc<ServerState>) -> Router {
    // CORS layer
    let cors = if state.config.enable_cors {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    };

    // Public routes
    let public_routes = Router::new()
        .route("/", get(api_info))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check));

    // Photo upload routes carry the configured body limit
    let auth_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .layer(DefaultBodyLimit::max(state.config.max_body_size()))
        .route("/auth/session", get(auth::session))
        .route("/auth/logout", post(auth::logout));

    // Enrollment management
    let management_routes = Router::new()
        .route("/api/v1/identities", get(identities::list_identities))
        .route(
            "/api/v1/identities/{identity_ref}",
            delete(identities::delete_identity),
        );

    // Combine routes
    Router::new()
        .merge(public_routes)
        .merge(auth_routes)
        .merge(management_routes)
        .fallback(not_found)
        .layer(TimeoutLayer::new(state.config.timeout()))
        .layer(cors)
        .layer(from_fn(request_id))
        .layer(from_fn(log_requests))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the Facegate HTTP server
///
/// Initializes the server with the provided configuration and starts listening
/// for incoming HTTP requests. This function will block until the server is
/// shut down via SIGTERM or Ctrl+C.
///
/// # Example
///
/// ```rust,no_run
/// use server::ServerConfig;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let config = ServerConfig::load()?;
///     server::start_server(config).await?;
///     Ok(())
/// }
/// ```
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(&config.log_level)
        .with_target(false)
        .json()
        .init();

    // Create server state
    let state = Arc::new(ServerState::new(config.clone())?);

    // Build router
    let app = build_router(state);

    // Parse bind address
    let addr: SocketAddr = config.socket_addr()?;

    tracing::info!(
        "Starting Facegate server on {} (tolerance {})",
        addr,
        config.tolerance
    );
    tracing::info!(
        "Timeout: {}s, Max body: {}MB, Token TTL: {}s",
        config.timeout_secs,
        config.max_body_size_mb,
        config.token_ttl_secs
    );
    match &config.db_path {
        Some(path) => tracing::info!("Enrollment store: {}", path),
        None => tracing::info!("Enrollment store: in-memory"),
    }

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Shutdown signal handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn router_builds_with_default_config() {
        let config = ServerConfig::default();
        let state = Arc::new(ServerState::new(config).unwrap());
        let _router = build_router(state);
    }
}
