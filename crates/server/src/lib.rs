//! HTTP REST API server for Facegate.
//!
//! Thin axum glue over the `facegate` pipeline: image uploads come in via
//! multipart, face descriptors are extracted at the boundary, and the
//! enrollment store plus matcher do the actual work. Matched verifications
//! are answered with an opaque bearer session token.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;
pub mod token;

pub use crate::config::ServerConfig;
pub use crate::error::{ServerError, ServerResult};
pub use crate::server::start_server;
pub use crate::state::ServerState;
