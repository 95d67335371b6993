//! Facegate Server - HTTP REST API for face enrollment and verification
//!
//! This binary exposes face registration and face-login verification over
//! REST endpoints backed by the enrollment store and matching engine.

use server::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env overrides before reading configuration
    dotenvy::dotenv().ok();

    let config = ServerConfig::load()?;
    server::start_server(config).await?;

    Ok(())
}
