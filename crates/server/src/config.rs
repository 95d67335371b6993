use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

use facegate::VerifyConfig;

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum request body size in MB (bounds the uploaded photo)
    #[serde(default = "default_max_body_size_mb")]
    pub max_body_size_mb: usize,

    /// Directory where uploaded photos are stored
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,

    /// Matching tolerance: maximum acceptable embedding distance
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Session token lifetime in seconds
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: u64,

    /// Enrollment database file; in-memory storage when unset
    #[serde(default)]
    pub db_path: Option<String>,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            timeout_secs: default_timeout_secs(),
            max_body_size_mb: default_max_body_size_mb(),
            upload_dir: default_upload_dir(),
            tolerance: default_tolerance(),
            token_ttl_secs: default_token_ttl_secs(),
            db_path: None,
            enable_cors: default_true(),
            log_level: default_log_level(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables and config files
    pub fn load() -> anyhow::Result<Self> {
        let builder = config::Config::builder()
            // Load from file if exists
            .add_source(config::File::with_name("server").required(false))
            // Override with environment variables
            .add_source(config::Environment::with_prefix("FACEGATE").separator("__"));

        let config: ServerConfig = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.bind_addr, self.port);
        Ok(addr_str.parse()?)
    }

    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get max body size in bytes
    pub fn max_body_size(&self) -> usize {
        self.max_body_size_mb * 1024 * 1024
    }

    /// Get session token lifetime as Duration
    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_secs)
    }

    /// Matching configuration derived from this server config
    pub fn verify_config(&self) -> VerifyConfig {
        VerifyConfig::with_tolerance(self.tolerance)
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_body_size_mb() -> usize {
    10
}

fn default_upload_dir() -> String {
    "uploads".to_string()
}

fn default_tolerance() -> f64 {
    0.6
}

fn default_token_ttl_secs() -> u64 {
    3600
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.timeout_secs, 30);
        assert_eq!(cfg.max_body_size_mb, 10);
        assert_eq!(cfg.tolerance, 0.6);
        assert_eq!(cfg.token_ttl_secs, 3600);
        assert!(cfg.db_path.is_none());
        assert!(cfg.enable_cors);
    }

    #[test]
    fn test_socket_addr() {
        let cfg = ServerConfig::default();
        let addr = cfg.socket_addr().unwrap();
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn test_verify_config_uses_tolerance() {
        let cfg = ServerConfig {
            tolerance: 0.45,
            ..ServerConfig::default()
        };
        assert_eq!(cfg.verify_config().tolerance, 0.45);
    }
}
