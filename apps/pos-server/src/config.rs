//! Server configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! development defaults.

use serde::{Deserialize, Serialize};
use std::env;

/// POS server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,

    /// Path to the SQLite database file
    pub database_path: String,

    /// Base currency reported with exchange rate 1.0
    pub base_currency: String,

    /// Time zone reported in session info
    pub time_zone: String,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// ## Variables
    /// - `BISTRO_HTTP_PORT` (default: 8080)
    /// - `BISTRO_DATABASE_PATH` (default: ./bistro-pos.db)
    /// - `BISTRO_BASE_CURRENCY` (default: EGP)
    /// - `BISTRO_TIME_ZONE` (default: Africa/Cairo)
    pub fn load() -> Result<Self, ConfigError> {
        let config = ServerConfig {
            http_port: env::var("BISTRO_HTTP_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("BISTRO_HTTP_PORT".to_string()))?,

            database_path: env::var("BISTRO_DATABASE_PATH")
                .unwrap_or_else(|_| "./bistro-pos.db".to_string()),

            base_currency: env::var("BISTRO_BASE_CURRENCY")
                .unwrap_or_else(|_| "EGP".to_string()),

            time_zone: env::var("BISTRO_TIME_ZONE")
                .unwrap_or_else(|_| "Africa/Cairo".to_string()),
        };

        Ok(config)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            http_port: 8080,
            database_path: "./bistro-pos.db".to_string(),
            base_currency: "EGP".to_string(),
            time_zone: "Africa/Cairo".to_string(),
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
