//! Server configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use serde::{Deserialize, Serialize};
use std::env;

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP listen port
    pub port: u16,

    /// Path to the SQLite database file
    pub database_path: String,

    /// JWT secret key for signing session cookies
    pub jwt_secret: String,

    /// Session lifetime in seconds
    pub session_lifetime_secs: i64,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = ServerConfig {
            port: env::var("SHOPBILL_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SHOPBILL_PORT".to_string()))?,

            database_path: env::var("SHOPBILL_DB")
                .unwrap_or_else(|_| "shopbill.db".to_string()),

            jwt_secret: env::var("SHOPBILL_JWT_SECRET").unwrap_or_else(|_| {
                // In production this MUST be set via environment variable
                "shopbill-dev-secret-change-in-production".to_string()
            }),

            session_lifetime_secs: env::var("SHOPBILL_SESSION_LIFETIME_SECS")
                .unwrap_or_else(|_| "86400".to_string()) // 24 hours
                .parse()
                .map_err(|_| {
                    ConfigError::InvalidValue("SHOPBILL_SESSION_LIFETIME_SECS".to_string())
                })?,
        };

        if config.session_lifetime_secs <= 0 {
            return Err(ConfigError::InvalidValue(
                "SHOPBILL_SESSION_LIFETIME_SECS".to_string(),
            ));
        }

        Ok(config)
    }

    /// A fixed configuration for tests: no environment reads.
    pub fn for_tests() -> Self {
        ServerConfig {
            port: 0,
            database_path: ":memory:".to_string(),
            jwt_secret: "test-secret".to_string(),
            session_lifetime_secs: 3600,
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
