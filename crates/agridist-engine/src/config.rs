//! Engine configuration.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults.

use std::env;
use std::time::Duration;

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Path to the SQLite database file.
    pub database_path: String,

    /// Max connections held by the pool.
    pub max_connections: u32,

    /// Bound on any single store operation during order creation. A counter
    /// increment exceeding this aborts the create.
    pub store_timeout: Duration,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = AppConfig {
            database_path: env::var("AGRIDIST_DATABASE_PATH")
                .unwrap_or_else(|_| "agridist.db".to_string()),

            max_connections: env::var("AGRIDIST_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("AGRIDIST_MAX_CONNECTIONS".to_string()))?,

            store_timeout: Duration::from_millis(
                env::var("AGRIDIST_STORE_TIMEOUT_MS")
                    .unwrap_or_else(|_| "5000".to_string())
                    .parse()
                    .map_err(|_| {
                        ConfigError::InvalidValue("AGRIDIST_STORE_TIMEOUT_MS".to_string())
                    })?,
            ),
        };

        if config.store_timeout.is_zero() {
            return Err(ConfigError::InvalidValue(
                "AGRIDIST_STORE_TIMEOUT_MS".to_string(),
            ));
        }

        Ok(config)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            database_path: "agridist.db".to_string(),
            max_connections: 5,
            store_timeout: Duration::from_millis(5000),
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
