//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The
//! `.env` file is used for local development.

use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub log_level: Level,
    /// Secret for signing bearer tokens. Required; there is no default so a
    /// deployment cannot silently run with a known key.
    pub jwt_secret: String,
    /// Directory where uploaded CVs are stored.
    pub upload_dir: PathBuf,
    /// Origin allowed by CORS (the server-rendered frontend).
    pub frontend_origin: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for
    /// development, but this is skipped in test environments so tests are
    /// hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingVar("DATABASE_URL".to_string()))?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let jwt_secret = std::env::var("JWT_SECRET")
            .map_err(|_| ConfigError::MissingVar("JWT_SECRET".to_string()))?;

        let upload_dir = std::env::var("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./uploads"));

        let frontend_origin = std::env::var("FRONTEND_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:3001".to_string());

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            jwt_secret,
            upload_dir,
            frontend_origin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env-var manipulation is process-global, so this single test covers
    // both the missing-variable and happy paths sequentially.
    #[test]
    fn from_env_requires_database_url_and_jwt_secret() {
        std::env::remove_var("DATABASE_URL");
        std::env::remove_var("JWT_SECRET");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::MissingVar(v)) if v == "DATABASE_URL"
        ));

        std::env::set_var("DATABASE_URL", "postgres://localhost/recruit");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::MissingVar(v)) if v == "JWT_SECRET"
        ));

        std::env::set_var("JWT_SECRET", "test-secret");
        let config = Config::from_env().unwrap();
        assert_eq!(config.bind_address.port(), 3000);
        assert_eq!(config.upload_dir, PathBuf::from("./uploads"));

        std::env::remove_var("DATABASE_URL");
        std::env::remove_var("JWT_SECRET");
    }
}
