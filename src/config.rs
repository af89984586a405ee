//! Application configuration loaded from environment variables.
//!
//! Only the HTTP service reads configuration. The entitlement core takes
//! its store and clock as constructor arguments.

use std::env;
use std::path::PathBuf;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_FRONTEND_URL: &str = "http://localhost:5173";
const DEFAULT_DATA_PATH: &str = "data/roxhub.json";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Frontend origin allowed by CORS
    pub frontend_url: String,
    /// JSON file backing the durable store
    pub data_path: PathBuf,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file is read first if present. Every variable is optional.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("PORT", raw))?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self {
            port,
            frontend_url: env::var("FRONTEND_URL")
                .map(|v| v.trim().to_string())
                .unwrap_or_else(|_| DEFAULT_FRONTEND_URL.to_string()),
            data_path: env::var("ROXHUB_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_PATH)),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}
