//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `GATHERLOVE_AUTH_URL` - Identity service base URL (default: <http://localhost:5000>)
//! - `GATHERLOVE_API_URL` - Core application base URL (default: <http://localhost:8080>)
//! - `GATHERLOVE_STATE_DIR` - Directory for persisted client state
//!   (default: `$HOME/.gatherlove`)

use std::path::PathBuf;

use url::Url;

use crate::error::ConfigError;

const DEFAULT_AUTH_URL: &str = "http://localhost:5000";
const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Identity service base URL (`/auth/*`, `/api/users/email/*`).
    pub auth_url: Url,
    /// Core application base URL (`/api/*`).
    pub api_url: Url,
    /// Directory holding persisted client state (the bearer token).
    pub state_dir: PathBuf,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a URL variable is set but unparseable, or if
    /// no state directory can be determined.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let auth_url = parse_url_env("GATHERLOVE_AUTH_URL", DEFAULT_AUTH_URL)?;
        let api_url = parse_url_env("GATHERLOVE_API_URL", DEFAULT_API_URL)?;
        let state_dir = state_dir_from_env()?;

        Ok(Self {
            auth_url,
            api_url,
            state_dir,
        })
    }

    /// Build a configuration explicitly, bypassing the environment.
    #[must_use]
    pub const fn new(auth_url: Url, api_url: Url, state_dir: PathBuf) -> Self {
        Self {
            auth_url,
            api_url,
            state_dir,
        }
    }
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_url_env(key: &str, default: &str) -> Result<Url, ConfigError> {
    get_env_or_default(key, default)
        .parse::<Url>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn state_dir_from_env() -> Result<PathBuf, ConfigError> {
    if let Ok(dir) = std::env::var("GATHERLOVE_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(home) = std::env::var("HOME") {
        return Ok(PathBuf::from(home).join(".gatherlove"));
    }
    Err(ConfigError::MissingEnvVar(
        "GATHERLOVE_STATE_DIR".to_string(),
    ))
}
