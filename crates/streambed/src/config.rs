//! Streambed configuration.
//!
//! Configuration is loaded from environment variables. The testbed blob
//! itself lives in the session store; only the store location, the
//! transport scheme, and an optional stream manager override come from
//! the environment.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use thiserror::Error;

/// Default session store path.
pub const DEFAULT_SESSION_STORE_PATH: &str = "testbed-session.json";

/// Streambed configuration.
///
/// Loaded from environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the session store file holding the testbed blob.
    pub session_store_path: PathBuf,

    /// Use https/wss instead of http/ws.
    pub secure: bool,

    /// Stream manager base URL override.
    ///
    /// When unset, the base URL is derived from the configured host and
    /// the transport scheme.
    pub stream_manager_url: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid STREAMBED_SECURE value, expected true/false: {0}")]
    InvalidSecureFlag(String),
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a `HashMap` (for testing).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable fails validation.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let session_store_path = vars
            .get("STREAMBED_SESSION_STORE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_STORE_PATH));

        let secure = match vars.get("STREAMBED_SECURE").map(String::as_str) {
            None | Some("false" | "0") => false,
            Some("true" | "1") => true,
            Some(other) => return Err(ConfigError::InvalidSecureFlag(other.to_string())),
        };

        let stream_manager_url = vars.get("STREAMBED_SM_URL").cloned();

        Ok(Config {
            session_store_path,
            secure,
            stream_manager_url,
        })
    }
}
