//! HTTP server configuration.

use super::errors::{ConfigError, ConfigValidator};
use crate::core::constants::{
    DEFAULT_BIND_ADDR, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_SESSION_TTL_SECS,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the web server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Directory holding the catalog images and the logo
    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,
    /// Idle time after which a browser session is dropped (seconds)
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,
    /// Largest accepted request body (bytes)
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_bind() -> String {
    DEFAULT_BIND_ADDR.to_string()
}
fn default_assets_dir() -> PathBuf {
    PathBuf::from("assets")
}
fn default_session_ttl_secs() -> u64 {
    DEFAULT_SESSION_TTL_SECS
}
fn default_max_upload_bytes() -> usize {
    DEFAULT_MAX_UPLOAD_BYTES
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            assets_dir: default_assets_dir(),
            session_ttl_secs: default_session_ttl_secs(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl ServerConfig {
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}

impl ConfigValidator for ServerConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.bind.parse::<std::net::SocketAddr>().is_err() {
            return Err(ConfigError::InvalidConfig {
                message: format!("bind address is not a socket address: {}", self.bind),
            });
        }
        if self.session_ttl_secs == 0 {
            return Err(ConfigError::InvalidConfig {
                message: "session TTL must be greater than 0".to_string(),
            });
        }
        if self.max_upload_bytes == 0 {
            return Err(ConfigError::InvalidConfig {
                message: "maximum upload size must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}
