// Configuration structs

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use super::constants::{DEFAULT_BIND_ADDR, DEFAULT_LOG_DIR, DEFAULT_SERVER_URL};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the inference server (e.g. "http://localhost:11434")
    pub server_url: String,

    /// Directory holding the per-model `output-<model>.csv` files
    pub log_dir: PathBuf,

    /// Address the web front-end listens on
    pub bind_address: String,

    /// Request timeout in seconds. Unset means the HTTP client default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_seconds: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            bind_address: DEFAULT_BIND_ADDR.to_string(),
            request_timeout_seconds: None,
        }
    }
}

impl Config {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_seconds.map(Duration::from_secs)
    }

    pub fn bind_socket_addr(&self) -> Result<SocketAddr> {
        self.bind_address
            .parse()
            .with_context(|| format!("Invalid bind address: {}", self.bind_address))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let url = reqwest::Url::parse(&self.server_url)
            .with_context(|| format!("Invalid server URL: {}", self.server_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!(
                "Server URL must use http or https, got '{}'",
                url.scheme()
            );
        }

        self.bind_socket_addr()?;

        if self.request_timeout_seconds == Some(0) {
            bail!("request_timeout_seconds must be greater than zero");
        }

        if self.log_dir.as_os_str().is_empty() {
            bail!("log_dir must not be empty");
        }

        Ok(())
    }
}
