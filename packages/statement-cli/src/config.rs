//! Configuration loaded from environment variables

use anyhow::{Context, Result};
use dotenvy::dotenv;
use statement_client::{ClientConfig, DEFAULT_BASE_URL};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// CLI configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_url: String,
    /// `None` waits for the service indefinitely
    pub timeout: Option<Duration>,
    pub preview_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let timeout_secs: u64 = match lookup("STATEMENT_API_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse()
                .context("STATEMENT_API_TIMEOUT_SECS must be a whole number of seconds")?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            api_url: lookup("STATEMENT_API_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
            preview_dir: lookup("STATEMENT_PREVIEW_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| env::temp_dir().join("statement-previews")),
        })
    }

    /// Override the API URL (from `--api-url`)
    pub fn with_api_url(mut self, api_url: Option<String>) -> Self {
        if let Some(url) = api_url {
            self.api_url = url;
        }
        self
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(&self.api_url).with_timeout(self.timeout)
    }
}
