//! Configuration management module.
//!
//! Handles loading configuration from environment variables.

use std::env;
use std::sync::Arc;

use crate::error::{Result, SessionError};
use crate::ethereum::{ChainTransport, ProviderSource, DEFAULT_LOCAL_RPC_URL};

/// Session configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Legacy JSON-RPC endpoint URL, used when no injected provider is present.
    pub rpc_url: Option<String>,
    /// Local endpoint used when neither an injected nor a legacy provider exists.
    pub fallback_url: String,
    /// Private key for self-signed submissions (hex string, 0x prefix optional).
    pub private_key: Option<String>,
    /// Logging level (default: info).
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: None,
            fallback_url: DEFAULT_LOCAL_RPC_URL.to_string(),
            private_key: None,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `ETHEREUM_RPC_URL`: legacy JSON-RPC endpoint
    /// - `LOCAL_RPC_URL`: fallback endpoint (default: `http://127.0.0.1:8545`)
    /// - `ETHEREUM_PRIVATE_KEY`: key for self-signed transactions
    /// - `LOG_LEVEL`: logging level (default: info)
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let rpc_url = non_empty_var("ETHEREUM_RPC_URL");
        let fallback_url =
            non_empty_var("LOCAL_RPC_URL").unwrap_or_else(|| DEFAULT_LOCAL_RPC_URL.to_string());
        let private_key = non_empty_var("ETHEREUM_PRIVATE_KEY");
        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let config = Self { rpc_url, fallback_url, private_key, log_level };
        config.validate()?;
        Ok(config)
    }

    /// Check that configured endpoints are parseable URLs.
    pub fn validate(&self) -> Result<()> {
        for url in self.rpc_url.iter().chain(std::iter::once(&self.fallback_url)) {
            url.parse::<alloy::transports::http::reqwest::Url>()
                .map_err(|_| SessionError::Config(format!("Invalid RPC URL: {}", url)))?;
        }
        Ok(())
    }

    /// Pick the provider source for this configuration.
    ///
    /// An injected transport always wins, then the legacy endpoint, then the
    /// local fallback.
    pub fn provider_source(&self, injected: Option<Arc<dyn ChainTransport>>) -> ProviderSource {
        match ProviderSource::detect(injected, self.rpc_url.as_deref()) {
            ProviderSource::Fallback(_) => ProviderSource::Fallback(self.fallback_url.clone()),
            source => source,
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
