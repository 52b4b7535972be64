//! `reqwest`-backed fetcher.

use async_trait::async_trait;
use tracing::debug;

use super::JsonFetcher;
use crate::config::ChainConfig;
use crate::errors::{ChainflowError, StageError};

/// Fetches JSON over HTTP with a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpJsonFetcher {
    client: reqwest::Client,
}

impl HttpJsonFetcher {
    /// Builds a fetcher with the configured timeout and user agent.
    ///
    /// The configuration is validated first.
    pub fn new(config: &ChainConfig) -> Result<Self, ChainflowError> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ChainflowError::Client(e.to_string()))?;

        Ok(Self::with_client(client))
    }

    /// Wraps an existing client.
    #[must_use]
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl JsonFetcher for HttpJsonFetcher {
    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value, StageError> {
        debug!(url = %url, "GET");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| StageError::transport(url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            debug!(url = %url, status = status.as_u16(), "Non-success status");
            return Err(StageError::http_status(url, status.as_u16()));
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| StageError::transport(url, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ConfigError;

    #[test]
    fn test_new_from_config() {
        let config = ChainConfig::new()
            .with_timeout(1.5)
            .with_user_agent("chainflow-tests");
        assert!(HttpJsonFetcher::new(&config).is_ok());
    }

    #[test]
    fn test_new_rejects_invalid_timeout() {
        for seconds in [-1.0, 0.0, f64::NAN, f64::INFINITY, 1e300] {
            let config = ChainConfig::new().with_timeout(seconds);
            let err = HttpJsonFetcher::new(&config).unwrap_err();
            assert!(matches!(
                err,
                ChainflowError::Config(ConfigError::InvalidValue { .. })
            ));
        }
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let config = ChainConfig::new().with_timeout(2.0);
        let fetcher = HttpJsonFetcher::new(&config).unwrap();

        // Port 9 (discard) on localhost is closed in test environments.
        let err = fetcher
            .fetch_json("http://127.0.0.1:9/users")
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "TransportError");
    }
}
