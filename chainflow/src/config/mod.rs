//! Configuration for the chain's endpoints and HTTP client.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ConfigError;

/// Environment variable overriding the base URL.
pub const ENV_BASE_URL: &str = "CHAINFLOW_BASE_URL";
/// Environment variable overriding the request timeout.
pub const ENV_TIMEOUT_SECONDS: &str = "CHAINFLOW_TIMEOUT_SECONDS";
/// Environment variable overriding the user agent.
pub const ENV_USER_AGENT: &str = "CHAINFLOW_USER_AGENT";

/// Configuration for a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Base URL the three endpoints hang off.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: f64,
    /// User agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "https://jsonplaceholder.typicode.com".to_string()
}

fn default_timeout() -> f64 {
    30.0
}

fn default_user_agent() -> String {
    format!("chainflow/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl ChainConfig {
    /// Creates a new configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration from an arbitrary key lookup.
    ///
    /// Unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base_url) = lookup(ENV_BASE_URL) {
            config = config.with_base_url(base_url);
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECONDS) {
            let seconds: f64 = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid_value(ENV_TIMEOUT_SECONDS, &raw))?;
            if !seconds.is_finite() || seconds <= 0.0 {
                return Err(ConfigError::invalid_value(ENV_TIMEOUT_SECONDS, raw));
            }
            config.timeout_seconds = seconds;
        }
        if let Some(user_agent) = lookup(ENV_USER_AGENT) {
            config = config.with_user_agent(user_agent);
        }

        config.validate()?;
        Ok(config)
    }

    /// Sets the base URL. A trailing slash is dropped.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the timeout.
    #[must_use]
    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Sets the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Checks the configuration is usable.
    ///
    /// The timeout must be a positive number of seconds that fits a
    /// [`Duration`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        let fits = Duration::try_from_secs_f64(self.timeout_seconds).is_ok();
        if !fits || self.timeout_seconds <= 0.0 {
            return Err(ConfigError::invalid_value(
                "timeout_seconds",
                self.timeout_seconds.to_string(),
            ));
        }
        Ok(())
    }

    /// Gets timeout as Duration.
    ///
    /// Falls back to the default for a timeout [`validate`](Self::validate)
    /// would reject.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.timeout_seconds)
            .ok()
            .filter(|timeout| !timeout.is_zero())
            .unwrap_or_else(|| Duration::from_secs_f64(default_timeout()))
    }

    /// `GET {base}/users`
    #[must_use]
    pub fn users_url(&self) -> String {
        format!("{}/users", self.base_url)
    }

    /// `GET {base}/users/{user_id}/posts`
    #[must_use]
    pub fn posts_url(&self, user_id: i64) -> String {
        format!("{}/users/{user_id}/posts", self.base_url)
    }

    /// `GET {base}/posts/{post_id}/comments`
    #[must_use]
    pub fn comments_url(&self, post_id: i64) -> String {
        format!("{}/posts/{post_id}/comments", self.base_url)
    }
}
