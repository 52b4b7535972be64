//! JSON fetching capability.
//!
//! The pipeline never reaches for a process-wide HTTP client: a
//! [`JsonFetcher`] is handed to the runner when it is built.

#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::HttpJsonFetcher;

use async_trait::async_trait;
use std::sync::Arc;

use crate::errors::StageError;

/// Performs a single GET and yields the decoded JSON body.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JsonFetcher: Send + Sync {
    /// Fetches `url`.
    ///
    /// Returns [`StageError::HttpStatus`] for any non-2xx response and
    /// [`StageError::Transport`] when no response was received. No retries.
    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value, StageError>;
}

#[async_trait]
impl<T> JsonFetcher for Arc<T>
where
    T: JsonFetcher + ?Sized,
{
    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value, StageError> {
        (**self).fetch_json(url).await
    }
}
