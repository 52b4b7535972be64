//! Scripted fetcher for tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;

use crate::errors::StageError;
use crate::fetch::JsonFetcher;

/// What a scripted URL answers with.
#[derive(Debug, Clone)]
pub enum ScriptedResponse {
    /// A 2xx response with this body.
    Json(serde_json::Value),
    /// A response with this non-2xx status.
    Status(u16),
    /// No response at all.
    Transport(String),
    /// A request that never completes.
    Hang,
}

/// A fetcher answering from a URL → response table and recording requests.
///
/// Unscripted URLs answer 404.
#[derive(Debug, Default)]
pub struct StaticJsonFetcher {
    routes: HashMap<String, ScriptedResponse>,
    requests: Mutex<Vec<String>>,
}

impl StaticJsonFetcher {
    /// Creates an empty fetcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts a response.
    #[must_use]
    pub fn with_response(mut self, url: impl Into<String>, response: ScriptedResponse) -> Self {
        self.routes.insert(url.into(), response);
        self
    }

    /// Scripts a JSON body.
    #[must_use]
    pub fn with_json(self, url: impl Into<String>, body: serde_json::Value) -> Self {
        self.with_response(url, ScriptedResponse::Json(body))
    }

    /// Scripts a status error.
    #[must_use]
    pub fn with_status(self, url: impl Into<String>, status: u16) -> Self {
        self.with_response(url, ScriptedResponse::Status(status))
    }

    /// Returns every requested URL in order.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }

    /// Returns the number of requests made.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl JsonFetcher for StaticJsonFetcher {
    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value, StageError> {
        self.requests.lock().push(url.to_string());

        match self.routes.get(url) {
            Some(ScriptedResponse::Json(body)) => Ok(body.clone()),
            Some(ScriptedResponse::Status(status)) => Err(StageError::http_status(url, *status)),
            Some(ScriptedResponse::Transport(message)) => {
                Err(StageError::transport(url, message.clone()))
            }
            Some(ScriptedResponse::Hang) => futures::future::pending().await,
            None => Err(StageError::http_status(url, 404)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_static_fetcher_routes() {
        let fetcher = StaticJsonFetcher::new()
            .with_json("http://t/users", json!([]))
            .with_status("http://t/boom", 500)
            .with_response(
                "http://t/down",
                ScriptedResponse::Transport("connection refused".to_string()),
            );

        assert_eq!(fetcher.fetch_json("http://t/users").await.unwrap(), json!([]));
        assert_eq!(
            fetcher.fetch_json("http://t/boom").await.unwrap_err().status(),
            Some(500)
        );
        assert_eq!(
            fetcher.fetch_json("http://t/down").await.unwrap_err().kind(),
            "TransportError"
        );
        assert_eq!(
            fetcher.fetch_json("http://t/missing").await.unwrap_err().status(),
            Some(404)
        );
        assert_eq!(fetcher.request_count(), 4);
    }
}
