//! Error types for chainflow pipelines.
//!
//! [`StageError`] is the taxonomy every stage, tap and fetcher reports into.
//! The recovery gate is the only place these errors are consumed; callers of
//! the runner never see them as a `Result::Err`.

use crate::core::StageName;
use std::collections::HashMap;
use thiserror::Error;

/// The main error type for setting up chainflow components.
///
/// Pipeline runs never return this; it covers configuration, client
/// construction and runtime start-up.
#[derive(Debug, Error)]
pub enum ChainflowError {
    /// Configuration could not be loaded.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Client(String),

    /// IO error (runtime start-up).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A value could not be parsed.
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue {
        /// The configuration key.
        key: String,
        /// The raw value.
        value: String,
    },

    /// The base URL was empty.
    #[error("Base URL must not be empty")]
    EmptyBaseUrl,
}

impl ConfigError {
    /// Creates an invalid value error.
    #[must_use]
    pub fn invalid_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Error returned by an observer callback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ObserverError {
    /// The error message.
    pub message: String,
}

impl ObserverError {
    /// Creates a new observer error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Failure anywhere inside a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StageError {
    /// The request never produced a response.
    #[error("Transport error for {url}: {message}")]
    Transport {
        /// The requested URL.
        url: String,
        /// The underlying failure.
        message: String,
    },

    /// The server answered with a non-2xx status.
    #[error("HTTP error! status: {status} ({url})")]
    HttpStatus {
        /// The requested URL.
        url: String,
        /// The response status code.
        status: u16,
    },

    /// A stage produced no items to select from.
    #[error("No {stage} found")]
    EmptyCollection {
        /// The stage whose collection was empty.
        stage: StageName,
    },

    /// A payload did not have the shape the stage projects.
    #[error("Malformed {stage} payload: {message}")]
    Decode {
        /// The stage being projected.
        stage: StageName,
        /// The decoder message.
        message: String,
    },

    /// An observer rejected a checkpoint.
    #[error("Observer failed at {checkpoint}: {message}")]
    Observer {
        /// The checkpoint name (e.g. "users.fetched").
        checkpoint: String,
        /// The observer's message.
        message: String,
    },

    /// Something panicked while the chain was running.
    #[error("Pipeline panicked: {message}")]
    Panicked {
        /// The panic payload, if it was a string.
        message: String,
    },
}

impl StageError {
    /// Creates a transport error.
    #[must_use]
    pub fn transport(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Creates an HTTP status error.
    #[must_use]
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates an empty collection error.
    #[must_use]
    pub const fn empty_collection(stage: StageName) -> Self {
        Self::EmptyCollection { stage }
    }

    /// Creates a decode error.
    #[must_use]
    pub fn decode(stage: StageName, message: impl Into<String>) -> Self {
        Self::Decode {
            stage,
            message: message.into(),
        }
    }

    /// Creates an observer error for a checkpoint.
    #[must_use]
    pub fn observer(checkpoint: impl Into<String>, error: ObserverError) -> Self {
        Self::Observer {
            checkpoint: checkpoint.into(),
            message: error.message,
        }
    }

    /// Creates a panic error.
    #[must_use]
    pub fn panicked(message: impl Into<String>) -> Self {
        Self::Panicked {
            message: message.into(),
        }
    }

    /// Returns the stage the error is attributed to, when known.
    #[must_use]
    pub const fn stage(&self) -> Option<StageName> {
        match self {
            Self::EmptyCollection { stage } | Self::Decode { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// Returns the HTTP status for status errors.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the error kind as reported on the observation channel.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "TransportError",
            Self::HttpStatus { .. } => "HttpStatusError",
            Self::EmptyCollection { .. } => "EmptyCollectionError",
            Self::Decode { .. } => "DecodeError",
            Self::Observer { .. } => "ObserverError",
            Self::Panicked { .. } => "PanicError",
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("type".to_string(), serde_json::json!(self.kind()));

        match self {
            Self::Transport { url, .. } => {
                map.insert("url".to_string(), serde_json::json!(url));
            }
            Self::HttpStatus { url, status } => {
                map.insert("url".to_string(), serde_json::json!(url));
                map.insert("status".to_string(), serde_json::json!(status));
            }
            Self::EmptyCollection { stage } | Self::Decode { stage, .. } => {
                map.insert("stage".to_string(), serde_json::json!(stage.as_str()));
            }
            Self::Observer { checkpoint, .. } => {
                map.insert("checkpoint".to_string(), serde_json::json!(checkpoint));
            }
            Self::Panicked { .. } => {}
        }

        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_message() {
        let err = StageError::http_status("http://api.test/users", 500);
        assert_eq!(err.to_string(), "HTTP error! status: 500 (http://api.test/users)");
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.stage(), None);
    }

    #[test]
    fn test_empty_collection_message() {
        let err = StageError::empty_collection(StageName::Users);
        assert_eq!(err.to_string(), "No users found");
        assert_eq!(err.stage(), Some(StageName::Users));

        let err = StageError::empty_collection(StageName::Posts);
        assert_eq!(err.to_string(), "No posts found");
    }

    #[test]
    fn test_observer_error_keeps_checkpoint() {
        let err = StageError::observer("users.fetched", ObserverError::new("disk full"));
        assert_eq!(err.to_string(), "Observer failed at users.fetched: disk full");
        assert_eq!(err.kind(), "ObserverError");
    }

    #[test]
    fn test_stage_error_to_dict() {
        let dict = StageError::http_status("http://api.test/users", 404).to_dict();
        assert_eq!(dict.get("type").unwrap(), "HttpStatusError");
        assert_eq!(dict.get("status").unwrap(), 404);

        let dict = StageError::empty_collection(StageName::Posts).to_dict();
        assert_eq!(dict.get("stage").unwrap(), "posts");
        assert_eq!(dict.get("message").unwrap(), "No posts found");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::invalid_value("CHAINFLOW_TIMEOUT_SECONDS", "soon");
        assert_eq!(
            err.to_string(),
            "Invalid value for CHAINFLOW_TIMEOUT_SECONDS: 'soon'"
        );
        let wrapped: ChainflowError = err.into();
        assert!(matches!(wrapped, ChainflowError::Config(_)));
    }
}
