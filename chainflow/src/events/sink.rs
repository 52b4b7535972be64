//! Observer trait and implementations.

use parking_lot::RwLock;
use tracing::{debug, info, Level};

use super::checkpoint::Checkpoint;
use crate::errors::ObserverError;

/// Receives checkpoint notifications.
///
/// Observers must not alter the data flowing through the chain. Returning an
/// error from a tap checkpoint fails the run through the recovery gate.
pub trait Observer: Send + Sync {
    /// Observes a checkpoint.
    fn observe(&self, checkpoint: &Checkpoint<'_>) -> Result<(), ObserverError>;
}

/// An observer that discards all checkpoints.
///
/// Used as the default when no observer is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl Observer for NoOpObserver {
    fn observe(&self, _checkpoint: &Checkpoint<'_>) -> Result<(), ObserverError> {
        Ok(())
    }
}

/// An observer that logs checkpoints using the tracing framework.
#[derive(Debug, Clone)]
pub struct TracingObserver {
    /// The log level to use.
    level: Level,
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self { level: Level::INFO }
    }
}

impl TracingObserver {
    /// Creates a new tracing observer with the specified level.
    #[must_use]
    pub const fn new(level: Level) -> Self {
        Self { level }
    }

    /// Creates a debug-level tracing observer.
    #[must_use]
    pub const fn debug() -> Self {
        Self::new(Level::DEBUG)
    }

    /// Creates an info-level tracing observer.
    #[must_use]
    pub const fn info() -> Self {
        Self::new(Level::INFO)
    }
}

impl Observer for TracingObserver {
    fn observe(&self, checkpoint: &Checkpoint<'_>) -> Result<(), ObserverError> {
        let data = checkpoint.to_value();
        if self.level == Level::DEBUG {
            debug!(checkpoint = checkpoint.name(), data = %data, "Checkpoint");
        } else {
            info!(checkpoint = checkpoint.name(), data = %data, "Checkpoint");
        }
        Ok(())
    }
}

/// An observer that records checkpoints, for tests.
///
/// It can be told to fail at a named checkpoint to exercise the recovery path.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: RwLock<Vec<(String, serde_json::Value)>>,
    fail_at: Option<String>,
}

impl RecordingObserver {
    /// Creates a new recording observer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an observer that fails when it sees `checkpoint`.
    #[must_use]
    pub fn failing_at(checkpoint: impl Into<String>) -> Self {
        Self {
            events: RwLock::new(Vec::new()),
            fail_at: Some(checkpoint.into()),
        }
    }

    /// Returns all recorded checkpoints.
    #[must_use]
    pub fn events(&self) -> Vec<(String, serde_json::Value)> {
        self.events.read().clone()
    }

    /// Returns the recorded checkpoint names in order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.events.read().iter().map(|(name, _)| name.clone()).collect()
    }

    /// Returns the payloads recorded for one checkpoint name.
    #[must_use]
    pub fn events_named(&self, name: &str) -> Vec<serde_json::Value> {
        self.events
            .read()
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, data)| data.clone())
            .collect()
    }

    /// Returns how many times `name` was recorded.
    #[must_use]
    pub fn count(&self, name: &str) -> usize {
        self.events.read().iter().filter(|(n, _)| n == name).count()
    }

    /// Clears all recorded checkpoints.
    pub fn clear(&self) {
        self.events.write().clear();
    }
}

impl Observer for RecordingObserver {
    fn observe(&self, checkpoint: &Checkpoint<'_>) -> Result<(), ObserverError> {
        self.events
            .write()
            .push((checkpoint.name().to_string(), checkpoint.to_value()));

        match &self.fail_at {
            Some(name) if name == checkpoint.name() => Err(ObserverError::new(format!(
                "observer rejected {name}"
            ))),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_observer() {
        let observer = NoOpObserver;
        assert!(observer.observe(&Checkpoint::UsersFetched { count: 3 }).is_ok());
    }

    #[test]
    fn test_tracing_observer() {
        let observer = TracingObserver::default();
        assert!(observer.observe(&Checkpoint::UsersFetched { count: 3 }).is_ok());
        assert!(TracingObserver::debug()
            .observe(&Checkpoint::UsersFetched { count: 0 })
            .is_ok());
    }

    #[test]
    fn test_recording_observer() {
        let observer = RecordingObserver::new();
        observer.observe(&Checkpoint::UsersFetched { count: 2 }).unwrap();
        observer.observe(&Checkpoint::UsersFetched { count: 5 }).unwrap();

        assert_eq!(observer.count("users.fetched"), 2);
        assert_eq!(
            observer.events_named("users.fetched")[1],
            serde_json::json!({"count": 5})
        );

        observer.clear();
        assert!(observer.events().is_empty());
    }

    #[test]
    fn test_recording_observer_failing_at() {
        let observer = RecordingObserver::failing_at("users.fetched");
        let err = observer
            .observe(&Checkpoint::UsersFetched { count: 1 })
            .unwrap_err();

        assert_eq!(err.message, "observer rejected users.fetched");
        // Still recorded before failing.
        assert_eq!(observer.names(), vec!["users.fetched".to_string()]);
    }
}
