//! Run identity and the summary handed to finalization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::status::RunStatus;

/// Identifies a single pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunIdentity {
    /// The unique ID for this run.
    pub run_id: Uuid,
    /// When the run started.
    pub started_at: DateTime<Utc>,
}

impl RunIdentity {
    /// Creates a new run identity with a generated run ID.
    #[must_use]
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
        }
    }

    /// Closes the run with a status.
    #[must_use]
    pub fn finish(self, status: RunStatus) -> RunSummary {
        let finished_at = Utc::now();
        let duration_ms = (finished_at - self.started_at)
            .num_microseconds()
            .map_or(0.0, |us| us as f64 / 1000.0);

        RunSummary {
            run_id: self.run_id,
            status,
            started_at: self.started_at,
            finished_at,
            duration_ms,
        }
    }
}

impl Default for RunIdentity {
    fn default() -> Self {
        Self::new()
    }
}

/// What the finalization hook learns about a finished run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// The run ID.
    pub run_id: Uuid,
    /// How the run ended.
    pub status: RunStatus,
    /// Start time.
    pub started_at: DateTime<Utc>,
    /// End time.
    pub finished_at: DateTime<Utc>,
    /// Elapsed time in milliseconds.
    pub duration_ms: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identities_are_unique() {
        let a = RunIdentity::new();
        let b = RunIdentity::new();
        assert_ne!(a.run_id, b.run_id);
    }

    #[test]
    fn test_finish() {
        let identity = RunIdentity::new();
        let summary = identity.finish(RunStatus::Recovered);

        assert_eq!(summary.run_id, identity.run_id);
        assert_eq!(summary.status, RunStatus::Recovered);
        assert!(summary.finished_at >= summary.started_at);
        assert!(summary.duration_ms >= 0.0);
    }
}
