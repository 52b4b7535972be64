//! The terminal value of a run.

use super::models::PipelineResult;
use super::status::RunStatus;
use crate::errors::StageError;

/// Either the pipeline result or the empty outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// All three stages succeeded.
    Completed(PipelineResult),
    /// No result. Carries the recovered error when there was one.
    Empty {
        /// The error that was recovered, if any.
        error: Option<StageError>,
    },
}

impl RunOutcome {
    /// Creates the empty outcome for a recovered error.
    #[must_use]
    pub const fn recovered(error: StageError) -> Self {
        Self::Empty { error: Some(error) }
    }

    /// Whether this is the empty outcome.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty { .. })
    }

    /// Returns the result, if any.
    #[must_use]
    pub const fn result(&self) -> Option<&PipelineResult> {
        match self {
            Self::Completed(result) => Some(result),
            Self::Empty { .. } => None,
        }
    }

    /// Returns the recovered error, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&StageError> {
        match self {
            Self::Empty { error } => error.as_ref(),
            Self::Completed(_) => None,
        }
    }

    /// Converts into the zero-or-one result slot.
    #[must_use]
    pub fn into_result(self) -> Option<PipelineResult> {
        match self {
            Self::Completed(result) => Some(result),
            Self::Empty { .. } => None,
        }
    }

    /// Returns the run status this outcome maps to.
    #[must_use]
    pub const fn status(&self) -> RunStatus {
        match self {
            Self::Completed(_) => RunStatus::Completed,
            Self::Empty { error: Some(_) } => RunStatus::Recovered,
            Self::Empty { error: None } => RunStatus::Empty,
        }
    }
}
