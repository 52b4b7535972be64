//! Finalization hook and the guard that runs it exactly once.

use crate::core::RunStatus;
use crate::core::RunSummary;

/// Runs once at the end of every pipeline run.
///
/// The hook only sees the run summary; it cannot change the outcome.
pub trait FinalizationHook: Send + Sync {
    /// Called after the outcome is determined.
    fn finalize(&self, summary: &RunSummary);
}

impl<F> FinalizationHook for F
where
    F: Fn(&RunSummary) + Send + Sync,
{
    fn finalize(&self, summary: &RunSummary) {
        self(summary);
    }
}

/// A hook that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpFinalizer;

impl FinalizationHook for NoOpFinalizer {
    fn finalize(&self, _summary: &RunSummary) {}
}

/// Guard that runs its callback exactly once.
///
/// [`complete`](Self::complete) runs it with the run's status; if the guard is
/// dropped first (the run future was cancelled) it runs with
/// [`RunStatus::Aborted`].
pub struct FinalizeGuard<F>
where
    F: FnOnce(RunStatus),
{
    finalize: Option<F>,
}

impl<F> FinalizeGuard<F>
where
    F: FnOnce(RunStatus),
{
    /// Creates a new guard.
    pub fn new(finalize: F) -> Self {
        Self {
            finalize: Some(finalize),
        }
    }

    /// Runs the callback with `status`.
    pub fn complete(mut self, status: RunStatus) {
        if let Some(finalize) = self.finalize.take() {
            finalize(status);
        }
    }
}

impl<F> Drop for FinalizeGuard<F>
where
    F: FnOnce(RunStatus),
{
    fn drop(&mut self) {
        if let Some(finalize) = self.finalize.take() {
            finalize(RunStatus::Aborted);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn test_guard_complete_runs_once() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();

        let guard = FinalizeGuard::new(move |status| seen_clone.lock().push(status));
        guard.complete(RunStatus::Recovered);

        assert_eq!(*seen.lock(), vec![RunStatus::Recovered]);
    }

    #[test]
    fn test_guard_drop_runs_aborted() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();

        {
            let _guard = FinalizeGuard::new(move |status| seen_clone.lock().push(status));
        }

        assert_eq!(*seen.lock(), vec![RunStatus::Aborted]);
    }

    #[test]
    fn test_closure_hook() {
        let count = Arc::new(Mutex::new(0));
        let count_clone = count.clone();
        let hook = move |_summary: &RunSummary| *count_clone.lock() += 1;

        let summary = crate::core::RunIdentity::new().finish(RunStatus::Completed);
        hook.finalize(&summary);
        NoOpFinalizer.finalize(&summary);

        assert_eq!(*count.lock(), 1);
    }
}
