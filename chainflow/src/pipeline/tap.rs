//! Side-effect taps at chain boundaries.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::warn;

use crate::events::{Checkpoint, NoOpObserver, Observer};
use crate::errors::StageError;

use super::recovery::panic_message;

/// Hands checkpoints to the observer without touching the data.
#[derive(Clone)]
pub struct SideEffectTap {
    observer: Arc<dyn Observer>,
}

impl SideEffectTap {
    /// Creates a tap over an observer.
    #[must_use]
    pub fn new(observer: Arc<dyn Observer>) -> Self {
        Self { observer }
    }

    /// Observes a checkpoint inside the chain.
    ///
    /// An observer failure becomes [`StageError::Observer`]. Post-outcome
    /// checkpoints are handed to [`report`](Self::report) instead and never
    /// fail.
    pub fn tap(&self, checkpoint: &Checkpoint<'_>) -> Result<(), StageError> {
        if !checkpoint.is_tap() {
            self.report(checkpoint);
            return Ok(());
        }

        self.observer
            .observe(checkpoint)
            .map_err(|e| StageError::observer(checkpoint.name(), e))
    }

    /// Reports a checkpoint after the outcome is known.
    ///
    /// The outcome can no longer change, so errors and panics from the
    /// observer are only logged.
    pub fn report(&self, checkpoint: &Checkpoint<'_>) {
        match panic::catch_unwind(AssertUnwindSafe(|| self.observer.observe(checkpoint))) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(
                checkpoint = checkpoint.name(),
                error = %e,
                "Observer failed while reporting"
            ),
            Err(panic) => warn!(
                checkpoint = checkpoint.name(),
                panic = %panic_message(panic.as_ref()),
                "Observer panicked while reporting"
            ),
        }
    }
}

impl Default for SideEffectTap {
    fn default() -> Self {
        Self::new(Arc::new(NoOpObserver))
    }
}

impl std::fmt::Debug for SideEffectTap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SideEffectTap").finish_non_exhaustive()
    }
}
