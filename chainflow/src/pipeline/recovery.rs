//! Recovery gate: every failure becomes the empty outcome.

use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use tracing::warn;

use crate::core::{PipelineResult, RunOutcome};
use crate::errors::StageError;
use crate::events::Checkpoint;

use super::tap::SideEffectTap;

/// Wraps a chain so that it always completes normally.
///
/// Errors (and panics) are reported once on the observation channel and
/// replaced by [`RunOutcome::Empty`].
#[derive(Debug, Clone, Default)]
pub struct RecoveryGate {
    tap: SideEffectTap,
}

impl RecoveryGate {
    /// Creates a gate reporting through `tap`.
    #[must_use]
    pub fn new(tap: SideEffectTap) -> Self {
        Self { tap }
    }

    /// Drives `chain` to completion and converts its result to an outcome.
    pub async fn guard<Fut>(&self, chain: Fut) -> RunOutcome
    where
        Fut: Future<Output = Result<Option<PipelineResult>, StageError>>,
    {
        let result = match AssertUnwindSafe(chain).catch_unwind().await {
            Ok(result) => result,
            Err(panic) => Err(StageError::panicked(panic_message(panic.as_ref()))),
        };

        match result {
            Ok(Some(result)) => RunOutcome::Completed(result),
            Ok(None) => RunOutcome::Empty { error: None },
            Err(error) => {
                warn!(error = %error, kind = error.kind(), "Recovered from pipeline failure");
                self.tap.report(&Checkpoint::Recovered { error: &error });
                RunOutcome::recovered(error)
            }
        }
    }
}

pub(super) fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
