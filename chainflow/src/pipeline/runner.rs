//! Pipeline runner: the single entry point of a run.

use std::sync::Arc;
use tracing::{info, info_span, Instrument};

use super::builder::PipelineRunnerBuilder;
use super::chain::DependentChain;
use super::finalize::{FinalizationHook, FinalizeGuard};
use super::recovery::RecoveryGate;
use super::tap::SideEffectTap;
use crate::core::{PipelineResult, RunIdentity, RunOutcome};
use crate::errors::ChainflowError;
use crate::events::Checkpoint;
use crate::fetch::JsonFetcher;

/// Runs the chain behind the recovery gate and finalizes exactly once.
///
/// Each call to [`run`](Self::run) is an independent run with its own state.
pub struct PipelineRunner {
    chain: DependentChain,
    gate: RecoveryGate,
    tap: SideEffectTap,
    finalizer: Arc<dyn FinalizationHook>,
}

impl PipelineRunner {
    pub(crate) fn new(
        chain: DependentChain,
        gate: RecoveryGate,
        tap: SideEffectTap,
        finalizer: Arc<dyn FinalizationHook>,
    ) -> Self {
        Self {
            chain,
            gate,
            tap,
            finalizer,
        }
    }

    /// Starts building a runner around `fetcher`.
    #[must_use]
    pub fn builder(fetcher: Arc<dyn JsonFetcher>) -> PipelineRunnerBuilder {
        PipelineRunnerBuilder::new(fetcher)
    }

    /// Runs the pipeline, yielding zero or one result.
    pub async fn run(&self) -> Option<PipelineResult> {
        self.run_outcome().await.into_result()
    }

    /// Runs the pipeline and returns the full outcome.
    ///
    /// Never fails: errors are recovered into [`RunOutcome::Empty`]. The
    /// finalization hook fires once, even if this future is dropped early.
    pub async fn run_outcome(&self) -> RunOutcome {
        let identity = RunIdentity::new();
        let span = info_span!("pipeline_run", run_id = %identity.run_id);

        let tap = self.tap.clone();
        let finalizer = Arc::clone(&self.finalizer);
        let guard = FinalizeGuard::new(move |status| {
            let summary = identity.finish(status);
            info!(
                run_id = %summary.run_id,
                status = %summary.status,
                duration_ms = summary.duration_ms,
                "Pipeline finalized"
            );
            tap.report(&Checkpoint::Finalized { summary: &summary });
            finalizer.finalize(&summary);
        });

        async move {
            let outcome = self.gate.guard(self.chain.execute()).await;

            if let RunOutcome::Completed(result) = &outcome {
                self.tap.report(&Checkpoint::Completed {
                    summary: &result.summary(),
                });
            }

            guard.complete(outcome.status());
            outcome
        }
        .instrument(span)
        .await
    }

    /// Runs the pipeline on a fresh current-thread runtime.
    ///
    /// Must not be called from inside an async context.
    ///
    /// # Errors
    ///
    /// Returns an error only if the runtime cannot be started.
    pub fn run_blocking(&self) -> Result<Option<PipelineResult>, ChainflowError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(runtime.block_on(self.run()))
    }
}

impl std::fmt::Debug for PipelineRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineRunner")
            .field("chain", &self.chain)
            .finish_non_exhaustive()
    }
}
