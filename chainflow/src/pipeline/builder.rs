//! Builder for pipeline runners.

use std::sync::Arc;

use super::chain::DependentChain;
use super::finalize::{FinalizationHook, NoOpFinalizer};
use super::recovery::RecoveryGate;
use super::runner::PipelineRunner;
use super::tap::SideEffectTap;
use crate::config::ChainConfig;
use crate::errors::ConfigError;
use crate::events::{NoOpObserver, Observer};
use crate::fetch::JsonFetcher;

/// Wires a fetcher, configuration, observer and finalization hook into a
/// [`PipelineRunner`].
#[derive(Clone)]
pub struct PipelineRunnerBuilder {
    fetcher: Arc<dyn JsonFetcher>,
    config: ChainConfig,
    observer: Arc<dyn Observer>,
    finalizer: Arc<dyn FinalizationHook>,
}

impl PipelineRunnerBuilder {
    /// Creates a builder around the fetch capability.
    #[must_use]
    pub fn new(fetcher: Arc<dyn JsonFetcher>) -> Self {
        Self {
            fetcher,
            config: ChainConfig::default(),
            observer: Arc::new(NoOpObserver),
            finalizer: Arc::new(NoOpFinalizer),
        }
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: ChainConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the observer receiving checkpoints.
    #[must_use]
    pub fn observer(mut self, observer: Arc<dyn Observer>) -> Self {
        self.observer = observer;
        self
    }

    /// Sets the finalization hook.
    #[must_use]
    pub fn finalizer(mut self, finalizer: Arc<dyn FinalizationHook>) -> Self {
        self.finalizer = finalizer;
        self
    }

    /// Builds the runner.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> Result<PipelineRunner, ConfigError> {
        self.config.validate()?;

        let tap = SideEffectTap::new(self.observer);
        let chain = DependentChain::new(self.fetcher, Arc::new(self.config), tap.clone());
        let gate = RecoveryGate::new(tap.clone());

        Ok(PipelineRunner::new(chain, gate, tap, self.finalizer))
    }
}

impl std::fmt::Debug for PipelineRunnerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineRunnerBuilder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
