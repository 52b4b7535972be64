//! # Chainflow
//!
//! Three dependent lookups (users → a user's posts → a post's comments)
//! composed into one pipeline.
//!
//! Chainflow provides:
//!
//! - **Dependent chaining**: each stage's request is derived from the previous
//!   stage's selected item, with switch-to-latest cancellation
//! - **Recovery**: any failure becomes a single empty outcome instead of an error
//! - **Finalization**: a hook that fires exactly once per run
//! - **Observation**: checkpoints at every stage boundary
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use chainflow::prelude::*;
//! use std::sync::Arc;
//!
//! let config = ChainConfig::from_env()?;
//! let fetcher = Arc::new(HttpJsonFetcher::new(&config)?);
//!
//! let runner = PipelineRunner::builder(fetcher)
//!     .config(config)
//!     .observer(Arc::new(TracingObserver::info()))
//!     .build()?;
//!
//! match runner.run().await {
//!     Some(result) => println!("{} comments", result.comments.len()),
//!     None => println!("no result"),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod cancellation;
pub mod config;
pub mod core;
pub mod errors;
pub mod events;
pub mod fetch;
pub mod pipeline;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::cancellation::{CancellationToken, StageSlot, SwitchLatest, SwitchLatestExt};
    pub use crate::config::ChainConfig;
    pub use crate::core::{
        Comment, PipelineResult, Post, RunOutcome, RunStatus, RunSummary, StageName, User,
    };
    pub use crate::errors::{ChainflowError, ConfigError, ObserverError, StageError};
    pub use crate::events::{Checkpoint, NoOpObserver, Observer, TracingObserver};
    #[cfg(feature = "http")]
    pub use crate::fetch::HttpJsonFetcher;
    pub use crate::fetch::JsonFetcher;
    pub use crate::pipeline::{FinalizationHook, PipelineRunner, PipelineRunnerBuilder};
}
