//! Pipeline assembly and execution.
//!
//! This module provides:
//! - The dependent users → posts → comments chain
//! - Side-effect taps at chain boundaries
//! - The recovery gate and finalization hook
//! - The runner and its builder

mod builder;
mod chain;
mod finalize;
mod recovery;
mod runner;
mod tap;


pub use builder::PipelineRunnerBuilder;
pub use chain::DependentChain;
pub use finalize::{FinalizationHook, FinalizeGuard, NoOpFinalizer};
pub use recovery::RecoveryGate;
pub use runner::PipelineRunner;
pub use tap::SideEffectTap;
