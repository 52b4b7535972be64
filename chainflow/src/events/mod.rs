//! Observation channel for pipeline runs.
//!
//! Observers receive a [`Checkpoint`] at each stage boundary and at the end
//! of every run. They are injected into the runner; there is no global sink.

mod checkpoint;
mod sink;

pub use checkpoint::Checkpoint;
pub use sink::{NoOpObserver, Observer, RecordingObserver, TracingObserver};
