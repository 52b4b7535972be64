//! Switch-to-latest cancellation.
//!
//! This module provides:
//! - CancellationToken for marking a derived request as superseded
//! - StageSlot, the per-stage generation counter
//! - SwitchLatest, a stream that keeps only the newest derived request alive

mod switch;
mod token;

pub use switch::{StageSlot, StageTicket, SwitchLatest, SwitchLatestExt};
pub use token::CancellationToken;
