//! Core types for chainflow.
//!
//! This module contains the fundamental types:
//! - Stage records (users, posts, comments) and their projections
//! - The pipeline result and run outcome
//! - Run identity and status

mod identity;
mod models;
mod outcome;
mod projection;
mod status;

pub use identity::{RunIdentity, RunSummary};
pub use models::{Comment, PipelineResult, Post, ResultSummary, User};
pub use outcome::RunOutcome;
pub use projection::{project_comments, project_posts, project_users};
pub use status::{RunStatus, StageName};
