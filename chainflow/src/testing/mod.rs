//! Testing utilities for chainflow pipelines.
//!
//! This module provides:
//! - A scripted in-memory fetcher
//! - Fixtures for the users → posts → comments endpoints

mod fixtures;
mod mocks;

pub use fixtures::{
    comment_json, happy_path_fetcher, post_json, test_config, user_json, TEST_BASE_URL,
};
pub use mocks::{ScriptedResponse, StaticJsonFetcher};
