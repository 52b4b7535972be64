//! Stage projections: raw decoded JSON into the typed records.
//!
//! Projections are pure. A payload that is not an array of objects with the
//! required fields surfaces as [`StageError::Decode`].

use serde::de::DeserializeOwned;

use super::models::{Comment, Post, User};
use super::status::StageName;
use crate::errors::StageError;

/// Projects the users payload.
pub fn project_users(payload: serde_json::Value) -> Result<Vec<User>, StageError> {
    project(StageName::Users, payload)
}

/// Projects a user's posts payload.
pub fn project_posts(payload: serde_json::Value) -> Result<Vec<Post>, StageError> {
    project(StageName::Posts, payload)
}

/// Projects a post's comments payload.
pub fn project_comments(payload: serde_json::Value) -> Result<Vec<Comment>, StageError> {
    project(StageName::Comments, payload)
}

fn project<T: DeserializeOwned>(
    stage: StageName,
    payload: serde_json::Value,
) -> Result<Vec<T>, StageError> {
    serde_json::from_value(payload).map_err(|e| StageError::decode(stage, e.to_string()))
}
