//! Typed records produced by each stage.

use serde::{Deserialize, Serialize};

/// A user from the first stage.
///
/// Fields of the raw payload beyond these are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User ID.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
}

/// A post owned by the selected user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Post ID.
    pub id: i64,
    /// Post title.
    pub title: String,
}

/// A comment on the selected post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Comment ID.
    pub id: i64,
    /// Comment name (subject line).
    pub name: String,
    /// Author email.
    pub email: String,
}

/// The only successful terminal value of a run.
///
/// Built from a user, that user's post and that post's comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineResult {
    /// The selected user.
    pub user: User,
    /// The selected post.
    pub post: Post,
    /// The post's comments.
    pub comments: Vec<Comment>,
}

impl PipelineResult {
    /// Creates a new pipeline result.
    #[must_use]
    pub fn new(user: User, post: Post, comments: Vec<Comment>) -> Self {
        Self {
            user,
            post,
            comments,
        }
    }

    /// Returns the summary reported on the observation channel.
    #[must_use]
    pub fn summary(&self) -> ResultSummary {
        ResultSummary {
            user_id: self.user.id,
            user_name: self.user.name.clone(),
            post_id: self.post.id,
            post_title: self.post.title.clone(),
            comment_count: self.comments.len(),
            first_comment: self.comments.first().cloned(),
        }
    }
}

/// Condensed view of a [`PipelineResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSummary {
    /// Selected user ID.
    pub user_id: i64,
    /// Selected user name.
    pub user_name: String,
    /// Selected post ID.
    pub post_id: i64,
    /// Selected post title.
    pub post_title: String,
    /// Number of comments.
    pub comment_count: usize,
    /// The first comment, if any.
    pub first_comment: Option<Comment>,
}
