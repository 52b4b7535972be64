//! Checkpoints reported on the observation channel.

use serde_json::json;

use crate::core::{Post, ResultSummary, RunSummary, User};
use crate::errors::StageError;

/// A notification at one of the run's boundaries.
///
/// The first four are taps inside the chain; an observer failing on one of
/// them fails the run. The last three are reported after the outcome is
/// known.
#[derive(Debug, Clone, Copy)]
pub enum Checkpoint<'a> {
    /// The users collection was fetched.
    UsersFetched {
        /// Number of users.
        count: usize,
    },
    /// The first user was selected.
    UserSelected {
        /// The selected user.
        user: &'a User,
    },
    /// The selected user's posts were fetched.
    PostsFetched {
        /// The user owning the posts.
        user: &'a User,
        /// Number of posts.
        count: usize,
    },
    /// The first post was selected; its comments are fetched next.
    PostSelected {
        /// The selected post.
        post: &'a Post,
    },
    /// A result was produced.
    Completed {
        /// The result summary.
        summary: &'a ResultSummary,
    },
    /// A failure was replaced by the empty outcome.
    Recovered {
        /// The recovered error.
        error: &'a StageError,
    },
    /// The run finalized.
    Finalized {
        /// The run summary.
        summary: &'a RunSummary,
    },
}

impl Checkpoint<'_> {
    /// Returns the checkpoint name (e.g. "users.fetched").
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::UsersFetched { .. } => "users.fetched",
            Self::UserSelected { .. } => "user.selected",
            Self::PostsFetched { .. } => "posts.fetched",
            Self::PostSelected { .. } => "post.selected",
            Self::Completed { .. } => "pipeline.completed",
            Self::Recovered { .. } => "pipeline.recovered",
            Self::Finalized { .. } => "pipeline.finalized",
        }
    }

    /// Whether an observer error here aborts the chain.
    #[must_use]
    pub const fn is_tap(&self) -> bool {
        matches!(
            self,
            Self::UsersFetched { .. }
                | Self::UserSelected { .. }
                | Self::PostsFetched { .. }
                | Self::PostSelected { .. }
        )
    }

    /// Converts the checkpoint payload to JSON.
    #[must_use]
    pub fn to_value(&self) -> serde_json::Value {
        match self {
            Self::UsersFetched { count } => json!({ "count": count }),
            Self::UserSelected { user } => json!({ "id": user.id, "name": user.name }),
            Self::PostsFetched { user, count } => json!({ "user_id": user.id, "count": count }),
            Self::PostSelected { post } => json!({ "id": post.id, "title": post.title }),
            Self::Completed { summary } => json!(summary),
            Self::Recovered { error } => json!({
                "type": error.kind(),
                "message": error.to_string(),
            }),
            Self::Finalized { summary } => json!({
                "run_id": summary.run_id,
                "status": summary.status,
                "duration_ms": summary.duration_ms,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StageName;

    #[test]
    fn test_tap_checkpoints() {
        let user = User {
            id: 1,
            name: "Leanne".to_string(),
            email: "a@b.com".to_string(),
        };
        assert!(Checkpoint::UsersFetched { count: 1 }.is_tap());
        assert!(Checkpoint::UserSelected { user: &user }.is_tap());

        let error = StageError::empty_collection(StageName::Users);
        assert!(!Checkpoint::Recovered { error: &error }.is_tap());
    }

    #[test]
    fn test_to_value() {
        let post = Post {
            id: 4,
            title: "T4".to_string(),
        };
        let checkpoint = Checkpoint::PostSelected { post: &post };
        assert_eq!(checkpoint.name(), "post.selected");
        assert_eq!(checkpoint.to_value(), json!({"id": 4, "title": "T4"}));

        let error = StageError::empty_collection(StageName::Posts);
        let value = Checkpoint::Recovered { error: &error }.to_value();
        assert_eq!(value["message"], "No posts found");
        assert_eq!(value["type"], "EmptyCollectionError");
    }
}
