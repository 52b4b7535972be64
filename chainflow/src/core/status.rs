//! Stage names and run status enums.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One step of the users → posts → comments chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageName {
    /// The user listing.
    Users,
    /// The selected user's posts.
    Posts,
    /// The selected post's comments.
    Comments,
}

impl StageName {
    /// Returns the stage name as used in messages and event data.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Posts => "posts",
            Self::Comments => "comments",
        }
    }
}

impl fmt::Display for StageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a pipeline run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// A result was produced.
    Completed,
    /// A failure was replaced by the empty outcome.
    Recovered,
    /// The chain finished without producing a value.
    Empty,
    /// The run was dropped before an outcome was determined.
    Aborted,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::Recovered => write!(f, "recovered"),
            Self::Empty => write!(f, "empty"),
            Self::Aborted => write!(f, "aborted"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_name_display() {
        assert_eq!(StageName::Users.to_string(), "users");
        assert_eq!(StageName::Posts.to_string(), "posts");
        assert_eq!(StageName::Comments.to_string(), "comments");
    }

    #[test]
    fn test_stage_name_serde() {
        let json = serde_json::to_string(&StageName::Posts).unwrap();
        assert_eq!(json, "\"posts\"");
        let back: StageName = serde_json::from_str("\"comments\"").unwrap();
        assert_eq!(back, StageName::Comments);
    }

    #[test]
    fn test_run_status() {
        assert_eq!(RunStatus::Recovered.to_string(), "recovered");
    }
}
