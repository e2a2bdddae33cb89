//! Comment records.

use super::{trailing_number, Provenance, User};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A comment on an issue or on the conversation tab of a pull request.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IssueComment {
    /// Source id.
    pub id: u64,

    /// API URL of the issue commented on.
    pub issue_url: String,

    /// Markdown body.
    #[serde(default)]
    pub body: Option<String>,

    /// Original author.
    pub user: User,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl IssueComment {
    /// Returns the source number of the issue commented on.
    #[must_use]
    pub fn issue_number(&self) -> Option<u64> {
        trailing_number(&self.issue_url)
    }
}

/// A review comment attached to a line of a pull request diff.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PullComment {
    /// Source id.
    pub id: u64,

    /// API URL of the pull request commented on.
    pub pull_request_url: String,

    /// Markdown body.
    #[serde(default)]
    pub body: Option<String>,

    /// Original author.
    pub user: User,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Commit the comment was originally made against.
    pub original_commit_id: String,

    /// File path within the diff.
    pub path: String,

    /// Line index within the original diff hunk.
    #[serde(default)]
    pub original_position: Option<u64>,
}

impl PullComment {
    /// Returns the source number of the pull request commented on.
    #[must_use]
    pub fn pull_number(&self) -> Option<u64> {
        trailing_number(&self.pull_request_url)
    }
}

/// A comment on a commit.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CommitComment {
    /// Source id.
    pub id: u64,

    /// Commented commit.
    pub commit_id: String,

    /// Markdown body.
    #[serde(default)]
    pub body: Option<String>,

    /// Original author.
    pub user: User,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// File path, for line comments.
    #[serde(default)]
    pub path: Option<String>,

    /// Line index within the diff, for line comments.
    #[serde(default)]
    pub position: Option<u64>,
}

macro_rules! impl_comment_provenance {
    ($($ty:ty),*) => {
        $(
            impl Provenance for $ty {
                fn author(&self) -> &str {
                    &self.user.login
                }

                fn created_at(&self) -> DateTime<Utc> {
                    self.created_at
                }
            }
        )*
    };
}

impl_comment_provenance!(IssueComment, PullComment, CommitComment);
