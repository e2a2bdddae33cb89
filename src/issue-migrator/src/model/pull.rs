//! Pull request records.

use super::{IssueState, User};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A branch tip referenced by a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitRef {
    /// Branch name (the API's `ref` field).
    #[serde(rename = "ref")]
    pub name: String,

    /// Commit the branch pointed at.
    pub sha: String,
}

/// A pull request as listed by `GET /pulls?state=all`.
///
/// Numbers share the issue numbering space; the issue view of the same
/// number carries the fields that get replayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequest {
    /// Number, shared with the issue view of this pull request.
    pub number: u64,

    /// Title.
    pub title: String,

    /// Markdown body.
    #[serde(default)]
    pub body: Option<String>,

    /// Open/closed state.
    pub state: IssueState,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Closing timestamp, if closed.
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,

    /// Original author.
    pub user: User,

    /// Branch the pull request merges into.
    pub base: GitRef,

    /// Branch carrying the proposed change.
    pub head: GitRef,
}
