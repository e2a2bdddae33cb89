//! The REST contract shared by source and destination systems.
//!
//! [`ForgeApi`] is the seam between the migration engine and the network:
//! [`RestClient`] speaks it over HTTP to any GitHub-compatible API, while
//! tests substitute an in-memory recorder.

mod client;
mod error;
mod requests;

pub use client::RestClient;
pub use error::TransportError;
pub use requests::{
    CreateCommentRequest, CreateCommitCommentRequest, CreateIssueRequest, CreatePullRequest,
    CreateRefRequest, CreateReviewCommentRequest, UpdateIssueRequest,
};

use crate::model::IssueState;
use async_trait::async_trait;
use serde::Deserialize;
use std::fmt;

/// A paginated collection of a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListResource {
    /// `issues` (includes the issue view of pull requests).
    Issues,
    /// `pulls`
    Pulls,
    /// `issues/comments`
    IssueComments,
    /// `pulls/comments`
    PullComments,
    /// `comments` (commit comments).
    CommitComments,
}

impl ListResource {
    /// Returns the route relative to the repository root.
    #[must_use]
    pub fn path(&self) -> &'static str {
        match self {
            Self::Issues => "issues",
            Self::Pulls => "pulls",
            Self::IssueComments => "issues/comments",
            Self::PullComments => "pulls/comments",
            Self::CommitComments => "comments",
        }
    }
}

impl fmt::Display for ListResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// An issue or pull request created in the destination.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedIssue {
    /// Number assigned by the destination.
    pub number: u64,

    /// Browser URL, when the API returns one.
    #[serde(default)]
    pub html_url: Option<String>,
}

/// A comment created in the destination.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedComment {
    /// Id assigned by the destination.
    pub id: u64,
}

/// Operations the engine needs from a remote repository.
///
/// Reads go to the source, writes to the destination; each side gets its own
/// implementation bound to one [`RemoteEndpoint`](crate::config::RemoteEndpoint).
#[async_trait]
pub trait ForgeApi: Send + Sync {
    /// Fetches one page of `resource` with `state=all`. An empty page marks
    /// the end of the collection.
    async fn list_page(
        &self,
        resource: ListResource,
        page: u32,
    ) -> Result<Vec<serde_json::Value>, TransportError>;

    /// Creates an open issue.
    async fn create_issue(
        &self,
        request: &CreateIssueRequest,
    ) -> Result<CreatedIssue, TransportError>;

    /// Sets the state of an existing issue or pull request.
    async fn update_issue_state(
        &self,
        number: u64,
        state: IssueState,
    ) -> Result<(), TransportError>;

    /// Creates a git reference.
    async fn create_ref(&self, request: &CreateRefRequest) -> Result<(), TransportError>;

    /// Creates an open pull request.
    async fn create_pull(
        &self,
        request: &CreatePullRequest,
    ) -> Result<CreatedIssue, TransportError>;

    /// Comments on an issue or on a pull request's conversation.
    async fn create_issue_comment(
        &self,
        number: u64,
        request: &CreateCommentRequest,
    ) -> Result<CreatedComment, TransportError>;

    /// Adds a review comment to a pull request diff.
    async fn create_pull_comment(
        &self,
        number: u64,
        request: &CreateReviewCommentRequest,
    ) -> Result<CreatedComment, TransportError>;

    /// Comments on a commit.
    async fn create_commit_comment(
        &self,
        sha: &str,
        request: &CreateCommitCommentRequest,
    ) -> Result<CreatedComment, TransportError>;
}
