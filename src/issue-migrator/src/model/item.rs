//! Correlated migration items.

use super::{GitRef, Issue, IssueState, Provenance, PullRequest};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Branch references copied from a pull request onto its issue view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRefs {
    /// Merge base of the pull request.
    pub base: GitRef,
    /// Proposed change.
    pub head: GitRef,
}

/// Whether an item replays as an issue or as a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Plain issue.
    Issue,
    /// Pull request.
    PullRequest,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Issue => f.write_str("issue"),
            Self::PullRequest => f.write_str("pull request"),
        }
    }
}

/// A unit replayed into the destination.
///
/// The presence of `pull` is the only thing distinguishing a pull request
/// from a plain issue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MigrationItem {
    /// Issue view of the item; title, body, state and timestamps come from here.
    pub issue: Issue,

    /// Branch references, present for pull requests only.
    pub pull: Option<PullRefs>,
}

impl MigrationItem {
    /// Creates a plain issue item.
    #[must_use]
    pub fn from_issue(issue: Issue) -> Self {
        Self { issue, pull: None }
    }

    /// Creates a pull request item by copying `base`/`head` onto the issue view.
    #[must_use]
    pub fn with_pull(issue: Issue, pull: &PullRequest) -> Self {
        Self {
            issue,
            pull: Some(PullRefs {
                base: pull.base.clone(),
                head: pull.head.clone(),
            }),
        }
    }

    /// Returns the source number.
    #[must_use]
    pub fn number(&self) -> u64 {
        self.issue.number
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.issue.title
    }

    /// Returns the body, empty if the source had none.
    #[must_use]
    pub fn body(&self) -> &str {
        self.issue.body()
    }

    /// Returns the source state.
    #[must_use]
    pub fn state(&self) -> IssueState {
        self.issue.state
    }

    /// Returns how this item replays.
    #[must_use]
    pub fn kind(&self) -> ItemKind {
        if self.pull.is_some() {
            ItemKind::PullRequest
        } else {
            ItemKind::Issue
        }
    }
}

impl Provenance for MigrationItem {
    fn author(&self) -> &str {
        self.issue.author()
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.issue.created_at
    }

    fn closed_at(&self) -> Option<DateTime<Utc>> {
        self.issue.closed_at
    }
}
