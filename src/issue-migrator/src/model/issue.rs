//! Issue records.

use super::Provenance;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Open/closed state shared by issues and pull requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    /// Still open.
    Open,
    /// Closed (or merged, for pull requests).
    Closed,
}

impl IssueState {
    /// Returns the state as sent over the wire.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for IssueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account that authored a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Account login.
    pub login: String,
}

/// An issue as listed by `GET /issues?state=all`.
///
/// The source lists pull requests here too; they are told apart only once
/// correlated with the pull list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Number, unique within the repository.
    pub number: u64,

    /// Title.
    pub title: String,

    /// Markdown body. The API returns `null` for empty bodies.
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
}

impl Issue {
    /// Returns the body, treating a missing body as empty.
    #[must_use]
    pub fn body(&self) -> &str {
        self.body.as_deref().unwrap_or_default()
    }
}

impl Provenance for Issue {
    fn author(&self) -> &str {
        &self.user.login
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn closed_at(&self) -> Option<DateTime<Utc>> {
        self.closed_at
    }
}
