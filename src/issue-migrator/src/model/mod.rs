//! Records read from the source repository and the items replayed into the
//! destination.
//!
//! Source records are deserialized straight from the REST payloads and are
//! never mutated afterwards. [`MigrationItem`] is the only type built by this
//! crate: an [`Issue`] optionally extended with the branch references of the
//! [`PullRequest`] sharing its number.

mod comment;
mod issue;
mod item;
mod pull;

pub use comment::{CommitComment, IssueComment, PullComment};
pub use issue::{Issue, IssueState, User};
pub use item::{ItemKind, MigrationItem, PullRefs};
pub use pull::{GitRef, PullRequest};

use chrono::{DateTime, Utc};

/// Authorship and lifecycle timestamps of a record that gets a provenance
/// footer when replayed.
pub trait Provenance {
    /// Login of the original author.
    fn author(&self) -> &str;

    /// When the record was created in the source repository.
    fn created_at(&self) -> DateTime<Utc>;

    /// When the record was closed, if it ever was.
    fn closed_at(&self) -> Option<DateTime<Utc>> {
        None
    }
}

/// Parses the number at the end of an API URL such as
/// `https://api.github.com/repos/o/r/issues/12`.
pub(crate) fn trailing_number(url: &str) -> Option<u64> {
    url.trim_end_matches('/').rsplit('/').next()?.parse().ok()
}
