//! Replays issue, review and commit comments after the items they belong to.
//!
//! Comments are posted one at a time in creation order with a provenance
//! footer. Issue and review comments are attached to the destination number
//! their item received during replay; comments on items that failed are
//! skipped.

mod error;

pub use error::CommentError;

use crate::forge::{
    CreateCommentRequest, CreateCommitCommentRequest, CreateReviewCommentRequest, ForgeApi,
};
use crate::model::{CommitComment, IssueComment, PullComment};
use crate::provenance::annotate;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info, info_span, warn, Instrument};

/// Every comment collection of the source.
#[derive(Debug, Clone, Default)]
pub struct CommentSet {
    /// Comments on issues and pull request conversations.
    pub issue_comments: Vec<IssueComment>,

    /// Review comments on pull request diffs.
    pub pull_comments: Vec<PullComment>,

    /// Comments on commits.
    pub commit_comments: Vec<CommitComment>,
}

impl CommentSet {
    /// Returns the total number of comments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.issue_comments.len() + self.pull_comments.len() + self.commit_comments.len()
    }

    /// Returns true if there are no comments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Kind of comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentKind {
    /// Issue or pull request conversation comment.
    Issue,
    /// Pull request review comment.
    Review,
    /// Commit comment.
    Commit,
}

/// Outcome of one comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CommentStatus {
    /// Created in the destination.
    Created {
        /// Id assigned by the destination.
        id: u64,
    },

    /// Not attempted.
    Skipped {
        /// Reason for skipping.
        reason: String,
    },

    /// Rejected by the destination.
    Failed {
        /// Error message.
        error: String,
    },
}

/// Outcome of one comment, keyed by its source id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentRecord {
    /// Source id.
    pub id: u64,

    /// Kind of comment.
    pub kind: CommentKind,

    /// Outcome.
    pub status: CommentStatus,
}

/// Outcomes of a comment replay, in the order comments were attempted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CommentReport {
    /// One record per comment.
    pub records: Vec<CommentRecord>,
}

impl CommentReport {
    fn count(&self, predicate: impl Fn(&CommentStatus) -> bool) -> usize {
        self.records
            .iter()
            .filter(|record| predicate(&record.status))
            .count()
    }

    /// Number of comments created.
    #[must_use]
    pub fn created(&self) -> usize {
        self.count(|status| matches!(status, CommentStatus::Created { .. }))
    }

    /// Number of comments skipped.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|status| matches!(status, CommentStatus::Skipped { .. }))
    }

    /// Number of comments the destination rejected.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|status| matches!(status, CommentStatus::Failed { .. }))
    }
}

#[derive(Clone, Copy)]
enum PendingComment<'c> {
    Issue(&'c IssueComment),
    Review(&'c PullComment),
    Commit(&'c CommitComment),
}

impl PendingComment<'_> {
    fn id(&self) -> u64 {
        match self {
            Self::Issue(c) => c.id,
            Self::Review(c) => c.id,
            Self::Commit(c) => c.id,
        }
    }

    fn created_at(&self) -> DateTime<Utc> {
        match self {
            Self::Issue(c) => c.created_at,
            Self::Review(c) => c.created_at,
            Self::Commit(c) => c.created_at,
        }
    }

    fn kind(&self) -> CommentKind {
        match self {
            Self::Issue(_) => CommentKind::Issue,
            Self::Review(_) => CommentKind::Review,
            Self::Commit(_) => CommentKind::Commit,
        }
    }
}

/// Replays comments one at a time.
pub struct CommentReplayer<'a> {
    destination: &'a dyn ForgeApi,
    numbers: &'a HashMap<u64, u64>,
}

impl<'a> CommentReplayer<'a> {
    /// Creates a replayer writing to `destination`, translating source item
    /// numbers through `numbers`.
    pub fn new(destination: &'a dyn ForgeApi, numbers: &'a HashMap<u64, u64>) -> Self {
        Self {
            destination,
            numbers,
        }
    }

    /// Attempts every comment exactly once, oldest first.
    pub async fn run(&self, comments: &CommentSet) -> CommentReport {
        let span = info_span!("replay_comments", count = comments.len());

        async {
            let mut pending: Vec<PendingComment<'_>> = comments
                .issue_comments
                .iter()
                .map(PendingComment::Issue)
                .chain(comments.pull_comments.iter().map(PendingComment::Review))
                .chain(comments.commit_comments.iter().map(PendingComment::Commit))
                .collect();
            pending.sort_by_key(|comment| (comment.created_at(), comment.id()));

            let mut report = CommentReport::default();
            for comment in pending {
                let status = match self.replay(comment).await {
                    Ok(id) => {
                        debug!(source_id = comment.id(), id, "Comment created");
                        CommentStatus::Created { id }
                    }
                    Err(e) if e.is_skip() => {
                        debug!(source_id = comment.id(), reason = %e, "Comment skipped");
                        CommentStatus::Skipped {
                            reason: e.to_string(),
                        }
                    }
                    Err(e) => {
                        warn!(source_id = comment.id(), error = %e, "Comment failed, continuing with next");
                        CommentStatus::Failed {
                            error: e.to_string(),
                        }
                    }
                };

                report.records.push(CommentRecord {
                    id: comment.id(),
                    kind: comment.kind(),
                    status,
                });
            }

            info!(
                created = report.created(),
                skipped = report.skipped(),
                failed = report.failed(),
                "Comment replay complete"
            );
            report
        }
        .instrument(span)
        .await
    }

    async fn replay(&self, comment: PendingComment<'_>) -> Result<u64, CommentError> {
        let created = match comment {
            PendingComment::Issue(c) => {
                let number = self.destination_number(c.issue_number(), &c.issue_url)?;
                let request = CreateCommentRequest {
                    body: annotate(c.body.as_deref().unwrap_or_default(), c),
                };
                self.destination
                    .create_issue_comment(number, &request)
                    .await?
            }
            PendingComment::Review(c) => {
                let number = self.destination_number(c.pull_number(), &c.pull_request_url)?;
                let request = CreateReviewCommentRequest {
                    body: annotate(c.body.as_deref().unwrap_or_default(), c),
                    commit_id: c.original_commit_id.clone(),
                    path: c.path.clone(),
                    position: c.original_position,
                };
                self.destination
                    .create_pull_comment(number, &request)
                    .await?
            }
            PendingComment::Commit(c) => {
                let request = CreateCommitCommentRequest {
                    body: annotate(c.body.as_deref().unwrap_or_default(), c),
                    path: c.path.clone(),
                    position: c.position,
                };
                self.destination
                    .create_commit_comment(&c.commit_id, &request)
                    .await?
            }
        };

        Ok(created.id)
    }

    fn destination_number(&self, source: Option<u64>, url: &str) -> Result<u64, CommentError> {
        let number = source.ok_or_else(|| CommentError::UnknownTarget {
            url: url.to_string(),
        })?;
        self.numbers
            .get(&number)
            .copied()
            .ok_or(CommentError::Unmapped { number })
    }
}
