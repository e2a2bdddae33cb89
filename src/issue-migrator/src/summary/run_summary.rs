//! Run summary types.

use super::result::FailedItem;
use crate::comments::CommentReport;
use crate::correlate::Correlation;
use crate::model::ItemKind;
use crate::replay::{ItemStatus, ReplayReport};
use serde::Serialize;

/// Summary of a complete run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    /// Number of items produced by correlation.
    pub items_planned: usize,

    /// Number of plain issues created.
    pub issues_created: usize,

    /// Number of pull requests created.
    pub pulls_created: usize,

    /// Number of items that failed.
    pub items_failed: usize,

    /// Number of items closed after creation.
    pub states_reconciled: usize,

    /// Pull requests dropped for lack of a matching issue.
    pub orphaned_pulls: Vec<u64>,

    /// Failed items, for manual retry.
    pub failed: Vec<FailedItem>,

    /// Number of comments created.
    pub comments_created: usize,

    /// Number of comments skipped.
    pub comments_skipped: usize,

    /// Number of comments that failed to create.
    pub comments_failed: usize,

    /// Why comments could not be fetched, if they could not.
    pub comment_fetch_error: Option<String>,

    /// Whether this was a dry run.
    pub dry_run: bool,
}

impl RunSummary {
    /// Creates a new empty summary.
    #[must_use]
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Default::default()
        }
    }

    /// Records the plan produced by correlation.
    pub fn record_plan(&mut self, correlation: &Correlation) {
        self.items_planned = correlation.items.len();
        self.orphaned_pulls = correlation.orphaned_pulls.clone();
    }

    /// Updates the summary with the outcome of item replay.
    pub fn record_replay(&mut self, report: &ReplayReport) {
        for record in &report.records {
            match &record.status {
                ItemStatus::Done { closed, .. } => {
                    match record.kind {
                        ItemKind::Issue => self.issues_created += 1,
                        ItemKind::PullRequest => self.pulls_created += 1,
                    }
                    if *closed {
                        self.states_reconciled += 1;
                    }
                }
                ItemStatus::Failed {
                    error,
                    destination_number,
                } => {
                    self.items_failed += 1;
                    self.failed.push(FailedItem {
                        number: record.number,
                        kind: record.kind,
                        error: error.clone(),
                        destination_number: *destination_number,
                    });
                }
                ItemStatus::Pending | ItemStatus::InFlight => {}
            }
        }
    }

    /// Updates the summary with the outcome of comment replay.
    pub fn record_comments(&mut self, report: &CommentReport) {
        self.comments_created += report.created();
        self.comments_skipped += report.skipped();
        self.comments_failed += report.failed();
    }

    /// Returns true if any failures occurred.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.items_failed > 0
            || self.comments_failed > 0
            || self.comment_fetch_error.is_some()
    }

    /// Returns true if all operations were successful.
    #[must_use]
    pub fn all_success(&self) -> bool {
        !self.has_failures()
    }

    /// Returns the source numbers of failed items.
    pub fn failed_numbers(&self) -> impl Iterator<Item = u64> + '_ {
        self.failed.iter().map(|item| item.number)
    }
}
