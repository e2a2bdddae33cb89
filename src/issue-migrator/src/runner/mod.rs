//! Orchestrates a migration run.
//!
//! A run is: optional git mirror, concurrent fetch of issues and pull
//! requests, correlation, sequential replay, then optional comment replay.

mod config;
mod error;

pub use config::{RunnerConfig, TokenOverrides};
pub use error::RunnerError;

use crate::comments::{CommentReplayer, CommentSet};
use crate::correlate::{correlate, Correlation};
use crate::fetch::fetch_all;
use crate::forge::{ForgeApi, ListResource, RestClient};
use crate::mirror::mirror_repository;
use crate::model::{CommitComment, Issue, IssueComment, PullComment, PullRequest};
use crate::replay::{ItemRecord, ReplayDriver};
use crate::summary::RunSummary;
use futures::TryFutureExt;
use std::collections::HashMap;
use tracing::{error, info, warn};

/// Runs a migration from the source to the destination.
pub struct Runner {
    config: RunnerConfig,
    source: Box<dyn ForgeApi>,
    destination: Box<dyn ForgeApi>,
}

impl Runner {
    /// Builds a runner talking to both endpoints over HTTP.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Transport`] if either client cannot be built,
    /// e.g. because of a bad proxy or CA bundle.
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        let source = RestClient::new(config.source())?;
        let destination = RestClient::new(config.destination())?;
        Ok(Self::with_apis(
            config,
            Box::new(source),
            Box::new(destination),
        ))
    }

    /// Builds a runner on top of existing API implementations.
    pub fn with_apis(
        config: RunnerConfig,
        source: Box<dyn ForgeApi>,
        destination: Box<dyn ForgeApi>,
    ) -> Self {
        Self {
            config,
            source,
            destination,
        }
    }

    /// Executes the full migration flow.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] if the mirror step fails or the issue or pull
    /// request listing cannot be fetched completely. Per-item failures are
    /// reported in the summary instead.
    pub async fn run(&self) -> Result<RunSummary, RunnerError> {
        let mut summary = RunSummary::new(self.config.dry_run());
        info!(
            source = %self.config.source().repository(),
            destination = %self.config.destination().repository(),
            dry_run = self.config.dry_run(),
            "Starting migration"
        );

        if self.config.mirror() {
            if self.config.dry_run() {
                info!("Dry run, skipping mirror step");
            } else {
                mirror_repository(
                    self.config.source(),
                    self.config.destination(),
                    self.config.naming(),
                )
                .await?;
            }
        }

        let correlation = self.plan().await?;
        summary.record_plan(&correlation);

        if self.config.dry_run() {
            print_dry_run_preview(&correlation);
            return Ok(summary);
        }

        let driver = ReplayDriver::new(self.destination.as_ref(), self.config.naming());
        let report = driver
            .run_with_progress(&correlation.items, log_item_outcome)
            .await;
        summary.record_replay(&report);
        info!(
            created = report.succeeded().count(),
            failed = summary.items_failed,
            "Item replay finished"
        );

        if self.config.comments() {
            let numbers = report.number_map();
            self.replay_comments(&numbers, &mut summary).await;
        }

        Ok(summary)
    }

    /// Fetches and correlates the source collections.
    async fn plan(&self) -> Result<Correlation, RunnerError> {
        let source = self.source.as_ref();
        let (issues, pulls) = futures::try_join!(
            fetch_all::<Issue>(source, ListResource::Issues).map_err(RunnerError::from),
            fetch_all::<PullRequest>(source, ListResource::Pulls).map_err(RunnerError::from),
        )?;
        info!(
            issues = issues.len(),
            pulls = pulls.len(),
            "Fetched source collections"
        );

        let correlation = correlate(issues, &pulls);
        if !correlation.orphaned_pulls.is_empty() {
            warn!(
                count = correlation.orphaned_pulls.len(),
                "Pull requests without a matching issue will not be migrated"
            );
        }
        Ok(correlation)
    }

    /// Fetches and replays comments. A fetch failure is recorded and ends
    /// comment replay without affecting the items already migrated.
    async fn replay_comments(&self, numbers: &HashMap<u64, u64>, summary: &mut RunSummary) {
        let source = self.source.as_ref();
        let fetched = futures::try_join!(
            fetch_all::<IssueComment>(source, ListResource::IssueComments).map_err(RunnerError::from),
            fetch_all::<PullComment>(source, ListResource::PullComments).map_err(RunnerError::from),
            fetch_all::<CommitComment>(source, ListResource::CommitComments).map_err(RunnerError::from),
        );

        let comments = match fetched {
            Ok((issue_comments, pull_comments, commit_comments)) => CommentSet {
                issue_comments,
                pull_comments,
                commit_comments,
            },
            Err(e) => {
                error!(error = %e, "Failed to fetch comments, skipping comment replay");
                summary.comment_fetch_error = Some(e.to_string());
                return;
            }
        };

        info!(count = comments.len(), "Replaying comments");
        let report = CommentReplayer::new(self.destination.as_ref(), numbers)
            .run(&comments)
            .await;
        summary.record_comments(&report);
    }
}

fn log_item_outcome(record: &ItemRecord) {
    if let Some(destination) = record.status.destination_number() {
        info!(
            number = record.number,
            destination,
            status = record.status.as_str(),
            "Item replayed"
        );
    }
}

fn print_dry_run_preview(correlation: &Correlation) {
    println!("\n[DRY RUN] Planned replay order:");
    let total = correlation.items.len();
    for (i, item) in correlation.items.iter().enumerate() {
        println!(
            "  [{}/{}] #{} {} ({}): \"{}\"",
            i + 1,
            total,
            item.number(),
            item.kind(),
            item.state(),
            item.title()
        );
    }

    if !correlation.orphaned_pulls.is_empty() {
        println!(
            "\n  Pull requests without a matching issue: {:?}",
            correlation.orphaned_pulls
        );
    }

    println!();
}
