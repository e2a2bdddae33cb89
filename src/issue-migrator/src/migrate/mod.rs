//! Replays one migration item into the destination.
//!
//! Plain issues are created and, if closed in the source, closed again.
//! Pull requests need their merge base to exist in the destination first, so
//! a branch is created at the base commit before the pull request is opened
//! against it. Each step short-circuits on failure.

mod error;

pub use error::ItemMigrationError;

use crate::config::{MigrationOptions, NUMBER_PLACEHOLDER};
use crate::forge::{CreateIssueRequest, CreatePullRequest, CreateRefRequest, ForgeApi};
use crate::model::{IssueState, ItemKind, MigrationItem, PullRefs};
use crate::provenance::annotate;
use serde::Serialize;
use tracing::{debug, info, info_span, Instrument};

/// Names of the branches a pull request is replayed between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchNaming {
    base_format: String,
    head_format: String,
}

impl BranchNaming {
    /// Creates a naming scheme; `{number}` in either format is replaced by the
    /// source number.
    pub fn new(base_format: impl Into<String>, head_format: impl Into<String>) -> Self {
        Self {
            base_format: base_format.into(),
            head_format: head_format.into(),
        }
    }

    /// Branch created at the pull request's merge base, e.g. `pr7base`.
    #[must_use]
    pub fn base_branch(&self, number: u64) -> String {
        self.base_format
            .replace(NUMBER_PLACEHOLDER, &number.to_string())
    }

    /// Mirrored branch holding the pull request's head, e.g. `pr/7/head`.
    #[must_use]
    pub fn head_branch(&self, number: u64) -> String {
        self.head_format
            .replace(NUMBER_PLACEHOLDER, &number.to_string())
    }
}

impl Default for BranchNaming {
    fn default() -> Self {
        Self::from(&MigrationOptions::default())
    }
}

impl From<&MigrationOptions> for BranchNaming {
    fn from(options: &MigrationOptions) -> Self {
        Self::new(&options.base_branch_format, &options.head_branch_format)
    }
}

/// A successfully replayed item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigratedItem {
    /// Number assigned by the destination.
    pub destination_number: u64,

    /// How the item was replayed.
    pub kind: ItemKind,

    /// Whether a follow-up update closed the item.
    pub closed: bool,
}

/// Creates migration items in the destination.
pub struct ItemMigrator<'a> {
    destination: &'a dyn ForgeApi,
    naming: &'a BranchNaming,
}

impl<'a> ItemMigrator<'a> {
    /// Creates a migrator writing to `destination`.
    pub fn new(destination: &'a dyn ForgeApi, naming: &'a BranchNaming) -> Self {
        Self {
            destination,
            naming,
        }
    }

    /// Replays `item`, dispatching on whether it carries pull request refs.
    ///
    /// # Errors
    ///
    /// Returns [`ItemMigrationError`] for the first step that failed; later
    /// steps are not attempted.
    pub async fn migrate(&self, item: &MigrationItem) -> Result<MigratedItem, ItemMigrationError> {
        let span = info_span!(
            "migrate_item",
            number = item.number(),
            kind = %item.kind()
        );

        async {
            match &item.pull {
                Some(refs) => self.migrate_pull(item, refs).await,
                None => self.migrate_issue(item).await,
            }
        }
        .instrument(span)
        .await
    }

    async fn migrate_issue(&self, item: &MigrationItem) -> Result<MigratedItem, ItemMigrationError> {
        let request = CreateIssueRequest::new(item.title(), annotate(item.body(), item));
        let created = self
            .destination
            .create_issue(&request)
            .await
            .map_err(ItemMigrationError::CreateIssue)?;
        info!(
            destination_number = created.number,
            url = created.html_url.as_deref().unwrap_or_default(),
            "Issue created"
        );

        let closed = self.reconcile_state(item, created.number).await?;
        Ok(MigratedItem {
            destination_number: created.number,
            kind: ItemKind::Issue,
            closed,
        })
    }

    async fn migrate_pull(
        &self,
        item: &MigrationItem,
        refs: &PullRefs,
    ) -> Result<MigratedItem, ItemMigrationError> {
        let number = item.number();
        let base_branch = self.naming.base_branch(number);

        debug!(branch = %base_branch, sha = %refs.base.sha, "Creating base branch");
        self.destination
            .create_ref(&CreateRefRequest::branch(&base_branch, &refs.base.sha))
            .await
            .map_err(|source| ItemMigrationError::CreateBaseRef {
                branch: base_branch.clone(),
                source,
            })?;

        let request = CreatePullRequest::new(
            item.title(),
            self.naming.head_branch(number),
            base_branch,
            annotate(item.body(), item),
        );
        let created = self
            .destination
            .create_pull(&request)
            .await
            .map_err(ItemMigrationError::CreatePull)?;
        info!(
            destination_number = created.number,
            url = created.html_url.as_deref().unwrap_or_default(),
            "Pull request created"
        );

        let closed = self.reconcile_state(item, created.number).await?;
        Ok(MigratedItem {
            destination_number: created.number,
            kind: ItemKind::PullRequest,
            closed,
        })
    }

    /// Closes the destination item if the source item is closed. Creation
    /// always yields an open item, so open items need no update.
    async fn reconcile_state(
        &self,
        item: &MigrationItem,
        destination_number: u64,
    ) -> Result<bool, ItemMigrationError> {
        if item.state() != IssueState::Closed {
            return Ok(false);
        }

        self.destination
            .update_issue_state(destination_number, IssueState::Closed)
            .await
            .map_err(|source| ItemMigrationError::ReconcileState {
                number: destination_number,
                source,
            })?;
        debug!(destination_number, "Closed to match source state");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_branch_names() {
        let naming = BranchNaming::default();

        assert_eq!(naming.base_branch(7), "pr7base");
        assert_eq!(naming.head_branch(7), "pr/7/head");
    }

    #[test]
    fn custom_branch_names() {
        let naming = BranchNaming::new("migration/{number}/base", "pull-{number}");

        assert_eq!(naming.base_branch(42), "migration/42/base");
        assert_eq!(naming.head_branch(42), "pull-42");
    }
}
