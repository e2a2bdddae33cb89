//! Item migration error types.

use crate::forge::TransportError;
use thiserror::Error;

/// Errors that end the migration of a single item.
///
/// None of these abort the batch; the replay driver records them and moves
/// on to the next item.
#[derive(Debug, Error)]
pub enum ItemMigrationError {
    /// The destination issue could not be created.
    #[error("Failed to create issue: {0}")]
    CreateIssue(#[source] TransportError),

    /// The branch anchoring the pull request's merge base could not be created.
    #[error("Failed to create base branch '{branch}': {source}")]
    CreateBaseRef {
        branch: String,
        #[source]
        source: TransportError,
    },

    /// The destination pull request could not be created.
    #[error("Failed to create pull request: {0}")]
    CreatePull(#[source] TransportError),

    /// The item was created but could not be closed.
    #[error("Created #{number} but failed to close it: {source}")]
    ReconcileState {
        number: u64,
        #[source]
        source: TransportError,
    },
}

impl ItemMigrationError {
    /// Returns true if the base branch already existed in the destination.
    #[must_use]
    pub fn is_ref_conflict(&self) -> bool {
        matches!(self, Self::CreateBaseRef { source, .. } if source.is_conflict())
    }

    /// Returns the destination number if the item got created before failing.
    #[must_use]
    pub fn created_number(&self) -> Option<u64> {
        match self {
            Self::ReconcileState { number, .. } => Some(*number),
            _ => None,
        }
    }
}
