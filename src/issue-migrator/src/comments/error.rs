//! Comment replay error types.

use crate::forge::TransportError;
use thiserror::Error;

/// Reasons a comment was not replayed.
#[derive(Debug, Error)]
pub enum CommentError {
    /// The commented item was not replayed, so there is nothing to attach to.
    #[error("Source item #{number} has no destination counterpart")]
    Unmapped { number: u64 },

    /// The commented item could not be determined from the comment.
    #[error("Cannot determine the commented item from '{url}'")]
    UnknownTarget { url: String },

    /// The destination rejected the comment.
    #[error("Failed to create comment: {0}")]
    Create(#[from] TransportError),
}

impl CommentError {
    /// Returns true if the comment was skipped rather than rejected.
    #[must_use]
    pub fn is_skip(&self) -> bool {
        !matches!(self, Self::Create(_))
    }
}
