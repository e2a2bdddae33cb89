//! Runner error types.

use crate::config::ConfigError;
use crate::fetch::FetchError;
use crate::forge::{ListResource, TransportError};
use crate::mirror::MirrorError;

/// Errors that abort a whole run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Configuration loading errors.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// HTTP client initialization errors.
    #[error("Failed to build API client: {0}")]
    Transport(#[from] TransportError),

    /// A source collection could not be fetched completely.
    #[error("Fetching {resource} aborted on page {page} after {fetched} records: {source}")]
    FetchAborted {
        resource: ListResource,
        page: u32,
        fetched: usize,
        #[source]
        source: TransportError,
    },

    /// The git mirror step failed.
    #[error(transparent)]
    Mirror(#[from] MirrorError),
}

impl<T> From<FetchError<T>> for RunnerError {
    fn from(error: FetchError<T>) -> Self {
        let fetched = error.fetched();
        Self::FetchAborted {
            resource: error.resource,
            page: error.page,
            fetched,
            source: error.source,
        }
    }
}
