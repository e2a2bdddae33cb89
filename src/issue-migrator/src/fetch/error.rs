//! Fetch error types.

use crate::forge::{ListResource, TransportError};
use thiserror::Error;

/// A paginated fetch aborted part-way through.
///
/// Carries the records accumulated before the failing page so callers can
/// see how far the fetch got.
#[derive(Debug, Error)]
#[error("Failed to fetch {resource} page {page} after {} records: {source}", .partial.len())]
pub struct FetchError<T> {
    /// Collection being fetched.
    pub resource: ListResource,

    /// Page that failed.
    pub page: u32,

    /// Records fetched from earlier pages, in order.
    pub partial: Vec<T>,

    /// Underlying failure.
    #[source]
    pub source: TransportError,
}

impl<T> FetchError<T> {
    /// Returns how many records were fetched before the failure.
    #[must_use]
    pub fn fetched(&self) -> usize {
        self.partial.len()
    }

    /// Consumes the error, returning the partial records.
    #[must_use]
    pub fn into_partial(self) -> Vec<T> {
        self.partial
    }
}
