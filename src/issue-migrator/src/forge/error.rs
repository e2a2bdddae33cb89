//! Transport error types.

use serde::Deserialize;
use thiserror::Error;

/// Errors raised by a single HTTP exchange with a remote system.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection, timeout, TLS or protocol failure.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body was not the expected JSON.
    #[error("Failed to decode response: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
    },

    /// The HTTP client could not be built for an endpoint.
    #[error("Failed to configure HTTP client: {message}")]
    Client { message: String },
}

/// Error payload returned by GitHub-compatible APIs.
#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl TransportError {
    /// Builds a [`TransportError::Status`] from a failed response, preferring
    /// the API's `message` field over the raw body.
    pub(crate) fn from_response(status: u16, text: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(text)
            .map(|body| body.message)
            .unwrap_or_else(|_| text.trim().to_string());

        Self::Status { status, message }
    }

    /// Returns the HTTP status, if the remote answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns true if the request collided with something that already
    /// exists, such as a branch reference.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        match self {
            Self::Status { status: 409, .. } => true,
            Self::Status {
                status: 422,
                message,
            } => message.to_lowercase().contains("already exists"),
            _ => false,
        }
    }
}
