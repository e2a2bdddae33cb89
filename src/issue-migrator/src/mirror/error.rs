//! Mirror error types.

use thiserror::Error;

/// Errors that can occur while mirroring the git repository.
#[derive(Debug, Error)]
pub enum MirrorError {
    /// A git command could not be run or exited unsuccessfully.
    #[error("git {command} failed: {message}")]
    CommandFailed { command: String, message: String },

    /// Reading or writing the mirror on disk failed.
    #[error("Mirror I/O error at '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// No git URL is known for the repository.
    #[error("No clone-url configured for '{repository}' and none can be derived from its api-url")]
    MissingCloneUrl { repository: String },

    /// Credentials could not be embedded into the git URL.
    #[error("Cannot add credentials to clone URL of '{repository}'")]
    InvalidUrl { repository: String },
}
