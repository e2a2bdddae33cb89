//! Configuration loading.
//!
//! A run is described by a single TOML file naming the source and
//! destination repositories:
//!
//! ```toml
//! [source]
//! repository = "octo/old"
//! token-env = "SOURCE_GITHUB_TOKEN"
//!
//! [destination]
//! api-url = "https://ghe.example.com/api/v3"
//! repository = "octo/new"
//! ca-bundle = "/etc/ssl/ghe.pem"
//!
//! [options]
//! comments = true
//! ```

mod endpoint;
mod error;

pub use endpoint::{EndpointConfig, RemoteEndpoint, DEFAULT_API_URL};
pub use error::ConfigError;

use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Placeholder substituted with the source number in branch formats.
pub const NUMBER_PLACEHOLDER: &str = "{number}";

/// Parsed contents of a migration configuration file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MigrationConfig {
    /// Repository issues are read from.
    pub source: EndpointConfig,

    /// Repository issues are replayed into.
    pub destination: EndpointConfig,

    /// Replay options.
    #[serde(default)]
    pub options: MigrationOptions,
}

/// Replay options from the `[options]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MigrationOptions {
    /// Name of the destination branch anchoring a pull request's merge base.
    #[serde(default = "default_base_branch_format")]
    pub base_branch_format: String,

    /// Name of the mirrored branch holding a pull request's head.
    #[serde(default = "default_head_branch_format")]
    pub head_branch_format: String,

    /// Whether to replay comments after items.
    #[serde(default)]
    pub comments: bool,

    /// Whether to mirror the git repository before replaying.
    #[serde(default)]
    pub mirror: bool,
}

impl Default for MigrationOptions {
    fn default() -> Self {
        Self {
            base_branch_format: default_base_branch_format(),
            head_branch_format: default_head_branch_format(),
            comments: false,
            mirror: false,
        }
    }
}

pub(crate) fn default_base_branch_format() -> String {
    "pr{number}base".to_string()
}

pub(crate) fn default_head_branch_format() -> String {
    "pr/{number}/head".to_string()
}

impl MigrationConfig {
    /// Loads and validates a configuration file.
    ///
    /// Tokens are not resolved here; see [`EndpointConfig::resolve`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file is missing, unreadable, not valid
    /// TOML, or fails validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        info!(path = %path.display(), "Loading configuration");

        if !path.exists() {
            return Err(ConfigError::MissingFile {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        let config = Self::parse(&content, path)?;
        debug!(
            source = %config.source.repository,
            destination = %config.destination.repository,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Parses and validates configuration content; `path` is used for error
    /// messages only.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the content is invalid.
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::TomlError {
            path: path.display().to_string(),
            source: e,
        })?;

        config.validate(path)?;
        Ok(config)
    }

    /// Validates both endpoint sections and the options.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] describing the first problem.
    pub fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        self.source.validate("source", path)?;
        self.destination.validate("destination", path)?;

        for (key, format) in [
            ("base-branch-format", &self.options.base_branch_format),
            ("head-branch-format", &self.options.head_branch_format),
        ] {
            if !format.contains(NUMBER_PLACEHOLDER) {
                return Err(ConfigError::ValidationError {
                    path: path.display().to_string(),
                    message: format!("[options] {key} '{format}' must contain {NUMBER_PLACEHOLDER}"),
                });
            }
        }

        if self.source.repository == self.destination.repository
            && self.source.api_url == self.destination.api_url
        {
            return Err(ConfigError::ValidationError {
                path: path.display().to_string(),
                message: "source and destination refer to the same repository".to_string(),
            });
        }

        Ok(())
    }
}
