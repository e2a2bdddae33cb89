//! Runner configuration.

use crate::config::{ConfigError, MigrationConfig, RemoteEndpoint};
use crate::migrate::BranchNaming;
use std::path::Path;

/// Tokens given on the command line, taking precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct TokenOverrides {
    /// Source token.
    pub source: Option<String>,
    /// Destination token.
    pub destination: Option<String>,
}

/// Configuration for a migration run.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Repository items are read from.
    source: RemoteEndpoint,
    /// Repository items are written to.
    destination: RemoteEndpoint,
    /// Branch names used for pull requests.
    naming: BranchNaming,
    /// Whether comments are replayed after items.
    comments: bool,
    /// Whether the git mirror step runs first.
    mirror: bool,
    /// Whether to plan without writing.
    dry_run: bool,
}

impl RunnerConfig {
    /// Creates a configuration with default options.
    pub fn new(source: RemoteEndpoint, destination: RemoteEndpoint) -> Self {
        Self {
            source,
            destination,
            naming: BranchNaming::default(),
            comments: false,
            mirror: false,
            dry_run: false,
        }
    }

    /// Resolves a loaded configuration file into a runner configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Parsed configuration file.
    /// * `path` - Path the file was loaded from, for error messages.
    /// * `tokens` - Tokens overriding the file's.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a section is invalid or has no token.
    pub fn from_config(
        config: MigrationConfig,
        path: &Path,
        tokens: TokenOverrides,
    ) -> Result<Self, ConfigError> {
        let naming = BranchNaming::from(&config.options);
        let source = config.source.resolve("source", path, tokens.source)?;
        let destination = config
            .destination
            .resolve("destination", path, tokens.destination)?;

        Ok(Self::new(source, destination)
            .with_naming(naming)
            .with_comments(config.options.comments)
            .with_mirror(config.options.mirror))
    }

    /// Sets the branch naming scheme.
    pub fn with_naming(mut self, naming: BranchNaming) -> Self {
        self.naming = naming;
        self
    }

    /// Enables or disables comment replay.
    pub fn with_comments(mut self, comments: bool) -> Self {
        self.comments = comments;
        self
    }

    /// Enables or disables the mirror step.
    pub fn with_mirror(mut self, mirror: bool) -> Self {
        self.mirror = mirror;
        self
    }

    /// Enables or disables dry-run mode.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Returns the source endpoint.
    pub fn source(&self) -> &RemoteEndpoint {
        &self.source
    }

    /// Returns the destination endpoint.
    pub fn destination(&self) -> &RemoteEndpoint {
        &self.destination
    }

    /// Returns the branch naming scheme.
    pub fn naming(&self) -> &BranchNaming {
        &self.naming
    }

    /// Returns whether comments are replayed.
    pub fn comments(&self) -> bool {
        self.comments
    }

    /// Returns whether the mirror step runs.
    pub fn mirror(&self) -> bool {
        self.mirror
    }

    /// Returns whether dry-run mode is enabled.
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }
}
