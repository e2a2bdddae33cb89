#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod comments;
pub mod config;
pub mod correlate;
pub mod fetch;
pub mod forge;
pub mod migrate;
pub mod mirror;
pub mod model;
pub mod provenance;
pub mod replay;
pub mod runner;
pub mod summary;

pub use comments::{CommentError, CommentReplayer, CommentReport, CommentSet};
pub use config::{ConfigError, EndpointConfig, MigrationConfig, MigrationOptions, RemoteEndpoint};
pub use correlate::{correlate, Correlation};
pub use fetch::{fetch_all, FetchError};
pub use forge::{ForgeApi, ListResource, RestClient, TransportError};
pub use migrate::{BranchNaming, ItemMigrationError, ItemMigrator, MigratedItem};
pub use mirror::{mirror_repository, MirrorError};
pub use model::{Issue, IssueState, ItemKind, MigrationItem, Provenance, PullRequest};
pub use provenance::{annotate, footer};
pub use replay::{ItemRecord, ItemStatus, ReplayDriver, ReplayReport};
pub use runner::{Runner, RunnerConfig, RunnerError, TokenOverrides};
pub use summary::{FailedItem, RunSummary};
