//! CLI for the issue migrator.
//!
//! Replays the issues and pull requests of a source repository into a
//! destination repository, as described by a TOML configuration file.

use clap::Parser;
use issue_migrator::{
    MigrationConfig, RunSummary, Runner, RunnerConfig, RunnerError, TokenOverrides,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Issue Migrator - Replay issues and pull requests into another repository.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the migration configuration file.
    #[arg(long, default_value = "migration.toml")]
    config: PathBuf,

    /// Token for the source repository (overrides the file).
    #[arg(long, env = "SOURCE_GITHUB_TOKEN", hide_env_values = true)]
    source_token: Option<String>,

    /// Token for the destination repository (overrides the file).
    #[arg(long, env = "DESTINATION_GITHUB_TOKEN", hide_env_values = true)]
    destination_token: Option<String>,

    /// Fetch and plan without writing to the destination.
    #[arg(long)]
    dry_run: bool,

    /// Also replay comments.
    #[arg(long)]
    comments: bool,

    /// Mirror the git repository before replaying.
    #[arg(long)]
    mirror: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let args = Args::parse();

    match run(args).await {
        Ok(summary) => {
            print_summary(&summary);

            if summary.has_failures() {
                ExitCode::from(1)
            } else {
                ExitCode::from(0)
            }
        }
        Err(e) => {
            error!(error = %e, "Critical failure");
            ExitCode::from(2)
        }
    }
}

/// Initializes tracing with compact output, filtered by `RUST_LOG`
/// (defaults to "info").
fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Main execution logic.
async fn run(args: Args) -> Result<RunSummary, RunnerError> {
    let file = MigrationConfig::load(&args.config)?;
    let tokens = TokenOverrides {
        source: args.source_token,
        destination: args.destination_token,
    };

    let mut config = RunnerConfig::from_config(file, &args.config, tokens)?
        .with_dry_run(args.dry_run);
    if args.comments {
        config = config.with_comments(true);
    }
    if args.mirror {
        config = config.with_mirror(true);
    }

    let runner = Runner::new(config)?;
    runner.run().await
}

/// Prints the final run summary.
fn print_summary(summary: &RunSummary) {
    println!("\nSummary:");
    println!(
        "  Mode: {}",
        if summary.dry_run { "Dry Run" } else { "Live" }
    );
    println!("  Items planned: {}", summary.items_planned);

    if !summary.orphaned_pulls.is_empty() {
        println!(
            "  Pull requests without an issue: {}",
            join_numbers(summary.orphaned_pulls.iter().copied())
        );
    }

    if summary.dry_run {
        return;
    }

    println!("  Issues created: {}", summary.issues_created);
    println!("  Pull requests created: {}", summary.pulls_created);
    println!("  Closed after creation: {}", summary.states_reconciled);
    println!("  Items failed: {}", summary.items_failed);
    for item in &summary.failed {
        println!("    #{} ({}): {}", item.number, item.kind, item.error);
    }

    if summary.comments_created + summary.comments_skipped + summary.comments_failed > 0 {
        println!("  Comments created: {}", summary.comments_created);
        println!("  Comments skipped: {}", summary.comments_skipped);
        println!("  Comments failed: {}", summary.comments_failed);
    }
    if let Some(error) = &summary.comment_fetch_error {
        println!("  Comments not replayed: {error}");
    }

    if summary.has_failures() && !summary.failed.is_empty() {
        println!(
            "\n  Retry manually: {}",
            join_numbers(summary.failed_numbers())
        );
    }
}

fn join_numbers(numbers: impl Iterator<Item = u64>) -> String {
    numbers
        .map(|number| format!("#{number}"))
        .collect::<Vec<_>>()
        .join(", ")
}
