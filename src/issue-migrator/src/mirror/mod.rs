//! Git mirror step run before replay.
//!
//! Pull requests are replayed against branches, so the destination needs
//! every pull request head as a branch. The source is cloned with
//! `--mirror`, its `refs/pull/<n>/head` refs are renamed to the head branch
//! names used during replay, and the result is pushed with `--mirror`.

mod error;

pub use error::MirrorError;

use crate::config::RemoteEndpoint;
use crate::migrate::BranchNaming;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, info_span, Instrument};
use url::Url;

const MIRROR_DIR: &str = "mirror.git";

/// Mirrors `source` into `destination`.
///
/// # Errors
///
/// Returns [`MirrorError`] if a clone URL is unknown or any git step fails.
pub async fn mirror_repository(
    source: &RemoteEndpoint,
    destination: &RemoteEndpoint,
    naming: &BranchNaming,
) -> Result<(), MirrorError> {
    let span = info_span!(
        "mirror",
        source = %source.repository(),
        destination = %destination.repository()
    );

    async {
        let source_url = authenticated_url(source)?;
        let destination_url = authenticated_url(destination)?;
        let secrets = [source.token(), destination.token()];

        let temp_dir = tempfile::tempdir().map_err(|e| MirrorError::Io {
            path: std::env::temp_dir().display().to_string(),
            source: e,
        })?;

        info!("Cloning source mirror");
        run_git(
            temp_dir.path(),
            &["clone", "--mirror", source_url.as_str(), MIRROR_DIR],
            &secrets,
        )
        .await?;

        let repo = temp_dir.path().join(MIRROR_DIR);
        let renamed = rewrite_pull_refs(&repo, naming)?;
        info!(pull_heads = renamed, "Renamed pull request heads to branches");

        info!("Pushing mirror to destination");
        run_git(
            &repo,
            &["push", "--mirror", destination_url.as_str()],
            &secrets,
        )
        .await?;

        Ok(())
    }
    .instrument(span)
    .await
}

fn authenticated_url(endpoint: &RemoteEndpoint) -> Result<Url, MirrorError> {
    let mut url = endpoint
        .clone_url()
        .ok_or_else(|| MirrorError::MissingCloneUrl {
            repository: endpoint.repository().to_string(),
        })?;

    let invalid = || MirrorError::InvalidUrl {
        repository: endpoint.repository().to_string(),
    };
    url.set_username("x-access-token").map_err(|_| invalid())?;
    url.set_password(Some(endpoint.token()))
        .map_err(|_| invalid())?;

    Ok(url)
}

/// Rewrites `packed-refs` in a bare mirror, returning how many pull heads
/// became branches.
fn rewrite_pull_refs(repo: &Path, naming: &BranchNaming) -> Result<usize, MirrorError> {
    let path = repo.join("packed-refs");
    let io_error = |source| MirrorError::Io {
        path: path.display().to_string(),
        source,
    };

    if !path.exists() {
        debug!("No packed-refs in mirror, nothing to rewrite");
        return Ok(0);
    }

    let content = std::fs::read_to_string(&path).map_err(io_error)?;
    let (rewritten, renamed) = rewrite_packed_refs(&content, naming);
    std::fs::write(&path, rewritten).map_err(io_error)?;

    Ok(renamed)
}

/// Renames `refs/pull/<n>/head` to `refs/heads/<head branch>` and drops the
/// `refs/pull/<n>/merge` refs, which destinations refuse to accept.
pub(crate) fn rewrite_packed_refs(content: &str, naming: &BranchNaming) -> (String, usize) {
    let mut output = String::with_capacity(content.len());
    let mut renamed = 0;

    for line in content.lines() {
        let rewritten = match line.split_once(' ') {
            Some((sha, name)) if !line.starts_with('#') && !line.starts_with('^') => {
                match pull_ref(name) {
                    Some((number, "head")) => {
                        renamed += 1;
                        Some(format!("{sha} refs/heads/{}", naming.head_branch(number)))
                    }
                    Some(_) => None,
                    None => Some(line.to_string()),
                }
            }
            _ => Some(line.to_string()),
        };

        if let Some(line) = rewritten {
            output.push_str(&line);
            output.push('\n');
        }
    }

    (output, renamed)
}

fn pull_ref(name: &str) -> Option<(u64, &str)> {
    let rest = name.strip_prefix("refs/pull/")?;
    let (number, kind) = rest.split_once('/')?;
    Some((number.parse().ok()?, kind))
}

/// Runs a git command, scrubbing `secrets` from any error output.
async fn run_git(path: &Path, args: &[&str], secrets: &[&str]) -> Result<(), MirrorError> {
    let command = args.first().copied().unwrap_or_default().to_string();
    debug!(command = %command, "Running git");

    let output = Command::new("git")
        .args(args)
        .current_dir(path)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| MirrorError::CommandFailed {
            command: command.clone(),
            message: format!("Failed to execute git: {e}"),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(MirrorError::CommandFailed {
            command,
            message: redact(stderr.trim(), secrets),
        });
    }

    Ok(())
}

fn redact(text: &str, secrets: &[&str]) -> String {
    secrets
        .iter()
        .filter(|secret| !secret.is_empty())
        .fold(text.to_string(), |text, secret| text.replace(secret, "***"))
}
