//! Git remote lookup
//!
//! Handles:
//! - Reading the current checkout's `origin` URL
//! - Turning a hosting-platform remote URL into an `owner/name` identifier

mod remote;

pub use remote::{parse_remote_url, Remote};

use crate::config::RepoId;
use crate::runner::{Invocation, Runner};

/// URL of the `origin` remote, or `None` outside a checkout or without git.
pub fn origin_url(runner: &dyn Runner) -> Option<String> {
    runner.locate("git")?;

    let output = match runner.run(&Invocation::new("git").args(["remote", "get-url", "origin"])) {
        Ok(output) => output,
        Err(e) => {
            tracing::debug!(error = %e, "git remote lookup failed to start");
            return None;
        }
    };

    if !output.success {
        tracing::debug!(stderr = %output.stderr.trim(), "no origin remote");
        return None;
    }

    Some(output.first_line().to_string()).filter(|url| !url.is_empty())
}

/// Repository named by `origin`, if it lives on `hostname`.
pub fn origin_repo(runner: &dyn Runner, hostname: &str) -> Option<RepoId> {
    let url = origin_url(runner)?;
    let remote = parse_remote_url(&url)?;

    if !remote.host.eq_ignore_ascii_case(hostname) {
        tracing::debug!(host = %remote.host, expected = %hostname, "origin is on another host");
        return None;
    }

    remote.repo_id().parse().ok()
}
