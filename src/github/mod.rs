//! GitHub CLI (`gh`) wrappers.
//!
//! Every call into `gh` goes through this module. Authentication, API access
//! and output formatting stay `gh`'s job; these functions only build the
//! command lines and interpret exit status (plus `--json` output where a
//! typed result is needed). All CLI interaction is in internal.rs.

mod internal;

use anyhow::Result;
use zeroize::Zeroizing;

use crate::config::{GitProtocol, RepoId};
use crate::runner::Runner;

/// Program name of the GitHub CLI.
pub const GH: &str = "gh";

/// Variables `gh` reads as credentials, for github.com and enterprise hosts.
/// Stripped from `gh auth login` so the login stores the credential instead
/// of refusing.
pub const GH_CREDENTIAL_VARS: &[&str] = &[
    "GH_TOKEN",
    "GITHUB_TOKEN",
    "GH_ENTERPRISE_TOKEN",
    "GITHUB_ENTERPRISE_TOKEN",
];

/// State filter for issue and milestone listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ListState {
    #[default]
    Open,
    Closed,
    All,
}

impl ListState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListState::Open => "open",
            ListState::Closed => "closed",
            ListState::All => "all",
        }
    }
}

/// What `gh repo view` reports about an accessible repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSummary {
    pub name_with_owner: String,
    pub visibility: String,
    pub default_branch: Option<String>,
    pub url: String,
}

/// Filters passed through to `gh issue list`.
#[derive(Debug, Clone, Default)]
pub struct IssueQuery {
    pub state: Option<ListState>,
    pub limit: Option<usize>,
}

/// First line of `gh --version`.
pub fn version(runner: &dyn Runner) -> Result<String> {
    internal::version(runner)
}

/// Check if `gh` is authenticated against `hostname`.
pub fn is_authenticated(runner: &dyn Runner, hostname: &str) -> Result<bool> {
    internal::check_auth(runner, hostname)
}

/// Non-interactive login: pipe `token` to `gh auth login --with-token`.
///
/// `token_env` names the variable the credential came from; it is removed from
/// the child's environment along with [`GH_CREDENTIAL_VARS`].
pub fn login_with_token(
    runner: &dyn Runner,
    hostname: &str,
    token_env: &str,
    token: &Zeroizing<String>,
) -> Result<()> {
    internal::login_with_token(runner, hostname, token_env, token)
}

/// Interactive browser login owned entirely by `gh`.
pub fn login_web(runner: &dyn Runner, hostname: &str, protocol: GitProtocol) -> Result<()> {
    internal::login_web(runner, hostname, protocol)
}

/// Check repository access via `gh repo view`.
pub fn repo_view(runner: &dyn Runner, repo: &RepoId) -> Result<RepoSummary> {
    internal::repo_view(runner, repo)
}

/// Proxy to `gh issue list`; output goes straight to the terminal.
pub fn issue_list(runner: &dyn Runner, repo: &RepoId, query: &IssueQuery) -> Result<()> {
    internal::issue_list(runner, repo, query)
}

/// List milestones through `gh api`; output goes straight to the terminal.
pub fn milestone_list(runner: &dyn Runner, repo: &RepoId, state: ListState) -> Result<()> {
    internal::milestone_list(runner, repo, state)
}
