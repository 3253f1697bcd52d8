//! Internal implementation for the gh wrappers.
//!
//! Contains gh command lines and JSON parsing.
//! Not exposed in public interface.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use zeroize::Zeroizing;

use super::{IssueQuery, ListState, RepoSummary, GH, GH_CREDENTIAL_VARS};
use crate::config::{GitProtocol, RepoId};
use crate::runner::{Invocation, Output, Runner};

// ============================================================================
// gh CLI JSON types (internal, match gh output format)
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GhRepo {
    name_with_owner: String,
    #[serde(default)]
    visibility: String,
    default_branch_ref: Option<GhBranchRef>,
    #[serde(default)]
    url: String,
}

#[derive(Debug, Deserialize)]
struct GhBranchRef {
    name: String,
}

const REPO_VIEW_FIELDS: &str = "nameWithOwner,visibility,defaultBranchRef,url";

const MILESTONE_JQ: &str = r#".[] | [.number, .title, .state, (.due_on // "-")] | @tsv"#;

// ============================================================================
// Functions (called by the public wrappers)
// ============================================================================

pub(crate) fn version(runner: &dyn Runner) -> Result<String> {
    let inv = Invocation::new(GH).arg("--version");
    let output = runner.run(&inv)?;
    ensure_success(&inv, &output)?;
    Ok(output.first_line().to_string())
}

pub(crate) fn check_auth(runner: &dyn Runner, hostname: &str) -> Result<bool> {
    let output = runner.run(&auth_status(hostname))?;
    if !output.success {
        tracing::debug!(stderr = %output.stderr.trim(), "gh auth status reports no login");
    }
    Ok(output.success)
}

pub(crate) fn login_with_token(
    runner: &dyn Runner,
    hostname: &str,
    token_env: &str,
    token: &Zeroizing<String>,
) -> Result<()> {
    let inv = token_login(hostname, token_env, token.clone());
    let output = runner.run(&inv)?;
    ensure_success(&inv, &output)
}

pub(crate) fn login_web(runner: &dyn Runner, hostname: &str, protocol: GitProtocol) -> Result<()> {
    let inv = web_login(hostname, protocol);
    let output = runner.run(&inv)?;
    ensure_success(&inv, &output)
}

pub(crate) fn repo_view(runner: &dyn Runner, repo: &RepoId) -> Result<RepoSummary> {
    let inv = Invocation::new(GH).args([
        "repo",
        "view",
        repo.as_str(),
        "--json",
        REPO_VIEW_FIELDS,
    ]);
    let output = runner.run(&inv)?;

    if !output.success {
        bail!(
            "Cannot access repository {}: {}",
            repo,
            stderr_or_exit(&output)
        );
    }

    parse_repo_view(&output.stdout)
}

pub(crate) fn issue_list(runner: &dyn Runner, repo: &RepoId, query: &IssueQuery) -> Result<()> {
    let mut inv = Invocation::new(GH).args(["issue", "list", "--repo", repo.as_str()]);
    if let Some(state) = query.state {
        inv = inv.args(["--state", state.as_str()]);
    }
    if let Some(limit) = query.limit {
        inv = inv.args(["--limit".to_string(), limit.to_string()]);
    }

    let inv = inv.inherit();
    let output = runner.run(&inv)?;
    ensure_success(&inv, &output)
}

pub(crate) fn milestone_list(runner: &dyn Runner, repo: &RepoId, state: ListState) -> Result<()> {
    let inv = Invocation::new(GH)
        .args(["api", "--method", "GET", "--paginate"])
        .arg(format!("repos/{}/milestones", repo))
        .args(["-f".to_string(), format!("state={}", state.as_str())])
        .args(["--jq", MILESTONE_JQ])
        .inherit();
    let output = runner.run(&inv)?;
    ensure_success(&inv, &output)
}

// ============================================================================
// Command lines
// ============================================================================

fn auth_status(hostname: &str) -> Invocation {
    Invocation::new(GH).args(["auth", "status", "--hostname", hostname])
}

fn token_login(hostname: &str, token_env: &str, token: Zeroizing<String>) -> Invocation {
    let inv = GH_CREDENTIAL_VARS.iter().fold(
        Invocation::new(GH)
            .args(["auth", "login", "--hostname", hostname, "--with-token"])
            .stdin(token),
        |inv, var| inv.env_remove(*var),
    );
    if GH_CREDENTIAL_VARS.iter().any(|var| *var == token_env) {
        inv
    } else {
        inv.env_remove(token_env)
    }
}

fn web_login(hostname: &str, protocol: GitProtocol) -> Invocation {
    Invocation::new(GH)
        .args([
            "auth",
            "login",
            "--hostname",
            hostname,
            "--web",
            "--git-protocol",
            protocol.as_str(),
        ])
        .inherit()
}

// ============================================================================
// Helpers
// ============================================================================

fn ensure_success(inv: &Invocation, output: &Output) -> Result<()> {
    if output.success {
        return Ok(());
    }
    bail!("`{}` failed: {}", inv, stderr_or_exit(output))
}

fn stderr_or_exit(output: &Output) -> String {
    let stderr = output.stderr.trim();
    if stderr.is_empty() {
        output.exit_description()
    } else {
        stderr.to_string()
    }
}

fn parse_repo_view(json: &str) -> Result<RepoSummary> {
    let repo: GhRepo = serde_json::from_str(json).context("Failed to parse gh repo view JSON")?;
    Ok(RepoSummary {
        name_with_owner: repo.name_with_owner,
        visibility: repo.visibility.to_lowercase(),
        default_branch: repo
            .default_branch_ref
            .map(|b| b.name)
            .filter(|name| !name.is_empty()),
        url: repo.url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::fake::FakeRunner;
    use crate::runner::IoMode;

    fn repo(s: &str) -> RepoId {
        s.parse().unwrap()
    }

    #[test]
    fn test_version_first_line() {
        let runner = FakeRunner::new().respond(
            "gh --version",
            Output::ok("gh version 2.62.0 (2024-11-14)\nhttps://github.com/cli/cli/releases/tag/v2.62.0\n"),
        );
        assert_eq!(version(&runner).unwrap(), "gh version 2.62.0 (2024-11-14)");
    }

    #[test]
    fn test_check_auth_uses_hostname() {
        let runner = FakeRunner::new()
            .respond("gh auth status", Output::failed(1, "You are not logged into any GitHub hosts."));
        assert!(!check_auth(&runner, "ghe.local").unwrap());
        assert_eq!(runner.calls(), vec!["gh auth status --hostname ghe.local"]);
    }

    #[test]
    fn test_token_login_pipes_and_strips_env() {
        let runner = FakeRunner::new();
        login_with_token(&runner, "github.com", "GH_TOKEN", &Zeroizing::new("ghp_123".into()))
            .unwrap();

        let inv = &runner.invocations()[0];
        assert_eq!(inv.command_line(), "gh auth login --hostname github.com --with-token");
        assert_eq!(inv.stdin.as_deref().map(String::as_str), Some("ghp_123"));
        assert_eq!(
            inv.env_remove,
            vec!["GH_TOKEN", "GITHUB_TOKEN", "GH_ENTERPRISE_TOKEN", "GITHUB_ENTERPRISE_TOKEN"]
        );
    }

    #[test]
    fn test_token_login_strips_custom_variable_for_enterprise_host() {
        let runner = FakeRunner::new();
        login_with_token(&runner, "ghe.corp", "CORP_GH_PAT", &Zeroizing::new("ghe_123".into()))
            .unwrap();

        let inv = &runner.invocations()[0];
        assert_eq!(inv.command_line(), "gh auth login --hostname ghe.corp --with-token");
        assert!(inv.env_remove.iter().any(|v| v == "GH_ENTERPRISE_TOKEN"));
        assert!(inv.env_remove.iter().any(|v| v == "GITHUB_ENTERPRISE_TOKEN"));
        assert_eq!(inv.env_remove.last().map(String::as_str), Some("CORP_GH_PAT"));
    }

    #[test]
    fn test_web_login_inherits_terminal() {
        let runner = FakeRunner::new();
        login_web(&runner, "github.com", GitProtocol::Ssh).unwrap();

        let inv = &runner.invocations()[0];
        assert_eq!(
            inv.command_line(),
            "gh auth login --hostname github.com --web --git-protocol ssh"
        );
        assert_eq!(inv.io, IoMode::Inherit);
        assert!(inv.stdin.is_none());
    }

    #[test]
    fn test_login_failure_reports_stderr() {
        let runner = FakeRunner::new()
            .respond("gh auth login", Output::failed(1, "error validating token: HTTP 401"));
        let err = login_with_token(&runner, "github.com", "GH_TOKEN", &Zeroizing::new("bad".into())).unwrap_err();
        assert!(err.to_string().contains("HTTP 401"));
    }

    #[test]
    fn test_repo_view_parses_summary() {
        let runner = FakeRunner::new().respond(
            "gh repo view octo/widgets",
            Output::ok(
                r#"{"nameWithOwner":"octo/widgets","visibility":"PRIVATE","defaultBranchRef":{"name":"main"},"url":"https://github.com/octo/widgets"}"#,
            ),
        );
        let summary = repo_view(&runner, &repo("octo/widgets")).unwrap();
        assert_eq!(summary.name_with_owner, "octo/widgets");
        assert_eq!(summary.visibility, "private");
        assert_eq!(summary.default_branch.as_deref(), Some("main"));
        assert_eq!(
            runner.calls()[0],
            "gh repo view octo/widgets --json nameWithOwner,visibility,defaultBranchRef,url"
        );
    }

    #[test]
    fn test_repo_view_empty_repository_has_no_branch() {
        let summary = parse_repo_view(
            r#"{"nameWithOwner":"octo/empty","visibility":"PUBLIC","defaultBranchRef":{"name":""},"url":""}"#,
        )
        .unwrap();
        assert_eq!(summary.default_branch, None);
    }

    #[test]
    fn test_repo_view_not_found() {
        let runner = FakeRunner::new().respond(
            "gh repo view",
            Output::failed(1, "GraphQL: Could not resolve to a Repository with the name 'octo/nope'."),
        );
        let err = repo_view(&runner, &repo("octo/nope")).unwrap_err();
        assert!(err.to_string().contains("Cannot access repository octo/nope"));
        assert!(err.to_string().contains("Could not resolve"));
    }

    #[test]
    fn test_issue_list_default_flags() {
        let runner = FakeRunner::new();
        issue_list(&runner, &repo("cli/cli"), &IssueQuery::default()).unwrap();
        assert_eq!(runner.calls(), vec!["gh issue list --repo cli/cli"]);
        assert_eq!(runner.invocations()[0].io, IoMode::Inherit);
    }

    #[test]
    fn test_issue_list_with_filters() {
        let runner = FakeRunner::new();
        let query = IssueQuery {
            state: Some(ListState::All),
            limit: Some(5),
        };
        issue_list(&runner, &repo("cli/cli"), &query).unwrap();
        assert_eq!(
            runner.calls(),
            vec!["gh issue list --repo cli/cli --state all --limit 5"]
        );
    }

    #[test]
    fn test_issue_list_failure_is_error() {
        let runner = FakeRunner::new().respond("gh issue list", Output::failed(1, ""));
        let err = issue_list(&runner, &repo("cli/cli"), &IssueQuery::default()).unwrap_err();
        assert!(err.to_string().contains("exit code 1"));
    }

    #[test]
    fn test_milestone_list_command() {
        let runner = FakeRunner::new();
        milestone_list(&runner, &repo("cli/cli"), ListState::Closed).unwrap();

        let inv = &runner.invocations()[0];
        assert_eq!(
            inv.args[..6],
            [
                "api",
                "--method",
                "GET",
                "--paginate",
                "repos/cli/cli/milestones",
                "-f"
            ]
        );
        assert_eq!(inv.args[6], "state=closed");
        assert_eq!(inv.args[7], "--jq");
        assert_eq!(inv.io, IoMode::Inherit);
    }
}
