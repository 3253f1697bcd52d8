//! Repository subcommands: `repo-check`, `issue-list`, `milestone-list`.

use anyhow::Result;
use colored::Colorize;

use super::Context;
use crate::config::RepoId;
use crate::github::{self, IssueQuery, ListState, RepoSummary};

/// Confirm the authenticated user can read `repo`.
pub fn check(ctx: &Context, repo: &RepoId) -> Result<RepoSummary> {
    let summary = github::repo_view(ctx.runner, repo)?;

    let branch = summary
        .default_branch
        .as_deref()
        .map(|b| format!(", default branch {}", b))
        .unwrap_or_default();
    println!(
        "   {} {} ({}{})",
        "✓".green().bold(),
        summary.name_with_owner,
        summary.visibility,
        branch
    );

    Ok(summary)
}

pub fn execute_check(ctx: &Context, repo: Option<&str>) -> Result<()> {
    let (repo, _) = ctx.config.resolve_repo(repo, ctx.runner)?;
    println!("{} {}", "🔍 Checking access to".bold(), repo.to_string().bold());
    check(ctx, &repo)?;
    Ok(())
}

pub fn execute_issues(ctx: &Context, repo: Option<&str>, query: &IssueQuery) -> Result<()> {
    let (repo, _) = ctx.config.resolve_repo(repo, ctx.runner)?;
    github::issue_list(ctx.runner, &repo, query)
}

pub fn execute_milestones(ctx: &Context, repo: Option<&str>, state: ListState) -> Result<()> {
    let (repo, _) = ctx.config.resolve_repo(repo, ctx.runner)?;
    github::milestone_list(ctx.runner, &repo, state)
}
