//! `bootstrap [repo]`: install, report, and (when logged in) check access.

use anyhow::Result;
use colored::Colorize;

use super::{install, repo, status, Context};
use crate::installer::InstallOutcome;

pub fn execute(ctx: &Context, repo_arg: Option<&str>, dry_run: bool) -> Result<()> {
    println!("{}", "🚀 GitHub CLI Bootstrap".bold().blue());

    // Resolve first so a bad argument fails before anything is installed.
    let (target, source) = ctx.config.resolve_repo(repo_arg, ctx.runner)?;

    status::print_platform(ctx);
    println!();

    let outcome = install::execute(ctx, dry_run)?;
    if let InstallOutcome::Planned(_) = outcome {
        return Ok(());
    }
    println!();

    let gh = status::report(ctx)?;
    if !gh.authenticated {
        // report() already warned
        return Ok(());
    }
    println!();

    println!(
        "{} {} {}",
        "🔍 Repository".bold(),
        target,
        format!("({})", source).dimmed()
    );
    repo::check(ctx, &target)?;

    println!("\n{}", "✅ gh is installed, authenticated and can reach the repository".green().bold());
    Ok(())
}
