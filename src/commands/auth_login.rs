//! `auth-login [auto|token|web]`

use anyhow::Result;
use colored::Colorize;

use super::{repo, warn, Context};
use crate::auth::{self, LoginMode};

/// Log in, then check repository access. Only the login can fail the command.
pub fn execute(ctx: &Context, mode: LoginMode) -> Result<()> {
    let used = auth::login(ctx.config, ctx.runner, ctx.prompt, mode)?;
    println!(
        "{} Logged in to {} {}",
        "✓".green().bold(),
        ctx.config.hostname,
        format!("({:?} login)", used).to_lowercase().dimmed()
    );

    if let Err(e) = verify_access(ctx) {
        warn(format!("logged in, but the repository check failed: {:#}", e));
    }

    Ok(())
}

fn verify_access(ctx: &Context) -> Result<()> {
    let (target, _) = ctx.config.resolve_repo(None, ctx.runner)?;
    repo::check(ctx, &target)?;
    Ok(())
}
