//! `status`: platform, gh version, authentication state.

use anyhow::{bail, Result};
use colored::Colorize;
use serde::Serialize;

use super::{warn, Context};
use crate::github::{self, GH};

/// gh's state as reported by `gh --version` and `gh auth status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GhStatus {
    pub version: String,
    pub hostname: String,
    pub authenticated: bool,
}

#[derive(Debug, Serialize)]
struct StatusJson {
    os: String,
    arch: String,
    distro: Option<String>,
    package_manager: Option<String>,
    gh: GhStatus,
    repo: String,
    repo_source: String,
    credential_env: String,
    credential_present: bool,
}

/// Query gh. Missing gh is fatal; an unauthenticated gh is not.
pub fn query(ctx: &Context) -> Result<GhStatus> {
    if ctx.runner.locate(GH).is_none() {
        bail!("gh is not installed. Run `gh-setup ensure-installed`");
    }

    let version = github::version(ctx.runner)?;
    let authenticated = github::is_authenticated(ctx.runner, &ctx.config.hostname)?;

    Ok(GhStatus {
        version,
        hostname: ctx.config.hostname.clone(),
        authenticated,
    })
}

/// Query gh and print the result. Warns when not logged in.
pub fn report(ctx: &Context) -> Result<GhStatus> {
    let status = query(ctx)?;

    println!("{}", "🔧 gh".bold());
    println!("   {:<10} {}", "version", status.version.dimmed());
    if status.authenticated {
        println!(
            "   {:<10} {} logged in to {}",
            "auth",
            "✓".green().bold(),
            status.hostname
        );
    } else {
        println!(
            "   {:<10} {} not logged in to {}",
            "auth",
            "✗".red().bold(),
            status.hostname
        );
        warn(format!(
            "gh is not authenticated with {}. Run `gh-setup auth-login`",
            status.hostname
        ));
    }

    Ok(status)
}

pub fn print_platform(ctx: &Context) {
    let platform = ctx.platform;
    println!("{}", "📋 System Information".bold());
    println!("   OS: {} {}", platform.os, platform.arch);
    if let Some(distro) = &platform.distro {
        println!("   Distribution: {}", distro);
    }
    println!(
        "   Package manager: {}",
        platform
            .package_manager
            .map(|pm| pm.name())
            .unwrap_or("none")
    );
    if platform.is_root {
        println!("   Running as root");
    }
}

pub fn execute(ctx: &Context, json: bool) -> Result<()> {
    if json {
        return output_json(ctx);
    }

    print_platform(ctx);
    report(ctx)?;

    let (repo, source) = ctx.config.resolve_repo(None, ctx.runner)?;
    println!("{}", "⚙️  Configuration".bold());
    println!("   Repository: {} {}", repo, format!("({})", source).dimmed());
    println!(
        "   Credential: {} {}",
        ctx.config.token_env,
        if ctx.config.has_token() {
            "set".green()
        } else {
            "not set".dimmed()
        }
    );

    Ok(())
}

fn output_json(ctx: &Context) -> Result<()> {
    let gh = query(ctx)?;
    let (repo, source) = ctx.config.resolve_repo(None, ctx.runner)?;
    let platform = ctx.platform;

    let status = StatusJson {
        os: platform.os.to_string(),
        arch: platform.arch.clone(),
        distro: platform.distro.clone(),
        package_manager: platform.package_manager.map(|pm| pm.name().to_string()),
        gh,
        repo: repo.to_string(),
        repo_source: source.to_string(),
        credential_env: ctx.config.token_env.clone(),
        credential_present: ctx.config.has_token(),
    };

    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}
