//! `ensure-installed`: install gh if it is missing.

use anyhow::Result;
use colored::Colorize;

use super::Context;
use crate::installer::{self, InstallOutcome};

pub fn execute(ctx: &Context, dry_run: bool) -> Result<InstallOutcome> {
    println!("{}", "📦 GitHub CLI".bold());

    let outcome = installer::ensure_installed(ctx.runner, ctx.platform, dry_run)?;

    match &outcome {
        InstallOutcome::AlreadyInstalled { version } => {
            println!("   {} {}", "✓".green().bold(), version.dimmed());
        }
        InstallOutcome::Installed { version } => {
            println!(
                "   {} installed {}",
                "✓".green().bold(),
                version.dimmed()
            );
        }
        InstallOutcome::Planned(steps) => {
            println!("   {}", "DRY RUN - No changes will be made".yellow().bold());
            for step in steps {
                println!(
                    "   - {}: {}",
                    step.description,
                    step.invocation.to_string().dimmed()
                );
            }
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::fake::FakePrompt;
    use crate::commands::testing;
    use crate::config::Config;
    use crate::runner::fake::FakeRunner;

    #[test]
    fn test_unsupported_os_fails_without_running_anything() {
        let config = Config::default();
        let runner = FakeRunner::new();
        let prompt = FakePrompt::headless();
        let platform = testing::unsupported();
        let ctx = Context {
            config: &config,
            runner: &runner,
            prompt: &prompt,
            platform: &platform,
        };

        let err = execute(&ctx, false).unwrap_err();
        assert!(err.to_string().contains("Unsupported operating system"));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_dry_run_on_linux() {
        let config = Config::default();
        let runner = FakeRunner::new();
        let prompt = FakePrompt::headless();
        let platform = testing::linux_apt();
        let ctx = Context {
            config: &config,
            runner: &runner,
            prompt: &prompt,
            platform: &platform,
        };

        let outcome = execute(&ctx, true).unwrap();
        assert!(matches!(outcome, InstallOutcome::Planned(ref steps) if steps.len() == 6));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_install_looks_up_gh_once_before_and_once_after() {
        let config = Config::default();
        let runner = FakeRunner::new().provides("sudo apt-get install -y gh", "gh");
        let prompt = FakePrompt::headless();
        let platform = testing::linux_apt();
        let ctx = Context {
            config: &config,
            runner: &runner,
            prompt: &prompt,
            platform: &platform,
        };

        let outcome = execute(&ctx, false).unwrap();
        assert!(matches!(outcome, InstallOutcome::Installed { .. }));
        assert_eq!(runner.lookups("gh"), 2);
    }
}
