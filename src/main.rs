use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;

use gh_setup::commands::{self, Context};
use gh_setup::config::CONFIG_ENV_VAR;
use gh_setup::github::{IssueQuery, ListState};
use gh_setup::{logging, Config, ConsolePrompt, LoginMode, Platform, SystemRunner};

#[derive(Parser)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about = "Install, validate and drive the GitHub CLI", long_about = None)]
struct Cli {
    /// Config file (default: ~/.gh-setup/config.toml)
    #[arg(long, global = true, env = CONFIG_ENV_VAR)]
    config: Option<PathBuf>,

    /// Show debug logging (overrides GH_SETUP_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Install gh if needed, report status, and check repository access when logged in
    Bootstrap {
        /// Repository (owner/name)
        repo: Option<String>,

        /// Show the install plan without running it
        #[arg(long)]
        dry_run: bool,
    },

    /// Install gh with the system package manager if it is missing
    EnsureInstalled {
        /// Show the install plan without running it
        #[arg(long)]
        dry_run: bool,
    },

    /// Show platform, gh version and authentication state
    Status {
        /// Output results as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Log gh in (auto: token if a credential is in the environment, else web)
    AuthLogin {
        /// Login mode
        #[arg(value_enum, default_value_t = LoginMode::Auto)]
        mode: LoginMode,
    },

    /// Check that the repository is reachable with the current login
    RepoCheck {
        /// Repository (owner/name)
        repo: Option<String>,
    },

    /// List issues through gh
    IssueList {
        /// Repository (owner/name)
        repo: Option<String>,

        /// Issue state filter
        #[arg(long, value_enum)]
        state: Option<ListState>,

        /// Maximum number of issues
        #[arg(long)]
        limit: Option<usize>,
    },

    /// List milestones through gh
    MilestoneList {
        /// Repository (owner/name)
        repo: Option<String>,

        /// Milestone state filter
        #[arg(long, value_enum, default_value_t = ListState::Open)]
        state: ListState,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    tracing::debug!(?config, "loaded configuration");

    let runner = SystemRunner;
    let prompt = ConsolePrompt;
    let platform = Platform::detect(&runner);
    let ctx = Context {
        config: &config,
        runner: &runner,
        prompt: &prompt,
        platform: &platform,
    };

    match cli.command {
        Commands::Bootstrap { repo, dry_run } => {
            commands::bootstrap::execute(&ctx, repo.as_deref(), dry_run)?;
        }
        Commands::EnsureInstalled { dry_run } => {
            commands::install::execute(&ctx, dry_run)?;
        }
        Commands::Status { json } => {
            commands::status::execute(&ctx, json)?;
        }
        Commands::AuthLogin { mode } => {
            commands::auth_login::execute(&ctx, mode)?;
        }
        Commands::RepoCheck { repo } => {
            commands::repo::execute_check(&ctx, repo.as_deref())?;
        }
        Commands::IssueList { repo, state, limit } => {
            commands::repo::execute_issues(&ctx, repo.as_deref(), &IssueQuery { state, limit })?;
        }
        Commands::MilestoneList { repo, state } => {
            commands::repo::execute_milestones(&ctx, repo.as_deref(), state)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_unknown_subcommand_rejected() {
        let err = Cli::try_parse_from(["gh-setup", "frobnicate"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidSubcommand);
    }

    #[test]
    fn test_missing_subcommand_rejected() {
        assert!(Cli::try_parse_from(["gh-setup"]).is_err());
    }

    #[test]
    fn test_invalid_login_mode_rejected() {
        let err = Cli::try_parse_from(["gh-setup", "auth-login", "sideways"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
    }

    #[test]
    fn test_auth_login_defaults_to_auto() {
        let cli = Cli::try_parse_from(["gh-setup", "auth-login"]).unwrap();
        assert!(matches!(cli.command, Commands::AuthLogin { mode: LoginMode::Auto }));
    }

    #[test]
    fn test_issue_list_flags() {
        let cli = Cli::try_parse_from([
            "gh-setup", "issue-list", "cli/cli", "--state", "closed", "--limit", "3",
        ])
        .unwrap();
        match cli.command {
            Commands::IssueList { repo, state, limit } => {
                assert_eq!(repo.as_deref(), Some("cli/cli"));
                assert_eq!(state, Some(ListState::Closed));
                assert_eq!(limit, Some(3));
            }
            _ => panic!("expected issue-list"),
        }
    }

    #[test]
    fn test_subcommand_names() {
        for name in [
            "bootstrap",
            "ensure-installed",
            "status",
            "auth-login",
            "repo-check",
            "issue-list",
            "milestone-list",
        ] {
            assert!(
                Cli::command().find_subcommand(name).is_some(),
                "missing subcommand {}",
                name
            );
        }
    }
}
