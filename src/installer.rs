//! Installing `gh` with the system package manager.
//!
//! Plans follow the GitHub CLI's published package instructions. A plan is
//! built first (pure, testable), then executed step by step; the first failed
//! step aborts. There is no rollback and no retry.

use anyhow::{anyhow, bail, Result};
use colored::Colorize;

use crate::github::{self, GH};
use crate::platform::{OsFamily, PackageManager, Platform};
use crate::runner::{Invocation, Runner};

const APT_KEYRING_DIR: &str = "/etc/apt/keyrings";
const APT_KEYRING_URL: &str = "https://cli.github.com/packages/githubcli-archive-keyring.gpg";
const APT_KEYRING_PATH: &str = "/etc/apt/keyrings/githubcli-archive-keyring.gpg";
const APT_SOURCE_PATH: &str = "/etc/apt/sources.list.d/github-cli.list";
const RPM_REPO_URL: &str = "https://cli.github.com/packages/rpm/gh-cli.repo";

/// One command of an install plan.
#[derive(Debug, Clone)]
pub struct Step {
    pub description: &'static str,
    pub invocation: Invocation,
}

#[derive(Debug, Clone)]
pub enum InstallOutcome {
    /// `gh` was already on `PATH`.
    AlreadyInstalled { version: String },
    /// The plan ran and `gh` now answers `--version`.
    Installed { version: String },
    /// Dry run: nothing executed.
    Planned(Vec<Step>),
}

/// Build the install plan for `platform`.
///
/// Fails on an unsupported OS or when no package manager was found.
pub fn plan(platform: &Platform) -> Result<Vec<Step>> {
    if let OsFamily::Unsupported(os) = &platform.os {
        return Err(unsupported_os(os));
    }

    let pm = platform.package_manager.ok_or_else(|| {
        let looked_for: Vec<&str> = PackageManager::candidates(&platform.os)
            .iter()
            .map(PackageManager::program)
            .collect();
        anyhow!(
            "No supported package manager found on {} (looked for {})",
            platform.os,
            looked_for.join(", ")
        )
    })?;

    let privileged = |program: &str| {
        if platform.is_root {
            Invocation::new(program)
        } else {
            Invocation::new("sudo").arg(program)
        }
    };
    let step = |description: &'static str, invocation: Invocation| Step {
        description,
        invocation: invocation.inherit(),
    };

    let steps = match pm {
        PackageManager::Apt => vec![
            step(
                "Create apt keyring directory",
                privileged("mkdir").args(["-p", "-m", "755", APT_KEYRING_DIR]),
            ),
            step(
                "Download GitHub CLI archive keyring",
                privileged("curl").args(["-fsSL", APT_KEYRING_URL, "-o", APT_KEYRING_PATH]),
            ),
            step(
                "Make keyring readable",
                privileged("chmod").args(["go+r", APT_KEYRING_PATH]),
            ),
            step(
                "Add GitHub CLI apt source",
                privileged("sh").args(["-c".to_string(), apt_source_script()]),
            ),
            step(
                "Refresh package lists",
                privileged("apt-get").arg("update"),
            ),
            step(
                "Install gh",
                privileged("apt-get").args(["install", "-y", GH]),
            ),
        ],
        PackageManager::Dnf => vec![
            step(
                "Install dnf config-manager plugin",
                privileged("dnf").args(["install", "-y", "dnf-command(config-manager)"]),
            ),
            step(
                "Add GitHub CLI repository",
                privileged("dnf").args(["config-manager", "--add-repo", RPM_REPO_URL]),
            ),
            step(
                "Install gh",
                privileged("dnf").args(["install", "-y", GH]),
            ),
        ],
        PackageManager::Yum => vec![
            step(
                "Install yum-utils",
                privileged("yum").args(["install", "-y", "yum-utils"]),
            ),
            step(
                "Add GitHub CLI repository",
                privileged("yum-config-manager").args(["--add-repo", RPM_REPO_URL]),
            ),
            step(
                "Install gh",
                privileged("yum").args(["install", "-y", GH]),
            ),
        ],
        // Homebrew refuses to run as root; never elevate.
        PackageManager::Brew => vec![step(
            "Install gh",
            Invocation::new("brew").args(["install", GH]),
        )],
    };

    Ok(steps)
}

fn unsupported_os(os: &str) -> anyhow::Error {
    anyhow!(
        "Unsupported operating system `{}`. Install gh manually: https://cli.github.com",
        os
    )
}

fn apt_source_script() -> String {
    format!(
        "echo \"deb [arch=$(dpkg --print-architecture) signed-by={}] https://cli.github.com/packages stable main\" > {}",
        APT_KEYRING_PATH, APT_SOURCE_PATH
    )
}

/// Make sure `gh` is installed, installing it if missing.
///
/// The platform is checked before anything else: an unsupported OS fails
/// without probing or running any command.
pub fn ensure_installed(
    runner: &dyn Runner,
    platform: &Platform,
    dry_run: bool,
) -> Result<InstallOutcome> {
    if let OsFamily::Unsupported(os) = &platform.os {
        return Err(unsupported_os(os));
    }

    if runner.locate(GH).is_some() {
        let version = github::version(runner)?;
        return Ok(InstallOutcome::AlreadyInstalled { version });
    }

    let steps = plan(platform)?;
    if dry_run {
        return Ok(InstallOutcome::Planned(steps));
    }

    if let Some(pm) = platform.package_manager {
        println!("   gh not found, installing with {}", pm.name().bold());
    }

    let total = steps.len();
    for (index, step) in steps.iter().enumerate() {
        println!(
            "   {} {}",
            format!("[{}/{}]", index + 1, total).dimmed(),
            step.description
        );
        tracing::info!(step = step.description, command = %step.invocation, "install step");

        let output = runner.run(&step.invocation)?;
        if !output.success {
            bail!(
                "{} failed: `{}` ({})",
                step.description,
                step.invocation,
                output.exit_description()
            );
        }
    }

    if runner.locate(GH).is_none() {
        bail!("gh was installed but is not on PATH. Open a new shell or check your PATH");
    }

    let version = github::version(runner)?;
    Ok(InstallOutcome::Installed { version })
}
