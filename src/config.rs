//! Configuration for gh-setup.
//!
//! Resolved once at startup and passed into every operation. Layers, lowest
//! to highest priority:
//!
//! 1. Built-in defaults
//! 2. `~/.gh-setup/config.toml` (or `--config` / `GH_SETUP_CONFIG`)
//! 3. Environment (`GH_SETUP_REPO`, the credential variable)
//! 4. Command-line arguments (the `[repo]` positional)

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use zeroize::Zeroizing;

use crate::git;
use crate::paths;
use crate::runner::Runner;

/// Repository used when nothing else names one.
pub const DEFAULT_REPO: &str = "cli/cli";

/// Environment variable overriding the default repository.
pub const REPO_ENV_VAR: &str = "GH_SETUP_REPO";

/// Environment variable overriding the config file location.
pub const CONFIG_ENV_VAR: &str = "GH_SETUP_CONFIG";

/// Credential variable read unless the config file names another.
pub const DEFAULT_TOKEN_ENV: &str = "GH_TOKEN";

pub const DEFAULT_HOSTNAME: &str = "github.com";

/// An `owner/name` repository identifier. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoId(String);

impl RepoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for RepoId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            bail!("Repository identifier must not be empty (expected owner/name)");
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where the repository identifier came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoSource {
    Argument,
    Environment,
    ConfigFile,
    OriginRemote,
    Default,
}

impl fmt::Display for RepoSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RepoSource::Argument => "argument",
            RepoSource::Environment => REPO_ENV_VAR,
            RepoSource::ConfigFile => "config file",
            RepoSource::OriginRemote => "origin remote",
            RepoSource::Default => "default",
        };
        f.write_str(label)
    }
}

/// Protocol `gh` configures for git operations after a web login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GitProtocol {
    #[default]
    Https,
    Ssh,
}

impl GitProtocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            GitProtocol::Https => "https",
            GitProtocol::Ssh => "ssh",
        }
    }
}

/// On-disk shape of `config.toml`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub repo: Option<String>,
    pub hostname: Option<String>,
    pub token_env: Option<String>,
    pub git_protocol: Option<GitProtocol>,
}

impl FileConfig {
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config TOML")
    }

    /// Load from `path`. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }
}

/// Effective configuration.
#[derive(Clone)]
pub struct Config {
    /// Repository from environment or config file; `None` defers to the
    /// origin remote and then [`DEFAULT_REPO`].
    pub repo: Option<(RepoId, RepoSource)>,
    pub hostname: String,
    pub git_protocol: GitProtocol,
    /// Name of the credential environment variable.
    pub token_env: String,
    /// Credential found in `token_env`, if non-empty.
    pub token: Option<Zeroizing<String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repo: None,
            hostname: DEFAULT_HOSTNAME.to_string(),
            git_protocol: GitProtocol::default(),
            token_env: DEFAULT_TOKEN_ENV.to_string(),
            token: None,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("repo", &self.repo)
            .field("hostname", &self.hostname)
            .field("git_protocol", &self.git_protocol)
            .field("token_env", &self.token_env)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Config {
    /// Load from the config file and the process environment.
    ///
    /// An explicitly named config file must exist; the default one may not.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let file = match explicit_path {
            Some(path) => {
                if !path.exists() {
                    bail!("Config file {} does not exist", path.display());
                }
                FileConfig::load_from(path)?
            }
            None => FileConfig::load_from(&paths::config_path())?,
        };

        Self::from_parts(file, |key| std::env::var(key).ok())
    }

    /// Combine a parsed file with an environment lookup.
    pub fn from_parts(file: FileConfig, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let repo = if let Some(value) = non_empty(REPO_ENV_VAR) {
            Some((value.parse::<RepoId>()?, RepoSource::Environment))
        } else if let Some(value) = file.repo {
            let id = value
                .parse::<RepoId>()
                .context("Invalid `repo` in config file")?;
            Some((id, RepoSource::ConfigFile))
        } else {
            None
        };

        let token_env = file
            .token_env
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TOKEN_ENV.to_string());
        let token = non_empty(&token_env).map(|t| Zeroizing::new(t.trim().to_string()));

        Ok(Self {
            repo,
            hostname: file
                .hostname
                .filter(|h| !h.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_HOSTNAME.to_string()),
            git_protocol: file.git_protocol.unwrap_or_default(),
            token_env,
            token,
        })
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Pick the repository: argument, then environment/config file, then the
    /// current checkout's origin remote, then [`DEFAULT_REPO`].
    pub fn resolve_repo(
        &self,
        argument: Option<&str>,
        runner: &dyn Runner,
    ) -> Result<(RepoId, RepoSource)> {
        let resolved = if let Some(arg) = argument {
            (arg.parse::<RepoId>()?, RepoSource::Argument)
        } else if let Some(configured) = &self.repo {
            configured.clone()
        } else if let Some(id) = git::origin_repo(runner, &self.hostname) {
            (id, RepoSource::OriginRemote)
        } else {
            (DEFAULT_REPO.parse::<RepoId>()?, RepoSource::Default)
        };

        tracing::debug!(repo = %resolved.0, source = %resolved.1, "resolved repository");
        Ok(resolved)
    }
}
