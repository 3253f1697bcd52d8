//! Authentication of `gh` against the configured host.
//!
//! Modes:
//! - `token`: credential from the environment, else a masked prompt; piped to
//!   `gh auth login --with-token`
//! - `web`: `gh`'s own interactive browser flow
//! - `auto`: `token` when the environment holds a credential, else `web`

use anyhow::{bail, Context, Result};
use zeroize::Zeroizing;

use crate::config::Config;
use crate::github;
use crate::runner::Runner;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LoginMode {
    #[default]
    Auto,
    Token,
    Web,
}

/// The login flow actually run once `auto` is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginMethod {
    Token,
    Web,
}

impl LoginMode {
    /// Collapse `auto` into a concrete method.
    pub fn resolve(self, config: &Config) -> LoginMethod {
        match self {
            LoginMode::Auto if config.has_token() => LoginMethod::Token,
            LoginMode::Auto | LoginMode::Web => LoginMethod::Web,
            LoginMode::Token => LoginMethod::Token,
        }
    }
}

/// Source of interactively typed secrets.
pub trait SecretPrompt {
    /// Whether a human can answer the prompt.
    fn is_interactive(&self) -> bool;

    /// Read one line without echo.
    fn read_secret(&self, prompt: &str) -> Result<Zeroizing<String>>;
}

/// Masked prompt on the controlling terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsolePrompt;

/// The prompt is written to and read through stderr's terminal, so both ends
/// must be attached for typed input to arrive.
fn terminal_attached(stdin_is_tty: bool, stderr_is_tty: bool) -> bool {
    stdin_is_tty && stderr_is_tty
}

impl SecretPrompt for ConsolePrompt {
    fn is_interactive(&self) -> bool {
        terminal_attached(
            atty::is(atty::Stream::Stdin),
            console::Term::stderr().is_term(),
        )
    }

    fn read_secret(&self, prompt: &str) -> Result<Zeroizing<String>> {
        let term = console::Term::stderr();
        term.write_str(prompt).context("Failed to write prompt")?;
        let line = term
            .read_secure_line()
            .context("Failed to read token from terminal")?;
        Ok(Zeroizing::new(line))
    }
}

/// Credential for token login: environment first, then the prompt.
///
/// Empty input is fatal, as is having neither a credential nor a terminal.
pub fn obtain_token(config: &Config, prompt: &dyn SecretPrompt) -> Result<Zeroizing<String>> {
    if let Some(token) = &config.token {
        tracing::debug!(source = %config.token_env, "using credential from environment");
        return Ok(token.clone());
    }

    if !prompt.is_interactive() {
        bail!(
            "No credential in {} and no terminal to prompt on (stdin is not a terminal or stderr is redirected); set {} or use `auth-login web`",
            config.token_env,
            config.token_env
        );
    }

    let typed = prompt.read_secret(&format!("Paste a token for {}: ", config.hostname))?;
    let token = Zeroizing::new(typed.trim().to_string());
    if token.is_empty() {
        bail!("Empty token; nothing to log in with");
    }
    Ok(token)
}

/// Log in with `mode` and return the concrete method used.
pub fn login(
    config: &Config,
    runner: &dyn Runner,
    prompt: &dyn SecretPrompt,
    mode: LoginMode,
) -> Result<LoginMethod> {
    let resolved = mode.resolve(config);
    tracing::debug!(requested = ?mode, resolved = ?resolved, "login mode");

    match resolved {
        LoginMethod::Token => {
            let token = obtain_token(config, prompt)?;
            github::login_with_token(runner, &config.hostname, &config.token_env, &token)?;
        }
        LoginMethod::Web => {
            github::login_web(runner, &config.hostname, config.git_protocol)?;
        }
    }

    Ok(resolved)
}
