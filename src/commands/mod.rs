//! Subcommand implementations.
//!
//! Each subcommand receives a [`Context`] holding the resolved configuration
//! and the collaborators it may touch. Nothing here reads process-global
//! state directly.

pub mod auth_login;
pub mod bootstrap;
pub mod install;
pub mod repo;
pub mod status;

use colored::Colorize;
use std::fmt::Display;

use crate::auth::SecretPrompt;
use crate::config::Config;
use crate::platform::Platform;
use crate::runner::Runner;

pub struct Context<'a> {
    pub config: &'a Config,
    pub runner: &'a dyn Runner,
    pub prompt: &'a dyn SecretPrompt,
    pub platform: &'a Platform,
}

/// Non-fatal problem: report on stderr and carry on.
pub fn warn(message: impl Display) {
    eprintln!("{} {}", "warning:".yellow().bold(), message);
}
