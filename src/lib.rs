//! Install, validate and drive the GitHub CLI (`gh`).
//!
//! gh-setup does no GitHub work of its own. It detects the platform, installs
//! `gh` with the system package manager, and hands authentication, API
//! access and listing to `gh`.

pub mod auth;
pub mod commands;
pub mod config;
pub mod git;
pub mod github;
pub mod installer;
pub mod logging;
pub mod paths;
pub mod platform;
pub mod runner;

// Re-export commonly used types
pub use auth::{ConsolePrompt, LoginMethod, LoginMode};
pub use commands::Context;
pub use config::{Config, RepoId};
pub use platform::Platform;
pub use runner::{Runner, SystemRunner};
