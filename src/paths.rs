//! Filesystem layout for gh-setup.
//!
//! ```text
//! ~/.gh-setup/
//! └── config.toml              # Optional user config
//! ```

use std::path::PathBuf;

/// User's gh-setup home directory: `~/.gh-setup/`
pub fn home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".gh-setup")
}

/// User config file: `~/.gh-setup/config.toml`
pub fn config_path() -> PathBuf {
    home().join("config.toml")
}
