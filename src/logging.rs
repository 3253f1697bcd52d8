//! Diagnostic logging.
//!
//! User-facing output stays on stdout/stderr via `println!`/`eprintln!`.
//! `tracing` carries diagnostics (every external command, resolved config)
//! to stderr, filtered by `GH_SETUP_LOG` or `--verbose`.

use tracing_subscriber::EnvFilter;

/// Filter directives, `EnvFilter` syntax (e.g. `gh_setup=debug`).
pub const LOG_ENV_VAR: &str = "GH_SETUP_LOG";

const DEFAULT_FILTER: &str = "warn";
const VERBOSE_FILTER: &str = "gh_setup=debug";

pub fn filter(verbose: bool) -> EnvFilter {
    if verbose {
        return EnvFilter::new(VERBOSE_FILTER);
    }
    EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. A second call is a no-op.
pub fn init(verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
