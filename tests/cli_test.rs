//! Command-line surface tests against the built binary.
//!
//! Run with: cargo test --test cli_test
//!
//! Only argument handling is exercised here; nothing reaches gh or a package
//! manager.

use std::process::{Command, Output};

fn gh_setup(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_gh-setup"))
        .args(args)
        .env_remove("GH_SETUP_CONFIG")
        .env("NO_COLOR", "1")
        .output()
        .expect("binary should start")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn test_invalid_subcommands_fail_with_usage() {
    for bad in ["frobnicate", "install", "issue-lists", "--not-a-flag"] {
        let output = gh_setup(&[bad]);
        assert!(!output.status.success(), "`{}` should fail", bad);
        assert!(
            stderr(&output).contains("Usage:"),
            "`{}` should print usage, got: {}",
            bad,
            stderr(&output)
        );
    }
}

#[test]
fn test_no_subcommand_fails_with_usage() {
    let output = gh_setup(&[]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Usage:"));
}

#[test]
fn test_invalid_login_mode_fails() {
    let output = gh_setup(&["auth-login", "sideways"]);
    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("sideways"));
    assert!(err.contains("auto"));
}

#[test]
fn test_help_lists_subcommands() {
    let output = gh_setup(&["help"]);
    assert!(output.status.success());
    let out = stdout(&output);
    for name in [
        "bootstrap",
        "ensure-installed",
        "status",
        "auth-login",
        "repo-check",
        "issue-list",
        "milestone-list",
    ] {
        assert!(out.contains(name), "help should mention {}", name);
    }
}

#[test]
fn test_missing_explicit_config_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");
    let output = gh_setup(&["--config", missing.to_str().unwrap(), "status"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("does not exist"));
}

#[test]
fn test_malformed_config_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "repo = \n").unwrap();
    let output = gh_setup(&["--config", path.to_str().unwrap(), "status"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Invalid config file"));
}
