//! External process execution.
//!
//! Every program this tool drives (`gh`, `git`, package managers, `sudo`)
//! is started through a [`Runner`]. [`SystemRunner`] spawns real processes;
//! tests substitute a recording fake.

use anyhow::{Context, Result};
use std::fmt;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use zeroize::Zeroizing;

/// How the child's stdout/stderr are wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoMode {
    /// Collect output for parsing.
    Capture,
    /// Pass the terminal through (interactive flows, proxied listings).
    Inherit,
}

/// A single external command line.
#[derive(Clone)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub io: IoMode,
    pub stdin: Option<Zeroizing<String>>,
    pub env_remove: Vec<String>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            io: IoMode::Capture,
            stdin: None,
            env_remove: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn inherit(mut self) -> Self {
        self.io = IoMode::Inherit;
        self
    }

    /// Feed `input` to the child's stdin, then close it.
    pub fn stdin(mut self, input: Zeroizing<String>) -> Self {
        self.stdin = Some(input);
        self
    }

    pub fn env_remove(mut self, key: impl Into<String>) -> Self {
        self.env_remove.push(key.into());
        self
    }

    /// Program and arguments joined by spaces, for messages and logs.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

// Hand-written so piped credentials never reach a log line.
impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("program", &self.program)
            .field("args", &self.args)
            .field("io", &self.io)
            .field("stdin", &self.stdin.as_ref().map(|_| "<redacted>"))
            .field("env_remove", &self.env_remove)
            .finish()
    }
}

/// Result of a finished child process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Output {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl Output {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn first_line(&self) -> &str {
        self.stdout.lines().next().unwrap_or("").trim()
    }

    /// Human-readable exit description: `exit code 1` or `signal`.
    pub fn exit_description(&self) -> String {
        match self.code {
            Some(code) => format!("exit code {}", code),
            None => "termination by signal".to_string(),
        }
    }
}

/// Process execution seam.
pub trait Runner {
    /// Run to completion. A non-zero exit is reported in [`Output::success`],
    /// not as an error; `Err` means the program could not be started.
    fn run(&self, invocation: &Invocation) -> Result<Output>;

    /// Resolve `program` on `PATH`.
    fn locate(&self, program: &str) -> Option<PathBuf>;
}

/// Runs real processes with `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl Runner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<Output> {
        tracing::debug!(command = %invocation, io = ?invocation.io, "running external command");

        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args);
        for key in &invocation.env_remove {
            cmd.env_remove(key);
        }

        match invocation.io {
            IoMode::Capture => {
                cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
            }
            IoMode::Inherit => {
                cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
            }
        }
        if invocation.stdin.is_some() {
            cmd.stdin(Stdio::piped());
        }

        let mut child = cmd.spawn().with_context(|| {
            format!(
                "Failed to run `{}`. Is `{}` installed?",
                invocation, invocation.program
            )
        })?;

        if let Some(input) = &invocation.stdin {
            let mut pipe = child
                .stdin
                .take()
                .context("Child process has no stdin pipe")?;
            pipe.write_all(input.as_bytes())
                .with_context(|| format!("Failed to write to stdin of `{}`", invocation))?;
            // pipe dropped here, child sees EOF
        }

        let output = child
            .wait_with_output()
            .with_context(|| format!("Failed to wait for `{}`", invocation))?;

        let result = Output {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        tracing::debug!(command = %invocation, success = result.success, code = ?result.code, "external command finished");
        Ok(result)
    }

    fn locate(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }
}
