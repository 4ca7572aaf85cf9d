//! Command execution abstraction.
//!
//! Every shelled-out command goes through [`Executor`] so that steps can be
//! exercised in tests without touching the host.
use anyhow::{Context as _, Result, bail};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Result of a command execution.
#[derive(Debug, Clone, Default)]
pub struct ExecResult {
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// Whether the process exited with status zero.
    pub success: bool,
    /// Exit code, if the process was not killed by a signal.
    pub code: Option<i32>,
}

impl From<Output> for ExecResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }
}

/// Runs external programs.
pub trait Executor: Send + Sync + std::fmt::Debug {
    /// Run a command and return its output. Fails if the command exits non-zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be spawned or exits non-zero.
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Run a command in a specific directory. Fails if the command exits non-zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be spawned or exits non-zero.
    fn run_in(&self, dir: &Path, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Run a command with the terminal attached (credential prompts).
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be spawned or exits non-zero.
    fn run_interactive(&self, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Run a command, allowing failure (returns result without bailing).
    ///
    /// # Errors
    ///
    /// Returns an error only if the program cannot be spawned.
    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Resolve `program` on the command search path.
    fn locate(&self, program: &str) -> Option<PathBuf>;

    /// Check if a program is available on `PATH`.
    fn which(&self, program: &str) -> bool {
        self.locate(program).is_some()
    }
}

/// [`Executor`] backed by [`std::process::Command`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

/// Execute a command and return the result, bailing on non-zero exit.
fn execute_checked(mut cmd: Command, label: &str) -> Result<ExecResult> {
    tracing::debug!("exec: {label}");
    let output = cmd
        .output()
        .with_context(|| format!("failed to execute: {label}"))?;
    let result = ExecResult::from(output);
    if !result.success {
        bail!(
            "{label} failed (exit {}): {}",
            result.code.unwrap_or(-1),
            result.stderr.trim()
        );
    }
    Ok(result)
}

/// Render a program and its arguments as a single line for logs and errors.
///
/// Arguments are not quoted. Use [`shell_command`] for anything an operator
/// is expected to paste into a shell.
#[must_use]
pub fn command_line(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render a command as a POSIX shell line, quoting arguments where needed.
///
/// Returns `None` if an argument contains a NUL byte, which no shell line
/// can carry.
#[must_use]
pub fn shell_command(program: &str, args: &[&str]) -> Option<String> {
    shlex::try_join(std::iter::once(program).chain(args.iter().copied())).ok()
}

impl Executor for SystemExecutor {
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        let mut cmd = Command::new(program);
        cmd.args(args);
        execute_checked(cmd, &command_line(program, args))
    }

    fn run_in(&self, dir: &Path, program: &str, args: &[&str]) -> Result<ExecResult> {
        let mut cmd = Command::new(program);
        cmd.args(args).current_dir(dir);
        execute_checked(
            cmd,
            &format!("{} in {}", command_line(program, args), dir.display()),
        )
    }

    fn run_interactive(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        let label = command_line(program, args);
        tracing::debug!("exec (interactive): {label}");
        let status = Command::new(program)
            .args(args)
            .status()
            .with_context(|| format!("failed to execute: {label}"))?;
        if !status.success() {
            bail!("{label} failed (exit {})", status.code().unwrap_or(-1));
        }
        Ok(ExecResult {
            success: true,
            code: status.code(),
            ..ExecResult::default()
        })
    }

    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        let label = command_line(program, args);
        tracing::debug!("exec (unchecked): {label}");
        let output = Command::new(program)
            .args(args)
            .output()
            .with_context(|| format!("failed to execute: {label}"))?;
        Ok(ExecResult::from(output))
    }

    fn locate(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }
}
