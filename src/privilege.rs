//! Privileged execution, isolated from the unprivileged majority of steps.
//!
//! The installer itself must never run as root. Steps that touch
//! system-wide state (the device rule, group membership, system packages)
//! go through a [`PrivilegedExecutor`]; everything else uses the plain
//! [`Executor`](crate::exec::Executor).
use anyhow::{Context as _, Result, bail};
use std::io::Write as _;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::exec::{ExecResult, Executor};

/// Runs operations with elevated host permission.
pub trait PrivilegedExecutor: Send + Sync + std::fmt::Debug {
    /// Obtain elevated credentials, prompting out-of-band when needed.
    ///
    /// # Errors
    ///
    /// Returns an error if privilege cannot be obtained.
    fn acquire(&self) -> Result<()>;

    /// Run `program` with elevated permission.
    ///
    /// # Errors
    ///
    /// Returns an error if privilege cannot be obtained or the command fails.
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Write `content` to the root-owned path `dest` (mode `0644`), creating
    /// parent directories and replacing any previous file.
    ///
    /// # Errors
    ///
    /// Returns an error if the content cannot be staged or installed.
    fn install_file(&self, content: &[u8], dest: &Path) -> Result<()>;

    /// Delete the root-owned file at `dest`. Absent files are not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists and cannot be removed.
    fn remove_file(&self, dest: &Path) -> Result<()>;
}

/// [`PrivilegedExecutor`] that routes commands through `sudo`.
///
/// Credentials are validated once per run with `sudo -v`; the cached
/// timestamp is invalidated with `sudo -k` when the executor is dropped.
#[derive(Debug)]
pub struct SudoExecutor {
    executor: Arc<dyn Executor>,
    acquired: AtomicBool,
}

impl SudoExecutor {
    /// Create a sudo-backed executor on top of `executor`.
    #[must_use]
    pub fn new(executor: Arc<dyn Executor>) -> Self {
        Self {
            executor,
            acquired: AtomicBool::new(false),
        }
    }
}

impl PrivilegedExecutor for SudoExecutor {
    fn acquire(&self) -> Result<()> {
        if self.acquired.load(Ordering::SeqCst) {
            return Ok(());
        }
        if !self.executor.which("sudo") {
            bail!("sudo is not installed");
        }
        tracing::info!("administrator password may be requested");
        self.executor
            .run_interactive("sudo", &["-v"])
            .context("could not obtain administrator privileges")?;
        self.acquired.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        self.acquire()?;
        let mut full = Vec::with_capacity(args.len() + 1);
        full.push(program);
        full.extend_from_slice(args);
        self.executor.run("sudo", &full)
    }

    fn install_file(&self, content: &[u8], dest: &Path) -> Result<()> {
        let mut staged = tempfile::NamedTempFile::new().context("creating staging file")?;
        staged
            .write_all(content)
            .and_then(|()| staged.flush())
            .context("writing staging file")?;
        let source = staged.path().to_string_lossy().into_owned();
        let target = dest.to_string_lossy().into_owned();
        self.run("install", &["-D", "-m", "0644", &source, &target])?;
        Ok(())
    }

    fn remove_file(&self, dest: &Path) -> Result<()> {
        let target = dest.to_string_lossy().into_owned();
        self.run("rm", &["-f", &target])?;
        Ok(())
    }
}

impl Drop for SudoExecutor {
    fn drop(&mut self) {
        if self.acquired.load(Ordering::SeqCst) {
            let _ = self.executor.run_unchecked("sudo", &["-k"]);
        }
    }
}
