//! The user-level service unit in the user service manager.
use anyhow::Result;
use std::sync::Arc;

use crate::exec::{Executor, shell_command};

/// The display process's user-level service in the user service manager.
#[derive(Debug, Clone)]
pub struct UserService {
    /// Unit name (e.g. `turing-screen.service`).
    pub unit: String,
    executor: Arc<dyn Executor>,
}

impl UserService {
    /// Create a handle for `unit`.
    #[must_use]
    pub fn new(unit: impl Into<String>, executor: Arc<dyn Executor>) -> Self {
        Self {
            unit: unit.into(),
            executor,
        }
    }

    fn systemctl(&self, verb: &[&str]) -> Result<()> {
        let mut args = vec!["--user"];
        args.extend_from_slice(verb);
        args.push(&self.unit);
        self.executor.run("systemctl", &args)?;
        Ok(())
    }

    /// Whether the service manager has the unit enabled.
    ///
    /// A missing `systemctl` counts as not registered.
    #[must_use]
    pub fn is_registered(&self) -> bool {
        self.executor
            .run_unchecked("systemctl", &["--user", "is-enabled", &self.unit])
            .is_ok_and(|r| r.success)
    }

    /// Enable and start the unit.
    ///
    /// # Errors
    ///
    /// Returns an error if `systemctl` fails.
    pub fn enable(&self) -> Result<()> {
        self.systemctl(&["enable", "--now"])
    }

    /// Stop the running instance.
    ///
    /// # Errors
    ///
    /// Returns an error if `systemctl` fails.
    pub fn stop(&self) -> Result<()> {
        self.systemctl(&["stop"])
    }

    /// Remove the unit's enablement links.
    ///
    /// # Errors
    ///
    /// Returns an error if `systemctl` fails.
    pub fn disable(&self) -> Result<()> {
        self.systemctl(&["disable"])
    }

    /// Command an operator can run to enable the unit by hand.
    #[must_use]
    pub fn enable_command(&self) -> Option<String> {
        shell_command("systemctl", &["--user", "enable", "--now", &self.unit])
    }
}
