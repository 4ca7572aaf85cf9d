//! System packages installed through the distribution package manager.
use anyhow::{Result, bail};
use std::sync::Arc;

use super::{Resource, ResourceChange, ResourceState};
use crate::exec::{Executor, shell_command};
use crate::privilege::PrivilegedExecutor;

const ZYPPER_INSTALL: &[&str] = &["--non-interactive", "install", "--no-recommends"];

/// A set of system packages installed through `zypper`.
///
/// Probed per package with `rpm -q`; only the missing ones are installed,
/// in a single privileged transaction.
#[derive(Debug)]
pub struct PackageSet {
    /// Package names, in install order.
    pub packages: Vec<String>,
    executor: Arc<dyn Executor>,
    privileged: Arc<dyn PrivilegedExecutor>,
}

impl PackageSet {
    /// Set over `packages`; the install goes through `privileged`.
    #[must_use]
    pub fn new(
        packages: &[&str],
        executor: Arc<dyn Executor>,
        privileged: Arc<dyn PrivilegedExecutor>,
    ) -> Self {
        Self {
            packages: packages.iter().map(ToString::to_string).collect(),
            executor,
            privileged,
        }
    }

    /// Packages not currently installed.
    #[must_use]
    pub fn missing(&self) -> Vec<String> {
        self.packages
            .iter()
            .filter(|p| {
                !self
                    .executor
                    .run_unchecked("rpm", &["-q", p.as_str()])
                    .is_ok_and(|r| r.success)
            })
            .cloned()
            .collect()
    }

    /// Exact command to install `packages` by hand.
    #[must_use]
    pub fn install_command(packages: &[String]) -> Option<String> {
        let mut args: Vec<&str> = vec!["zypper"];
        args.extend_from_slice(ZYPPER_INSTALL);
        args.extend(packages.iter().map(String::as_str));
        shell_command("sudo", &args)
    }
}

impl Resource for PackageSet {
    fn description(&self) -> String {
        "system packages".to_string()
    }

    fn probe(&self) -> Result<ResourceState> {
        Ok(if self.missing().is_empty() {
            ResourceState::Present
        } else {
            ResourceState::Absent
        })
    }

    fn apply(&self) -> Result<ResourceChange> {
        let missing = self.missing();
        if missing.is_empty() {
            return Ok(ResourceChange::Unchanged);
        }
        if !self.executor.which("zypper") {
            bail!("zypper is not installed");
        }
        tracing::info!("installing {}", missing.join(", "));
        let mut args: Vec<&str> = ZYPPER_INSTALL.to_vec();
        args.extend(missing.iter().map(String::as_str));
        self.privileged.run("zypper", &args)?;
        Ok(ResourceChange::Applied)
    }
}
