//! System package installation as a task.
use anyhow::Result;
use std::sync::Arc;

use super::{Context, Task, TaskResult};
use crate::config::settings;
use crate::error::SetupError;
use crate::resources::packages::PackageSet;
use crate::resources::{Resource as _, ResourceChange};

/// Install the system packages the runtime needs to build its dependencies.
///
/// Failure never stops the run: the packages are only needed by some of the
/// environment's dependencies, and the rerun command is reported.
#[derive(Debug)]
pub struct InstallSystemPackages;

impl Task for InstallSystemPackages {
    fn name(&self) -> &'static str {
        "Install system packages"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let set = PackageSet::new(
            settings::SYSTEM_PACKAGES,
            Arc::clone(&ctx.executor),
            Arc::clone(&ctx.privileged),
        );
        let missing = set.missing();
        if missing.is_empty() {
            return Ok(TaskResult::Unchanged("already installed".to_string()));
        }
        ctx.log.debug(&format!("missing packages: {}", missing.join(", ")));
        match set.apply() {
            Ok(ResourceChange::Unchanged) => {
                Ok(TaskResult::Unchanged("already installed".to_string()))
            }
            Ok(_) => Ok(TaskResult::Ok),
            Err(e) => Ok(TaskResult::Warned(vec![SetupError::warning(
                set.description(),
                format!("{e:#}"),
                PackageSet::install_command(&missing),
            )])),
        }
    }
}
