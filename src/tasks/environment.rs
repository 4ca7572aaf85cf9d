//! Task wrapper around the runtime environment builder.
use anyhow::Result;
use std::path::PathBuf;

use super::{Context, Task, TaskResult};
use crate::environment::EnvironmentBuilder;
use crate::prereq::GpuVendor;

/// Rebuild the isolated runtime environment from scratch.
#[derive(Debug)]
pub struct BuildEnvironment {
    runtime: PathBuf,
    gpu: Option<GpuVendor>,
}

impl BuildEnvironment {
    /// `runtime` and `gpu` come from the prerequisite check.
    #[must_use]
    pub const fn new(runtime: PathBuf, gpu: Option<GpuVendor>) -> Self {
        Self { runtime, gpu }
    }
}

impl Task for BuildEnvironment {
    fn name(&self) -> &'static str {
        "Build runtime environment"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let warnings =
            EnvironmentBuilder::new(&ctx.layout, &*ctx.executor, self.runtime.clone())
                .build(self.gpu)?;
        Ok(TaskResult::from_warnings(warnings))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logging::StepStatus;
    use crate::resources::test_helpers::RecordingExecutor;
    use crate::tasks::execute;
    use crate::tasks::test_helpers::{Sandbox, silent_context};

    fn task(gpu: Option<GpuVendor>) -> BuildEnvironment {
        BuildEnvironment::new(PathBuf::from("/usr/bin/python3.11"), gpu)
    }

    #[test]
    fn missing_manifest_is_recorded_as_warning() {
        let sandbox = Sandbox::new();
        let ctx = silent_context(&sandbox, RecordingExecutor::new());
        execute(&task(None), &ctx).unwrap();
        let steps = ctx.log.steps();
        assert_eq!(steps[0].status, StepStatus::Warn);
        assert!(
            steps[0]
                .message
                .as_deref()
                .is_some_and(|m| m.contains("requirements.txt not found"))
        );
    }

    #[test]
    fn failed_tooling_upgrade_aborts_with_command() {
        let sandbox = Sandbox::new();
        let ctx = silent_context(
            &sandbox,
            RecordingExecutor::new().failing(&format!(
                "{} -m pip install --upgrade pip",
                sandbox.layout.venv_python().display()
            )),
        );
        assert!(execute(&task(Some(GpuVendor::Nvidia)), &ctx).is_err());
        assert!(ctx.log.has_fatal());
        assert_eq!(
            ctx.log.follow_ups(),
            vec![format!(
                "{} -m pip install --upgrade pip",
                sandbox.layout.venv_python().display()
            )]
        );
    }
}
