//! Named, ordered steps that orchestrate resource changes.
pub mod checkout;
mod context;
pub mod environment;
pub mod packages;
pub mod resources;
pub mod usb_access;

pub use context::Context;

use anyhow::Result;

use crate::error::SetupError;
use crate::logging::StepStatus;
use crate::prereq::Readiness;
use crate::resources::descriptor::{DESCRIPTORS, ResourceKind};

/// Outcome of a task that did not abort the run.
#[derive(Debug)]
pub enum TaskResult {
    /// Task made its changes.
    Ok,
    /// Nothing needed doing.
    Unchanged(String),
    /// Task finished but hit non-fatal problems.
    Warned(Vec<SetupError>),
    /// The operator declined the action.
    Cancelled(String),
}

impl TaskResult {
    /// Collapse a list of warnings into `Ok` or `Warned`.
    #[must_use]
    pub fn from_warnings(warnings: Vec<SetupError>) -> Self {
        if warnings.is_empty() {
            Self::Ok
        } else {
            Self::Warned(warnings)
        }
    }
}

/// A named, executable step.
pub trait Task {
    /// Human-readable step name, used in the summary.
    fn name(&self) -> &str;

    /// Whether this step applies to the current host.
    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    /// Execute the step.
    ///
    /// # Errors
    ///
    /// Returns an error (usually a [`SetupError`]) if the step fails. The
    /// error's classification decides whether the run continues.
    fn run(&self, ctx: &Context) -> Result<TaskResult>;
}

/// Steps run by `install`, in order.
///
/// System packages first, then every descriptor in declaration order. USB
/// access follows the device rule; the runtime environment is built by
/// [`environment::BuildEnvironment`].
#[must_use]
pub fn all_install_tasks(readiness: &Readiness) -> Vec<Box<dyn Task>> {
    let mut tasks: Vec<Box<dyn Task>> = vec![Box::new(packages::InstallSystemPackages)];
    for descriptor in DESCRIPTORS {
        match descriptor.kind {
            ResourceKind::RuntimeEnv => tasks.push(Box::new(environment::BuildEnvironment::new(
                readiness.runtime.clone(),
                readiness.gpu,
            ))),
            ResourceKind::DeviceRule => {
                tasks.push(Box::new(resources::ProvisionResource::new(descriptor.kind)));
                tasks.push(Box::new(usb_access::ConfigureUsbAccess));
            }
            kind => tasks.push(Box::new(resources::ProvisionResource::new(kind))),
        }
    }
    tasks
}

/// Steps run by `uninstall`: every descriptor, newest first.
///
/// The checkout removal is gated separately by the command.
#[must_use]
pub fn all_uninstall_tasks() -> Vec<Box<dyn Task>> {
    DESCRIPTORS
        .iter()
        .rev()
        .map(|d| Box::new(resources::RetractResource::new(d.kind)) as Box<dyn Task>)
        .collect()
}

/// Execute a task, recording the result in the logger.
///
/// Warnings and cancellations are recorded and the run continues; a fatal
/// [`SetupError`] is recorded and returned so the caller stops.
///
/// # Errors
///
/// Returns the task's error when it is fatal.
pub fn execute(task: &dyn Task, ctx: &Context) -> Result<()> {
    if !task.should_run(ctx) {
        ctx.log
            .debug(&format!("skipping task: {} (not applicable)", task.name()));
        return Ok(());
    }

    ctx.log.stage(task.name());

    match task.run(ctx) {
        Ok(TaskResult::Ok) => ctx.log.record_step(task.name(), StepStatus::Ok, None),
        Ok(TaskResult::Unchanged(reason)) => {
            ctx.log.info(&reason);
            ctx.log
                .record_step(task.name(), StepStatus::Unchanged, Some(&reason));
        }
        Ok(TaskResult::Warned(warnings)) => {
            for warning in &warnings {
                report_warning(ctx, warning);
            }
            let message = warnings
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            ctx.log
                .record_step(task.name(), StepStatus::Warn, Some(&message));
        }
        Ok(TaskResult::Cancelled(reason)) => {
            ctx.log.info(&reason);
            ctx.log
                .record_step(task.name(), StepStatus::Cancelled, Some(&reason));
        }
        Err(e) => {
            let message = format!("{e:#}");
            match e.downcast_ref::<SetupError>() {
                Some(err) if err.is_fatal() => {
                    ctx.log.error(&format!("{}: {message}", task.name()));
                    if let Some(remedy) = err.remedy() {
                        ctx.log.follow_up(remedy);
                    }
                    ctx.log
                        .record_step(task.name(), StepStatus::Fatal, Some(&message));
                    return Err(e);
                }
                Some(SetupError::UserCancelled { .. }) => {
                    ctx.log.info(&message);
                    ctx.log
                        .record_step(task.name(), StepStatus::Cancelled, Some(&message));
                }
                Some(err) => {
                    report_warning(ctx, err);
                    ctx.log
                        .record_step(task.name(), StepStatus::Warn, Some(&message));
                }
                None => {
                    ctx.log.warn(&format!("{}: {message}", task.name()));
                    ctx.log
                        .record_step(task.name(), StepStatus::Warn, Some(&message));
                }
            }
        }
    }
    Ok(())
}

fn report_warning(ctx: &Context, warning: &SetupError) {
    ctx.log.warn(&warning.to_string());
    if let Some(remedy) = warning.remedy() {
        ctx.log.follow_up(remedy);
    }
}


#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::prereq::GpuVendor;
    use crate::resources::test_helpers::RecordingExecutor;
    use test_helpers::{Sandbox, silent_context};

    struct MockTask {
        name: &'static str,
        outcome: fn() -> Result<TaskResult>,
    }

    impl Task for MockTask {
        fn name(&self) -> &str {
            self.name
        }

        fn run(&self, _ctx: &Context) -> Result<TaskResult> {
            (self.outcome)()
        }
    }

    struct NotApplicable;

    impl Task for NotApplicable {
        fn name(&self) -> &str {
            "not applicable"
        }

        fn should_run(&self, _ctx: &Context) -> bool {
            false
        }

        fn run(&self, _ctx: &Context) -> Result<TaskResult> {
            panic!("must not run")
        }
    }

    fn run_one(task: &dyn Task) -> (Context, Result<()>) {
        let sandbox = Sandbox::new();
        let ctx = silent_context(&sandbox, RecordingExecutor::new());
        let result = execute(task, &ctx);
        (ctx, result)
    }

    #[test]
    fn ok_is_recorded() {
        let (ctx, result) = run_one(&MockTask {
            name: "Install icon",
            outcome: || Ok(TaskResult::Ok),
        });
        assert!(result.is_ok());
        let steps = ctx.log.steps();
        assert_eq!(steps[0].status, StepStatus::Ok);
        assert!(steps[0].message.is_none());
    }

    #[test]
    fn no_op_is_recorded_as_unchanged() {
        let (ctx, result) = run_one(&MockTask {
            name: "Install icon",
            outcome: || Ok(TaskResult::Unchanged("already up to date".to_string())),
        });
        assert!(result.is_ok());
        let steps = ctx.log.steps();
        assert_eq!(steps[0].status, StepStatus::Unchanged);
        assert_eq!(steps[0].message.as_deref(), Some("already up to date"));
        assert_eq!(ctx.log.count(StepStatus::Ok), 0);
    }

    #[test]
    fn warnings_continue_with_follow_ups() {
        let (ctx, result) = run_one(&MockTask {
            name: "Install menu entry",
            outcome: || {
                Ok(TaskResult::Warned(vec![SetupError::warning(
                    "desktop database refresh",
                    "update-desktop-database is not installed",
                    Some("update-desktop-database ~/.local/share/applications".to_string()),
                )]))
            },
        });
        assert!(result.is_ok());
        assert_eq!(ctx.log.steps()[0].status, StepStatus::Warn);
        assert_eq!(
            ctx.log.follow_ups(),
            vec!["update-desktop-database ~/.local/share/applications"]
        );
    }

    #[test]
    fn fatal_error_stops_and_is_recorded() {
        let (ctx, result) = run_one(&MockTask {
            name: "Install device rule",
            outcome: || {
                Err(SetupError::mandatory(
                    "device rule",
                    "administrator privileges unavailable",
                    Some("sudo -v".to_string()),
                )
                .into())
            },
        });
        assert!(result.is_err());
        assert!(ctx.log.has_fatal());
        assert_eq!(ctx.log.follow_ups(), vec!["sudo -v"]);
    }

    #[test]
    fn recoverable_error_is_a_warning() {
        let (ctx, result) = run_one(&MockTask {
            name: "Install icon",
            outcome: || Err(SetupError::warning("icon", "source not found", None).into()),
        });
        assert!(result.is_ok());
        assert_eq!(ctx.log.count(StepStatus::Warn), 1);
    }

    #[test]
    fn cancellation_is_not_a_failure() {
        let (ctx, result) = run_one(&MockTask {
            name: "Remove checkout",
            outcome: || Err(SetupError::cancelled("remove checkout").into()),
        });
        assert!(result.is_ok());
        assert_eq!(ctx.log.count(StepStatus::Cancelled), 1);
        assert!(!ctx.log.has_fatal());
    }

    #[test]
    fn unclassified_error_is_a_warning() {
        let (ctx, result) = run_one(&MockTask {
            name: "Configure USB access",
            outcome: || Err(anyhow::anyhow!("id: no such user")),
        });
        assert!(result.is_ok());
        assert_eq!(ctx.log.count(StepStatus::Warn), 1);
    }

    #[test]
    fn not_applicable_task_is_not_recorded() {
        let (ctx, result) = run_one(&NotApplicable);
        assert!(result.is_ok());
        assert!(ctx.log.steps().is_empty());
    }

    #[test]
    fn install_task_order() {
        let readiness = Readiness {
            runtime: "/usr/bin/python3.11".into(),
            runtime_version: (3, 11),
            gpu: Some(GpuVendor::Nvidia),
            warnings: Vec::new(),
        };
        let names: Vec<String> = all_install_tasks(&readiness)
            .iter()
            .map(|t| t.name().to_string())
            .collect();
        insta::assert_debug_snapshot!(names, @r#"
        [
            "Install system packages",
            "Install device rule",
            "Configure USB access",
            "Build runtime environment",
            "Install service unit",
            "Install menu entry",
            "Install autostart entry",
            "Install icon",
            "Install configuration directory",
        ]
        "#);
    }

    #[test]
    fn uninstall_task_order_is_reversed() {
        let names: Vec<String> = all_uninstall_tasks()
            .iter()
            .map(|t| t.name().to_string())
            .collect();
        insta::assert_debug_snapshot!(names, @r#"
        [
            "Remove configuration directory",
            "Remove icon",
            "Remove autostart entry",
            "Remove menu entry",
            "Remove service unit",
            "Remove runtime environment",
            "Remove device rule",
        ]
        "#);
    }
}
