//! Tasks that install or remove one managed resource through the provisioner.
use anyhow::Result;

use super::{Context, Task, TaskResult};
use crate::provisioner::{Provisioned, Provisioner};
use crate::resources::ResourceChange;
use crate::resources::descriptor::{ResourceKind, descriptor};
use crate::template::Substitutions;

/// Install one descriptor.
#[derive(Debug)]
pub struct ProvisionResource {
    kind: ResourceKind,
    name: String,
}

impl ProvisionResource {
    /// Task named after the descriptor's label.
    #[must_use]
    pub fn new(kind: ResourceKind) -> Self {
        Self {
            kind,
            name: format!("Install {}", kind.label()),
        }
    }
}

impl Task for ProvisionResource {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let provisioner = Provisioner::new(&ctx.layout, &ctx.executor, &ctx.privileged);
        let substitutions = Substitutions::for_install(&ctx.layout.root);
        let provisioned = provisioner.install(descriptor(self.kind), &substitutions)?;
        ctx.log.debug(&format!(
            "{}: {}",
            self.kind.label(),
            descriptor(self.kind).destination_path(&ctx.layout).display()
        ));
        Ok(outcome(provisioned, "already up to date"))
    }
}

/// Retract one descriptor; absent resources are a no-op.
#[derive(Debug)]
pub struct RetractResource {
    kind: ResourceKind,
    name: String,
}

impl RetractResource {
    /// Task named after the descriptor's label.
    #[must_use]
    pub fn new(kind: ResourceKind) -> Self {
        Self {
            kind,
            name: format!("Remove {}", kind.label()),
        }
    }
}

impl Task for RetractResource {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let provisioner = Provisioner::new(&ctx.layout, &ctx.executor, &ctx.privileged);
        let provisioned = provisioner.uninstall(descriptor(self.kind))?;
        Ok(outcome(provisioned, "already absent"))
    }
}

fn outcome(provisioned: Provisioned, unchanged: &str) -> TaskResult {
    if !provisioned.warnings.is_empty() {
        return TaskResult::Warned(provisioned.warnings);
    }
    match provisioned.change {
        ResourceChange::Applied => TaskResult::Ok,
        ResourceChange::Unchanged => TaskResult::Unchanged(unchanged.to_string()),
        ResourceChange::Skipped { reason } => TaskResult::Unchanged(reason),
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::config::settings;
    use crate::logging::StepStatus;
    use crate::prompt::MockPrompter;
    use crate::resources::test_helpers::{RecordingExecutor, RecordingPrivileged};
    use crate::tasks::execute;
    use crate::tasks::test_helpers::{Sandbox, make_context, silent_context, unit_path};
    use std::sync::Arc;

    #[test]
    fn service_unit_matches_rendered_template() {
        let sandbox = Sandbox::new();
        let ctx = silent_context(&sandbox, RecordingExecutor::new());
        execute(&ProvisionResource::new(ResourceKind::ServiceUnit), &ctx).unwrap();
        let unit = std::fs::read_to_string(unit_path(&sandbox)).unwrap();
        assert_eq!(
            unit,
            format!(
                "[Service]\nExecStart={}/venv/bin/python main.py\n",
                sandbox.root().display()
            )
        );
        assert_eq!(ctx.log.steps()[0].status, StepStatus::Ok);
    }

    #[test]
    fn reinstall_overwrites_local_edits() {
        let sandbox = Sandbox::new();
        let ctx = silent_context(&sandbox, RecordingExecutor::new());
        let task = ProvisionResource::new(ResourceKind::ServiceUnit);
        execute(&task, &ctx).unwrap();
        std::fs::write(unit_path(&sandbox), "[Service]\nExecStart=/bin/false\n").unwrap();
        execute(&task, &ctx).unwrap();
        let unit = std::fs::read_to_string(unit_path(&sandbox)).unwrap();
        assert!(!unit.contains("/bin/false"));
        assert!(!unit.contains("@TARGET_DIR@"));
    }

    #[test]
    fn failed_enable_is_a_warning_with_rerun_command() {
        let sandbox = Sandbox::new();
        let ctx = silent_context(
            &sandbox,
            RecordingExecutor::new().failing("systemctl --user enable"),
        );
        execute(&ProvisionResource::new(ResourceKind::ServiceUnit), &ctx).unwrap();
        assert!(unit_path(&sandbox).exists());
        assert_eq!(ctx.log.steps()[0].status, StepStatus::Warn);
        assert_eq!(
            ctx.log.follow_ups(),
            vec![format!(
                "systemctl --user enable --now {}",
                settings::SERVICE_UNIT
            )]
        );
    }

    #[test]
    fn device_rule_without_privilege_aborts() {
        let sandbox = Sandbox::new();
        let ctx = make_context(
            &sandbox,
            Arc::new(RecordingExecutor::new()),
            Arc::new(RecordingPrivileged::denying()),
            MockPrompter::new(),
        );
        let result = execute(&ProvisionResource::new(ResourceKind::DeviceRule), &ctx);
        assert!(result.is_err());
        assert!(ctx.log.has_fatal());
    }

    #[test]
    fn retract_twice_reports_already_absent() {
        let sandbox = Sandbox::new();
        let ctx = silent_context(&sandbox, RecordingExecutor::new());
        execute(&ProvisionResource::new(ResourceKind::Icon), &ctx).unwrap();
        let task = RetractResource::new(ResourceKind::Icon);
        execute(&task, &ctx).unwrap();
        execute(&task, &ctx).unwrap();
        let steps = ctx.log.steps();
        assert_eq!(steps[1].message, None);
        assert_eq!(steps[2].message.as_deref(), Some("already absent"));
        assert_eq!(steps[1].status, StepStatus::Ok);
        assert_eq!(steps[2].status, StepStatus::Unchanged);
    }
}
