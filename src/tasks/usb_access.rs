//! Serial-port group membership as a task.
use anyhow::Result;
use std::sync::Arc;

use super::{Context, Task, TaskResult};
use crate::config::settings;
use crate::error::SetupError;
use crate::resources::group::GroupMembership;
use crate::resources::{Resource as _, ResourceChange};

/// Add the user to the serial-port group.
///
/// This is the fallback route to the display when the device rule does not
/// match, so a failure is reported with the manual command and the run
/// continues.
#[derive(Debug)]
pub struct ConfigureUsbAccess;

/// The membership this task manages for the layout's user.
#[must_use]
pub fn membership(ctx: &Context) -> GroupMembership {
    GroupMembership::new(
        ctx.layout.user.clone(),
        settings::USB_GROUP,
        Arc::clone(&ctx.executor),
        Arc::clone(&ctx.privileged),
    )
}

impl Task for ConfigureUsbAccess {
    fn name(&self) -> &'static str {
        "Configure USB access"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let group = membership(ctx);
        match group.apply() {
            Ok(ResourceChange::Applied) => {
                ctx.log
                    .info(&format!("added {} to {}", group.user, group.group));
                Ok(TaskResult::Ok)
            }
            Ok(_) => Ok(TaskResult::Unchanged(format!(
                "{} already in {}",
                group.user, group.group
            ))),
            Err(e) => Ok(TaskResult::Warned(vec![SetupError::warning(
                group.description(),
                format!("{e:#}"),
                group.add_command(),
            )])),
        }
    }
}
