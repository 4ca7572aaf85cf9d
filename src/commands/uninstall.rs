//! Uninstall command implementation.
use anyhow::Result;

use super::{abort, finish, run_tasks};
use crate::gate::{self, Decision};
use crate::logging::StepStatus;
use crate::prereq::PrerequisiteChecker;
use crate::tasks::{self, Context, Task, checkout::RemoveCheckout};

const PREREQUISITES: &str = "Check prerequisites";
const CONFIRM: &str = "Confirm uninstall";

/// Run the uninstall command.
///
/// Every managed resource is retracted, newest first; deleting the checkout
/// itself is offered last, behind its own confirmation.
///
/// # Errors
///
/// Returns an error if the checks fail or a mandatory resource cannot be
/// removed. Declining a confirmation is not an error.
pub fn run(ctx: &Context) -> Result<()> {
    let result = uninstall(ctx);
    finish(ctx, result)
}

fn uninstall(ctx: &Context) -> Result<()> {
    ctx.log.stage(PREREQUISITES);
    PrerequisiteChecker::new(&ctx.layout, &*ctx.executor)
        .check_uninstall()
        .map_err(|e| abort(ctx, PREREQUISITES, e))?;
    ctx.log.record_step(PREREQUISITES, StepStatus::Ok, None);

    let question = "Remove the Turing Smart Screen integration from this system?";
    if gate::confirm(&*ctx.prompter, question) == Decision::Cancelled {
        ctx.log
            .record_step(CONFIRM, StepStatus::Cancelled, Some("nothing removed"));
        return Ok(());
    }

    let mut steps = tasks::all_uninstall_tasks();
    steps.push(Box::new(RemoveCheckout) as Box<dyn Task>);
    run_tasks(steps.iter().map(Box::as_ref), ctx)
}
