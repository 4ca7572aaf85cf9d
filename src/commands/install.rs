//! Command: install every resource.
use anyhow::Result;

use super::{abort, finish, run_tasks, version};
use crate::config::settings;
use crate::logging::StepStatus;
use crate::prereq::{PrerequisiteChecker, Readiness};
use crate::resources::{Resource as _, ResourceState};
use crate::tasks::{self, Context, usb_access};

const PREREQUISITES: &str = "Check prerequisites";

/// Run the install command.
///
/// # Errors
///
/// Returns an error if a prerequisite is missing or a mandatory resource
/// could not be provisioned. Warnings alone never fail the run.
pub fn run(ctx: &Context) -> Result<()> {
    ctx.log
        .info(&format!("turing-setup {}", version::version()));
    ctx.log
        .info(&format!("checkout: {}", ctx.layout.root.display()));
    let result = install(ctx);
    finish(ctx, result)
}

fn install(ctx: &Context) -> Result<()> {
    let readiness = check_prerequisites(ctx)?;
    let tasks = tasks::all_install_tasks(&readiness);
    run_tasks(tasks.iter().map(Box::as_ref), ctx)?;
    check_session(ctx);
    Ok(())
}

fn check_prerequisites(ctx: &Context) -> Result<Readiness> {
    ctx.log.stage(PREREQUISITES);
    let readiness = PrerequisiteChecker::new(&ctx.layout, &*ctx.executor)
        .check_install()
        .map_err(|e| abort(ctx, PREREQUISITES, e))?;

    let (major, minor) = readiness.runtime_version;
    ctx.log.info(&format!(
        "runtime: {} ({major}.{minor})",
        readiness.runtime.display()
    ));
    match readiness.gpu {
        Some(gpu) => ctx.log.info(&format!("gpu: {gpu:?}")),
        None => ctx.log.debug("no display controller reported"),
    }

    if readiness.warnings.is_empty() {
        ctx.log.record_step(PREREQUISITES, StepStatus::Ok, None);
    } else {
        for warning in &readiness.warnings {
            ctx.log.warn(&warning.to_string());
            if let Some(remedy) = warning.remedy() {
                ctx.log.follow_up(remedy);
            }
        }
        let message = readiness
            .warnings
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        ctx.log
            .record_step(PREREQUISITES, StepStatus::Warn, Some(&message));
    }
    Ok(readiness)
}

/// Ask for a new login when the group was granted but this session does
/// not have it yet.
fn check_session(ctx: &Context) {
    let group = usb_access::membership(ctx);
    if !group
        .probe()
        .is_ok_and(|state| state == ResourceState::Present)
    {
        return;
    }
    match group.active_in_session() {
        Ok(true) => ctx
            .log
            .debug(&format!("{} is active in this session", group.group)),
        Ok(false) => ctx.log.follow_up(&format!(
            "log out and back in to apply {} group membership",
            settings::USB_GROUP
        )),
        Err(e) => ctx.log.debug(&format!("session groups unknown: {e:#}")),
    }
}
