//! Command orchestration: task sequencing, abort handling and the final summary.
pub mod install;
pub mod uninstall;
pub mod version;

use anyhow::Result;

use crate::error::SetupError;
use crate::logging::StepStatus;
use crate::tasks::{self, Context, Task};

/// Execute every task in order, stopping at the first fatal one.
///
/// # Errors
///
/// Returns the fatal task's error.
pub fn run_tasks<'a>(tasks: impl IntoIterator<Item = &'a dyn Task>, ctx: &Context) -> Result<()> {
    for task in tasks {
        tasks::execute(task, ctx)?;
    }
    Ok(())
}

/// Record a failed gate check that ends the run before any task starts.
pub fn abort(ctx: &Context, step: &str, err: SetupError) -> anyhow::Error {
    let message = err.to_string();
    ctx.log.error(&format!("{step}: {message}"));
    if let Some(remedy) = err.remedy() {
        ctx.log.follow_up(remedy);
    }
    ctx.log.record_step(step, StepStatus::Fatal, Some(&message));
    err.into()
}

/// Print the summary and pass the run's result through as the exit status.
///
/// # Errors
///
/// Returns `result` unchanged.
pub fn finish(ctx: &Context, result: Result<()>) -> Result<()> {
    ctx.log.print_summary();
    result
}
