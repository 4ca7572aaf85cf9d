//! Gated removal of the checkout itself.
use anyhow::Result;

use super::{Context, Task, TaskResult};
use crate::config::settings;
use crate::error::SetupError;
use crate::exec::shell_command;
use crate::gate::{self, Decision};
use crate::resources::helpers::fs::remove_tree;

/// Delete the whole checkout, behind the two-step confirmation gate.
///
/// The only action that cannot be re-created by running `install` again.
#[derive(Debug)]
pub struct RemoveCheckout;

impl Task for RemoveCheckout {
    fn name(&self) -> &'static str {
        "Remove checkout"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let root = &ctx.layout.root;
        let question = format!("Also delete {} and everything in it?", root.display());
        if gate::confirm_destructive(&*ctx.prompter, &question, settings::CONFIRMATION_WORD)
            == Decision::Cancelled
        {
            return Ok(TaskResult::Cancelled(format!("kept {}", root.display())));
        }

        // Refusals carry no remedy.
        if ctx.layout.home.starts_with(root) {
            return Err(SetupError::warning(
                "checkout",
                format!(
                    "refusing to remove {}: it contains your home directory",
                    root.display()
                ),
                None,
            )
            .into());
        }
        if !root.join(settings::ANCHOR_FILE).is_file()
            || !root.join(settings::ANCHOR_DIR).is_dir()
        {
            return Err(SetupError::warning(
                "checkout",
                format!("refusing to remove {}: not a checkout", root.display()),
                None,
            )
            .into());
        }

        remove_tree(root).map_err(|e| {
            SetupError::warning(
                "checkout",
                format!("{e:#}"),
                shell_command("rm", &["-rf", &root.to_string_lossy()]),
            )
        })?;
        ctx.log.info(&format!("removed {}", root.display()));
        Ok(TaskResult::Ok)
    }
}
