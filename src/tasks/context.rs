//! Execution context shared by every task.
use std::sync::Arc;

use anyhow::Result;

use crate::config::Layout;
use crate::exec::{Executor, SystemExecutor};
use crate::logging::Logger;
use crate::privilege::{PrivilegedExecutor, SudoExecutor};
use crate::prompt::{Prompter, TerminalPrompter};

/// Shared context for task execution.
pub struct Context {
    /// Resolved checkout and destination paths.
    pub layout: Arc<Layout>,
    /// Logger for output and step recording.
    pub log: Arc<Logger>,
    /// Command executor (for testing or real system calls).
    pub executor: Arc<dyn Executor>,
    /// Route for the few steps that need administrator rights.
    pub privileged: Arc<dyn PrivilegedExecutor>,
    /// Operator prompts for the confirmation gate.
    pub prompter: Arc<dyn Prompter>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("layout", &self.layout)
            .field("log", &"<Logger>")
            .field("executor", &"<dyn Executor>")
            .field("privileged", &"<dyn PrivilegedExecutor>")
            .field("prompter", &"<dyn Prompter>")
            .finish()
    }
}

impl Context {
    /// Context for a real run from `root`, logging as `command`.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout cannot be resolved (no `HOME`, or
    /// `root` does not exist).
    pub fn for_host(root: &std::path::Path, command: &str) -> Result<Self> {
        let executor: Arc<dyn Executor> = Arc::new(SystemExecutor);
        Ok(Self {
            layout: Arc::new(Layout::detect(root, executor.as_ref())?),
            log: Arc::new(Logger::for_command(command)),
            privileged: Arc::new(SudoExecutor::new(Arc::clone(&executor))),
            executor,
            prompter: Arc::new(TerminalPrompter),
        })
    }
}
