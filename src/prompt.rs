//! Interactive prompting capability.
//!
//! The confirmation gate never reads the terminal directly; it asks a
//! [`Prompter`], which tests replace with scripted answers.
use anyhow::{Context as _, Result};

/// Blocking operator prompts.
#[cfg_attr(test, mockall::automock)]
pub trait Prompter {
    /// Ask a yes/no question. Anything other than an explicit yes is `false`.
    ///
    /// # Errors
    ///
    /// Returns an error if the answer cannot be read.
    fn confirm(&self, prompt: &str) -> Result<bool>;

    /// Ask for a line of free text, returned exactly as typed.
    ///
    /// # Errors
    ///
    /// Returns an error if the answer cannot be read.
    fn input(&self, prompt: &str) -> Result<String>;
}

/// [`Prompter`] reading from the controlling terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .context("failed to read confirmation")
    }

    fn input(&self, prompt: &str) -> Result<String> {
        dialoguer::Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .context("failed to read input")
    }
}
