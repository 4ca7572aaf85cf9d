//! Confirmation gate for irreversible actions.
use crate::error::SetupError;
use crate::prompt::Prompter;

/// Outcome of a confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The operator confirmed.
    Proceed,
    /// The operator declined or mistyped the confirmation.
    Cancelled,
}

impl Decision {
    /// Map a cancellation onto [`SetupError::UserCancelled`] for `action`.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::UserCancelled`] when the decision is [`Decision::Cancelled`].
    pub fn into_result(self, action: &str) -> Result<(), SetupError> {
        match self {
            Self::Proceed => Ok(()),
            Self::Cancelled => Err(SetupError::cancelled(action)),
        }
    }
}

/// Ask a yes/no question. Unreadable input counts as "no".
pub fn confirm(prompter: &dyn Prompter, prompt: &str) -> Decision {
    match prompter.confirm(prompt) {
        Ok(true) => Decision::Proceed,
        Ok(false) => Decision::Cancelled,
        Err(e) => {
            tracing::debug!("confirmation not read: {e:#}");
            Decision::Cancelled
        }
    }
}

/// Ask for `expected` to be typed exactly (case-sensitive, no trimming).
pub fn confirm_exact(prompter: &dyn Prompter, prompt: &str, expected: &str) -> Decision {
    match prompter.input(prompt) {
        Ok(answer) if answer == expected => Decision::Proceed,
        Ok(_) => Decision::Cancelled,
        Err(e) => {
            tracing::debug!("confirmation not read: {e:#}");
            Decision::Cancelled
        }
    }
}

/// Two-step gate: a yes/no, then the exact confirmation word.
///
/// The word is only asked for after a "yes".
pub fn confirm_destructive(
    prompter: &dyn Prompter,
    question: &str,
    expected: &str,
) -> Decision {
    if confirm(prompter, question) == Decision::Cancelled {
        return Decision::Cancelled;
    }
    confirm_exact(prompter, &format!("Type {expected} to confirm"), expected)
}
