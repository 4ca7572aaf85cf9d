//! Error taxonomy for the provisioning engine.
//!
//! Library code returns these typed errors (wrapped in [`anyhow::Error`] where
//! convenient); the step runner in [`crate::tasks`] downcasts them to decide
//! whether a run aborts, continues with a warning, or records a cancellation.
//!
//! # Propagation
//!
//! ```text
//! SetupError
//! ├── FatalPrerequisite          : abort before any mutation
//! ├── FatalMandatoryResource     : abort; a mandatory resource could not be provisioned
//! ├── RecoverableResourceWarning : record and continue
//! └── UserCancelled              : local to the gated action, never an error exit
//! ```

use thiserror::Error;

/// Classified failure of a provisioning step.
#[derive(Error, Debug)]
pub enum SetupError {
    /// The host is not ready; nothing has been changed yet.
    #[error("{check}: {message}")]
    FatalPrerequisite {
        /// Name of the failed check (e.g. `"runtime"`).
        check: String,
        /// What is wrong.
        message: String,
        /// Corrective instruction shown to the operator.
        hint: String,
    },

    /// A resource the installation cannot work without failed to provision.
    #[error("{resource}: {message}")]
    FatalMandatoryResource {
        /// Human-readable resource name.
        resource: String,
        /// What went wrong.
        message: String,
        /// Exact command or instruction to resolve the failure, if any.
        remedy: Option<String>,
    },

    /// An optional resource, reload, or dependency failed; the run continues.
    #[error("{resource}: {message}")]
    RecoverableResourceWarning {
        /// Human-readable resource name.
        resource: String,
        /// What went wrong.
        message: String,
        /// Exact command or instruction to resolve the failure, if any.
        remedy: Option<String>,
    },

    /// The operator declined a confirmation gate.
    #[error("{action}: cancelled")]
    UserCancelled {
        /// The action that was not performed.
        action: String,
    },
}

impl SetupError {
    /// Build a [`SetupError::FatalPrerequisite`].
    pub fn prerequisite(
        check: impl Into<String>,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) -> Self {
        Self::FatalPrerequisite {
            check: check.into(),
            message: message.into(),
            hint: hint.into(),
        }
    }

    /// Build a [`SetupError::FatalMandatoryResource`].
    pub fn mandatory(
        resource: impl Into<String>,
        message: impl Into<String>,
        remedy: Option<String>,
    ) -> Self {
        Self::FatalMandatoryResource {
            resource: resource.into(),
            message: message.into(),
            remedy,
        }
    }

    /// Build a [`SetupError::RecoverableResourceWarning`].
    pub fn warning(
        resource: impl Into<String>,
        message: impl Into<String>,
        remedy: Option<String>,
    ) -> Self {
        Self::RecoverableResourceWarning {
            resource: resource.into(),
            message: message.into(),
            remedy,
        }
    }

    /// Build a [`SetupError::UserCancelled`].
    pub fn cancelled(action: impl Into<String>) -> Self {
        Self::UserCancelled {
            action: action.into(),
        }
    }

    /// Whether this error aborts the whole run.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::FatalPrerequisite { .. } | Self::FatalMandatoryResource { .. }
        )
    }

    /// Corrective instruction attached to the error, if any.
    #[must_use]
    pub fn remedy(&self) -> Option<&str> {
        match self {
            Self::FatalPrerequisite { hint, .. } => Some(hint),
            Self::FatalMandatoryResource { remedy, .. }
            | Self::RecoverableResourceWarning { remedy, .. } => remedy.as_deref(),
            Self::UserCancelled { .. } => None,
        }
    }
}

/// Errors raised while rendering a resource template.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// A known placeholder appears in the template but no value was supplied.
    #[error("unresolved placeholder {token}")]
    Unresolved {
        /// The literal token, e.g. `@TARGET_DIR@`.
        token: String,
    },

    /// The template uses a placeholder outside the supported set.
    #[error("unknown placeholder {token}")]
    UnknownPlaceholder {
        /// The literal token as found in the template.
        token: String,
    },
}
