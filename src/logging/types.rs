//! Outcome record types.

/// One step's outcome, as shown in the run summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepEntry {
    /// Human-readable step name.
    pub name: String,
    /// Final status of the step.
    pub status: StepStatus,
    /// Optional detail (warning text, no-op reason, cancellation).
    pub message: Option<String>,
}

/// Status of a completed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// Step changed the host.
    Ok,
    /// Step found everything already in place and did nothing.
    Unchanged,
    /// Step completed partially or an optional part failed; the run continued.
    Warn,
    /// Step failed and aborted the run.
    Fatal,
    /// The operator declined the step's confirmation.
    Cancelled,
}

impl StepStatus {
    /// Every status, in summary order.
    pub const ALL: [Self; 5] = [
        Self::Ok,
        Self::Unchanged,
        Self::Warn,
        Self::Fatal,
        Self::Cancelled,
    ];

    /// Summary marker for this status.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Ok => "✓",
            Self::Unchanged => "=",
            Self::Warn => "!",
            Self::Fatal => "✗",
            Self::Cancelled => "○",
        }
    }

    /// Heading of this status's group in the summary.
    #[must_use]
    pub const fn heading(self) -> &'static str {
        match self {
            Self::Ok => "Applied",
            Self::Unchanged => "Unchanged",
            Self::Warn => "Warnings",
            Self::Fatal => "Fatal",
            Self::Cancelled => "Cancelled",
        }
    }
}
