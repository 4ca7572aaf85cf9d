//! Structured logger and run outcome reporter.
use std::path::PathBuf;
use std::sync::Mutex;

use super::subscriber::STAGE_TARGET;
use super::types::{StepEntry, StepStatus};
use super::utils::log_file_path;

/// Structured logger that also accumulates the run's outcome records.
///
/// Messages go through [`tracing`]; the subscriber installed by
/// [`init_subscriber`](super::init_subscriber) mirrors every event to
/// `$XDG_CACHE_HOME/turing-setup/<command>.log`. Step records and follow-up
/// actions live only for the run and are rendered by
/// [`print_summary`](Self::print_summary).
#[derive(Debug, Default)]
pub struct Logger {
    steps: Mutex<Vec<StepEntry>>,
    follow_ups: Mutex<Vec<String>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a logger that reports `log_file` in the summary.
    ///
    /// The file itself is written by the subscriber, not by this type.
    #[must_use]
    pub fn new(log_file: Option<PathBuf>) -> Self {
        Self {
            log_file,
            ..Self::default()
        }
    }

    /// Logger for `command`, pointing at its log file under the cache directory.
    #[must_use]
    pub fn for_command(command: &str) -> Self {
        Self::new(log_file_path(command))
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Record a step result for the summary.
    pub fn record_step(&self, name: &str, status: StepStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.steps.lock() {
            guard.push(StepEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Add a manual action for the operator. Duplicates are ignored;
    /// order of first mention is kept.
    pub fn follow_up(&self, action: &str) {
        if let Ok(mut guard) = self.follow_ups.lock()
            && !guard.iter().any(|a| a == action)
        {
            guard.push(action.to_string());
        }
    }

    /// All recorded steps, in order.
    #[must_use]
    pub fn steps(&self) -> Vec<StepEntry> {
        self.steps.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// All follow-up actions, in order.
    #[must_use]
    pub fn follow_ups(&self) -> Vec<String> {
        self.follow_ups.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Number of steps with `status`.
    #[must_use]
    pub fn count(&self, status: StepStatus) -> usize {
        self.steps
            .lock()
            .map_or(0, |g| g.iter().filter(|s| s.status == status).count())
    }

    /// Whether any step aborted the run.
    #[must_use]
    pub fn has_fatal(&self) -> bool {
        self.count(StepStatus::Fatal) > 0
    }

    fn step_line(entry: &StepEntry) -> String {
        let suffix = entry
            .message
            .as_ref()
            .map_or_else(String::new, |msg| format!(" ({msg})"));
        format!("{} {}{suffix}", entry.status.icon(), entry.name)
    }

    fn totals_line(&self) -> String {
        let steps = self.steps();
        format!(
            "{} steps: {} applied, {} unchanged, {} warnings, {} fatal, {} cancelled",
            steps.len(),
            self.count(StepStatus::Ok),
            self.count(StepStatus::Unchanged),
            self.count(StepStatus::Warn),
            self.count(StepStatus::Fatal),
            self.count(StepStatus::Cancelled),
        )
    }

    /// Non-empty status groups in summary order, steps in record order.
    fn groups(&self) -> Vec<(StepStatus, Vec<StepEntry>)> {
        let steps = self.steps();
        let mut groups = Vec::new();
        for status in StepStatus::ALL {
            let group: Vec<StepEntry> = steps
                .iter()
                .filter(|s| s.status == status)
                .cloned()
                .collect();
            if !group.is_empty() {
                groups.push((status, group));
            }
        }
        groups
    }

    /// Plain-text summary: totals, steps grouped under one heading per
    /// status, then follow-ups.
    ///
    /// Headings start at column zero; entries are indented by two spaces.
    #[must_use]
    pub fn render_summary(&self) -> String {
        let mut lines = vec![self.totals_line()];
        for (status, group) in self.groups() {
            lines.push(format!("{}:", status.heading()));
            lines.extend(group.iter().map(|s| format!("  {}", Self::step_line(s))));
        }
        let follow_ups = self.follow_ups();
        if !follow_ups.is_empty() {
            lines.push("Follow-up:".to_string());
            lines.extend(follow_ups.iter().map(|a| format!("  - {a}")));
        }
        lines.join("\n")
    }

    /// Print [`render_summary`](Self::render_summary) to the console, headings
    /// in bold, followed by the log file path.
    #[allow(clippy::print_stdout)]
    pub fn print_summary(&self) {
        if self.steps().is_empty() {
            return;
        }

        println!();
        self.stage("Summary");
        for line in self.render_summary().lines() {
            if line.starts_with(' ') {
                self.info(line);
            } else {
                self.info(&format!("\x1b[1m{line}\x1b[0m"));
            }
        }

        if let Some(path) = &self.log_file {
            self.info(&format!("\x1b[2mlog: {}\x1b[0m", path.display()));
        }
    }
}
