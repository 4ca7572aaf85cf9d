//! Command-line interface definitions.
use clap::{Parser, Subcommand};

/// Installs and removes the Turing Smart Screen integration.
///
/// Run from the root of the turing-smart-screen-python checkout.
#[derive(Parser, Debug)]
#[command(
    name = "turing-setup",
    about = "Install the Turing Smart Screen service, device rule and desktop entries",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Install the display service and desktop integration
    Install,
    /// Remove everything install created
    Uninstall,
    /// Print version information
    Version,
}

impl Command {
    /// Name used for the persistent log file.
    #[must_use]
    pub const fn log_name(self) -> &'static str {
        match self {
            Self::Install => "install",
            Self::Uninstall => "uninstall",
            Self::Version => "version",
        }
    }
}
