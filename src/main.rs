//! `turing-setup` binary entry point.
use anyhow::{Context as _, Result};
use clap::Parser;

use turing_setup::cli::{Cli, Command};
use turing_setup::commands;
use turing_setup::logging;
use turing_setup::tasks::Context;

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();

    if args.command == Command::Version {
        commands::version::run();
        return Ok(());
    }

    logging::init_subscriber(args.verbose, args.command.log_name());
    let root = std::env::current_dir().context("cannot read the current directory")?;
    let ctx = Context::for_host(&root, args.command.log_name())?;

    match args.command {
        Command::Install => commands::install::run(&ctx),
        Command::Uninstall => commands::uninstall::run(&ctx),
        Command::Version => Ok(()),
    }
}
