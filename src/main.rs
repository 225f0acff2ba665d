//! `stow` binary entry point.
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use stow_cli::cli::{Cli, Command};
use stow_cli::commands;
use stow_cli::logging::{self, Logger};

/// Install the tracing subscriber and create the run logger for `command`.
fn start_logging(verbose: bool, command: &str) -> Arc<Logger> {
    logging::init_subscriber(verbose, command);
    Arc::new(Logger::new(command))
}

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();
    let name = args.command.name();

    match &args.command {
        Command::Install(opts) => {
            let log = start_logging(args.verbose, name);
            commands::install::run(&args.global, opts, &log)
        }
        Command::Uninstall(opts) => {
            let log = start_logging(args.verbose, name);
            commands::uninstall::run(&args.global, opts, &log)
        }
        Command::List => {
            let log = start_logging(args.verbose, name);
            commands::list::run(&args.global, &log)
        }
        Command::Completions(opts) => {
            commands::completions::run(opts.shell);
            Ok(())
        }
        Command::Version => {
            commands::version::run();
            Ok(())
        }
    }
}
