//! Command-line interface definition.
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Top-level CLI entry point for the symlink farm manager.
#[derive(Parser, Debug)]
#[command(
    name = "stow",
    about = "Declarative, idempotent symlink farm manager for dotfiles",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Preview changes without applying
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Move conflicting destinations aside to `<name>.bak`
    #[arg(short, long, global = true)]
    pub shove: bool,

    /// Log conflicts as errors and keep going
    #[arg(short, long, global = true)]
    pub ignore_errors: bool,

    /// Destination root for links [default: home directory]
    #[arg(short, long, global = true, value_name = "PATH")]
    pub relative_base: Option<PathBuf>,

    /// Package container [default: $STOW_DOTFILES_DIR, else ~/.dotfiles]
    #[arg(long, global = true, value_name = "PATH")]
    pub dotfiles_dir: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Link packages into the relative base
    Install(PackageOpts),
    /// Remove the links packages would have created
    Uninstall(PackageOpts),
    /// List available packages
    List,
    /// Print a shell completion script
    Completions(CompletionsOpts),
    /// Print version information
    Version,
}

impl Command {
    /// Name used for the per-command log file.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Install(_) => "install",
            Self::Uninstall(_) => "uninstall",
            Self::List => "list",
            Self::Completions(_) => "completions",
            Self::Version => "version",
        }
    }
}

/// Options for the `install` and `uninstall` subcommands.
#[derive(Parser, Debug, Clone)]
pub struct PackageOpts {
    /// Package names, or `all` for every available package
    #[arg(required = true, value_name = "PACKAGE")]
    pub packages: Vec<String>,
}

/// Options for the `completions` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct CompletionsOpts {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
