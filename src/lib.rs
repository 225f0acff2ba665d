//! Declarative, idempotent symlink farm manager.
//!
//! Projects "package" directories from a dotfiles container onto a
//! destination root (normally the home directory) with relative symbolic
//! links, and removes exactly those links again on uninstall.
//!
//! The public API is organised into layers:
//!
//! - **[`config`]** — container and destination roots, `.stowignore` rules
//! - **[`resources`]** — idempotent `check + apply` primitives (links, directories)
//! - **[`engine`]** — the per-package tree walk and conflict policy
//! - **[`commands`]** — top-level subcommand orchestration (`install`, `uninstall`, `list`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod resources;
