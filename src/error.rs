//! Domain-specific error types for the stow engine.
//!
//! Internal modules return [`StowError`] through the crate-wide [`Result`]
//! alias, while command handlers at the CLI boundary convert it to
//! [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error taxonomy
//!
//! ```text
//! StowError
//! ├── PackageNotFound  — always fatal
//! ├── Conflict         — fatal unless errors are ignored
//! ├── BackupCollision  — a conflict outcome of shove mode
//! ├── PartialShove     — blocker moved aside but link creation failed
//! ├── Io               — any other filesystem failure
//! ├── RulesFile        — rules file present but unreadable
//! ├── HomeNotFound     — no home directory to derive defaults from
//! └── Unsupported      — symlinks unavailable on this platform
//! ```

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T, E = StowError> = std::result::Result<T, E>;

/// Errors raised while loading rules or operating on packages.
#[derive(Error, Debug)]
pub enum StowError {
    /// The requested package has no directory in the dotfiles container.
    #[error("dotfiles package not found: {}", path.display())]
    PackageNotFound {
        /// Path where the package directory was expected.
        path: PathBuf,
    },

    /// The destination holds content this package does not manage.
    #[error("{detail}: {}", destination.display())]
    Conflict {
        /// Destination path that blocked the operation.
        destination: PathBuf,
        /// Human-readable description of the blocker.
        detail: String,
    },

    /// Shove mode could not move the blocker aside because the backup path is taken.
    #[error("cannot shove destination out of the way: {} exists", backup.display())]
    BackupCollision {
        /// Destination that should have been moved aside.
        destination: PathBuf,
        /// Occupied backup path.
        backup: PathBuf,
    },

    /// The blocker was renamed to its backup path but the link could not be created.
    #[error(
        "moved {} to {} but could not create the link: {source}",
        destination.display(),
        backup.display()
    )]
    PartialShove {
        /// Destination that is now empty.
        destination: PathBuf,
        /// Where the original content now lives.
        backup: PathBuf,
        /// Underlying I/O error from link creation.
        source: io::Error,
    },

    /// A filesystem operation failed.
    #[error("{action} {}: {source}", path.display())]
    Io {
        /// Short description of the attempted action (e.g. `"create link"`).
        action: &'static str,
        /// Path the action was applied to.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The rules file exists but could not be read.
    #[error("cannot read rules file {}: {source}", path.display())]
    RulesFile {
        /// Path of the rules file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The home directory could not be determined.
    #[error("cannot determine home directory; pass --relative-base and --dotfiles-dir")]
    HomeNotFound,

    /// Symbolic links are not supported on this platform.
    #[error("symbolic links are not supported on this platform")]
    Unsupported,
}

impl StowError {
    /// Build an [`StowError::Io`] from an action, path, and source error.
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }

    /// Build a [`StowError::Conflict`] for `destination`.
    pub fn conflict(destination: impl Into<PathBuf>, detail: impl Into<String>) -> Self {
        Self::Conflict {
            destination: destination.into(),
            detail: detail.into(),
        }
    }

    /// Whether the error is a conflict outcome that the ignore-errors policy may downgrade.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. } | Self::BackupCollision { .. })
    }
}
