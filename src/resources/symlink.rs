//! Package link resource: one relative symlink from the destination tree into a package.
use std::fs;
use std::path::{Path, PathBuf};

use super::helpers::fs::{create_symlink, entry_exists, is_symlink, normalize, resolve, with_suffix};
use super::helpers::path::relative_link_target;
use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::error::{Result, StowError};

/// Suffix appended to a blocker's path when shove mode moves it aside.
pub const BACKUP_SUFFIX: &str = ".bak";

/// A symlink at `destination` whose payload leads back to `source`.
#[derive(Debug, Clone)]
pub struct PackageLink {
    /// The file or directory inside the package (what the link points to).
    pub source: PathBuf,
    /// Where the link lives in the destination tree.
    pub destination: PathBuf,
}

impl PackageLink {
    /// Create a new package link resource.
    #[must_use]
    pub const fn new(source: PathBuf, destination: PathBuf) -> Self {
        Self {
            source,
            destination,
        }
    }

    /// The relative payload written into the link.
    ///
    /// The destination's parent is resolved, since that is the directory the
    /// kernel starts from and the `..` segments climb real directories. The
    /// source is only normalized: the payload names the entry inside the
    /// package through the container path as given, so an aliased container
    /// or a symlink inside the package stays part of the link.
    #[must_use]
    pub fn payload(&self) -> PathBuf {
        let anchored = match (self.destination.parent(), self.destination.file_name()) {
            (Some(parent), Some(name)) => resolve(parent).join(name),
            _ => resolve(&self.destination),
        };
        relative_link_target(&normalize(&self.source), &anchored)
    }

    /// Where shove mode moves an existing blocker.
    #[must_use]
    pub fn backup_path(&self) -> PathBuf {
        with_suffix(&self.destination, BACKUP_SUFFIX)
    }

    /// Conflict for a destination that resolves into the package without
    /// being a link itself, i.e. it is reached through a linked ancestor.
    #[must_use]
    pub fn not_a_link(&self) -> StowError {
        StowError::conflict(
            &self.destination,
            "destination resolves into the package but is not a symlink",
        )
    }

    /// Rename whatever occupies the destination to `backup`.
    ///
    /// # Errors
    ///
    /// Returns [`StowError::BackupCollision`] if `backup` is occupied, or an
    /// I/O error if the rename fails.
    pub fn move_aside(&self, backup: &Path) -> Result<()> {
        if entry_exists(backup) {
            return Err(StowError::BackupCollision {
                destination: self.destination.clone(),
                backup: backup.to_path_buf(),
            });
        }
        fs::rename(&self.destination, backup)
            .map_err(|e| StowError::io("move aside", &self.destination, e))
    }
}

impl Applicable for PackageLink {
    fn description(&self) -> String {
        format!("{} -> {}", self.destination.display(), self.source.display())
    }

    fn apply(&self) -> Result<ResourceChange> {
        create_symlink(&self.payload(), &self.destination).map_err(|e| {
            if e.kind() == std::io::ErrorKind::Unsupported {
                StowError::Unsupported
            } else {
                StowError::io("create link", &self.destination, e)
            }
        })?;
        Ok(ResourceChange::Applied)
    }

    fn remove(&self) -> Result<ResourceChange> {
        if !entry_exists(&self.destination) {
            return Ok(ResourceChange::Skipped {
                reason: "nothing to remove".to_string(),
            });
        }
        if !is_symlink(&self.destination) {
            return Err(self.not_a_link());
        }
        fs::remove_file(&self.destination)
            .map_err(|e| StowError::io("remove link", &self.destination, e))?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for PackageLink {
    fn current_state(&self) -> Result<ResourceState> {
        let Ok(meta) = self.destination.symlink_metadata() else {
            return Ok(ResourceState::Missing);
        };

        if resolve(&self.destination) == resolve(&self.source) {
            return Ok(ResourceState::Correct);
        }

        let file_type = meta.file_type();
        if file_type.is_symlink() {
            let current = fs::read_link(&self.destination)
                .map_err(|e| StowError::io("read link", &self.destination, e))?;
            Ok(ResourceState::Incorrect {
                current: format!("links to {}", current.display()),
            })
        } else if file_type.is_file() {
            Ok(ResourceState::Incorrect {
                current: "regular file".to_string(),
            })
        } else if file_type.is_dir() {
            Ok(ResourceState::Incorrect {
                current: "directory".to_string(),
            })
        } else {
            Ok(ResourceState::Invalid {
                reason: "not a file, directory or symlink".to_string(),
            })
        }
    }
}
