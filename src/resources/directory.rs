//! Ensure-present directory resource.
use std::fs;
use std::path::PathBuf;

use super::helpers::fs::entry_exists;
use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::error::{Result, StowError};

/// A real directory that must exist at `path`.
///
/// Removal is deliberately not supported: these directories are shared
/// mount points whose children belong to many packages.
#[derive(Debug, Clone)]
pub struct EnsureDirectory {
    /// Destination directory to create when absent.
    pub path: PathBuf,
}

impl EnsureDirectory {
    /// Create a new directory resource.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Applicable for EnsureDirectory {
    fn description(&self) -> String {
        self.path.display().to_string()
    }

    fn apply(&self) -> Result<ResourceChange> {
        fs::create_dir_all(&self.path)
            .map_err(|e| StowError::io("create directory", &self.path, e))?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for EnsureDirectory {
    fn current_state(&self) -> Result<ResourceState> {
        if self.path.is_dir() {
            Ok(ResourceState::Correct)
        } else if entry_exists(&self.path) {
            Ok(ResourceState::Incorrect {
                current: "exists but is not a directory".to_string(),
            })
        } else {
            Ok(ResourceState::Missing)
        }
    }
}
