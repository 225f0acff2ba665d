//! Idempotent resource primitives (check + apply pattern).
pub mod directory;
pub mod helpers;
pub mod symlink;

use crate::error::Result;

/// Minimal interface for resources that can be described, applied, and removed.
pub trait Applicable {
    /// Human-readable description of this resource.
    fn description(&self) -> String;

    /// Bring the resource into its desired state.
    ///
    /// Callers check [`Resource::current_state`] first; `apply` assumes the
    /// resource is [`ResourceState::Missing`] and does not clear blockers.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying filesystem operation fails.
    fn apply(&self) -> Result<ResourceChange>;

    /// Remove the resource, undoing a previous `apply()`.
    ///
    /// Default implementation reports the resource as skipped: not every
    /// resource is ever removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource cannot be removed.
    fn remove(&self) -> Result<ResourceChange> {
        Ok(ResourceChange::Skipped {
            reason: format!("'{}' is never removed", self.description()),
        })
    }
}

/// State of a resource on disk.
///
/// # Examples
///
/// ```
/// use stow_cli::resources::ResourceState;
///
/// let missing = ResourceState::Missing;
/// let correct = ResourceState::Correct;
/// let wrong = ResourceState::Incorrect { current: "points to /other/path".into() };
/// let special = ResourceState::Invalid { reason: "character device".into() };
///
/// assert_ne!(missing, correct);
/// assert_eq!(correct, ResourceState::Correct);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState {
    /// Nothing occupies the resource's path.
    Missing,
    /// The resource exists and matches the desired state.
    Correct,
    /// A file, directory, or symlink occupies the path but is not the desired resource.
    Incorrect {
        /// Description of what currently occupies the path.
        current: String,
    },
    /// Something that is neither file, directory, nor symlink occupies the path.
    Invalid {
        /// Description of the blocker.
        reason: String,
    },
}

/// Result of applying a resource change.
///
/// # Examples
///
/// ```
/// use stow_cli::resources::ResourceChange;
///
/// let applied = ResourceChange::Applied;
/// let skipped = ResourceChange::Skipped { reason: "nothing to remove".into() };
///
/// assert_eq!(applied, ResourceChange::Applied);
/// assert_ne!(applied, skipped);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceChange {
    /// Resource was created or removed.
    Applied,
    /// Resource was left alone.
    Skipped {
        /// Reason why the resource was skipped.
        reason: String,
    },
}

/// Unified interface for resources that can be checked and applied.
pub trait Resource: Applicable {
    /// Check the current state of the resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be determined.
    fn current_state(&self) -> Result<ResourceState>;
}
