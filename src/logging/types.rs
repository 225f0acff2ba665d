//! Core logging types: package entries, status, and the [`Log`] trait.

/// Per-package result for summary reporting.
#[derive(Debug, Clone)]
pub struct PackageEntry {
    /// Package name.
    pub name: String,
    /// Final status of the package.
    pub status: PackageStatus,
    /// Optional detail message (e.g., skip reason or error description).
    pub message: Option<String>,
}

/// Status of a processed package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageStatus {
    /// Package was processed without conflicts.
    Ok,
    /// Package was skipped because the rules file excludes it.
    Skipped,
    /// Package was previewed in dry-run mode; no changes were applied.
    DryRun,
    /// Package hit at least one conflict or a fatal error.
    Failed,
}

/// Abstraction over logging backends.
///
/// The engine logs through this trait so tests and alternative front ends
/// can supply their own sink.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (never shown on the console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log an action that dry-run mode suppressed.
    fn dry_run(&self, msg: &str);
    /// Record a package result for the summary.
    fn record_package(&self, name: &str, status: PackageStatus, message: Option<&str>);
}
