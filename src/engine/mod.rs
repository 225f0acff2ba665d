//! Package operations: install, uninstall, and package discovery.
//!
//! Every operation takes a [`Context`] carrying the loaded [`Config`], the
//! run-wide [`Options`], and the logger. Nothing here reads global state.
mod walk;

use std::fmt;
use std::path::{Component, Path};
use std::sync::Arc;

use crate::config::Config;
use crate::error::{Result, StowError};
use crate::logging::Log;
use crate::resources::helpers::fs::sorted_children;

use self::walk::Walker;

/// Direction of a package operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    /// Project the package onto the relative base.
    Install,
    /// Remove exactly the links an install would have created.
    Uninstall,
}

impl Verb {
    /// Lower-case name used in log messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Install => "install",
            Self::Uninstall => "uninstall",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Run-wide policy flags, fixed for the whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    /// Log every mutation instead of performing it.
    pub dry_run: bool,
    /// Move blocking destinations aside to `<name>.bak` before linking.
    pub shove: bool,
    /// Downgrade conflicts to logged errors and keep walking.
    pub ignore_errors: bool,
}

/// Everything a package operation needs.
pub struct Context {
    /// Roots and rules for this run.
    pub config: Config,
    /// Policy flags.
    pub options: Options,
    /// Logger for output and package recording.
    pub log: Arc<dyn Log>,
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("config", &self.config)
            .field("options", &self.options)
            .field("log", &"<dyn Log>")
            .finish()
    }
}

impl Context {
    /// Creates a new engine context.
    #[must_use]
    pub const fn new(config: Config, options: Options, log: Arc<dyn Log>) -> Self {
        Self {
            config,
            options,
            log,
        }
    }
}

/// What one package operation did.
///
/// In dry-run mode the counts describe what would have been done.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PackageReport {
    /// The package root itself is excluded by the rules file.
    pub skipped: bool,
    /// Links created.
    pub linked: usize,
    /// Links removed.
    pub unlinked: usize,
    /// Blockers moved aside by shove mode.
    pub shoved: usize,
    /// Ensure-present directories created.
    pub dirs_created: usize,
    /// Destinations that already link to the package.
    pub already_correct: usize,
    /// Source entries skipped by the rules file.
    pub ignored: usize,
    /// Conflicts downgraded to errors by the ignore-errors policy.
    pub conflicts: usize,
}

impl PackageReport {
    /// Whether any conflict was downgraded while processing the package.
    #[must_use]
    pub const fn has_conflicts(&self) -> bool {
        self.conflicts > 0
    }
}

impl fmt::Display for PackageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} linked, {} unlinked, {} shoved, {} dirs created, {} already correct, {} ignored, {} conflicts",
            self.linked,
            self.unlinked,
            self.shoved,
            self.dirs_created,
            self.already_correct,
            self.ignored,
            self.conflicts,
        )
    }
}

/// Install or uninstall the package called `name`.
///
/// # Errors
///
/// Returns [`StowError::PackageNotFound`] if `name` is not a single
/// directory entry of the container or the package has no directory, the
/// first conflict unless errors are ignored, and any filesystem failure.
pub fn operate_package(ctx: &Context, name: &str, verb: Verb) -> Result<PackageReport> {
    let root = ctx.config.package_path(name);
    if !is_package_name(name) || !root.is_dir() {
        return Err(StowError::PackageNotFound { path: root });
    }

    if ctx.config.rules.is_ignored(&root) {
        ctx.log.info(&format!("skipping ignored package {name}"));
        return Ok(PackageReport {
            skipped: true,
            ..PackageReport::default()
        });
    }

    ctx.log.debug(&format!(
        "{verb} {} -> {}",
        root.display(),
        ctx.config.relative_base.display()
    ));

    let mut walker = Walker::new(ctx, &root, verb);
    for child in sorted_children(&root)? {
        walker.visit(&child)?;
    }
    let report = walker.into_report();
    ctx.log.debug(&format!("{name}: {report}"));
    Ok(report)
}

/// A package name is exactly one normal path component: no separators,
/// no `.` or `..`, not empty.
fn is_package_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(std::path::is_separator)
}

/// Link every entry of package `name` into the relative base.
///
/// # Errors
///
/// See [`operate_package`].
pub fn install_package(ctx: &Context, name: &str) -> Result<PackageReport> {
    operate_package(ctx, name, Verb::Install)
}

/// Remove the links package `name` would have created.
///
/// # Errors
///
/// See [`operate_package`].
pub fn uninstall_package(ctx: &Context, name: &str) -> Result<PackageReport> {
    operate_package(ctx, name, Verb::Uninstall)
}

/// Names of all package directories in the container, sorted, excluding
/// those whose resolved path is ignored.
///
/// Directories whose names are not valid UTF-8 cannot be named on the
/// command line; they are reported through `log` and left out.
///
/// # Errors
///
/// Returns an error if the container cannot be read.
pub fn list_available_packages(config: &Config, log: &dyn Log) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for path in sorted_children(&config.dotfiles_dir)? {
        if !path.is_dir() || config.rules.is_ignored(&path) {
            continue;
        }
        match path.file_name().and_then(|name| name.to_str()) {
            Some(name) => names.push(name.to_string()),
            None => log.warn(&format!(
                "skipping package with non UTF-8 name: {}",
                path.display()
            )),
        }
    }
    Ok(names)
}
