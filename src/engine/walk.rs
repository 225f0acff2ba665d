//! Recursive package walk and the per-node link decisions.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{Context, PackageReport, Verb};
use crate::error::{Result, StowError};
use crate::resources::directory::EnsureDirectory;
use crate::resources::helpers::fs::{entry_exists, is_symlink, sorted_children};
use crate::resources::symlink::PackageLink;
use crate::resources::{Applicable as _, Resource as _, ResourceState};

/// Kind of a source entry, following symlinks inside the package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    File,
    Directory,
    Other,
}

impl EntryKind {
    fn of(source: &Path) -> Result<Self> {
        match fs::metadata(source) {
            Ok(meta) if meta.is_file() => Ok(Self::File),
            Ok(meta) if meta.is_dir() => Ok(Self::Directory),
            Ok(_) => Ok(Self::Other),
            // Dangling link inside the package.
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::Other),
            Err(e) => Err(StowError::io("inspect", source, e)),
        }
    }
}

/// Depth-first walker over one package, accumulating a [`PackageReport`].
pub(super) struct Walker<'a> {
    ctx: &'a Context,
    root: &'a Path,
    verb: Verb,
    report: PackageReport,
}

impl<'a> Walker<'a> {
    pub(super) fn new(ctx: &'a Context, root: &'a Path, verb: Verb) -> Self {
        Self {
            ctx,
            root,
            verb,
            report: PackageReport::default(),
        }
    }

    pub(super) const fn into_report(self) -> PackageReport {
        self.report
    }

    const fn dry_run(&self) -> bool {
        self.ctx.options.dry_run
    }

    /// `relative_base / (source relative to the package root)`.
    fn destination_for(&self, source: &Path) -> PathBuf {
        let relative = source.strip_prefix(self.root).unwrap_or(source);
        self.ctx.config.relative_base.join(relative)
    }

    /// Log a mutation, at dry-run level when it will not be performed.
    fn announce(&self, msg: &str) {
        if self.dry_run() {
            self.ctx.log.dry_run(msg);
        } else {
            self.ctx.log.info(msg);
        }
    }

    /// Apply the ignore-errors policy to a conflict.
    fn signal(&mut self, err: StowError) -> Result<()> {
        if self.ctx.options.ignore_errors && err.is_conflict() {
            self.ctx.log.error(&err.to_string());
            self.report.conflicts += 1;
            Ok(())
        } else {
            Err(err)
        }
    }

    /// Process one source entry and, for ensure-present directories, its children.
    pub(super) fn visit(&mut self, source: &Path) -> Result<()> {
        if self.ctx.config.rules.is_ignored(source) {
            self.ctx
                .log
                .info(&format!("skipping ignored {}", source.display()));
            self.report.ignored += 1;
            return Ok(());
        }

        let destination = self.destination_for(source);
        match EntryKind::of(source)? {
            EntryKind::Directory if self.ctx.config.rules.is_ensure_present(&destination) => {
                self.descend(source, &destination)
            }
            EntryKind::File | EntryKind::Directory => {
                let link = PackageLink::new(source.to_path_buf(), destination);
                self.ctx.log.debug(&link.description());
                match self.verb {
                    Verb::Install => self.install_link(&link),
                    Verb::Uninstall => self.uninstall_link(&link),
                }
            }
            EntryKind::Other => {
                self.ctx.log.warn(&format!(
                    "skipping {}: not a regular file or directory",
                    source.display()
                ));
                Ok(())
            }
        }
    }

    /// Materialize an ensure-present directory (install only) and recurse.
    fn descend(&mut self, source: &Path, destination: &Path) -> Result<()> {
        if self.verb == Verb::Install {
            let dir = EnsureDirectory::new(destination.to_path_buf());
            self.ctx.log.debug(&format!("ensure {}", dir.description()));
            match dir.current_state()? {
                ResourceState::Correct => {}
                ResourceState::Missing => {
                    self.announce(&format!("mkdir -p {}", destination.display()));
                    if !self.dry_run() {
                        dir.apply()?;
                    }
                    self.report.dirs_created += 1;
                }
                ResourceState::Incorrect { current: detail }
                | ResourceState::Invalid { reason: detail } => {
                    return self.signal(StowError::conflict(destination, detail));
                }
            }
        }

        for child in sorted_children(source)? {
            self.visit(&child)?;
        }
        Ok(())
    }

    fn install_link(&mut self, link: &PackageLink) -> Result<()> {
        match link.current_state()? {
            ResourceState::Missing => {
                self.create(link)?;
                self.report.linked += 1;
                Ok(())
            }
            ResourceState::Correct => {
                self.ctx.log.warn(&format!(
                    "skipping already managed destination {}",
                    link.destination.display()
                ));
                self.report.already_correct += 1;
                Ok(())
            }
            ResourceState::Incorrect { current } if self.ctx.options.shove => {
                self.shove(link, &current)
            }
            ResourceState::Incorrect { current } => self.signal(StowError::conflict(
                &link.destination,
                format!("destination already exists ({current})"),
            )),
            ResourceState::Invalid { reason } => self.signal(StowError::conflict(
                &link.destination,
                format!("destination cannot be replaced ({reason})"),
            )),
        }
    }

    fn create(&self, link: &PackageLink) -> Result<()> {
        self.announce(&format!(
            "ln -s {} {}",
            link.payload().display(),
            link.destination.display()
        ));
        if !self.dry_run() {
            link.apply()?;
        }
        Ok(())
    }

    /// Move the blocker to its backup path, then link.
    fn shove(&mut self, link: &PackageLink, current: &str) -> Result<()> {
        self.shove_with(link, current, Self::create)
    }

    /// Shove sequence with the final link step supplied by the caller.
    ///
    /// Once the blocker has been renamed, an I/O failure of `link_step`
    /// leaves the destination empty and is reported as
    /// [`StowError::PartialShove`] regardless of the ignore-errors policy.
    fn shove_with<F>(&mut self, link: &PackageLink, current: &str, link_step: F) -> Result<()>
    where
        F: FnOnce(&Self, &PackageLink) -> Result<()>,
    {
        let backup = link.backup_path();
        if entry_exists(&backup) {
            return self.signal(StowError::BackupCollision {
                destination: link.destination.clone(),
                backup,
            });
        }

        self.announce(&format!(
            "mv {} {} ({current})",
            link.destination.display(),
            backup.display()
        ));
        if !self.dry_run()
            && let Err(err) = link.move_aside(&backup)
        {
            return self.signal(err);
        }

        link_step(&*self, link).map_err(|err| match err {
            StowError::Io { source, .. } => StowError::PartialShove {
                destination: link.destination.clone(),
                backup: backup.clone(),
                source,
            },
            other => other,
        })?;
        self.report.shoved += 1;
        self.report.linked += 1;
        Ok(())
    }

    fn uninstall_link(&mut self, link: &PackageLink) -> Result<()> {
        match link.current_state()? {
            ResourceState::Missing => {
                self.ctx.log.warn(&format!(
                    "skipping non-existing destination {}",
                    link.destination.display()
                ));
                Ok(())
            }
            ResourceState::Correct if !is_symlink(&link.destination) => {
                self.signal(link.not_a_link())
            }
            ResourceState::Correct => {
                self.announce(&format!("rm {}", link.destination.display()));
                if !self.dry_run() {
                    link.remove()?;
                }
                self.report.unlinked += 1;
                Ok(())
            }
            ResourceState::Incorrect { current: detail }
            | ResourceState::Invalid { reason: detail } => self.signal(StowError::conflict(
                &link.destination,
                format!("destination doesn't link to this package ({detail})"),
            )),
        }
    }
}
