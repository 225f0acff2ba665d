// Shared helpers for integration tests.
//
// Provides a temporary dotfiles container plus a temporary home directory
// and a fluent builder so each integration test can set up an isolated
// environment without repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use stow_cli::config::Config;
use stow_cli::engine::{Context, Options};
use stow_cli::logging::{Log, PackageStatus};

/// A [`Log`] implementation that keeps every message in memory, tagged with
/// its level, so tests can assert on what the engine reported.
#[derive(Debug, Default)]
pub struct RecordingLog {
    lines: Mutex<Vec<String>>,
}

impl RecordingLog {
    fn push(&self, level: &str, msg: &str) {
        self.lines
            .lock()
            .expect("log lock")
            .push(format!("{level}: {msg}"));
    }

    /// All recorded lines, in order.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().expect("log lock").clone()
    }

    /// Recorded lines at `level`.
    pub fn at(&self, level: &str) -> Vec<String> {
        let prefix = format!("{level}: ");
        self.lines()
            .into_iter()
            .filter_map(|line| line.strip_prefix(&prefix).map(String::from))
            .collect()
    }
}

impl Log for RecordingLog {
    fn stage(&self, msg: &str) {
        self.push("stage", msg);
    }
    fn info(&self, msg: &str) {
        self.push("info", msg);
    }
    fn debug(&self, msg: &str) {
        self.push("debug", msg);
    }
    fn warn(&self, msg: &str) {
        self.push("warn", msg);
    }
    fn error(&self, msg: &str) {
        self.push("error", msg);
    }
    fn dry_run(&self, msg: &str) {
        self.push("dry_run", msg);
    }
    fn record_package(&self, name: &str, status: PackageStatus, _message: Option<&str>) {
        self.push("package", &format!("{name} {status:?}"));
    }
}

/// An isolated dotfiles container and home directory, both backed by
/// [`tempfile::TempDir`] and deleted when dropped.
pub struct IntegrationTestContext {
    /// Package container (`~/.dotfiles` in real use).
    pub dotfiles: tempfile::TempDir,
    /// Destination root the packages are projected onto.
    pub home: tempfile::TempDir,
}

impl IntegrationTestContext {
    /// Create an empty container and home.
    pub fn new() -> Self {
        Self {
            dotfiles: tempfile::tempdir().expect("create dotfiles dir"),
            home: tempfile::tempdir().expect("create home dir"),
        }
    }

    /// Path to the package container.
    pub fn dotfiles_path(&self) -> &Path {
        self.dotfiles.path()
    }

    /// Path to the home directory.
    pub fn home_path(&self) -> &Path {
        self.home.path()
    }

    /// `relative` joined onto the package container.
    pub fn source(&self, relative: &str) -> PathBuf {
        self.dotfiles.path().join(relative)
    }

    /// `relative` joined onto the home directory.
    pub fn dest(&self, relative: &str) -> PathBuf {
        self.home.path().join(relative)
    }

    /// Load configuration from the container with the home as relative base.
    pub fn load_config(&self) -> Config {
        Config::load(self.dotfiles.path(), self.home.path()).expect("load config")
    }

    /// Build an engine context with `options` and a fresh [`RecordingLog`].
    pub fn engine(&self, options: Options) -> (Context, Arc<RecordingLog>) {
        let log = Arc::new(RecordingLog::default());
        let ctx = Context::new(self.load_config(), options, Arc::clone(&log) as Arc<dyn Log>);
        (ctx, log)
    }

    /// Sorted names of every entry under the home directory, relative to it,
    /// with `@` appended to symlinks.
    pub fn home_tree(&self) -> Vec<String> {
        fn walk(root: &Path, dir: &Path, out: &mut Vec<String>) {
            let mut entries: Vec<_> = fs::read_dir(dir)
                .expect("read dir")
                .map(|e| e.expect("dir entry").path())
                .collect();
            entries.sort();
            for path in entries {
                let relative = path
                    .strip_prefix(root)
                    .expect("under root")
                    .display()
                    .to_string();
                let meta = path.symlink_metadata().expect("metadata");
                if meta.file_type().is_symlink() {
                    out.push(format!("{relative}@"));
                } else if meta.is_dir() {
                    out.push(format!("{relative}/"));
                    walk(root, &path, out);
                } else {
                    out.push(relative);
                }
            }
        }
        let mut out = Vec::new();
        walk(self.home.path(), self.home.path(), &mut out);
        out
    }
}

/// Fluent builder for [`IntegrationTestContext`].
pub struct TestContextBuilder {
    ctx: IntegrationTestContext,
}

impl TestContextBuilder {
    /// Begin building from an empty container and home.
    pub fn new() -> Self {
        Self {
            ctx: IntegrationTestContext::new(),
        }
    }

    /// Write `content` to `relative` inside the container, creating parents.
    pub fn with_package_file(self, relative: &str, content: &str) -> Self {
        let path = self.ctx.source(relative);
        fs::create_dir_all(path.parent().expect("parent")).expect("create package dir");
        fs::write(&path, content).expect("write package file");
        self
    }

    /// Write the container's `.stowignore`.
    pub fn with_rules(self, rules: &str) -> Self {
        fs::write(self.ctx.source(".stowignore"), rules).expect("write rules");
        self
    }

    /// Write `content` to `relative` inside the home directory, creating parents.
    pub fn with_home_file(self, relative: &str, content: &str) -> Self {
        let path = self.ctx.dest(relative);
        fs::create_dir_all(path.parent().expect("parent")).expect("create home dir");
        fs::write(&path, content).expect("write home file");
        self
    }

    /// Finish building.
    pub fn build(self) -> IntegrationTestContext {
        self.ctx
    }
}
