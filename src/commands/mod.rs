//! Top-level subcommand orchestration.
pub mod completions;
pub mod install;
pub mod list;
pub mod uninstall;
pub mod version;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};

use crate::cli::GlobalOpts;
use crate::config::{self, Config};
use crate::engine::{self, Context, Options, Verb};
use crate::logging::{Log, Logger, PackageStatus};

/// Package name that expands to every available package.
pub const ALL_PACKAGES: &str = "all";

/// Resolve the package container and relative base from the CLI options,
/// falling back to `$STOW_DOTFILES_DIR`, `~/.dotfiles`, and the home directory.
///
/// # Errors
///
/// Returns an error if a default is needed and the home directory is unknown.
pub fn resolve_roots(global: &GlobalOpts) -> Result<(PathBuf, PathBuf)> {
    let dotfiles_dir = match &global.dotfiles_dir {
        Some(dir) => dir.clone(),
        None => config::default_dotfiles_dir()?,
    };
    let relative_base = match &global.relative_base {
        Some(base) => base.clone(),
        None => config::home_dir()?,
    };
    Ok((dotfiles_dir, relative_base))
}

/// Load the run configuration for `global`, logging what was found.
///
/// # Errors
///
/// Returns an error if the roots cannot be resolved or the rules file
/// cannot be read.
pub fn load_config(global: &GlobalOpts, log: &dyn Log) -> Result<Config> {
    let (dotfiles_dir, relative_base) = resolve_roots(global)?;
    log.stage("Loading rules");
    let config = Config::load(&dotfiles_dir, &relative_base)
        .with_context(|| format!("loading {}", dotfiles_dir.display()))?;
    log.info(&format!("packages: {}", config.dotfiles_dir.display()));
    log.info(&format!("relative base: {}", config.relative_base.display()));
    log.debug(&format!(
        "{} ignored paths, {} ensure-present directories",
        config.rules.ignored_len(),
        config.rules.ensure_present_len()
    ));
    Ok(config)
}

/// Shared driver for the `install` and `uninstall` commands.
///
/// Loads configuration once, runs the verb for each requested package,
/// records one summary entry per package, and fails the command if any
/// package failed.
#[derive(Debug)]
pub struct CommandRunner {
    ctx: Context,
    log: Arc<Logger>,
}

impl CommandRunner {
    /// Load configuration and build the engine context.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading fails.
    pub fn new(global: &GlobalOpts, log: &Arc<Logger>) -> Result<Self> {
        log.debug(&format!("stow {}", version::version()));

        let config = load_config(global, log.as_ref())?;
        let options = Options {
            dry_run: global.dry_run,
            shove: global.shove,
            ignore_errors: global.ignore_errors,
        };
        if options.dry_run {
            log.info("dry run: no changes will be made");
        }
        let ctx = Context::new(config, options, Arc::clone(log) as Arc<dyn Log>);
        Ok(Self {
            ctx,
            log: Arc::clone(log),
        })
    }

    /// The engine context this runner operates with.
    #[must_use]
    pub const fn context(&self) -> &Context {
        &self.ctx
    }

    /// Expand `all` into every available package, keeping other names as given.
    ///
    /// # Errors
    ///
    /// Returns an error if `all` is requested and the container cannot be listed.
    pub fn expand(&self, packages: &[String]) -> Result<Vec<String>> {
        let mut names: Vec<String> = Vec::new();
        for package in packages {
            let expanded = if package == ALL_PACKAGES {
                engine::list_available_packages(&self.ctx.config, self.ctx.log.as_ref())?
            } else {
                vec![package.clone()]
            };
            for name in expanded {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        Ok(names)
    }

    /// Run `verb` for each package, print the summary, and fail if any package failed.
    ///
    /// # Errors
    ///
    /// Returns an error when a package is missing, hits a conflict, or fails
    /// on the filesystem. Missing packages and filesystem failures stop the
    /// run; downgraded conflicts fail it after every package was processed.
    pub fn run(&self, verb: Verb, packages: &[String]) -> Result<()> {
        let result = self.run_packages(verb, packages);
        self.log.print_summary();
        result?;

        let count = self.log.failure_count();
        if count > 0 {
            anyhow::bail!("{count} package(s) failed");
        }
        Ok(())
    }

    fn run_packages(&self, verb: Verb, packages: &[String]) -> Result<()> {
        for name in self.expand(packages)? {
            self.log.stage(&format!("{} {name}", capitalize(verb.as_str())));
            match engine::operate_package(&self.ctx, &name, verb) {
                Ok(report) if report.skipped => {
                    self.log
                        .record_package(&name, PackageStatus::Skipped, Some("ignored"));
                }
                Ok(report) if report.has_conflicts() => {
                    let msg = format!("{} conflict(s)", report.conflicts);
                    self.log
                        .record_package(&name, PackageStatus::Failed, Some(&msg));
                }
                Ok(report) => {
                    self.log.info(&report.to_string());
                    let status = if self.ctx.options.dry_run {
                        PackageStatus::DryRun
                    } else {
                        PackageStatus::Ok
                    };
                    self.log.record_package(&name, status, None);
                }
                Err(e) => {
                    self.log
                        .record_package(&name, PackageStatus::Failed, Some(&e.to_string()));
                    return Err(e).with_context(|| format!("{verb} {name}"));
                }
            }
        }
        Ok(())
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::logging::isolated_logger;
    use std::fs;

    fn global(dotfiles: &std::path::Path, home: &std::path::Path) -> GlobalOpts {
        GlobalOpts {
            dry_run: false,
            shove: false,
            ignore_errors: false,
            relative_base: Some(home.to_path_buf()),
            dotfiles_dir: Some(dotfiles.to_path_buf()),
        }
    }

    #[test]
    fn capitalize_first_letter() {
        assert_eq!(capitalize("install"), "Install");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn resolve_roots_prefers_explicit_paths() {
        let opts = GlobalOpts {
            dry_run: false,
            shove: false,
            ignore_errors: false,
            relative_base: Some(PathBuf::from("/h")),
            dotfiles_dir: Some(PathBuf::from("/d")),
        };
        let (dotfiles, base) = resolve_roots(&opts).unwrap();
        assert_eq!(dotfiles, PathBuf::from("/d"));
        assert_eq!(base, PathBuf::from("/h"));
    }

    #[test]
    fn expand_all_lists_packages() {
        let dotfiles = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        fs::create_dir(dotfiles.path().join("zsh")).unwrap();
        fs::create_dir(dotfiles.path().join("git")).unwrap();
        let (log, _tmp, _guard) = isolated_logger();
        let runner = CommandRunner::new(&global(dotfiles.path(), home.path()), &Arc::new(log))
            .unwrap();

        let names = runner
            .expand(&["all".to_string(), "extra".to_string()])
            .unwrap();
        assert_eq!(names, vec!["git", "zsh", "extra"]);
    }

    #[test]
    fn missing_package_fails_the_run() {
        let dotfiles = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        let (log, _tmp, _guard) = isolated_logger();
        let log = Arc::new(log);
        let runner = CommandRunner::new(&global(dotfiles.path(), home.path()), &log).unwrap();

        let err = runner
            .run(Verb::Install, &["missing".to_string()])
            .unwrap_err();
        assert!(format!("{err:#}").contains("not found"), "{err:#}");
        assert_eq!(log.failure_count(), 1);
    }

    #[test]
    fn downgraded_conflicts_still_fail_the_command() {
        let dotfiles = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        fs::create_dir(dotfiles.path().join("zsh")).unwrap();
        fs::write(dotfiles.path().join("zsh/.zshrc"), "managed").unwrap();
        fs::write(home.path().join(".zshrc"), "local").unwrap();
        let (log, _tmp, _guard) = isolated_logger();
        let log = Arc::new(log);
        let mut opts = global(dotfiles.path(), home.path());
        opts.ignore_errors = true;
        let runner = CommandRunner::new(&opts, &log).unwrap();

        let err = runner.run(Verb::Install, &["zsh".to_string()]).unwrap_err();
        assert!(err.to_string().contains("1 package(s) failed"), "{err}");
        assert_eq!(
            log.package_entries()
                .first()
                .map(|entry| entry.status),
            Some(PackageStatus::Failed)
        );
    }

    #[test]
    fn dry_run_records_dry_run_status() {
        let dotfiles = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        fs::create_dir(dotfiles.path().join("zsh")).unwrap();
        fs::write(dotfiles.path().join("zsh/.zshrc"), "").unwrap();
        let (log, _tmp, _guard) = isolated_logger();
        let log = Arc::new(log);
        let mut opts = global(dotfiles.path(), home.path());
        opts.dry_run = true;
        let runner = CommandRunner::new(&opts, &log).unwrap();

        runner.run(Verb::Install, &["zsh".to_string()]).unwrap();
        assert_eq!(
            log.package_entries()
                .first()
                .map(|entry| entry.status),
            Some(PackageStatus::DryRun)
        );
        assert!(runner.context().options.dry_run);
    }
}
