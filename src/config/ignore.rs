//! `.stowignore` rules loading.
//!
//! The rules file lives at the root of the dotfiles container and holds one
//! directive per line:
//!
//! ```text
//! # comment
//! zsh/.zshrc          excluded path, relative to the rules file
//! !.config/nvim       ensure-present directory, relative to the home context
//! ```
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, StowError};
use crate::resources::helpers::fs::resolve;

/// File name of the rules file inside the dotfiles container.
pub const RULES_FILE_NAME: &str = ".stowignore";

/// Container metadata directory that is always excluded.
pub const METADATA_DIR: &str = ".git";

/// Conventional base directories that are always materialized, relative to the home context.
pub const BASE_DIRECTORIES: &[&str] = &[
    ".config",
    ".local",
    ".local/share",
    ".local/bin",
    ".local/lib",
    ".cache",
];

/// A single parsed rules-file line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// A source path to skip, relative to the rules file's directory.
    Exclude(PathBuf),
    /// A destination directory to create and recurse into, relative to the home context.
    EnsurePresent(PathBuf),
}

/// Parse rules-file text into directives, dropping blank lines and comments.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use stow_cli::config::ignore::{Directive, parse};
///
/// let directives = parse("# shell\nzsh/.zshrc\n\n!~/.config/nvim\n");
/// assert_eq!(
///     directives,
///     vec![
///         Directive::Exclude(PathBuf::from("zsh/.zshrc")),
///         Directive::EnsurePresent(PathBuf::from("~/.config/nvim")),
///     ]
/// );
/// ```
#[must_use]
pub fn parse(text: &str) -> Vec<Directive> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| match line.strip_prefix('!') {
            Some(rest) => {
                let rest = rest.trim();
                (!rest.is_empty()).then(|| Directive::EnsurePresent(PathBuf::from(rest)))
            }
            None => Some(Directive::Exclude(PathBuf::from(line))),
        })
        .collect()
}

/// Expand a leading `~` and anchor relative paths at `home`.
fn expand_home(raw: &Path, home: &Path) -> PathBuf {
    match raw.strip_prefix("~") {
        Ok(rest) => home.join(rest),
        Err(_) => home.join(raw),
    }
}

/// Resolved exclusion and ensure-present sets, immutable once built.
#[derive(Debug, Clone, Default)]
pub struct Rules {
    ignored: HashSet<PathBuf>,
    ensure_present: HashSet<PathBuf>,
}

impl Rules {
    /// Load rules from `rules_file`, whose directory is the dotfiles container.
    ///
    /// A missing rules file is the common case and yields only the built-in
    /// entries: the container's metadata directory and [`BASE_DIRECTORIES`].
    ///
    /// # Errors
    ///
    /// Returns [`StowError::RulesFile`] if the file exists but cannot be read.
    pub fn load(rules_file: &Path, home: &Path) -> Result<Self> {
        let container = rules_file.parent().unwrap_or_else(|| Path::new("."));
        let directives = if rules_file.is_file() {
            let text = fs::read_to_string(rules_file).map_err(|source| StowError::RulesFile {
                path: rules_file.to_path_buf(),
                source,
            })?;
            parse(&text)
        } else {
            Vec::new()
        };
        Ok(Self::from_directives(&directives, container, home))
    }

    /// Build the resolved sets from parsed directives plus the built-in entries.
    #[must_use]
    pub fn from_directives(directives: &[Directive], container: &Path, home: &Path) -> Self {
        let mut ignored: HashSet<PathBuf> = HashSet::from([resolve(&container.join(METADATA_DIR))]);
        let mut ensure_present: HashSet<PathBuf> = BASE_DIRECTORIES
            .iter()
            .map(|dir| resolve(&home.join(dir)))
            .collect();

        for directive in directives {
            match directive {
                Directive::Exclude(path) => {
                    ignored.insert(resolve(&container.join(path)));
                }
                Directive::EnsurePresent(path) => {
                    ensure_present.insert(resolve(&expand_home(path, home)));
                }
            }
        }

        Self {
            ignored,
            ensure_present,
        }
    }

    /// Whether the resolved form of `source` is excluded.
    #[must_use]
    pub fn is_ignored(&self, source: &Path) -> bool {
        self.ignored.contains(&resolve(source))
    }

    /// Whether the resolved form of `destination` must be a real directory.
    #[must_use]
    pub fn is_ensure_present(&self, destination: &Path) -> bool {
        self.ensure_present.contains(&resolve(destination))
    }

    /// Number of excluded paths, built-ins included.
    #[must_use]
    pub fn ignored_len(&self) -> usize {
        self.ignored.len()
    }

    /// Number of ensure-present directories, built-ins included.
    #[must_use]
    pub fn ensure_present_len(&self) -> usize {
        self.ensure_present.len()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parse_skips_blank_and_comment_lines() {
        let directives = parse("\n   \n# a comment\n  # indented comment\n");
        assert!(directives.is_empty());
    }

    #[test]
    fn parse_trims_whitespace() {
        let directives = parse("  zsh/.zshrc  \n\t! .config/nvim \n");
        assert_eq!(
            directives,
            vec![
                Directive::Exclude(PathBuf::from("zsh/.zshrc")),
                Directive::EnsurePresent(PathBuf::from(".config/nvim")),
            ]
        );
    }

    #[test]
    fn parse_drops_bare_bang() {
        assert!(parse("!\n!   \n").is_empty());
    }

    #[test]
    fn expand_home_handles_tilde_and_relative() {
        let home = Path::new("/home/u");
        assert_eq!(
            expand_home(Path::new("~/.config/nvim"), home),
            PathBuf::from("/home/u/.config/nvim")
        );
        assert_eq!(expand_home(Path::new("~"), home), PathBuf::from("/home/u"));
        assert_eq!(
            expand_home(Path::new(".config/nvim"), home),
            PathBuf::from("/home/u/.config/nvim")
        );
        assert_eq!(
            expand_home(Path::new("/etc/xdg"), home),
            PathBuf::from("/etc/xdg")
        );
    }

    #[test]
    fn missing_rules_file_yields_builtins() {
        let container = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        let rules = Rules::load(&container.path().join(RULES_FILE_NAME), home.path()).unwrap();

        assert_eq!(rules.ignored_len(), 1);
        assert!(rules.is_ignored(&container.path().join(".git")));
        assert_eq!(rules.ensure_present_len(), BASE_DIRECTORIES.len());
        for dir in BASE_DIRECTORIES {
            assert!(rules.is_ensure_present(&home.path().join(dir)), "{dir}");
        }
    }

    #[test]
    fn rules_file_adds_to_builtins() {
        let container = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        let rules_file = container.path().join(RULES_FILE_NAME);
        fs::write(
            &rules_file,
            "# personal rules\nzsh/.zshrc\n!.config/nvim\n!~/.local/share/fonts\n",
        )
        .unwrap();

        let rules = Rules::load(&rules_file, home.path()).unwrap();

        assert!(rules.is_ignored(&container.path().join("zsh/.zshrc")));
        assert!(rules.is_ignored(&container.path().join(".git")));
        assert!(!rules.is_ignored(&container.path().join("zsh")));
        assert!(rules.is_ensure_present(&home.path().join(".config/nvim")));
        assert!(rules.is_ensure_present(&home.path().join(".local/share/fonts")));
        assert!(rules.is_ensure_present(&home.path().join(".config")));
        assert!(!rules.is_ensure_present(&home.path().join(".ssh")));
    }

    #[cfg(unix)]
    #[test]
    fn ignore_matches_symlink_aliases() {
        let container = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        fs::create_dir(container.path().join("secrets")).unwrap();
        std::os::unix::fs::symlink(
            container.path().join("secrets"),
            container.path().join("alias"),
        )
        .unwrap();
        let rules = Rules::from_directives(
            &[Directive::Exclude(PathBuf::from("secrets"))],
            container.path(),
            home.path(),
        );

        assert!(rules.is_ignored(&container.path().join("alias")));
    }

    #[test]
    fn rules_path_that_is_a_directory_is_treated_as_absent() {
        let container = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        let rules_file = container.path().join(RULES_FILE_NAME);
        fs::create_dir(&rules_file).unwrap();

        let rules = Rules::load(&rules_file, home.path()).unwrap();
        assert_eq!(rules.ignored_len(), 1);
    }
}
