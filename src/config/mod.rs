//! Run configuration: where packages live, where they land, and the loaded rules.
pub mod ignore;

use std::path::{Path, PathBuf};

use crate::error::{Result, StowError};
use self::ignore::{RULES_FILE_NAME, Rules};

/// Environment variable overriding the default dotfiles container.
pub const DOTFILES_DIR_ENV: &str = "STOW_DOTFILES_DIR";

/// Default container directory name under the home directory.
pub const DEFAULT_DOTFILES_DIR_NAME: &str = ".dotfiles";

/// All loaded configuration for a run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Absolute path of the package container.
    pub dotfiles_dir: PathBuf,
    /// Absolute destination root against which package-relative paths land.
    pub relative_base: PathBuf,
    /// Exclusion and ensure-present sets.
    pub rules: Rules,
}

impl Config {
    /// Make both roots absolute and load `.stowignore` from the container.
    ///
    /// The relative base doubles as the home context for `!` directives and
    /// the built-in base directories.
    ///
    /// # Errors
    ///
    /// Returns an error if a root cannot be made absolute or the rules file
    /// exists but cannot be read.
    pub fn load(dotfiles_dir: &Path, relative_base: &Path) -> Result<Self> {
        let dotfiles_dir = absolute(dotfiles_dir)?;
        let relative_base = absolute(relative_base)?;
        let rules = Rules::load(&dotfiles_dir.join(RULES_FILE_NAME), &relative_base)?;
        Ok(Self {
            dotfiles_dir,
            relative_base,
            rules,
        })
    }

    /// Path of the rules file inside the container.
    #[must_use]
    pub fn rules_file(&self) -> PathBuf {
        self.dotfiles_dir.join(RULES_FILE_NAME)
    }

    /// Path of the package named `name` inside the container.
    #[must_use]
    pub fn package_path(&self, name: &str) -> PathBuf {
        self.dotfiles_dir.join(name)
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).map_err(|e| StowError::io("make absolute", path, e))
}

/// The current user's home directory.
///
/// # Errors
///
/// Returns [`StowError::HomeNotFound`] if it cannot be determined.
pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or(StowError::HomeNotFound)
}

/// Default package container: `$STOW_DOTFILES_DIR`, else `~/.dotfiles`.
///
/// # Errors
///
/// Returns [`StowError::HomeNotFound`] if the variable is unset and the home
/// directory cannot be determined.
pub fn default_dotfiles_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(DOTFILES_DIR_ENV)
        && !dir.is_empty()
    {
        return Ok(PathBuf::from(dir));
    }
    Ok(home_dir()?.join(DEFAULT_DOTFILES_DIR_NAME))
}
