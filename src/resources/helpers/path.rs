//! Relative symlink payload computation.
use std::path::{Path, PathBuf};

/// Compute the relative payload for a symlink at `destination` pointing to `source`.
///
/// The payload climbs from the directory containing `destination` up to the
/// lowest common ancestor of both paths with `..` segments, then descends
/// into `source`.  Resolving the payload from `destination`'s parent yields
/// `source`, and keeps doing so when the whole tree is relocated with its
/// relative layout intact.
///
/// Both paths are expected to be absolute.  Paths sharing only the
/// filesystem root produce the maximal `..` chain.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use stow_cli::resources::helpers::path::relative_link_target;
///
/// let target = relative_link_target(
///     Path::new("/home/u/.dotfiles/zsh/.zshrc"),
///     Path::new("/home/u/.zshrc"),
/// );
/// assert_eq!(target, PathBuf::from(".dotfiles/zsh/.zshrc"));
/// ```
#[must_use]
pub fn relative_link_target(source: &Path, destination: &Path) -> PathBuf {
    let anchor = destination.parent().unwrap_or(destination);
    match pathdiff::diff_paths(source, anchor) {
        Some(relative) if relative.as_os_str().is_empty() => PathBuf::from("."),
        Some(relative) => relative,
        None => source.to_path_buf(),
    }
}
