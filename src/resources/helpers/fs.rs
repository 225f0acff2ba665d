//! File-system resource helpers.
use std::ffi::OsString;
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::{Result, StowError};

/// Return the absolute, symlink-dereferenced, normalized form of `path`.
///
/// The longest existing prefix is canonicalized (following every symlink
/// along the way) and the remaining components are appended lexically, so
/// the function succeeds for paths that do not exist yet.  Every identity
/// comparison in the crate goes through this one function.
#[must_use]
pub fn resolve(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());

    let mut existing = absolute.as_path();
    let mut tail: Vec<Component<'_>> = Vec::new();
    loop {
        if let Ok(mut resolved) = dunce::canonicalize(existing) {
            for component in tail.iter().rev() {
                push_lexical(&mut resolved, *component);
            }
            return resolved;
        }
        match (existing.parent(), existing.components().next_back()) {
            (Some(parent), Some(last)) => {
                tail.push(last);
                existing = parent;
            }
            _ => return absolute,
        }
    }
}

/// Return the absolute form of `path` with `.` and `..` collapsed lexically.
///
/// Unlike [`resolve`], no symlink is followed: a path reached through an
/// alias keeps naming the alias.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        push_lexical(&mut normalized, component);
    }
    normalized
}

fn push_lexical(path: &mut PathBuf, component: Component<'_>) {
    match component {
        Component::ParentDir => {
            path.pop();
        }
        Component::CurDir => {}
        other => path.push(other.as_os_str()),
    }
}

/// Whether anything (including a dangling symlink) occupies `path`.
#[must_use]
pub fn entry_exists(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

/// Whether `path` itself is a symbolic link.
#[must_use]
pub fn is_symlink(path: &Path) -> bool {
    path.symlink_metadata().is_ok_and(|m| m.file_type().is_symlink())
}

/// Return `path` with `suffix` appended to its final component.
#[must_use]
pub fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut raw: OsString = path.as_os_str().to_owned();
    raw.push(suffix);
    PathBuf::from(raw)
}

/// Return the sorted child paths of the directory at `dir`.
///
/// # Errors
///
/// Returns an error if the directory cannot be read.
pub fn sorted_children(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut children = fs::read_dir(dir)
        .map_err(|e| StowError::io("read directory", dir, e))?
        .map(|entry| {
            entry
                .map(|e| e.path())
                .map_err(|e| StowError::io("read directory", dir, e))
        })
        .collect::<Result<Vec<_>>>()?;
    children.sort();
    Ok(children)
}

/// Create a symlink at `link` whose payload is `target`.
///
/// # Errors
///
/// Returns the underlying I/O error, or [`std::io::ErrorKind::Unsupported`]
/// on platforms without POSIX symlinks.
pub fn create_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(target, link)
    }

    #[cfg(not(unix))]
    {
        let _ = (target, link);
        Err(std::io::Error::from(std::io::ErrorKind::Unsupported))
    }
}
