use std::ffi::OsString;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::errors::CopyError;

/// Lexically clean a path: drop `.` components and trailing separators, fold
/// `name/..` pairs. Leading `..` components of a relative path are kept.
/// Symlinks are not resolved.
pub(crate) fn lexical_clean(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // "/.." is "/"
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(comp),
            },
            other => out.push(other),
        }
    }
    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}

/// Absolute, lexically cleaned form of `path` (relative paths are joined to the cwd).
pub(crate) fn absolute_clean(path: &Path) -> io::Result<PathBuf> {
    Ok(lexical_clean(&std::path::absolute(path)?))
}

/// Final path component used when a source is copied *into* a directory.
/// `.`/`..` style sources take the name of the directory they resolve to.
pub(crate) fn source_name(source: &Path) -> Result<OsString, CopyError> {
    if let Some(name) = source.file_name() {
        return Ok(name.to_owned());
    }
    let abs = absolute_clean(source).map_err(|e| CopyError::io("resolve source path", source, e))?;
    abs.file_name()
        .map(|n| n.to_owned())
        .ok_or_else(|| CopyError::NoFileName(source.to_path_buf()))
}

/// Reject a directory copy whose target is the source itself or lies beneath it.
/// Targets that are ancestors of the source, or unrelated, are fine.
pub(crate) fn ensure_destination_outside_source(
    source_dir: &Path,
    target: &Path,
) -> Result<(), CopyError> {
    let src_abs =
        absolute_clean(source_dir).map_err(|e| CopyError::io("resolve source path", source_dir, e))?;
    let dst_abs =
        absolute_clean(target).map_err(|e| CopyError::io("resolve destination path", target, e))?;

    if dst_abs == src_abs {
        return Err(CopyError::CopyToItself(source_dir.to_path_buf()));
    }
    // Component-wise: "/a/bc" does not start with "/a/b".
    if dst_abs.starts_with(&src_abs) {
        return Err(CopyError::CopyIntoItself {
            source_dir: source_dir.to_path_buf(),
            dest: target.to_path_buf(),
        });
    }
    Ok(())
}
