//! I/O error hints.
//!
//! Maps an io::Error to a short, actionable suffix that `CopyError::Io` appends
//! to its message, e.g. "open destination file '/x': Permission denied (os error 13)
//! (permission denied; check ownership and write permissions) [os code: 13]".

use std::io;

/// Platform-aware hint for an OS error code, if we know a useful one.
#[cfg(unix)]
fn hint_for_code(code: i32) -> Option<&'static str> {
    let hint = match code {
        libc::EACCES | libc::EPERM => "permission denied; check ownership and write permissions",
        libc::ENOENT => "path not found; verify it exists",
        libc::EEXIST => "already exists; use -f to overwrite",
        libc::ENOSPC => "insufficient space on device",
        libc::EROFS => "read-only filesystem; cannot write here",
        libc::EISDIR => "is a directory",
        libc::ENOTDIR => "a path component is not a directory",
        libc::ELOOP => "too many symbolic link levels; possible symlink cycle",
        libc::ENAMETOOLONG => "filename or path too long; shorten path segments",
        libc::EMFILE => "process file descriptor limit reached",
        libc::ENFILE => "system-wide file table overflow",
        libc::EIO => "low-level I/O error; check the device",
        _ => return None,
    };
    Some(hint)
}

#[cfg(windows)]
fn hint_for_code(code: i32) -> Option<&'static str> {
    let hint = match code {
        5 => "access denied; check permissions",             // ERROR_ACCESS_DENIED
        2 | 3 => "path not found; verify it exists",         // FILE/PATH NOT FOUND
        32 => "sharing violation; file is in use",           // ERROR_SHARING_VIOLATION
        80 => "already exists; use -f to overwrite",         // ERROR_FILE_EXISTS
        112 => "insufficient disk space",                    // ERROR_DISK_FULL
        19 => "write protected / read-only media",           // ERROR_WRITE_PROTECT
        206 => "filename or path too long",                  // ERROR_FILENAME_EXCED_RANGE
        _ => return None,
    };
    Some(hint)
}

#[cfg(not(any(unix, windows)))]
fn hint_for_code(_code: i32) -> Option<&'static str> {
    None
}

fn hint_for_kind(kind: io::ErrorKind) -> Option<&'static str> {
    match kind {
        io::ErrorKind::PermissionDenied => Some("permission denied; check ownership and write permissions"),
        io::ErrorKind::NotFound => Some("path not found; verify it exists"),
        io::ErrorKind::AlreadyExists => Some("already exists; use -f to overwrite"),
        io::ErrorKind::UnexpectedEof => Some("source ended early; was it truncated during the copy?"),
        _ => None,
    }
}

/// Hint suffix for `e`, empty when nothing useful is known.
pub fn hint_for(e: &io::Error) -> String {
    match e.raw_os_error() {
        Some(code) => match hint_for_code(code) {
            Some(hint) => format!(" ({hint}) [os code: {code}]"),
            None => format!(" [os code: {code}]"),
        },
        None => hint_for_kind(e.kind())
            .map(|hint| format!(" ({hint})"))
            .unwrap_or_default(),
    }
}
