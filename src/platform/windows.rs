//! Windows implementations of platform helpers (best-effort).
//!
//! Notes:
//! - Windows lacks POSIX mode semantics; only the owner-write bit is mapped,
//!   onto the READONLY attribute.
//! - File identity is compared through canonical paths.

use std::fs::{self, File, Metadata, OpenOptions};
use std::io;
use std::path::Path;

/// Synthesised permission bits: 0o444 when read-only, 0o666 otherwise.
pub fn permission_bits(meta: &Metadata) -> u32 {
    if meta.permissions().readonly() { 0o444 } else { 0o666 }
}

/// Mirror the owner-write bit onto the READONLY attribute.
pub fn set_permission_bits(path: &Path, mode: u32) -> io::Result<()> {
    let mut perms = fs::metadata(path)?.permissions();
    perms.set_readonly(mode & 0o200 == 0);
    fs::set_permissions(path, perms)
}

pub fn create_dir_with_mode(path: &Path, _mode: u32) -> io::Result<()> {
    fs::create_dir_all(path)
}

pub fn open_destination(path: &Path, force: bool, _mode: u32) -> io::Result<File> {
    let mut opts = OpenOptions::new();
    opts.write(true);
    if force {
        opts.create(true).truncate(true);
    } else {
        opts.create_new(true);
    }
    opts.open(path)
}

/// Close `file`. CloseHandle does not report deferred write failures, so
/// there is nothing more to check than dropping it.
pub fn close_file(file: File) -> io::Result<()> {
    drop(file);
    Ok(())
}

pub fn same_file(a: &Path, b: &Path) -> io::Result<bool> {
    let a_real = dunce::canonicalize(a)?;
    match dunce::canonicalize(b) {
        Ok(b_real) => Ok(a_real == b_real),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Open log file for appending (no symlink defense available via std on Windows).
pub fn open_log_file_secure_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    OpenOptions::new().create(true).append(true).open(path)
}
