//! Unix implementations of platform helpers.

use std::fs::{self, DirBuilder, File, Metadata, OpenOptions};
use std::io;
use std::os::fd::IntoRawFd;
use std::os::unix::fs::{DirBuilderExt, MetadataExt, OpenOptionsExt, PermissionsExt};
use std::path::Path;

/// Permission bits (rwx for user/group/other) of `meta`.
pub fn permission_bits(meta: &Metadata) -> u32 {
    meta.permissions().mode() & 0o777
}

/// chmod `path` to exactly `mode` (permission bits only).
pub fn set_permission_bits(path: &Path, mode: u32) -> io::Result<()> {
    fs::set_permissions(path, fs::Permissions::from_mode(mode & 0o777))
}

/// mkdir -p with `mode` applied to every directory created (subject to umask).
/// Succeeds if `path` already exists as a directory.
pub fn create_dir_with_mode(path: &Path, mode: u32) -> io::Result<()> {
    DirBuilder::new()
        .recursive(true)
        .mode(mode & 0o777)
        .create(path)
}

/// Open the destination of a file copy for writing.
/// - `force == false`: O_CREAT|O_EXCL, so an existing file is never touched.
/// - `force == true`: O_CREAT|O_TRUNC.
///
/// `mode` applies only when the file is created.
pub fn open_destination(path: &Path, force: bool, mode: u32) -> io::Result<File> {
    let mut opts = OpenOptions::new();
    opts.write(true).mode(mode & 0o777);
    if force {
        opts.create(true).truncate(true);
    } else {
        opts.create_new(true);
    }
    opts.open(path)
}

/// Close `file` and report what close(2) says. Dropping a `File` discards that
/// result, which is where some filesystems (NFS, quota) report failed writes.
/// EINTR is not retried: on Linux the descriptor is already released.
pub fn close_file(file: File) -> io::Result<()> {
    let fd = file.into_raw_fd();
    // SAFETY: `fd` came from `into_raw_fd`, so we own it and nothing else closes it.
    if unsafe { libc::close(fd) } == -1 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// True when `a` and `b` name the same filesystem entity (device + inode).
/// A missing `b` is not an error; it is simply not the same file.
pub fn same_file(a: &Path, b: &Path) -> io::Result<bool> {
    let a_meta = fs::metadata(a)?;
    let b_meta = match fs::metadata(b) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };
    Ok(a_meta.dev() == b_meta.dev() && a_meta.ino() == b_meta.ino())
}

/// Open log file for appending; set 0600 only when creating a new file.
/// If the file already exists, we preserve its existing permissions.
pub fn open_log_file_secure_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .mode(0o600) // applies on create
        .custom_flags(libc::O_NOFOLLOW)
        .open(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn open_destination_without_force_refuses_existing() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("existing");
        fs::write(&p, b"keep me").unwrap();

        let err = open_destination(&p, false, 0o644).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(fs::read(&p).unwrap(), b"keep me");
    }

    #[test]
    fn open_destination_with_force_truncates() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("existing");
        fs::write(&p, b"long old content").unwrap();

        let mut f = open_destination(&p, true, 0o644).unwrap();
        f.write_all(b"new").unwrap();
        drop(f);
        assert_eq!(fs::read(&p).unwrap(), b"new");
    }

    #[test]
    fn close_file_releases_descriptor() {
        use std::os::fd::{AsRawFd, FromRawFd};

        let dir = tempdir().unwrap();
        let p = dir.path().join("closed");
        let f = File::create(&p).unwrap();
        // Park a duplicate on a high descriptor nothing else will be handed.
        let fd = unsafe { libc::fcntl(f.as_raw_fd(), libc::F_DUPFD_CLOEXEC, 900) };
        assert!(fd >= 900);
        drop(f);

        let mut dup = unsafe { File::from_raw_fd(fd) };
        dup.write_all(b"payload").unwrap();
        close_file(dup).unwrap();

        let rc = unsafe { libc::fcntl(fd, libc::F_GETFD) };
        let errno = io::Error::last_os_error().raw_os_error();
        assert_eq!(rc, -1);
        assert_eq!(errno, Some(libc::EBADF));
        assert_eq!(fs::read(&p).unwrap(), b"payload");
    }

    #[test]
    fn same_file_detects_hard_links() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        fs::write(&a, b"x").unwrap();
        fs::hard_link(&a, &b).unwrap();

        assert!(same_file(&a, &b).unwrap());
        assert!(!same_file(&a, &dir.path().join("missing")).unwrap());
    }

    #[test]
    fn set_permission_bits_applies_exact_mode() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("f");
        fs::write(&p, b"x").unwrap();
        set_permission_bits(&p, 0o640).unwrap();
        assert_eq!(permission_bits(&fs::metadata(&p).unwrap()), 0o640);
    }
}
