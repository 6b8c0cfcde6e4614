#![cfg(unix)]

mod common;

use common::{canonical_tempdir, stderr, zcp};
use filetime::{FileTime, set_file_mtime};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::time::{Duration, SystemTime};

fn within_a_second(a: SystemTime, b: SystemTime) -> bool {
    let diff = a.duration_since(b).unwrap_or_else(|e| e.duration());
    diff <= Duration::from_secs(1)
}

#[test]
fn preserve_copies_mode_and_mtime_of_file() {
    let (_td, base) = canonical_tempdir();
    let src = base.join("perm.txt");
    fs::write(&src, "keep me").unwrap();
    fs::set_permissions(&src, fs::Permissions::from_mode(0o640)).unwrap();
    let when = SystemTime::UNIX_EPOCH + Duration::from_secs(1_234_567_890);
    set_file_mtime(&src, FileTime::from_system_time(when)).unwrap();

    let dest = base.join("perm.out");
    let out = zcp(&base).arg("-p").arg(&src).arg(&dest).output().unwrap();
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let meta = fs::metadata(&dest).unwrap();
    assert_eq!(meta.permissions().mode() & 0o777, 0o640);
    assert!(within_a_second(meta.modified().unwrap(), when));
}

#[test]
fn preserve_keeps_directory_mtime_after_children_are_written() {
    let (_td, base) = canonical_tempdir();
    let src = base.join("tree");
    fs::create_dir_all(src.join("inner")).unwrap();
    fs::write(src.join("inner/a.txt"), "a").unwrap();
    fs::write(src.join("b.txt"), "b").unwrap();
    fs::set_permissions(src.join("inner"), fs::Permissions::from_mode(0o700)).unwrap();

    let dir_time = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000_000);
    let inner_time = SystemTime::UNIX_EPOCH + Duration::from_secs(1_100_000_000);
    set_file_mtime(src.join("inner"), FileTime::from_system_time(inner_time)).unwrap();
    set_file_mtime(&src, FileTime::from_system_time(dir_time)).unwrap();

    let dest = base.join("copy");
    let out = zcp(&base)
        .args(["-r", "-p", "-q"])
        .arg(&src)
        .arg(&dest)
        .output()
        .unwrap();
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let root = fs::metadata(&dest).unwrap();
    let inner = fs::metadata(dest.join("inner")).unwrap();
    assert!(within_a_second(root.modified().unwrap(), dir_time));
    assert!(within_a_second(inner.modified().unwrap(), inner_time));
    assert_eq!(inner.permissions().mode() & 0o777, 0o700);
}

#[test]
fn without_preserve_mtime_is_fresh() {
    let (_td, base) = canonical_tempdir();
    let src = base.join("old.txt");
    fs::write(&src, "x").unwrap();
    let old = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000_000);
    set_file_mtime(&src, FileTime::from_system_time(old)).unwrap();

    let dest = base.join("new.txt");
    let out = zcp(&base).arg(&src).arg(&dest).output().unwrap();
    assert!(out.status.success());
    let modified = fs::metadata(&dest).unwrap().modified().unwrap();
    assert!(modified > old + Duration::from_secs(3600));
}

#[test]
fn symlink_sources_are_rejected() {
    let (_td, base) = canonical_tempdir();
    let target = base.join("target.txt");
    fs::write(&target, "t").unwrap();
    let link = base.join("link.txt");
    std::os::unix::fs::symlink(&target, &link).unwrap();

    let out = zcp(&base).arg(&link).arg(base.join("out.txt")).output().unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("symbolic links are not supported"));
    assert!(!base.join("out.txt").exists());
}

#[test]
fn symlink_inside_tree_aborts_before_any_write() {
    let (_td, base) = canonical_tempdir();
    let src = base.join("tree");
    fs::create_dir(&src).unwrap();
    fs::write(src.join("a.txt"), "a").unwrap();
    std::os::unix::fs::symlink(src.join("a.txt"), src.join("z-link")).unwrap();

    let dest = base.join("out");
    let out = zcp(&base).arg("-r").arg(&src).arg(&dest).output().unwrap();
    assert_eq!(out.status.code(), Some(1));
    let se = stderr(&out);
    assert!(se.contains("symbolic links are not supported"), "stderr: {se}");
    assert!(se.contains("z-link"), "stderr: {se}");
    assert!(!dest.exists());
}
