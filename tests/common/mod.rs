#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Command for the zcp binary, isolated from the user's own config file:
/// HOME/XDG_CONFIG_HOME point into `home` and ZCP_CONFIG is cleared.
pub fn zcp(home: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("zcp"));
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("ZCP_CONFIG");
    cmd
}

pub fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

pub fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

/// Tempdir with symlinks resolved (macOS /var -> /private/var).
pub fn canonical_tempdir() -> (tempfile::TempDir, PathBuf) {
    let td = tempfile::tempdir().expect("tempdir");
    let base = fs::canonicalize(td.path()).expect("canonicalize tempdir");
    (td, base)
}
