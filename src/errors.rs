//! Typed error definitions for zcp.
//! Every failure the copy engine can report, grouped the way callers handle them:
//! configuration, plan validation, execution and interruption.
//!
//! Library functions return `anyhow::Result` and raise these values, so callers
//! can `downcast_ref::<CopyError>()` when they need to branch on the kind.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::fs_ops::hint_for;

#[derive(Debug, Error)]
pub enum CopyError {
    /// Invalid flag/argument combination, detected before touching the filesystem.
    #[error("{0}")]
    Config(String),

    #[error("destination '{}' must be an existing directory when copying multiple sources", .0.display())]
    AmbiguousDestination(PathBuf),

    #[error("symbolic links are not supported: '{}'", .0.display())]
    SymlinkRejected(PathBuf),

    #[error("unsupported file type (not a regular file or directory): '{}'", .0.display())]
    UnsupportedFileType(PathBuf),

    #[error("omitting directory '{}' (use -r or --recursive)", .0.display())]
    OmittingDirectory(PathBuf),

    #[error("cannot overwrite non-directory '{}' with directory '{}'", .dest.display(), .source_dir.display())]
    OverwriteNonDirectory { dest: PathBuf, source_dir: PathBuf },

    #[error("cannot copy '{}' to itself", .0.display())]
    CopyToItself(PathBuf),

    #[error("cannot copy directory '{}' into itself ('{}')", .source_dir.display(), .dest.display())]
    CopyIntoItself { source_dir: PathBuf, dest: PathBuf },

    #[error("'{}' and '{}' are the same file", .source_file.display(), .dest.display())]
    SameFile { source_file: PathBuf, dest: PathBuf },

    #[error("will not overwrite just-planned '{}' with '{}'", .dest.display(), .source_path.display())]
    DuplicateDestination { dest: PathBuf, source_path: PathBuf },

    #[error("cannot determine a file name for source '{}'", .0.display())]
    NoFileName(PathBuf),

    #[error("walk source directory '{}': {source}", .root.display())]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("destination file exists (use -f to overwrite): '{}'", .0.display())]
    DestinationExists(PathBuf),

    #[error("write destination file '{}': short write ({written} of {expected} bytes)", .path.display())]
    ShortWrite {
        path: PathBuf,
        written: usize,
        expected: usize,
    },

    #[error("{op} '{}': {source}{}", .path.display(), hint_for(.source))]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("operation interrupted by user")]
    Interrupted,
}

impl CopyError {
    /// Wrap an io::Error with the operation attempted and the offending path.
    pub fn io(op: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        CopyError::Io {
            op,
            path: path.into(),
            source,
        }
    }

    /// Stable short code for structured logs.
    pub fn code(&self) -> &'static str {
        match self {
            CopyError::Config(_) => "config",
            CopyError::AmbiguousDestination(_) => "ambiguous_destination",
            CopyError::SymlinkRejected(_) => "symlink",
            CopyError::UnsupportedFileType(_) => "unsupported_type",
            CopyError::OmittingDirectory(_) => "omitting_directory",
            CopyError::OverwriteNonDirectory { .. } => "overwrite_non_directory",
            CopyError::CopyToItself(_) => "copy_to_itself",
            CopyError::CopyIntoItself { .. } => "copy_into_itself",
            CopyError::SameFile { .. } => "same_file",
            CopyError::DuplicateDestination { .. } => "duplicate_destination",
            CopyError::NoFileName(_) => "no_file_name",
            CopyError::Walk { .. } => "walk",
            CopyError::DestinationExists(_) => "destination_exists",
            CopyError::ShortWrite { .. } => "short_write",
            CopyError::Io { .. } => "io",
            CopyError::Interrupted => "interrupted",
        }
    }
}
