//! Copy-plan builder.
//!
//! Turns `SOURCE... DEST` plus the recursive flag into an ordered list of
//! primitive operations. All validation happens here, before anything is
//! written: the plan is all-or-nothing.
//!
//! Ordering: sources keep their command-line order; each directory tree is
//! walked pre-order (sorted by file name), so a directory's `CreateDirectory`
//! always precedes the operations for anything beneath it.

use anyhow::Result;
use std::collections::HashSet;
use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::errors::CopyError;
use crate::platform::{permission_bits, same_file};
use crate::utils::{ensure_destination_outside_source, lexical_clean, source_name};

/// One primitive filesystem operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOperation {
    CreateDirectory {
        source: PathBuf,
        destination: PathBuf,
        mode: u32,
        modified: SystemTime,
    },
    CopyFile {
        source: PathBuf,
        destination: PathBuf,
        mode: u32,
        modified: SystemTime,
        size: u64,
    },
}

impl CopyOperation {
    pub fn source(&self) -> &Path {
        match self {
            CopyOperation::CreateDirectory { source, .. } | CopyOperation::CopyFile { source, .. } => {
                source
            }
        }
    }

    pub fn destination(&self) -> &Path {
        match self {
            CopyOperation::CreateDirectory { destination, .. }
            | CopyOperation::CopyFile { destination, .. } => destination,
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, CopyOperation::CopyFile { .. })
    }
}

/// Ordered operations plus the number of bytes they will transfer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyPlan {
    pub operations: Vec<CopyOperation>,
    pub total_bytes: u64,
}

impl CopyPlan {
    /// Number of `CopyFile` operations.
    pub fn file_count(&self) -> usize {
        self.operations.iter().filter(|op| op.is_file()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CopyOperation> {
        self.operations.iter()
    }

    /// Append `op`, enforcing unique destinations.
    fn push(&mut self, op: CopyOperation, seen: &mut HashSet<PathBuf>) -> Result<(), CopyError> {
        if !seen.insert(op.destination().to_path_buf()) {
            return Err(CopyError::DuplicateDestination {
                dest: op.destination().to_path_buf(),
                source_path: op.source().to_path_buf(),
            });
        }
        if let CopyOperation::CopyFile { size, .. } = &op {
            self.total_bytes += *size;
        }
        self.operations.push(op);
        Ok(())
    }
}

impl<'a> IntoIterator for &'a CopyPlan {
    type Item = &'a CopyOperation;
    type IntoIter = std::slice::Iter<'a, CopyOperation>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.iter()
    }
}

fn modified_of(meta: &Metadata) -> SystemTime {
    meta.modified().unwrap_or(SystemTime::UNIX_EPOCH)
}

/// Build the plan for copying `sources` to `destination`.
///
/// Fails fast on the first invalid source; nothing is written either way.
pub fn build_plan<P: AsRef<Path>>(sources: &[P], destination: &Path, recursive: bool) -> Result<CopyPlan> {
    // 1) Destination: a missing destination is fine, any other stat failure is not.
    let dest_meta = match fs::metadata(destination) {
        Ok(m) => Some(m),
        Err(e) if e.kind() == io::ErrorKind::NotFound => None,
        Err(e) => return Err(CopyError::io("stat destination", destination, e).into()),
    };
    let dest_exists = dest_meta.is_some();
    let dest_is_dir = dest_meta.as_ref().is_some_and(|m| m.is_dir());

    // 2) Several sources need an existing directory to land in.
    let multiple = sources.len() > 1;
    if multiple && !dest_is_dir {
        return Err(CopyError::AmbiguousDestination(destination.to_path_buf()).into());
    }

    let mut plan = CopyPlan::default();
    let mut seen = HashSet::new();

    for source in sources {
        let source = lexical_clean(source.as_ref());

        // 3a) Never follow or recreate symlinks.
        let meta = fs::symlink_metadata(&source).map_err(|e| CopyError::io("stat source", &source, e))?;
        let file_type = meta.file_type();
        if file_type.is_symlink() {
            return Err(CopyError::SymlinkRejected(source).into());
        }

        // 3b) Effective target path.
        let target = if multiple || dest_is_dir {
            destination.join(source_name(&source)?)
        } else {
            destination.to_path_buf()
        };

        if file_type.is_dir() {
            // 3c)
            if !recursive {
                return Err(CopyError::OmittingDirectory(source).into());
            }
            // 3d)
            if dest_exists && !dest_is_dir && !multiple {
                return Err(CopyError::OverwriteNonDirectory {
                    dest: destination.to_path_buf(),
                    source_dir: source,
                }
                .into());
            }
            // 3e)
            ensure_destination_outside_source(&source, &target)?;
            // 3f)
            collect_directory(&source, &target, &mut plan, &mut seen)?;
            continue;
        }

        if !file_type.is_file() {
            return Err(CopyError::UnsupportedFileType(source).into());
        }

        // 3g) Same entity on disk (hard link, `a` vs `./a`, ...).
        let identical = same_file(&source, &target)
            .map_err(|e| CopyError::io("compare source and destination", &target, e))?;
        if identical {
            return Err(CopyError::SameFile {
                source_file: source,
                dest: target,
            }
            .into());
        }

        debug!(src = %source.display(), dest = %target.display(), size = meta.len(), "plan: copy file");
        plan.push(
            CopyOperation::CopyFile {
                mode: permission_bits(&meta),
                modified: modified_of(&meta),
                size: meta.len(),
                source,
                destination: target,
            },
            &mut seen,
        )?;
    }

    info!(
        operations = plan.len(),
        files = plan.file_count(),
        total_bytes = plan.total_bytes,
        "Copy plan built"
    );
    Ok(plan)
}

/// Pre-order walk of `source_root`, translating each path onto `target_root`.
fn collect_directory(
    source_root: &Path,
    target_root: &Path,
    plan: &mut CopyPlan,
    seen: &mut HashSet<PathBuf>,
) -> Result<(), CopyError> {
    let walk_err = |e: walkdir::Error| CopyError::Walk {
        root: source_root.to_path_buf(),
        source: e,
    };

    for entry in WalkDir::new(source_root).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(walk_err)?;
        let path = entry.path();
        let file_type = entry.file_type();

        if file_type.is_symlink() {
            return Err(CopyError::SymlinkRejected(path.to_path_buf()));
        }

        let meta = entry.metadata().map_err(walk_err)?;
        let rel = path
            .strip_prefix(source_root)
            .map_err(|_| CopyError::NoFileName(path.to_path_buf()))?;
        // Joining an empty relative path would append a trailing separator.
        let destination = if rel.as_os_str().is_empty() {
            target_root.to_path_buf()
        } else {
            target_root.join(rel)
        };

        let op = if file_type.is_dir() {
            debug!(src = %path.display(), dest = %destination.display(), "plan: create directory");
            CopyOperation::CreateDirectory {
                source: path.to_path_buf(),
                destination,
                mode: permission_bits(&meta),
                modified: modified_of(&meta),
            }
        } else if file_type.is_file() {
            debug!(src = %path.display(), dest = %destination.display(), size = meta.len(), "plan: copy file");
            CopyOperation::CopyFile {
                source: path.to_path_buf(),
                destination,
                mode: permission_bits(&meta),
                modified: modified_of(&meta),
                size: meta.len(),
            }
        } else {
            return Err(CopyError::UnsupportedFileType(path.to_path_buf()));
        };
        plan.push(op, seen)?;
    }
    Ok(())
}
