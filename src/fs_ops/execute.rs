//! Plan executor.
//!
//! Runs a [`CopyPlan`] strictly in order. The first failure aborts the run;
//! anything already written stays where it is.
//!
//! With `preserve`, directory timestamps are applied in a second pass, deepest
//! first, after every file below them has been written.

use anyhow::Result;
use std::path::Path;
use std::time::SystemTime;
use tracing::{debug, info};

use crate::config::Options;
use crate::errors::CopyError;
use crate::fs_ops::io_copy::copy_streaming;
use crate::fs_ops::metadata::apply_metadata;
use crate::fs_ops::plan::{CopyOperation, CopyPlan};
use crate::platform::create_dir_with_mode;
use crate::progress::ProgressSink;
use crate::shutdown;

/// Mode for parent directories the plan did not create itself.
const PARENT_DIR_MODE: u32 = 0o755;

/// Execute `plan` with `options`, reporting written bytes to `sink`.
pub fn execute(plan: &CopyPlan, options: &Options, sink: &dyn ProgressSink) -> Result<()> {
    options.validate()?;

    let mut created_dirs: Vec<(&Path, u32, SystemTime)> = Vec::new();
    let mut files = 0usize;
    let mut bytes = 0u64;

    for (index, op) in plan.iter().enumerate() {
        if shutdown::is_requested() {
            info!(completed = index, remaining = plan.len() - index, "shutdown requested; stopping before next operation");
            return Err(CopyError::Interrupted.into());
        }

        match op {
            CopyOperation::CreateDirectory {
                destination,
                mode,
                modified,
                ..
            } => {
                create_dir_with_mode(destination, *mode)
                    .map_err(|e| CopyError::io("create directory", destination, e))?;
                debug!(dest = %destination.display(), mode = format!("{:o}", mode), "created directory");
                if options.preserve {
                    created_dirs.push((destination.as_path(), *mode, *modified));
                }
            }
            CopyOperation::CopyFile {
                source,
                destination,
                mode,
                modified,
                ..
            } => {
                if let Some(parent) = destination.parent()
                    && !parent.as_os_str().is_empty()
                {
                    create_dir_with_mode(parent, PARENT_DIR_MODE)
                        .map_err(|e| CopyError::io("create destination parent for", destination, e))?;
                }

                let res = copy_streaming(source, destination, *mode, options, sink)?;
                if options.preserve {
                    apply_metadata(destination, *mode, *modified)?;
                }
                debug!(
                    src = %source.display(),
                    dest = %destination.display(),
                    bytes = res.bytes,
                    buf_size = res.buf_size,
                    durability = ?res.mode,
                    "copied file"
                );
                files += 1;
                bytes += res.bytes;
                sink.file_copied(destination);
            }
        }
    }

    // Deepest first: fixing a parent must come after its children are done.
    for (dir, mode, modified) in created_dirs.iter().rev() {
        apply_metadata(dir, *mode, *modified)?;
    }

    info!(files, bytes, operations = plan.len(), "plan executed");
    Ok(())
}
