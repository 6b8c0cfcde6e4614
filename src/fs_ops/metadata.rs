//! Metadata preservation.
//! Copies permission bits and modification time recorded in the plan onto a destination.
//! Failures are fatal: a `-p` copy that cannot preserve is a failed copy.

use filetime::{FileTime, set_file_times};
use std::path::Path;
use std::time::SystemTime;
use tracing::trace;

use crate::errors::CopyError;
use crate::platform::set_permission_bits;

/// chmod `path` to `mode`, then set both atime and mtime to `modified`.
pub fn apply_metadata(path: &Path, mode: u32, modified: SystemTime) -> Result<(), CopyError> {
    set_permission_bits(path, mode).map_err(|e| CopyError::io("set mode on", path, e))?;
    trace!(path = %path.display(), mode = format!("{:o}", mode), "set permissions on destination");

    let ft = FileTime::from_system_time(modified);
    set_file_times(path, ft, ft).map_err(|e| CopyError::io("set modification time on", path, e))?;
    trace!(path = %path.display(), "set atime/mtime on destination");
    Ok(())
}
