//! Platform-specific helpers.
//! This module hides OS differences (Unix/Windows) behind a uniform API so
//! the plan builder and executor can remain platform-agnostic.

#[cfg(unix)]
mod unix;
#[cfg(not(unix))]
mod windows;

#[cfg(unix)]
pub use unix::{
    close_file, create_dir_with_mode, open_destination, open_log_file_secure_append, permission_bits,
    same_file, set_permission_bits,
};

#[cfg(not(unix))]
pub use windows::{
    close_file, create_dir_with_mode, open_destination, open_log_file_secure_append, permission_bits,
    same_file, set_permission_bits,
};
