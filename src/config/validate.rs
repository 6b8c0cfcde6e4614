//! Config validation logic.
//! Runs before any filesystem access; nothing here is retried or clamped.

use crate::errors::CopyError;

use super::types::Options;

const BUFFER_SIZE_MESSAGE: &str = "buffer-size must be greater than 0";

/// Validate a raw (signed, as typed by the user) buffer size.
pub fn validate_buffer_size(raw: i64) -> Result<usize, CopyError> {
    if raw <= 0 {
        return Err(CopyError::Config(BUFFER_SIZE_MESSAGE.into()));
    }
    usize::try_from(raw)
        .map_err(|_| CopyError::Config(format!("buffer-size {raw} is too large for this platform")))
}

impl Options {
    /// Check invariants the executor relies on.
    pub fn validate(&self) -> Result<(), CopyError> {
        if self.buffer_size == 0 {
            return Err(CopyError::Config(BUFFER_SIZE_MESSAGE.into()));
        }
        Ok(())
    }
}
