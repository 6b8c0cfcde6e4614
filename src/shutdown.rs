//! Process-wide shutdown coordination.
//! The Ctrl-C handler sets the flag; the executor checks it between operations.
//! A second Ctrl-C while the flag is already set aborts the process.
//!
//! Notes:
//! - Relaxed atomics are sufficient for a one-way "stop" flag.
//! - `request()` is safe to call from signal handlers.

use std::sync::atomic::{AtomicBool, Ordering};

static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Request a cooperative shutdown (idempotent).
/// Returns whether a shutdown had already been requested.
#[inline]
pub fn request() -> bool {
    SHUTDOWN.swap(true, Ordering::Relaxed)
}

/// Check whether a shutdown has been requested.
#[inline]
pub fn is_requested() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}

/// Clear the flag. Only meaningful for tests sharing one process.
#[doc(hidden)]
#[inline]
pub fn reset() {
    SHUTDOWN.store(false, Ordering::Relaxed);
}
