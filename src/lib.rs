//! Core library for `zcp`.
//!
//! Copying happens in two phases: [`fs_ops::build_plan`] validates every source
//! and produces an ordered list of primitive operations, then [`fs_ops::execute`]
//! carries them out while a [`progress::Reporter`] renders progress from the
//! byte counts it is fed.

pub mod cli;
pub mod config;
pub mod errors;
pub mod fs_ops;
pub mod output;
pub mod platform;
pub mod progress;
pub mod shutdown;
mod utils;

pub use config::{Config, LogLevel, Options};
pub use errors::CopyError;
pub use fs_ops::{CopyOperation, CopyPlan, DurabilityMode, build_plan, execute};
pub use progress::{NoProgress, ProgressSink, Reporter};
