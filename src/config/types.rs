//! Core configuration types.
//! - Options holds the copy flags consumed by the executor.
//! - Config wraps Options with the ambient settings (logging).
//! - LogLevel represents verbosity with simple parsing helpers.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::fs_ops::DurabilityMode;

use super::DEFAULT_BUFFER_SIZE;

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// No diagnostics at all (default; keeps stderr clean on success)
    #[default]
    Off,
    /// Warnings and errors
    Warn,
    /// Per-run summaries
    Info,
    /// Per-operation detail
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" | "none" | "quiet" => Some(LogLevel::Off),
            "warn" | "warning" | "error" | "normal" => Some(LogLevel::Warn),
            "info" | "verbose" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Off => "off",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// Copy flags. Built once from CLI + config file, read-only during execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Allow directory sources
    pub recursive: bool,
    /// Overwrite existing destination files
    pub force: bool,
    /// Copy permission bits and modification time
    pub preserve: bool,
    /// Suppress progress output
    pub quiet: bool,
    /// Print one line per copied file
    pub verbose: bool,
    /// I/O chunk size in bytes; must be > 0
    pub buffer_size: usize,
    /// What "closing" a destination file guarantees
    pub durability: DurabilityMode,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            recursive: false,
            force: false,
            preserve: false,
            quiet: false,
            verbose: false,
            buffer_size: DEFAULT_BUFFER_SIZE,
            durability: DurabilityMode::Data,
        }
    }
}

/// Runtime configuration: copy options plus logging settings.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub options: Options,
    /// Diagnostic verbosity (stderr)
    pub log_level: LogLevel,
    /// Optional path to a log file
    pub log_file: Option<PathBuf>,
    /// Emit diagnostics as JSON
    pub json: bool,
}
