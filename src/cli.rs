//! CLI definition and parsing.
//! Defines Args and provides parse() for command-line handling.
//!
//! Notes:
//! - The last PATH is the destination; everything before it is a source.
//! - --debug is a shorthand for --log-level debug.
//! - --no-force/--no-preserve/--no-quiet switch off a value set in the config
//!   file; the later of a flag and its negation wins.
//! - --buffer-size accepts negative numbers at the parser level so that the
//!   range check reports them with the same message as zero.

use clap::{Parser, ValueHint};
use std::path::PathBuf;

use crate::config::types::{Config, LogLevel};
use crate::config::validate_buffer_size;
use crate::errors::CopyError;
use crate::fs_ops::DurabilityMode;

/// Copy files and directories with progress reporting.
/// CLI flags override config values (which are loaded from XML if present).
#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "zcp",
    author,
    version,
    about = "Copy files and directories with a progress bar",
    override_usage = "zcp [OPTIONS] SOURCE... DEST"
)]
pub struct Args {
    /// Sources followed by the destination.
    #[arg(value_name = "PATH", value_hint = ValueHint::AnyPath)]
    pub paths: Vec<PathBuf>,

    /// Copy directories recursively.
    #[arg(short, long)]
    pub recursive: bool,

    /// Overwrite existing destination files.
    #[arg(short, long, overrides_with = "no_force")]
    pub force: bool,

    /// Never overwrite, even if the config file enables force.
    #[arg(long, overrides_with = "force")]
    pub no_force: bool,

    /// Preserve permission bits and modification times.
    #[arg(short, long, overrides_with = "no_preserve")]
    pub preserve: bool,

    /// Do not preserve metadata, even if the config file enables it.
    #[arg(long, overrides_with = "preserve")]
    pub no_preserve: bool,

    /// Suppress the progress bar.
    #[arg(short, long, overrides_with = "no_quiet")]
    pub quiet: bool,

    /// Show the progress bar, even if the config file sets quiet.
    #[arg(long, overrides_with = "quiet")]
    pub no_quiet: bool,

    /// Print each destination file as it is created.
    #[arg(short, long)]
    pub verbose: bool,

    /// I/O buffer size in bytes (default 1 MiB).
    #[arg(long, value_name = "BYTES", allow_negative_numbers = true)]
    pub buffer_size: Option<i64>,

    /// Sync every destination file to stable storage before closing it.
    #[arg(long)]
    pub fsync: bool,

    /// Set log level. One of: off, warn, info, debug.
    #[arg(long, value_name = "LEVEL", help = "Set log level: off, warn, info, debug")]
    pub log_level: Option<String>,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(short = 'd', long)]
    pub debug: bool,

    /// Also append logs to this file.
    #[arg(long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,

    /// Emit logs in structured JSON (includes timestamp, level, and structured fields).
    #[arg(long)]
    pub json: bool,

    /// Print the config file location used by zcp and exit.
    #[arg(long)]
    pub print_config: bool,
}

impl Args {
    /// `(sources, dest)`; at least one of each is required.
    pub fn split_paths(&self) -> Result<(Vec<PathBuf>, PathBuf), CopyError> {
        match self.paths.split_last() {
            Some((dest, sources)) if !sources.is_empty() => Ok((sources.to_vec(), dest.clone())),
            _ => Err(CopyError::Config(
                "expected at least one SOURCE and one DEST".to_string(),
            )),
        }
    }

    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Result<Option<LogLevel>, CopyError> {
        if self.debug {
            return Ok(Some(LogLevel::Debug));
        }
        self.log_level
            .as_deref()
            .map(|s| s.parse::<LogLevel>().map_err(CopyError::Config))
            .transpose()
    }

    /// Check flag values that need no filesystem access.
    pub fn validate(&self) -> Result<(), CopyError> {
        self.split_paths()?;
        if let Some(raw) = self.buffer_size {
            validate_buffer_size(raw)?;
        }
        self.effective_log_level()?;
        Ok(())
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) -> Result<(), CopyError> {
        let opts = &mut cfg.options;
        opts.recursive |= self.recursive;
        opts.force = (opts.force || self.force) && !self.no_force;
        opts.preserve = (opts.preserve || self.preserve) && !self.no_preserve;
        opts.quiet = (opts.quiet || self.quiet) && !self.no_quiet;
        opts.verbose |= self.verbose;
        if let Some(raw) = self.buffer_size {
            opts.buffer_size = validate_buffer_size(raw)?;
        }
        if self.fsync {
            opts.durability = DurabilityMode::Full;
        }
        if let Some(level) = self.effective_log_level()? {
            cfg.log_level = level;
        }
        if let Some(path) = &self.log_file {
            cfg.log_file = Some(path.clone());
        }
        cfg.json |= self.json;
        Ok(())
    }
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("zcp").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn splits_sources_and_destination() {
        let a = args(&["a", "b", "out"]);
        let (sources, dest) = a.split_paths().unwrap();
        assert_eq!(sources, vec![PathBuf::from("a"), PathBuf::from("b")]);
        assert_eq!(dest, PathBuf::from("out"));
    }

    #[test]
    fn needs_two_paths() {
        for argv in [&[][..], &["only"][..]] {
            let err = args(argv).split_paths().unwrap_err();
            assert_eq!(err.to_string(), "expected at least one SOURCE and one DEST");
        }
    }

    #[test]
    fn negative_buffer_size_reaches_validation() {
        let a = args(&["--buffer-size", "-4", "a", "b"]);
        assert_eq!(a.buffer_size, Some(-4));
        let err = a.validate().unwrap_err();
        assert_eq!(err.to_string(), "buffer-size must be greater than 0");
    }

    #[test]
    fn short_flags_combine() {
        let a = args(&["-rfpqv", "a", "b"]);
        assert!(a.recursive && a.force && a.preserve && a.quiet && a.verbose);
    }

    #[test]
    fn debug_wins_over_log_level() {
        let a = args(&["--log-level", "warn", "--debug", "a", "b"]);
        assert_eq!(a.effective_log_level().unwrap(), Some(LogLevel::Debug));
        let a = args(&["--log-level", "loud", "a", "b"]);
        assert!(matches!(a.validate(), Err(CopyError::Config(_))));
    }

    #[test]
    fn overrides_win_over_file_values() {
        let mut cfg = Config::default();
        cfg.options.buffer_size = 4096;
        cfg.log_level = LogLevel::Warn;

        args(&["--buffer-size", "17", "--fsync", "--log-level", "info", "-p", "a", "b"])
            .apply_overrides(&mut cfg)
            .unwrap();
        assert_eq!(cfg.options.buffer_size, 17);
        assert_eq!(cfg.options.durability, DurabilityMode::Full);
        assert_eq!(cfg.log_level, LogLevel::Info);
        assert!(cfg.options.preserve);

        // unset flags leave file values alone
        let mut cfg = Config::default();
        cfg.options.force = true;
        cfg.options.buffer_size = 4096;
        args(&["a", "b"]).apply_overrides(&mut cfg).unwrap();
        assert!(cfg.options.force);
        assert_eq!(cfg.options.buffer_size, 4096);
    }

    #[test]
    fn negations_turn_off_file_values() {
        let mut cfg = Config::default();
        cfg.options.force = true;
        cfg.options.preserve = true;
        cfg.options.quiet = true;
        args(&["--no-force", "--no-preserve", "--no-quiet", "a", "b"])
            .apply_overrides(&mut cfg)
            .unwrap();
        assert!(!cfg.options.force && !cfg.options.preserve && !cfg.options.quiet);
    }

    #[test]
    fn later_of_flag_and_negation_wins() {
        let a = args(&["-f", "--no-force", "a", "b"]);
        assert!(!a.force && a.no_force);
        let a = args(&["--no-force", "-f", "a", "b"]);
        assert!(a.force && !a.no_force);

        let mut cfg = Config::default();
        a.apply_overrides(&mut cfg).unwrap();
        assert!(cfg.options.force);
    }
}
