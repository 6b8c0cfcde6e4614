//! Application orchestrator.
//! Validates flags, loads/merges config, initializes logging, installs the Ctrl-C
//! handler, then builds and executes the copy plan with a progress reporter.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, error, info, warn};

use zcp::cli::Args;
use zcp::config::{CONFIG_ENV, Config, config_location, load_config};
use zcp::errors::CopyError;
use zcp::fs_ops::{build_plan, execute};
use zcp::output as out;
use zcp::progress::{ProgressSink, Reporter};
use zcp::shutdown;

use crate::logging::init_tracing;

/// Progress sink for a CLI run: forwards bytes to the reporter and, with
/// `--verbose`, announces each finished destination on stdout.
struct RunSink<'a> {
    reporter: &'a Reporter,
    verbose: bool,
}

impl ProgressSink for RunSink<'_> {
    fn add(&self, n: u64) {
        self.reporter.add(n);
    }

    fn file_copied(&self, dest: &Path) {
        if self.verbose {
            self.reporter.print_line(&format!("created: {}", dest.display()));
        }
    }
}

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    // Handle --print-config before anything else
    if args.print_config {
        print_config();
        return Ok(());
    }

    args.validate()?;
    let (sources, dest) = args.split_paths()?;

    // Build config: defaults < config file < CLI flags.
    let mut cfg = Config::default();
    if let Some((path, file)) = load_config()? {
        file.apply_to(&mut cfg)
            .with_context(|| format!("config file '{}'", path.display()))?;
    }
    args.apply_overrides(&mut cfg)?;
    cfg.options.validate()?;

    // Held until return so the file appender flushes.
    let _guard = init_tracing(&cfg.log_level, cfg.log_file.as_deref(), cfg.json)?;
    install_interrupt_handler();

    debug!(?sources, dest = %dest.display(), options = ?cfg.options, "starting zcp");

    let result = copy(&sources, &dest, &cfg);
    if let Err(e) = &result {
        match e.downcast_ref::<CopyError>() {
            Some(ce) => error!(code = ce.code(), error = %ce, "copy failed"),
            None => error!(error = %e, "copy failed"),
        }
    }
    result
}

fn copy(sources: &[std::path::PathBuf], dest: &Path, cfg: &Config) -> Result<()> {
    let plan = build_plan(sources, dest, cfg.options.recursive)?;

    let mut reporter = Reporter::stdout(plan.total_bytes, !cfg.options.quiet);
    reporter.start();
    let sink = RunSink {
        reporter: &reporter,
        verbose: cfg.options.verbose,
    };
    let executed = execute(&plan, &cfg.options, &sink);
    // Runs on error too; Drop would cover an early return or panic.
    reporter.stop();
    executed?;

    info!(
        files = plan.file_count(),
        bytes = plan.total_bytes,
        "copy complete"
    );
    out::print_user(&out::summary_line(plan.file_count(), plan.total_bytes));
    Ok(())
}

/// Exit status for a run aborted by a second interrupt (128 + SIGINT).
const ABORT_EXIT_CODE: i32 = 130;

#[derive(Debug, PartialEq, Eq)]
enum InterruptAction {
    /// Finish the current file, then stop.
    Graceful,
    /// Already asked once; leave now.
    Abort,
}

fn on_interrupt() -> InterruptAction {
    if shutdown::request() {
        InterruptAction::Abort
    } else {
        InterruptAction::Graceful
    }
}

fn install_interrupt_handler() {
    let installed = ctrlc::set_handler(|| match on_interrupt() {
        InterruptAction::Graceful => {
            out::print_warn(
                "interrupt received; stopping after the current file (Ctrl-C again to abort)",
            );
        }
        InterruptAction::Abort => {
            out::print_warn("interrupted again; aborting");
            std::process::exit(ABORT_EXIT_CODE);
        }
    });
    if let Err(e) = installed {
        warn!(error = %e, "could not install Ctrl-C handler");
    }
}

fn print_config() {
    match config_location() {
        Some(loc) if loc.explicit => {
            out::print_user(&format!("{} (from {CONFIG_ENV})", loc.path.display()));
        }
        Some(loc) => {
            let state = if loc.path.exists() { "exists" } else { "not present; defaults apply" };
            out::print_user(&format!("{} ({state})", loc.path.display()));
        }
        None => out::print_user("no config location available; defaults apply"),
    }
}
