//! Progress reporting.
//!
//! The executor pushes byte deltas through [`ProgressSink`]; a [`Reporter`] owns a
//! background thread that periodically renders a status line from those counts.
//!
//! Notes:
//! - The counter is an `AtomicU64` and the start instant is set once; the
//!   executor never blocks on rendering.
//! - Messages printed through [`Reporter::print_line`] share the output lock with
//!   the renderer, so they never land in the middle of a progress line.
//! - A disabled reporter (quiet, or nothing to copy) writes nothing at all.
//! - `stop()` is idempotent and also runs on drop, so the final 100% line is
//!   printed exactly once on every exit path.

pub mod format;

use std::io::{self, Write};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, OnceLock};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use self::format::format_progress_line;

const TERMINAL_INTERVAL: Duration = Duration::from_millis(120);
const PLAIN_INTERVAL: Duration = Duration::from_secs(1);

/// Receiver of copy progress notifications.
pub trait ProgressSink: Send + Sync {
    /// `n` more bytes were written to a destination.
    fn add(&self, n: u64);

    /// A destination file was fully written (and its metadata applied, if requested).
    fn file_copied(&self, _dest: &Path) {}
}

/// Sink that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn add(&self, _n: u64) {}
}

struct Output {
    writer: Box<dyn Write + Send>,
    last_len: usize,
}

struct ProgressState {
    total: u64,
    completed: AtomicU64,
    started_at: OnceLock<Instant>,
    terminal: bool,
    output: Mutex<Output>,
}

impl ProgressState {
    fn render(&self, done: u64, last: bool) {
        let done = done.min(self.total);
        let elapsed = self
            .started_at
            .get()
            .map(Instant::elapsed)
            .unwrap_or_default()
            .as_secs_f64();
        let rate = if elapsed > 0.0 { done as f64 / elapsed } else { 0.0 };
        let line = format_progress_line(done, self.total, rate);

        let Ok(mut out) = self.output.lock() else {
            return;
        };
        if let Err(e) = out.write_line(&line, self.terminal, last) {
            warn!(error = %e, "failed to write progress line");
        }
    }
}

impl Output {
    fn write_line(&mut self, line: &str, terminal: bool, last: bool) -> io::Result<()> {
        if terminal {
            let pad = self.last_len.saturating_sub(line.len());
            write!(self.writer, "\r{line}{}", " ".repeat(pad))?;
            self.last_len = line.len();
            if last {
                writeln!(self.writer)?;
                self.last_len = 0;
            }
        } else {
            writeln!(self.writer, "{line}")?;
        }
        self.writer.flush()
    }

    /// A full line of its own. A pending in-place progress line is erased first;
    /// the next render draws it again.
    fn write_message(&mut self, msg: &str) -> io::Result<()> {
        if self.last_len > 0 {
            write!(self.writer, "\r{}\r", " ".repeat(self.last_len))?;
            self.last_len = 0;
        }
        writeln!(self.writer, "{msg}")?;
        self.writer.flush()
    }
}

/// Periodic progress renderer.
pub struct Reporter {
    state: Arc<ProgressState>,
    enabled: bool,
    stop_tx: Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
    stopped: bool,
}

impl Reporter {
    /// Build a reporter writing to `output`. `terminal` selects in-place rendering.
    /// A zero `total` always disables the reporter.
    pub fn new(total: u64, enabled: bool, output: Box<dyn Write + Send>, terminal: bool) -> Self {
        Self {
            state: Arc::new(ProgressState {
                total,
                completed: AtomicU64::new(0),
                started_at: OnceLock::new(),
                terminal,
                output: Mutex::new(Output {
                    writer: output,
                    last_len: 0,
                }),
            }),
            enabled: enabled && total > 0,
            stop_tx: None,
            worker: None,
            stopped: false,
        }
    }

    /// Reporter on stdout; in-place rendering when stdout is a TTY.
    pub fn stdout(total: u64, enabled: bool) -> Self {
        let terminal = atty::is(atty::Stream::Stdout);
        Self::new(total, enabled, Box::new(io::stdout()), terminal)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Bytes reported so far (not clamped).
    pub fn completed(&self) -> u64 {
        self.state.completed.load(Ordering::Relaxed)
    }

    /// Spawn the render loop. No-op when disabled or already started/stopped.
    pub fn start(&mut self) {
        if !self.enabled || self.worker.is_some() || self.stopped {
            return;
        }
        let _ = self.state.started_at.set(Instant::now());

        let interval = if self.state.terminal {
            TERMINAL_INTERVAL
        } else {
            PLAIN_INTERVAL
        };
        let (tx, rx) = mpsc::channel::<()>();
        let state = Arc::clone(&self.state);
        let spawned = thread::Builder::new()
            .name("zcp-progress".into())
            .spawn(move || {
                loop {
                    match rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {
                            let done = state.completed.load(Ordering::Relaxed);
                            // 100% is left to the final render.
                            if done < state.total {
                                state.render(done, false);
                            }
                        }
                        _ => break,
                    }
                }
            });

        match spawned {
            Ok(handle) => {
                self.stop_tx = Some(tx);
                self.worker = Some(handle);
                debug!(total = self.state.total, ?interval, "progress reporter started");
            }
            Err(e) => warn!(error = %e, "could not spawn progress thread; showing final line only"),
        }
    }

    /// Print `msg` on the reporter's output as a line of its own, whether or not
    /// the progress bar is shown.
    pub fn print_line(&self, msg: &str) {
        let Ok(mut out) = self.state.output.lock() else {
            return;
        };
        if let Err(e) = out.write_message(msg) {
            warn!(error = %e, "failed to write output line");
        }
    }

    /// Final render at 100%, then join the render loop. Idempotent.
    pub fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        if !self.enabled {
            return;
        }

        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.worker.take()
            && handle.join().is_err()
        {
            warn!("progress thread panicked");
        }
        self.state.render(self.state.total, true);
    }
}

impl ProgressSink for Reporter {
    fn add(&self, n: u64) {
        if self.enabled {
            self.state.completed.fetch_add(n, Ordering::Relaxed);
        }
    }
}

impl Drop for Reporter {
    fn drop(&mut self) {
        self.stop();
    }
}
