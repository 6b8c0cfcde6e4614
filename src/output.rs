use owo_colors::OwoColorize;

use crate::progress::format::humanize_bytes;

/// Small wrapper around stdout/stderr printing for user-facing lines.
/// Colors are enabled only when the stream is a TTY.
fn stderr_is_tty() -> bool {
    atty::is(atty::Stream::Stderr)
}

/// `zcp: <msg>` on stderr.
pub fn print_error(msg: &str) {
    if stderr_is_tty() {
        eprintln!("{} {}", "zcp:".red().bold(), msg);
    } else {
        eprintln!("zcp: {}", msg);
    }
}

pub fn print_warn(msg: &str) {
    if stderr_is_tty() {
        eprintln!("{} {}", "zcp: warning:".yellow().bold(), msg);
    } else {
        eprintln!("zcp: warning: {}", msg);
    }
}

/// Print a plain user-facing line (no prefix). Scripts may parse these.
pub fn print_user(msg: &str) {
    println!("{}", msg);
}

/// One line for an error and its causes, `outer: inner: root`.
/// A cause already quoted by the message above it is not repeated.
pub fn error_chain(err: &anyhow::Error) -> String {
    let mut msg = err.to_string();
    for cause in err.chain().skip(1) {
        let text = cause.to_string();
        if !msg.contains(&text) {
            msg.push_str(": ");
            msg.push_str(&text);
        }
    }
    msg
}

/// `Copied 3 file(s), 1.5 KiB total.`
pub fn summary_line(files: usize, bytes: u64) -> String {
    format!("Copied {} file(s), {} total.", files, humanize_bytes(bytes))
}
