//! Progress-line formatting helpers (pure functions).

use std::time::Duration;

const UNITS: [&str; 6] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB"];

/// Width of the bar between the brackets.
pub const BAR_WIDTH: usize = 30;

/// `[=====>      ]` style bar body, `width` cells wide.
/// `=` for filled cells, one `>` at the edge while partially filled, spaces after.
pub fn build_bar(percentage: f64, width: usize) -> String {
    if width == 0 {
        return String::new();
    }

    let filled = ((percentage / 100.0) * width as f64).round();
    let filled = if filled.is_nan() || filled <= 0.0 {
        0
    } else {
        (filled as usize).min(width)
    };

    match filled {
        0 => " ".repeat(width),
        f if f >= width => "=".repeat(width),
        f => format!("{}>{}", "=".repeat(f - 1), " ".repeat(width - f)),
    }
}

/// 1024-based human size: "512 B", "1.5 KiB", "2.0 MiB".
pub fn humanize_bytes(value: u64) -> String {
    if value < 1024 {
        return format!("{value} B");
    }

    let mut size = value as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{size:.1} {}", UNITS[unit])
}

/// Like [`humanize_bytes`] for a (fractional) per-second rate, without the "/s".
pub fn humanize_rate(bytes_per_second: f64) -> String {
    if bytes_per_second.is_nan() || bytes_per_second <= 0.0 {
        return "0 B".to_string();
    }

    let mut value = bytes_per_second;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{value:.0} {}", UNITS[unit])
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

/// `mm:ss`, or `hh:mm:ss` from one hour up. Rounded to the nearest second.
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs_f64().round() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}

/// Percentage of `done` in `total`, floored to two decimals.
/// Never reads 100.00 until `done` reaches `total`.
pub fn percentage(done: u64, total: u64) -> f64 {
    if total == 0 || done >= total {
        return 100.0;
    }
    let raw = done as f64 / total as f64 * 100.0;
    ((raw * 100.0).floor() / 100.0).min(99.99)
}

/// Full status line: bar, percentage, done/total, throughput and ETA.
pub fn format_progress_line(done: u64, total: u64, bytes_per_second: f64) -> String {
    if total == 0 {
        return format!(
            "[{}] 100.00% 0 B/0 B 0 B/s ETA 00:00",
            "=".repeat(BAR_WIDTH)
        );
    }

    let percentage = percentage(done, total);

    let eta = if done < total && bytes_per_second > 0.0 {
        let remaining = (total - done) as f64 / bytes_per_second;
        format_duration(Duration::try_from_secs_f64(remaining).unwrap_or(Duration::MAX))
    } else {
        "00:00".to_string()
    };

    format!(
        "[{}] {:6.2}% {}/{} {}/s ETA {}",
        build_bar(percentage, BAR_WIDTH),
        percentage,
        humanize_bytes(done),
        humanize_bytes(total),
        humanize_rate(bytes_per_second),
        eta,
    )
}
