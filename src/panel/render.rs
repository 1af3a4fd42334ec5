use crate::panel::animator::AnimationState;
use crate::panel::constants::{
    ACCEPTABLE_LATENCY_MS, FAST_LATENCY_MS, MARKER_DARKEN_PERCENT, TRACK_CELL_WIDTH,
};
use crate::panel::ledger::RequestRecord;
use crate::panel::palette::Rgb;
use crate::panel::stats::LatencySummary;
use colored::*;

/// Shown while the ledger is empty
pub const EMPTY_STATE_MESSAGE: &str =
    "Waiting for network requests. Feed finished-request events to start the panel.";

const LABEL_WIDTH: usize = 24;

/// Human-readable byte size: base 1024, one decimal place, trailing ".0"
/// trimmed ("1.5 KB", "2 KB", "0 B")
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let exponent = ((bytes as f64).ln() / 1024f64.ln()).floor() as usize;
    let exponent = exponent.min(UNITS.len() - 1);
    let value = bytes as f64 / 1024f64.powi(exponent as i32);
    let formatted = format!("{:.1}", value);
    let trimmed = formatted.strip_suffix(".0").unwrap_or(&formatted);
    format!("{} {}", trimmed, UNITS[exponent])
}

fn truncate_label(label: &str, width: usize) -> String {
    if label.chars().count() <= width {
        return label.to_string();
    }
    let mut out: String = label.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn latency_colored(latency_ms: u64) -> ColoredString {
    let text = format!("{}ms", latency_ms);
    if latency_ms < FAST_LATENCY_MS {
        text.green()
    } else if latency_ms < ACCEPTABLE_LATENCY_MS {
        text.yellow()
    } else {
        text.red()
    }
}

/// One marker row: label column on the left, the bounce track on the right.
///
/// The track maps the animator's pixel geometry onto terminal cells; the
/// marker cell carries the record's fill color, the rest of the track its
/// darkened trim color.
pub fn render_row(record: &RequestRecord, state: &AnimationState, color: Rgb) -> String {
    let label = truncate_label(&record.label(), LABEL_WIDTH);
    let info = format!(
        "{} {} {}",
        record.resource_type,
        format_size(record.size_bytes),
        latency_colored(record.latency_ms)
    );

    let span = state.end_x - state.start_x;
    let cells = if span > 0.0 {
        (span / TRACK_CELL_WIDTH).floor() as usize + 1
    } else {
        1
    };
    let marker_cell = if span > 0.0 {
        (((state.current_x - state.start_x) / span) * (cells - 1) as f64).round() as usize
    } else {
        0
    };

    let trim = color.darken(MARKER_DARKEN_PERCENT);
    let mut track = String::new();
    for cell in 0..cells {
        if cell == marker_cell.min(cells - 1) {
            track.push_str(&"●".truecolor(color.r, color.g, color.b).to_string());
        } else {
            track.push_str(&"·".truecolor(trim.r, trim.g, trim.b).to_string());
        }
    }

    format!("{:<label_width$} {}  {}", label, info, track, label_width = LABEL_WIDTH)
}

/// Footer line summarizing observed latencies. Band counts reuse the
/// colors the rows grade latencies with.
pub fn render_summary(summary: &LatencySummary) -> String {
    if summary.count() == 0 {
        return String::new();
    }
    format!(
        "{} requests  {} fast / {} ok / {} slow  mean {:.0}ms  p50 {}ms  p99 {}ms  range {}-{}ms",
        summary.count(),
        summary.fast_count().to_string().green(),
        summary.acceptable_count().to_string().yellow(),
        summary.slow_count().to_string().red(),
        summary.mean(),
        summary.percentile(0.5),
        summary.percentile(0.99),
        summary.min(),
        summary.max()
    )
}

/// Header line with the current tuning
pub fn render_header(palette_name: &str, speed_multiplier: f64) -> String {
    format!(
        "{}  palette: {}  speed: {:.3}x",
        "netbounce".bold(),
        palette_name.cyan(),
        speed_multiplier
    )
}

/// User-visible status line for capture failures
pub fn render_status(message: &str) -> String {
    message.yellow().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size_units() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1024), "1 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(1024 * 1024), "1 MB");
        assert_eq!(format_size(1024 * 1024 * 1024), "1 GB");
        assert_eq!(format_size(2_621_440), "2.5 MB");
    }

    #[test]
    fn test_truncate_label() {
        assert_eq!(truncate_label("short.js", 24), "short.js");
        let long = "a-very-long-resource-name-that-keeps-going.min.js";
        let truncated = truncate_label(long, 10);
        assert_eq!(truncated.chars().count(), 10);
        assert!(truncated.ends_with('…'));
    }

    #[test]
    fn test_render_row_contains_fields() {
        use crate::panel::ledger::{sample_event, RequestLedger};

        colored::control::set_override(false);
        let mut ledger = RequestLedger::new();
        let admitted = ledger
            .ingest(&sample_event("https://t/app.js", 42.0), 0)
            .unwrap();
        let record = ledger.get(&admitted.id).unwrap();
        let state = AnimationState::new(42, 0.0, 80.0);

        let row = render_row(record, &state, Rgb::new(255, 0, 0));
        assert!(row.contains("app.js"));
        assert!(row.contains("script"));
        assert!(row.contains("42ms"));
        assert!(row.contains('●'));
        colored::control::unset_override();
    }

    #[test]
    fn test_render_row_degenerate_span_still_renders() {
        use crate::panel::ledger::{sample_event, RequestLedger};

        let mut ledger = RequestLedger::new();
        let admitted = ledger
            .ingest(&sample_event("https://t/app.js", 42.0), 0)
            .unwrap();
        let record = ledger.get(&admitted.id).unwrap();
        let state = AnimationState::new(42, 270.0, 100.0);

        // Narrow container: no panic, marker parked on a single cell
        let row = render_row(record, &state, Rgb::new(255, 0, 0));
        assert!(row.contains('●'));
    }

    #[test]
    fn test_render_summary_empty_is_blank() {
        let summary = LatencySummary::new().unwrap();
        assert!(render_summary(&summary).is_empty());
    }

    #[test]
    fn test_render_summary_reports_bands() {
        colored::control::set_override(false);
        let mut summary = LatencySummary::new().unwrap();
        summary.record(42);
        summary.record(250);
        summary.record(800);

        let footer = render_summary(&summary);
        assert!(footer.contains("3 requests"));
        assert!(footer.contains("1 fast / 1 ok / 1 slow"));
        assert!(footer.contains("range 42-800ms"));
        colored::control::unset_override();
    }
}
