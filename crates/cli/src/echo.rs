use std::time::Duration;

use owo_colors::OwoColorize;
use readable_core::ExtractionResult;

use crate::VERSION;

/// Kind of a one-line status message on stderr
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Info,
    Done,
    Warning,
}

impl Status {
    fn tag(self) -> &'static str {
        match self {
            Status::Info => "info",
            Status::Done => "done",
            Status::Warning => "warn",
        }
    }
}

/// Print a status line, tagged and colored by kind
pub fn status(kind: Status, message: &str) {
    let tag = format!("{:>5}", kind.tag());
    match kind {
        Status::Info => eprintln!("{} {}", tag.blue().bold(), message),
        Status::Done => eprintln!("{} {}", tag.green().bold(), message),
        Status::Warning => eprintln!("{} {}", tag.yellow().bold(), message),
    }
}

/// Name and version, shown once at the top of verbose output
pub fn print_banner() {
    eprintln!("{} {}", "readable".bold().bright_blue(), VERSION.dimmed());
}

fn step_label(step: usize, total: usize) -> String {
    format!("{:>5}", format!("{}/{}", step, total))
}

/// Print a pipeline step as `1/3 message`
pub fn print_step(step: usize, total: usize, message: &str) {
    eprintln!("{} {}", step_label(step, total).bright_cyan().bold(), message);
}

/// Print a labelled value under the current step
pub fn print_field(label: &str, value: &str) {
    eprintln!("      {} {}", format!("{}:", label).dimmed(), value.bright_white());
}

fn section(title: &str) {
    eprintln!("\n{}", title.bold().cyan());
    eprintln!("{}", "─".repeat(title.chars().count()).dimmed());
}

/// Print a summary of the extracted article
pub fn print_extraction_details(result: &ExtractionResult) {
    section("Extraction Details");

    if result.title.is_empty() {
        status(Status::Warning, "document has no title");
    } else {
        print_field("Title", &result.title);
    }
    print_field("Words", &result.word_count.to_string());
    print_field("Characters", &result.length.to_string());
    if let Some(url) = &result.source_url {
        print_field("Source", url);
    }
    eprintln!();
}

/// Rough speed bucket for a stage duration
fn pace(duration: Duration) -> &'static str {
    match duration.as_millis() {
        0..50 => "fast",
        50..100 => "moderate",
        _ => "slow",
    }
}

/// Print per-stage timings followed by the total
pub fn print_timing_summary(total: Duration, timings: &[(&str, Duration)]) {
    section("Timings");

    for (label, duration) in timings {
        let ms = format!("{:>8.2}ms", duration.as_secs_f64() * 1000.0);
        match pace(*duration) {
            "fast" => eprintln!("      {:<8} {} {}", label, ms, "fast".dimmed()),
            "moderate" => eprintln!("      {:<8} {} {}", label, ms, "moderate".yellow()),
            other => eprintln!("      {:<8} {} {}", label, ms, other.red()),
        }
    }

    eprintln!("      {:<8} {:>8.2}ms\n", "Total".bold(), total.as_secs_f64() * 1000.0);
}

/// Format file size for display
pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * KB;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }

    #[test]
    fn test_pace_buckets() {
        assert_eq!(pace(Duration::from_millis(3)), "fast");
        assert_eq!(pace(Duration::from_millis(50)), "moderate");
        assert_eq!(pace(Duration::from_millis(250)), "slow");
    }

    #[test]
    fn test_step_label_is_right_aligned() {
        assert_eq!(step_label(1, 3), "  1/3");
        assert_eq!(step_label(10, 12), "10/12");
    }

    #[test]
    fn test_status_tags_share_width() {
        for kind in [Status::Info, Status::Done, Status::Warning] {
            assert_eq!(kind.tag().len(), 4);
        }
    }
}
