//! Output formatting for the CLI.
//!
//! Rewritten HTML owns stdout. Status lines go to stderr and are
//! suppressed in JSON mode, where only machine-readable documents are
//! printed.

use console::{style, StyledObject};
use indicatif::{ProgressBar, ProgressStyle};
use rewrite_core::StreamStats;
use serde::Serialize;

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    fn status(&self, marker: StyledObject<&str>, msg: &str) {
        if !self.json {
            eprintln!("{} {}", marker, msg);
        }
    }

    pub fn info(&self, msg: &str) {
        self.status(style("ℹ").blue(), msg);
    }

    pub fn success(&self, msg: &str) {
        self.status(style("✓").green(), msg);
    }

    pub fn warn(&self, msg: &str) {
        self.status(style("⚠").yellow(), msg);
    }

    /// Errors are reported in both modes; JSON mode emits `{"error": ..}` on stderr.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        } else {
            eprintln!("{} {}", style("✗").red(), style(msg).red());
        }
    }

    /// Only shown with `--verbose`.
    pub fn debug(&self, msg: &str) {
        if self.verbose && !self.json {
            eprintln!("{} {}", style("→").dim(), style(msg).dim());
        }
    }

    pub fn header(&self, msg: &str) {
        if !self.json {
            eprintln!("\n{}", style(msg).bold().underlined());
        }
    }

    pub fn kv(&self, key: &str, value: &str) {
        if !self.json {
            eprintln!("  {}: {}", style(key).dim(), value);
        }
    }

    pub fn list_item(&self, item: &str) {
        if !self.json {
            eprintln!("  {} {}", style("•").dim(), item);
        }
    }

    /// Pretty JSON document on stdout.
    pub fn json<T: Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    /// Expected and actual markup, side by side.
    pub fn mismatch(&self, expected: &str, got: &str) {
        self.kv("expected", &style(expected).green().to_string());
        self.kv("got", &style(got).red().to_string());
    }

    /// Rewrite counters.
    ///
    /// Always on stderr: stdout may be carrying the rewritten document.
    pub fn stats(&self, stats: &StreamStats) {
        if self.json {
            eprintln!("{}", serde_json::json!({
                "chunks_in": stats.chunks_in,
                "bytes_in": stats.bytes_in,
                "chunks_out": stats.chunks_out,
                "bytes_out": stats.bytes_out,
                "size_ratio": stats.size_ratio(),
                "elapsed_us": stats.elapsed().as_micros() as u64,
            }));
            return;
        }

        self.header("Rewrite stats");
        self.kv("input", &counted(stats.bytes_in, stats.chunks_in));
        self.kv("output", &counted(stats.bytes_out, stats.chunks_out));
        if let Some(ratio) = stats.size_ratio() {
            self.kv("ratio", &format!("{:.1}%", ratio * 100.0));
        }
        self.kv("elapsed", &format!("{:?}", stats.elapsed()));
    }

    /// Progress bar over checked splits; hidden in JSON mode.
    pub fn progress(&self, len: u64, msg: &str) -> ProgressBar {
        if self.json {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(len);
        if let Ok(bar_style) =
            ProgressStyle::default_bar().template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(bar_style.progress_chars("#>-"));
        }
        pb.set_message(msg.to_string());
        pb
    }

    pub fn is_json(&self) -> bool {
        self.json
    }
}

fn counted(bytes: usize, chunks: usize) -> String {
    format!("{} in {} chunk(s)", format_bytes(bytes as u64), chunks)
}

/// Format bytes as human-readable size.
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
