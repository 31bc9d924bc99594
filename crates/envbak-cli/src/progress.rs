//! Progress bar implementation for CLI operations.

use console::Term;
use envbak_core::ProgressCallback;
use indicatif::ProgressBar;
use indicatif::ProgressStyle;
use std::path::Path;

/// CLI progress bar wrapper implementing `ProgressCallback`.
///
/// A run is a sequence of passes (mirror, then archive). Each pass starts
/// its own entry count, so the bar is resized on the first entry of a pass
/// and relabelled after every `on_complete`.
pub struct CliProgress {
    bar: ProgressBar,
    phases: &'static [&'static str],
    phase: usize,
    bytes_written: u64,
}

impl CliProgress {
    /// Creates a progress bar that walks through `phases` labels in order.
    #[must_use]
    pub fn new(phases: &'static [&'static str]) -> Self {
        let bar = ProgressBar::new(0);

        // Template: "Archiving [████████░░░░] 42/100 entries (15.2 KB)"
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{prefix} [{bar:40.cyan/blue}] {pos}/{len} entries ({msg})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓░"),
        );

        let progress = Self {
            bar,
            phases,
            phase: 0,
            bytes_written: 0,
        };
        progress.relabel();
        progress
    }

    /// Checks if we should show progress (TTY detection).
    #[must_use]
    pub fn should_show() -> bool {
        Term::stdout().is_term()
    }

    fn label(&self) -> &'static str {
        self.phases
            .get(self.phase)
            .or_else(|| self.phases.last())
            .copied()
            .unwrap_or("Working")
    }

    fn relabel(&self) {
        self.bar.set_prefix(self.label());
        self.bar.set_message(humanize_bytes(self.bytes_written));
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressCallback for CliProgress {
    fn on_entry_start(&mut self, _path: &Path, total: usize, current: usize) {
        if current == 1 {
            self.bar.set_length(total as u64);
            self.bar.set_position(0);
            self.bar.reset_eta();
        }
    }

    fn on_bytes_written(&mut self, bytes: u64) {
        self.bytes_written += bytes;
        self.bar.set_message(humanize_bytes(self.bytes_written));
    }

    fn on_entry_complete(&mut self, _path: &Path) {
        self.bar.inc(1);
    }

    fn on_complete(&mut self) {
        self.phase += 1;
        self.bytes_written = 0;
        self.relabel();
    }
}

/// Converts bytes to human-readable format (KB, MB, GB).
fn humanize_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}
