//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use anyhow::Result;
use console::Term;
use console::style;
use envbak_core::ArchiveReport;
use envbak_core::BackupReport;
use envbak_core::MirrorReport;
use std::path::Path;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    fn format_size(bytes: u64) -> String {
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

    fn format_number(n: usize) -> String {
        let s = n.to_string();
        let mut result = String::new();
        let mut count = 0;

        for c in s.chars().rev() {
            if count == 3 {
                result.push(',');
                count = 0;
            }
            result.push(c);
            count += 1;
        }

        result.chars().rev().collect()
    }

    fn line(&self, text: &str) {
        let _ = self.term.write_line(text);
    }

    fn headline(&self, text: &str) {
        if self.use_colors {
            self.line(&format!("{} {text}", style("✓").green().bold()));
        } else {
            self.line(text);
        }
    }

    fn mirror_lines(&self, report: &MirrorReport) {
        self.line(&format!(
            "  Files copied:     {}",
            Self::format_number(report.files_copied)
        ));
        self.line(&format!(
            "  Total size:       {}",
            Self::format_size(report.bytes_copied)
        ));

        if self.verbose {
            self.line(&format!(
                "  Directories:      {}",
                Self::format_number(report.directories_created)
            ));
            self.line(&format!(
                "  Skipped subtrees: {}",
                Self::format_number(report.excluded.len())
            ));
            for path in &report.copied {
                self.line(&format!("    + {}", path.display()));
            }
            for path in &report.excluded {
                self.line(&format!("    - {}", path.display()));
            }
            self.line(&format!("  Duration:         {:?}", report.duration));
        }
    }

    fn archive_lines(&self, report: &ArchiveReport) {
        self.line(&format!(
            "  Entries:          {} files, {} directories",
            Self::format_number(report.files_added),
            Self::format_number(report.directories_added)
        ));
        self.line(&format!(
            "  Archive size:     {}",
            Self::format_size(report.archive_size)
        ));

        if report.bytes_written > 0 {
            self.line(&format!(
                "  Compression:      {:.1}%",
                report.compression_percentage()
            ));
        }
        if report.files_skipped > 0 {
            self.line(&format!("  Entries skipped:  {}", report.files_skipped));
        }
        if self.verbose {
            for name in &report.entries {
                self.line(&format!("    {name}"));
            }
            self.line(&format!("  Duration:         {:?}", report.duration));
        }
    }

    fn warnings<'a>(&self, warnings: impl Iterator<Item = &'a str>) {
        let mut warnings = warnings.peekable();
        if warnings.peek().is_none() {
            return;
        }

        self.line("");
        if self.use_colors {
            self.line(&format!("{}", style("Warnings:").yellow().bold()));
        } else {
            self.line("Warnings:");
        }
        for warning in warnings {
            self.line(&format!("  - {warning}"));
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_backup_result(&self, report: &BackupReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        self.headline(&format!(
            "Backup created: {}",
            report.archive_path.display()
        ));
        self.line("");
        self.mirror_lines(&report.mirror);
        self.archive_lines(&report.archive);

        if !report.mirror_removed {
            self.line(&format!("  Mirror kept:      {}", report.mirror_dir.display()));
        }
        if self.verbose {
            self.line(&format!("  Total duration:   {:?}", report.duration));
        }

        self.warnings(report.warnings());
        Ok(())
    }

    fn format_mirror_result(&self, dest: &Path, report: &MirrorReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        self.headline(&format!("Mirror complete: {}", dest.display()));
        self.line("");
        self.mirror_lines(report);
        self.warnings(report.warnings.iter().map(String::as_str));
        Ok(())
    }

    fn format_archive_result(&self, output_path: &Path, report: &ArchiveReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        self.headline(&format!("Archive created: {}", output_path.display()));
        self.line("");
        self.archive_lines(report);
        self.warnings(report.warnings.iter().map(String::as_str));
        Ok(())
    }

    fn format_error(&self, _operation: &str, _error: &anyhow::Error) {
        // Printed to stderr by the `main` return path.
    }
}
